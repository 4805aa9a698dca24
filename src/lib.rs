// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod output;
pub mod project;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::dag::Graph;
use crate::engine::{Artifacts, Generator};
use crate::errors::PipegenError;
use crate::fs::{FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
pub fn run(args: CliArgs) -> Result<()> {
    execute(&args, &RealFileSystem)
}

/// Load the project, generate every artifact, then write, check or print
/// them depending on the flags. Generated files go through `fs`; the
/// project file itself is always read from disk.
pub fn execute(args: &CliArgs, fs: &dyn FileSystem) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let project = load_and_validate(&config_path)?;
    let root = args
        .root
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config_root_dir(&config_path));
    info!(project = %project.project.name, root = ?root, "generating project files");

    let mut generator = Generator::new(project);
    let artifacts = generator.generate()?;

    if args.dry_run {
        if let Some(graph) = generator.graph() {
            print_dry_run(graph, &artifacts)?;
        }
        return Ok(());
    }

    if args.check {
        let stale = artifacts.stale(fs, &root);
        if !stale.is_empty() {
            let names = stale.iter().map(|p| p.display().to_string()).collect();
            return Err(PipegenError::Stale(names).into());
        }
        info!(files = artifacts.len(), "generated files are up to date");
        return Ok(());
    }

    artifacts.write_all(fs, &root)?;
    Ok(())
}

/// Directory containing the project file, or `.`.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Print the render order with each node's capabilities, then the files a
/// real run would write.
fn print_dry_run(graph: &Graph, artifacts: &Artifacts) -> Result<()> {
    println!("pipegen dry-run");
    println!();

    println!("nodes ({}):", graph.len());
    for name in graph.topological_order()? {
        let Some(node) = graph.find(&name) else {
            continue;
        };
        println!("  - {name}");
        let inputs: Vec<&str> = node.inputs().map(|input| input.name()).collect();
        if !inputs.is_empty() {
            println!("      inputs: {:?}", inputs);
        }
        for capability in node.capability_names() {
            println!("      capability: {capability}");
        }
    }
    println!();

    println!("files ({}):", artifacts.len());
    for file in artifacts.files() {
        println!("  - {} ({} bytes)", file.path.display(), file.contents.len());
    }

    debug!("dry-run complete (nothing written)");
    Ok(())
}
