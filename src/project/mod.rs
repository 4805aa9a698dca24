// src/project/mod.rs

//! Turning a validated project description into a node graph.
//!
//! Layout of the assembled graph (edges point from dependency to dependent):
//!
//! ```text
//! docker ─┐
//!         ├─> js ─┬─> lint-eslint
//! protobuf┘       ├─> unit-tests-frontend
//!                 └─> <build>... ─> <image>
//! ```

use tracing::{debug, info};

use crate::config::ProjectFile;
use crate::dag::Graph;
use crate::errors::Result;

pub mod common;
pub mod js;
pub mod meta;

pub use meta::Meta;

/// Build the node graph for `cfg` and check it is acyclic.
///
/// Node construction happens before graph insertion so that every node has
/// registered its build args and source files by the time the docker node
/// takes its snapshot of [`Meta`].
pub fn assemble(cfg: &ProjectFile) -> Result<Graph> {
    let mut meta = Meta::from_project(cfg);

    let protobuf = cfg
        .protobuf
        .as_ref()
        .map(|section| js::Protobuf::new(&mut meta, section));
    let toolchain = js::Toolchain::new(&mut meta, &cfg.js);
    let lint = cfg.js.lint.then(|| js::Lint::new(&mut meta));
    let unit_tests = cfg.js.unit_tests.then(|| js::UnitTests::new(&mut meta));
    let builds: Vec<js::Build> = cfg
        .build
        .iter()
        .map(|section| js::Build::new(&mut meta, section.name.clone()))
        .collect();
    let image = cfg.image.as_ref().map(|section| common::Image::new(section.name.clone()));
    let docker = common::Docker::new(&meta);

    let mut graph = Graph::new();

    let mut toolchain_inputs = vec![graph.add(docker)?];
    if let Some(protobuf) = protobuf {
        toolchain_inputs.push(graph.add(protobuf)?);
    }
    let toolchain = graph.add(toolchain)?;
    graph.add_input(toolchain, &toolchain_inputs)?;

    if let Some(lint) = lint {
        let id = graph.add(lint)?;
        graph.add_input(id, &[toolchain])?;
    }
    if let Some(unit_tests) = unit_tests {
        let id = graph.add(unit_tests)?;
        graph.add_input(id, &[toolchain])?;
    }

    let mut build_ids = Vec::with_capacity(builds.len());
    for build in builds {
        let id = graph.add(build)?;
        graph.add_input(id, &[toolchain])?;
        build_ids.push(id);
    }
    for section in &cfg.build {
        for dependency in &section.after {
            debug!(build = %section.name, after = %dependency, "adding build ordering edge");
            graph.connect(&section.name, dependency)?;
        }
    }

    if let Some(image) = image {
        let id = graph.add(image)?;
        graph.add_input(id, &build_ids)?;
    }

    graph.validate()?;
    info!(project = %cfg.project.name, nodes = graph.len(), "project graph assembled");
    Ok(graph)
}
