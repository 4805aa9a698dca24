// src/output/dockerfile/mod.rs

use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::dag::{NodeRef, OutputFormat};
use crate::output::{GENERATED_NOTICE, commented};

pub mod step;

pub use step::Step;

const SYNTAX: &str = "# syntax = docker/dockerfile-upstream:1.2.0-labs";

/// Capability: the node renders Dockerfile build stages.
pub trait Compiler {
    fn compile_dockerfile(&self, node: NodeRef<'_>, output: &mut Output) -> Result<()>;
}

/// Capability: the node's stage leaves files behind that later stages can
/// copy out with `COPY --from=<node name>`.
pub trait ArtifactProducer {
    fn artifacts(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct Stage {
    name: String,
    description: Option<String>,
    from: String,
    steps: Vec<Step>,
}

impl Stage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Base image or the name of an earlier stage.
    pub fn from(&mut self, base: impl Into<String>) -> &mut Self {
        self.from = base.into();
        self
    }

    pub fn step(&mut self, step: impl Into<Step>) -> &mut Self {
        self.steps.push(step.into());
        self
    }

    pub fn base(&self) -> &str {
        &self.from
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Dockerfile accumulator: global build args and ordered build stages.
#[derive(Debug, Default)]
pub struct Output {
    args: Vec<String>,
    stages: Vec<Stage>,
}

impl Output {
    /// Declare a global build argument (before the first `FROM`).
    pub fn arg(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.args.contains(&name) {
            self.args.push(name);
        }
        self
    }

    /// Start a new stage. Stage names must be unique.
    pub fn stage(&mut self, name: impl Into<String>) -> Result<&mut Stage> {
        let name = name.into();
        if self.stages.iter().any(|s| s.name == name) {
            bail!("dockerfile stage '{name}' is already defined");
        }
        self.stages.push(Stage {
            name,
            ..Stage::default()
        });
        let idx = self.stages.len() - 1;
        Ok(&mut self.stages[idx])
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn find_stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }
}

impl OutputFormat for Output {
    const NAME: &'static str = "dockerfile";
    type Compiler = dyn Compiler;

    fn compile(compiler: &Self::Compiler, node: NodeRef<'_>, output: &mut Self) -> Result<()> {
        compiler.compile_dockerfile(node, output)
    }
}

/// Serialize a finished Dockerfile accumulator.
///
/// Fails if a stage has no base, or references (via `FROM` or
/// `COPY --from`) a stage that is only defined after it.
pub fn render(output: &Output) -> Result<String> {
    let positions: HashMap<&str, usize> = output
        .stages
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.as_str(), i))
        .collect();

    for (i, stage) in output.stages.iter().enumerate() {
        if stage.from.is_empty() {
            bail!("dockerfile stage '{}' has no base image", stage.name);
        }

        let copies = stage.steps.iter().filter_map(|step| match step {
            Step::Copy(copy) => copy.source_stage(),
            _ => None,
        });
        for referenced in std::iter::once(stage.from.as_str()).chain(copies) {
            if positions.get(referenced).is_some_and(|&pos| pos >= i) {
                bail!(
                    "dockerfile stage '{}' references stage '{referenced}' which is not defined before it",
                    stage.name
                );
            }
        }
    }

    let mut lines = vec![SYNTAX.to_string(), String::new()];
    lines.extend(commented("# ", GENERATED_NOTICE));

    if !output.args.is_empty() {
        lines.push(String::new());
        lines.extend(output.args.iter().map(|arg| format!("ARG {arg}")));
    }

    for stage in &output.stages {
        lines.push(String::new());
        if let Some(description) = &stage.description {
            lines.extend(commented("# ", description));
        }
        lines.push(format!("FROM {} AS {}", stage.from, stage.name));
        lines.extend(stage.steps.iter().map(Step::render));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    Ok(text)
}
