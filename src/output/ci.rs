// src/output/ci.rs

//! CI pipeline steps (`.drone.yml`).

use anyhow::{Result, bail};

use crate::dag::{NodeRef, OutputFormat};
use crate::output::{GENERATED_NOTICE, commented};

/// Capability: the node contributes a CI pipeline step.
pub trait Compiler {
    fn compile_ci(&self, node: NodeRef<'_>, output: &mut Output) -> Result<()>;
}

/// A pipeline step running one Makefile target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    name: String,
    target: String,
    depends_on: Vec<String>,
}

/// Step named after (and running) the Makefile target `name`.
pub fn make_step(name: impl Into<String>) -> Step {
    let name = name.into();
    Step {
        target: name.clone(),
        name,
        depends_on: Vec::new(),
    }
}

impl Step {
    /// Run a different Makefile target than the step name.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn depends_on<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for step in steps {
            let step = step.into();
            if !self.depends_on.contains(&step) {
                self.depends_on.push(step);
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn make_target(&self) -> &str {
        &self.target
    }

    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }
}

/// CI accumulator: ordered pipeline steps.
#[derive(Debug, Default)]
pub struct Output {
    steps: Vec<Step>,
}

impl Output {
    /// Append a step. Step names must be unique.
    pub fn step(&mut self, step: Step) -> Result<&mut Self> {
        if self.steps.iter().any(|s| s.name == step.name) {
            bail!("ci step '{}' is already defined", step.name);
        }
        self.steps.push(step);
        Ok(self)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn find_step(&self, name: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.name == name)
    }
}

impl OutputFormat for Output {
    const NAME: &'static str = "ci";
    type Compiler = dyn Compiler;

    fn compile(compiler: &Self::Compiler, node: NodeRef<'_>, output: &mut Self) -> Result<()> {
        compiler.compile_ci(node, output)
    }
}

/// Pipeline-level settings that do not come from nodes.
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    pub name: &'a str,
    pub image: &'a str,
}

/// Serialize a finished CI accumulator as a pipeline document.
///
/// Fails if a step depends on a step that does not exist or comes later.
pub fn render(output: &Output, pipeline: &Pipeline<'_>) -> Result<String> {
    for (i, step) in output.steps.iter().enumerate() {
        for dep in &step.depends_on {
            match output.steps.iter().position(|s| &s.name == dep) {
                Some(pos) if pos < i => {}
                Some(_) => bail!("ci step '{}' depends on later step '{dep}'", step.name),
                None => bail!("ci step '{}' depends on unknown step '{dep}'", step.name),
            }
        }
    }

    let mut lines = commented("# ", GENERATED_NOTICE);
    lines.push("---".to_string());
    lines.push("kind: pipeline".to_string());
    lines.push("type: docker".to_string());
    lines.push(format!("name: {}", pipeline.name));
    lines.push(String::new());
    if output.steps.is_empty() {
        lines.push("steps: []".to_string());
    } else {
        lines.push("steps:".to_string());
    }

    for step in &output.steps {
        lines.push(format!("  - name: {}", step.name));
        lines.push(format!("    image: {}", pipeline.image));
        lines.push("    commands:".to_string());
        lines.push(format!("      - make {}", step.target));
        if !step.depends_on.is_empty() {
            lines.push("    depends_on:".to_string());
            lines.extend(step.depends_on.iter().map(|dep| format!("      - {dep}")));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    Ok(text)
}
