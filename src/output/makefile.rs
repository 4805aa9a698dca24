// src/output/makefile.rs

use anyhow::{Result, bail};
use indexmap::IndexMap;

use crate::dag::{NodeRef, OutputFormat};
use crate::output::{GENERATED_NOTICE, commented};

/// Group holding variables shared by every target.
pub const VARIABLE_GROUP_COMMON: &str = "common variables";
/// Group holding docker build settings.
pub const VARIABLE_GROUP_DOCKER: &str = "docker build settings";

/// Capability: the node renders Makefile variables and targets.
pub trait Compiler {
    fn compile_makefile(&self, node: NodeRef<'_>, output: &mut Output) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// `NAME := value`
    Simple,
    /// `NAME = value`, expanded on use.
    Recursive,
    /// `NAME ?= value`, overridable from the environment or command line.
    Overridable,
    /// `NAME += value`
    Append,
}

impl Assignment {
    fn operator(self) -> &'static str {
        match self {
            Assignment::Simple => ":=",
            Assignment::Recursive => "=",
            Assignment::Overridable => "?=",
            Assignment::Append => "+=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: String,
    pub assignment: Assignment,
}

pub fn simple_variable(name: impl Into<String>, value: impl Into<String>) -> Variable {
    Variable {
        name: name.into(),
        value: value.into(),
        assignment: Assignment::Simple,
    }
}

/// Variable expanded where it is used, so it may reference variables that
/// are only defined further down the Makefile.
pub fn recursive_variable(name: impl Into<String>, value: impl Into<String>) -> Variable {
    Variable {
        name: name.into(),
        value: value.into(),
        assignment: Assignment::Recursive,
    }
}

pub fn overridable_variable(name: impl Into<String>, value: impl Into<String>) -> Variable {
    Variable {
        name: name.into(),
        value: value.into(),
        assignment: Assignment::Overridable,
    }
}

pub fn append_variable(name: impl Into<String>, value: impl Into<String>) -> Variable {
    Variable {
        name: name.into(),
        value: value.into(),
        assignment: Assignment::Append,
    }
}

#[derive(Debug, Clone, Default)]
pub struct VariableGroup {
    variables: Vec<Variable>,
}

impl VariableGroup {
    pub fn variable(&mut self, variable: Variable) -> &mut Self {
        self.variables.push(variable);
        self
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
}

#[derive(Debug, Clone, Default)]
pub struct Target {
    name: String,
    description: Option<String>,
    depends: Vec<String>,
    script: Vec<String>,
    phony: bool,
}

impl Target {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn depends<I, S>(&mut self, depends: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dep in depends {
            let dep = dep.into();
            if !self.depends.contains(&dep) {
                self.depends.push(dep);
            }
        }
        self
    }

    pub fn script(&mut self, line: impl Into<String>) -> &mut Self {
        self.script.push(line.into());
        self
    }

    pub fn phony(&mut self) -> &mut Self {
        self.phony = true;
        self
    }

    pub fn dependencies(&self) -> &[String] {
        &self.depends
    }

    pub fn script_lines(&self) -> &[String] {
        &self.script
    }

    pub fn is_phony(&self) -> bool {
        self.phony
    }
}

/// Makefile accumulator: variable groups (in first-use order) and targets.
#[derive(Debug, Default)]
pub struct Output {
    groups: IndexMap<String, VariableGroup>,
    targets: Vec<Target>,
}

impl Output {
    /// Get or create a variable group.
    pub fn variable_group(&mut self, name: &str) -> &mut VariableGroup {
        self.groups.entry(name.to_string()).or_default()
    }

    /// Start a new target. Target names must be unique.
    pub fn target(&mut self, name: impl Into<String>) -> Result<&mut Target> {
        let name = name.into();
        if self.targets.iter().any(|t| t.name == name) {
            bail!("makefile target '{name}' is already defined");
        }
        self.targets.push(Target {
            name,
            ..Target::default()
        });
        let idx = self.targets.len() - 1;
        Ok(&mut self.targets[idx])
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn find_target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &VariableGroup)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.targets.is_empty()
    }
}

impl OutputFormat for Output {
    const NAME: &'static str = "makefile";
    type Compiler = dyn Compiler;

    fn compile(compiler: &Self::Compiler, node: NodeRef<'_>, output: &mut Self) -> Result<()> {
        compiler.compile_makefile(node, output)
    }
}

/// Serialize a finished Makefile accumulator.
pub fn render(output: &Output) -> String {
    let mut lines = commented("# ", GENERATED_NOTICE);

    for (name, group) in output.groups() {
        if group.variables.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("# {name}"));
        lines.push(String::new());
        for var in &group.variables {
            let line = format!("{} {} {}", var.name, var.assignment.operator(), var.value);
            lines.push(line.trim_end().to_string());
        }
    }

    if !output.targets.is_empty() {
        lines.push(String::new());
        lines.push("# targets".to_string());
    }

    for target in &output.targets {
        lines.push(String::new());
        if target.phony {
            lines.push(format!(".PHONY: {}", target.name));
        }

        let mut header = format!("{}:", target.name);
        if !target.depends.is_empty() {
            header.push(' ');
            header.push_str(&target.depends.join(" "));
        }
        if let Some(description) = &target.description {
            header.push_str("  ## ");
            header.push_str(description);
        }
        lines.push(header);

        for line in &target.script {
            lines.push(format!("\t{line}"));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
