// src/output/template.rs

//! Scaffolded files rendered from templates.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use minijinja::{Environment, UndefinedBehavior};

use crate::dag::{NodeRef, OutputFormat};
use crate::output::{GENERATED_NOTICE, commented};

/// Capability: the node defines scaffolded files.
pub trait Compiler {
    fn compile_templates(&self, node: NodeRef<'_>, output: &mut Output) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preamble {
    /// Generated-file notice with the given comment prefix, optionally
    /// preceded by the project license header.
    Generated { prefix: String, license: bool },
    /// File is emitted exactly as rendered.
    None,
}

impl Default for Preamble {
    fn default() -> Self {
        Preamble::Generated {
            prefix: "# ".to_string(),
            license: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileDef {
    path: String,
    template: String,
    params: BTreeMap<String, String>,
    preamble: Preamble,
    origin: Option<String>,
}

impl FileDef {
    pub fn param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Comment prefix for the generated-file notice.
    pub fn preamble_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        let license = matches!(self.preamble, Preamble::Generated { license: true, .. });
        self.preamble = Preamble::Generated {
            prefix: prefix.into(),
            license,
        };
        self
    }

    /// Put the project license header above the notice.
    pub fn with_license(&mut self) -> &mut Self {
        if let Preamble::Generated { license, .. } = &mut self.preamble {
            *license = true;
        }
        self
    }

    pub fn no_preamble(&mut self) -> &mut Self {
        self.preamble = Preamble::None;
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn preamble(&self) -> &Preamble {
        &self.preamble
    }

    /// Name of the node that defined this file, when it was defined during
    /// a dispatch pass.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }
}

/// Template accumulator: file definitions keyed by destination path.
#[derive(Debug, Default)]
pub struct Output {
    files: IndexMap<String, FileDef>,
    /// Node currently rendering into this accumulator.
    current: Option<String>,
}

impl Output {
    /// Define a new file. Destination paths must be unique.
    pub fn define(
        &mut self,
        path: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<&mut FileDef> {
        let path = path.into();
        if let Some(existing) = self.files.get(&path) {
            match existing.origin() {
                Some(node) => bail!("file '{path}' is already defined by node '{node}'"),
                None => bail!("file '{path}' is already defined"),
            }
        }
        let def = FileDef {
            path: path.clone(),
            template: template.into(),
            origin: self.current.clone(),
            ..FileDef::default()
        };
        Ok(self.files.entry(path).or_insert(def))
    }

    pub fn files(&self) -> impl Iterator<Item = &FileDef> {
        self.files.values()
    }

    pub fn get(&self, path: &str) -> Option<&FileDef> {
        self.files.get(path)
    }
}

impl OutputFormat for Output {
    const NAME: &'static str = "templates";
    type Compiler = dyn Compiler;

    fn compile(compiler: &Self::Compiler, node: NodeRef<'_>, output: &mut Self) -> Result<()> {
        output.current = Some(node.name().to_string());
        let result = compiler.compile_templates(node, output);
        output.current = None;
        result
    }
}

/// Render one file definition to its final contents.
///
/// Template parameters are strict: referencing a parameter that was not
/// provided is an error.
pub fn render_file(def: &FileDef, license: Option<&str>) -> Result<String> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    let body = env
        .render_str(&def.template, &def.params)
        .with_context(|| format!("evaluating template for {}", def.path))?;

    let Preamble::Generated {
        prefix,
        license: with_license,
    } = &def.preamble
    else {
        return Ok(body);
    };

    let mut lines = Vec::new();
    if *with_license {
        if let Some(text) = license {
            lines.extend(commented(prefix, text.trim_end()));
            lines.push(String::new());
        }
    }
    lines.extend(commented(prefix, GENERATED_NOTICE));
    lines.push(String::new());

    let mut text = lines.join("\n");
    text.push('\n');
    text.push_str(&body);
    Ok(text)
}
