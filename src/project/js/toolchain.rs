// src/project/js/toolchain.rs

use std::path::Path;

use anyhow::{Result, bail};

use crate::config::JsSection;
use crate::dag::{BaseNode, Capabilities, Depth, Node, NodeRef, implements};
use crate::errors::PipegenError;
use crate::output::dockerfile::{self, step};
use crate::output::makefile::{self, VARIABLE_GROUP_DOCKER, overridable_variable};
use crate::output::{ci, template};
use crate::project::common::ToolchainBuilder;
use crate::project::js::{join_path, templates};
use crate::project::meta::Meta;

/// Package version stamped by `npm version` unless `make VERSION=...` is given.
const DEFAULT_PACKAGE_VERSION: &str = "0.0.0-dev";

/// Node.js runtime plus the project sources: the `js` stage every JS build,
/// lint and test stage starts from.
#[derive(Debug)]
pub struct Toolchain {
    base: BaseNode,
    source_dir: String,
    version: String,
    image: Option<String>,
    npm_cache_path: String,
    go_path: String,
    directories: Vec<String>,
    source_files: Vec<String>,
    eslint_config: bool,
    jest_config: bool,
}

impl Toolchain {
    pub const NAME: &'static str = "js";

    pub fn new(meta: &mut Meta, js: &JsSection) -> Self {
        meta.add_build_arg("JS_TOOLCHAIN");
        meta.add_build_arg("VERSION");
        meta.add_source_file(".babelrc");
        meta.add_source_file(".tsconfig");
        meta.add_source_file("go.mod");
        meta.add_source_file("go.sum");
        meta.add_source_file(js.source_dir.clone());
        for directory in &js.directories {
            meta.add_source_file(directory.clone());
        }
        for file in &js.source_files {
            meta.add_source_file(file.clone());
        }

        Self {
            base: BaseNode::new(Self::NAME),
            source_dir: js.source_dir.clone(),
            version: js.version.clone(),
            image: js.image.clone(),
            npm_cache_path: meta.npm_cache_path.clone(),
            go_path: meta.go_path.clone(),
            directories: js.directories.clone(),
            source_files: js.source_files.clone(),
            eslint_config: js.lint,
            jest_config: js.unit_tests,
        }
    }

    /// Toolchain image reference: the explicit image, or the official
    /// Node.js image at the configured version.
    pub fn image(&self) -> String {
        match &self.image {
            Some(image) => image.clone(),
            None => format!("docker.io/node:{}", self.version),
        }
    }
}

impl Node for Toolchain {
    fn base(&self) -> &BaseNode {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseNode {
        &mut self.base
    }

    fn capabilities(&self, caps: &mut Capabilities<Self>) {
        caps.provide::<dyn makefile::Compiler>(|n| n)
            .provide::<dyn dockerfile::Compiler>(|n| n)
            .provide::<dyn ci::Compiler>(|n| n)
            .provide::<dyn template::Compiler>(|n| n);
    }
}

impl template::Compiler for Toolchain {
    fn compile_templates(&self, _node: NodeRef<'_>, output: &mut template::Output) -> Result<()> {
        output.define(".babelrc", templates::BABEL)?.preamble_prefix("// ");
        output.define(".tsconfig", templates::TSCONFIG)?.no_preamble();
        Ok(())
    }
}

impl makefile::Compiler for Toolchain {
    fn compile_makefile(&self, _node: NodeRef<'_>, output: &mut makefile::Output) -> Result<()> {
        output
            .variable_group(VARIABLE_GROUP_DOCKER)
            .variable(overridable_variable("JS_TOOLCHAIN", self.image()))
            .variable(overridable_variable("VERSION", DEFAULT_PACKAGE_VERSION));

        output
            .target(Self::NAME)?
            .description("Prepare js base toolchain.")
            .script("@$(MAKE) target-$@")
            .phony();
        Ok(())
    }
}

impl ci::Compiler for Toolchain {
    fn compile_ci(&self, node: NodeRef<'_>, output: &mut ci::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn ci::Compiler>(), Depth::Unbounded);
        output.step(ci::make_step(Self::NAME).depends_on(depends))?;
        Ok(())
    }
}

impl dockerfile::Compiler for Toolchain {
    fn compile_dockerfile(&self, node: NodeRef<'_>, output: &mut dockerfile::Output) -> Result<()> {
        if Path::new(&self.source_dir).is_absolute() {
            bail!("js source dir '{}' must be relative to the project root", self.source_dir);
        }

        output.arg("JS_TOOLCHAIN").arg("VERSION");

        output
            .stage("js-toolchain")?
            .description("base toolchain image")
            .from("${JS_TOOLCHAIN}")
            .step(step::run([
                "apk", "--update", "--no-cache", "add", "bash", "curl", "protoc", "protobuf-dev",
                "go",
            ]))
            .step(step::copy("./go.mod", "."))
            .step(step::copy("./go.sum", "."))
            .step(step::env("GOPATH", &self.go_path));

        let base = output.stage(Self::NAME)?;
        base.description("tools and sources")
            .from("js-toolchain")
            .step(step::workdir("/src"));

        node.walk_inputs(Depth::Direct, |input| {
            match input.capability::<dyn ToolchainBuilder>() {
                Some(builder) => builder.toolchain_build(base).map_err(PipegenError::from),
                None => Ok(()),
            }
        })?;

        base.step(step::copy(join_path(&self.source_dir, "package.json"), "./"))
            .step(step::copy(join_path(&self.source_dir, "package-lock.json"), "./"))
            .step(step::arg("VERSION"))
            .step(step::script("npm version ${VERSION}").mount_cache(&self.npm_cache_path))
            .step(step::script("npm install").mount_cache(&self.npm_cache_path));

        if self.eslint_config {
            base.step(step::copy(".eslintrc.yaml", "./"));
        }
        base.step(step::copy(".babelrc", "./babel.config.js"));
        if self.jest_config {
            base.step(step::copy(".jestrc", "./jest.config.js"));
        }
        base.step(step::copy(".tsconfig", "./tsconfig.json"));

        for directory in &self.directories {
            let dest = directory
                .strip_prefix(self.source_dir.as_str())
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .unwrap_or(directory)
                .trim_matches('/');
            base.step(step::copy(format!("./{directory}"), format!("./{dest}")));
        }

        for file in &self.source_files {
            let dest = Path::new(file)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.clone());
            base.step(step::copy(file, format!("./{dest}")));
        }

        Ok(())
    }
}
