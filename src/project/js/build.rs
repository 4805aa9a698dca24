// src/project/js/build.rs

use anyhow::Result;

use crate::dag::{BaseNode, Capabilities, Depth, Node, NodeRef, implements};
use crate::output::dockerfile::{self, ArtifactProducer, step};
use crate::output::{ci, makefile, template};
use crate::project::js::templates;
use crate::project::meta::Meta;

/// Production build of the JS project, embedded into a Go package.
#[derive(Debug)]
pub struct Build {
    base: BaseNode,
    embed_file: String,
    npm_cache_path: String,
}

impl Build {
    pub fn new(meta: &mut Meta, name: impl Into<String>) -> Self {
        let name = name.into();
        let embed_file = format!("internal/{name}/{name}.go");
        meta.add_source_file(embed_file.clone());

        Self {
            base: BaseNode::new(name),
            embed_file,
            npm_cache_path: meta.npm_cache_path.clone(),
        }
    }

    /// Directory inside the build stage holding the compiled assets.
    pub fn output_dir(&self) -> String {
        format!("/internal/{}/dist", self.name())
    }

    /// Go package name for the embed stub: the build name without the
    /// characters Go identifiers don't allow.
    fn package_name(&self) -> String {
        self.name()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase()
    }
}

impl Node for Build {
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
            .provide::<dyn template::Compiler>(|n| n)
            .provide::<dyn ArtifactProducer>(|n| n);
    }
}

impl template::Compiler for Build {
    fn compile_templates(&self, _node: NodeRef<'_>, output: &mut template::Output) -> Result<()> {
        output
            .define(&self.embed_file, templates::GO_EMBED)?
            .param("project", self.name())
            .param("package", self.package_name())
            .preamble_prefix("// ")
            .with_license();

        output
            .define(format!("internal/{}/dist/.gitkeep", self.name()), "")?
            .no_preamble();
        Ok(())
    }
}

impl dockerfile::Compiler for Build {
    fn compile_dockerfile(
        &self,
        _node: NodeRef<'_>,
        output: &mut dockerfile::Output,
    ) -> Result<()> {
        let output_dir = self.output_dir();

        output
            .stage(self.name())?
            .description(format!("builds {}", self.name()))
            .from("js")
            .step(step::script("npm run build").mount_cache(&self.npm_cache_path))
            .step(step::script(format!("mkdir -p {output_dir}")))
            .step(step::script(format!("cp -rf ./dist/* {output_dir}")));
        Ok(())
    }
}

impl ArtifactProducer for Build {
    fn artifacts(&self) -> Vec<String> {
        vec![self.output_dir()]
    }
}

impl makefile::Compiler for Build {
    fn compile_makefile(&self, node: NodeRef<'_>, output: &mut makefile::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn makefile::Compiler>(), Depth::Direct);

        output
            .target(self.name())?
            .description(format!("Builds js release for {}.", self.name()))
            .depends(depends)
            .script("@$(MAKE) local-$@ DEST=$(ARTIFACTS)")
            .phony();
        Ok(())
    }
}

impl ci::Compiler for Build {
    fn compile_ci(&self, node: NodeRef<'_>, output: &mut ci::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn ci::Compiler>(), Depth::Unbounded);
        output.step(ci::make_step(self.name()).depends_on(depends))?;
        Ok(())
    }
}
