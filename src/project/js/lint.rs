// src/project/js/lint.rs

use anyhow::Result;

use crate::dag::{BaseNode, Capabilities, Depth, Node, NodeRef, implements};
use crate::output::dockerfile::{self, step};
use crate::output::{ci, makefile, template};
use crate::project::js::templates;
use crate::project::meta::Meta;

/// eslint run over the project sources.
#[derive(Debug)]
pub struct Lint {
    base: BaseNode,
    npm_cache_path: String,
}

impl Lint {
    pub const NAME: &'static str = "lint-eslint";

    pub fn new(meta: &mut Meta) -> Self {
        meta.add_source_file(".eslintrc.yaml");

        Self {
            base: BaseNode::new(Self::NAME),
            npm_cache_path: meta.npm_cache_path.clone(),
        }
    }
}

impl Node for Lint {
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

impl template::Compiler for Lint {
    fn compile_templates(&self, _node: NodeRef<'_>, output: &mut template::Output) -> Result<()> {
        output.define(".eslintrc.yaml", templates::ESLINT)?;
        Ok(())
    }
}

impl dockerfile::Compiler for Lint {
    fn compile_dockerfile(
        &self,
        _node: NodeRef<'_>,
        output: &mut dockerfile::Output,
    ) -> Result<()> {
        output
            .stage(Self::NAME)?
            .description("runs eslint")
            .from("js")
            .step(step::script("npm run lint").mount_cache(&self.npm_cache_path));
        Ok(())
    }
}

impl makefile::Compiler for Lint {
    fn compile_makefile(&self, node: NodeRef<'_>, output: &mut makefile::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn makefile::Compiler>(), Depth::Direct);

        output
            .target(Self::NAME)?
            .description("Runs eslint linter.")
            .depends(depends)
            .script("@$(MAKE) target-$@")
            .phony();
        Ok(())
    }
}

impl ci::Compiler for Lint {
    fn compile_ci(&self, node: NodeRef<'_>, output: &mut ci::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn ci::Compiler>(), Depth::Unbounded);
        output.step(ci::make_step(Self::NAME).depends_on(depends))?;
        Ok(())
    }
}
