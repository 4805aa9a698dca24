// src/project/js/unit_tests.rs

use anyhow::Result;

use crate::dag::{BaseNode, Capabilities, Depth, Node, NodeRef, implements};
use crate::output::dockerfile::{self, step};
use crate::output::{ci, makefile, template};
use crate::project::js::templates;
use crate::project::meta::Meta;

/// jest run over the project sources.
#[derive(Debug)]
pub struct UnitTests {
    base: BaseNode,
    npm_cache_path: String,
}

impl UnitTests {
    pub const NAME: &'static str = "unit-tests-frontend";

    pub fn new(meta: &mut Meta) -> Self {
        meta.add_source_file(".jestrc");

        Self {
            base: BaseNode::new(Self::NAME),
            npm_cache_path: meta.npm_cache_path.clone(),
        }
    }
}

impl Node for UnitTests {
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

impl template::Compiler for UnitTests {
    fn compile_templates(&self, _node: NodeRef<'_>, output: &mut template::Output) -> Result<()> {
        output
            .define(".jestrc", templates::JEST)?
            .preamble_prefix("// ");
        Ok(())
    }
}

impl dockerfile::Compiler for UnitTests {
    fn compile_dockerfile(
        &self,
        _node: NodeRef<'_>,
        output: &mut dockerfile::Output,
    ) -> Result<()> {
        output
            .stage(Self::NAME)?
            .description("runs js unit-tests")
            .from("js")
            .step(step::script("npm run test").mount_cache(&self.npm_cache_path));
        Ok(())
    }
}

impl makefile::Compiler for UnitTests {
    fn compile_makefile(&self, node: NodeRef<'_>, output: &mut makefile::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn makefile::Compiler>(), Depth::Direct);

        output
            .target(Self::NAME)?
            .description("Performs unit tests for the frontend.")
            .depends(depends)
            .script("@$(MAKE) target-$@")
            .phony();
        Ok(())
    }
}

impl ci::Compiler for UnitTests {
    fn compile_ci(&self, node: NodeRef<'_>, output: &mut ci::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn ci::Compiler>(), Depth::Unbounded);
        output.step(ci::make_step(Self::NAME).depends_on(depends))?;
        Ok(())
    }
}
