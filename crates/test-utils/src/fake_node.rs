//! A node whose capabilities are chosen per instance, for exercising the
//! graph core without the project node catalogue.

use anyhow::{Result, bail};
use pipegen::dag::{BaseNode, Capabilities, Depth, Node, NodeRef, SkipAsDependency, implements};
use pipegen::output::dockerfile::{self, step};
use pipegen::output::{ci, makefile, template};

#[derive(Debug, Clone)]
pub struct FakeNode {
    base: BaseNode,
    makefile: bool,
    dockerfile: bool,
    ci: bool,
    templates: bool,
    skip: bool,
    fail_on: Option<&'static str>,
    template: &'static str,
}

impl FakeNode {
    /// A node with no capabilities at all.
    pub fn new(name: &str) -> Self {
        Self {
            base: BaseNode::new(name),
            makefile: false,
            dockerfile: false,
            ci: false,
            templates: false,
            skip: false,
            fail_on: None,
            template: "node {{ name }}\n",
        }
    }

    /// A node rendering into every format.
    pub fn full(name: &str) -> Self {
        Self::new(name).makefile().dockerfile().ci().templates()
    }

    pub fn makefile(mut self) -> Self {
        self.makefile = true;
        self
    }

    pub fn dockerfile(mut self) -> Self {
        self.dockerfile = true;
        self
    }

    pub fn ci(mut self) -> Self {
        self.ci = true;
        self
    }

    pub fn templates(mut self) -> Self {
        self.templates = true;
        self
    }

    pub fn skip_as_dependency(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Make the rendering call for `format` (an `OutputFormat::NAME`) fail.
    pub fn failing_on(mut self, format: &'static str) -> Self {
        self.fail_on = Some(format);
        self
    }

    /// Template source for the node's `<name>.txt` file. Only `name` is
    /// provided as a parameter.
    pub fn with_template(mut self, source: &'static str) -> Self {
        self.template = source;
        self
    }

    fn check(&self, format: &str) -> Result<()> {
        if self.fail_on == Some(format) {
            bail!("{} refuses to render {format}", self.name());
        }
        Ok(())
    }
}

impl Node for FakeNode {
    fn base(&self) -> &BaseNode {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseNode {
        &mut self.base
    }

    fn capabilities(&self, caps: &mut Capabilities<Self>) {
        if self.makefile {
            caps.provide::<dyn makefile::Compiler>(|n| n);
        }
        if self.dockerfile {
            caps.provide::<dyn dockerfile::Compiler>(|n| n);
        }
        if self.ci {
            caps.provide::<dyn ci::Compiler>(|n| n);
        }
        if self.templates {
            caps.provide::<dyn template::Compiler>(|n| n);
        }
        if self.skip {
            caps.provide::<dyn SkipAsDependency>(|n| n);
        }
    }
}

impl SkipAsDependency for FakeNode {}

impl makefile::Compiler for FakeNode {
    fn compile_makefile(&self, node: NodeRef<'_>, output: &mut makefile::Output) -> Result<()> {
        self.check("makefile")?;
        let depends =
            node.gather_matching_input_names(implements::<dyn makefile::Compiler>(), Depth::Direct);
        output
            .target(self.name())?
            .depends(depends)
            .script(format!("@echo {}", self.name()))
            .phony();
        Ok(())
    }
}

impl dockerfile::Compiler for FakeNode {
    fn compile_dockerfile(
        &self,
        _node: NodeRef<'_>,
        output: &mut dockerfile::Output,
    ) -> Result<()> {
        self.check("dockerfile")?;
        output
            .stage(self.name())?
            .from("scratch")
            .step(step::workdir(format!("/{}", self.name())));
        Ok(())
    }
}

impl ci::Compiler for FakeNode {
    fn compile_ci(&self, node: NodeRef<'_>, output: &mut ci::Output) -> Result<()> {
        self.check("ci")?;
        let depends =
            node.gather_matching_input_names(implements::<dyn ci::Compiler>(), Depth::Unbounded);
        output.step(ci::make_step(self.name()).depends_on(depends))?;
        Ok(())
    }
}

impl template::Compiler for FakeNode {
    fn compile_templates(&self, _node: NodeRef<'_>, output: &mut template::Output) -> Result<()> {
        self.check("templates")?;
        output
            .define(format!("{}.txt", self.name()), self.template)?
            .param("name", self.name());
        Ok(())
    }
}
