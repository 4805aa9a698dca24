// src/project/common.rs

//! Nodes shared by every project flavour.

use anyhow::{Result, bail};

use crate::dag::{BaseNode, Capabilities, Depth, Node, NodeRef, SkipAsDependency, implements};
use crate::output::dockerfile::{self, ArtifactProducer, Stage, step};
use crate::output::makefile::{
    self, VARIABLE_GROUP_COMMON, VARIABLE_GROUP_DOCKER, append_variable, overridable_variable,
    recursive_variable, simple_variable,
};
use crate::output::{ci, template};
use crate::project::meta::Meta;

/// Capability: the node contributes steps to the JS base stage (the stage
/// every JS build starts from). Only direct inputs of the toolchain are asked.
pub trait ToolchainBuilder {
    fn toolchain_build(&self, stage: &mut Stage) -> Result<()>;
}

/// Docker build plumbing: Makefile variables and pattern targets, global
/// Dockerfile args and the `.dockerignore` allow-list.
///
/// Built from the final [`Meta`] snapshot, so it must be constructed after
/// every other node has registered its build args and source files.
#[derive(Debug)]
pub struct Docker {
    base: BaseNode,
    artifacts: String,
    build_args: Vec<String>,
    source_files: Vec<String>,
}

impl Docker {
    pub const NAME: &'static str = "docker";

    pub fn new(meta: &Meta) -> Self {
        Self {
            base: BaseNode::new(Self::NAME),
            artifacts: meta.artifacts.clone(),
            build_args: meta.build_args.clone(),
            source_files: meta.source_files.clone(),
        }
    }
}

impl Node for Docker {
    fn base(&self) -> &BaseNode {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseNode {
        &mut self.base
    }

    fn capabilities(&self, caps: &mut Capabilities<Self>) {
        caps.provide::<dyn makefile::Compiler>(|n| n)
            .provide::<dyn dockerfile::Compiler>(|n| n)
            .provide::<dyn template::Compiler>(|n| n)
            .provide::<dyn SkipAsDependency>(|n| n);
    }
}

impl SkipAsDependency for Docker {}

impl makefile::Compiler for Docker {
    fn compile_makefile(&self, _node: NodeRef<'_>, output: &mut makefile::Output) -> Result<()> {
        output
            .variable_group(VARIABLE_GROUP_COMMON)
            .variable(simple_variable("ARTIFACTS", &self.artifacts));

        let group = output.variable_group(VARIABLE_GROUP_DOCKER);
        group
            .variable(simple_variable("BUILD", "docker buildx build"))
            .variable(overridable_variable("PLATFORM", "linux/amd64"))
            .variable(overridable_variable("PROGRESS", "auto"))
            .variable(recursive_variable("COMMON_ARGS", "--file=Dockerfile"))
            .variable(append_variable("COMMON_ARGS", "--progress=$(PROGRESS)"))
            .variable(append_variable("COMMON_ARGS", "--platform=$(PLATFORM)"));
        for arg in &self.build_args {
            group.variable(append_variable(
                "COMMON_ARGS",
                format!("--build-arg={arg}=$({arg})"),
            ));
        }

        output
            .target("target-%")?
            .description("Builds the specified target defined in the Dockerfile.")
            .script("@$(BUILD) --target=$* $(COMMON_ARGS) $(TARGET_ARGS) .");

        output
            .target("local-%")?
            .description("Builds the specified target and exports its filesystem to DEST.")
            .script(r#"@$(MAKE) target-$* TARGET_ARGS="--output=type=local,dest=$(DEST) $(TARGET_ARGS)""#);

        Ok(())
    }
}

impl dockerfile::Compiler for Docker {
    fn compile_dockerfile(
        &self,
        _node: NodeRef<'_>,
        output: &mut dockerfile::Output,
    ) -> Result<()> {
        for arg in &self.build_args {
            output.arg(arg);
        }
        Ok(())
    }
}

impl template::Compiler for Docker {
    fn compile_templates(&self, _node: NodeRef<'_>, output: &mut template::Output) -> Result<()> {
        let mut entries = vec!["*".to_string()];
        entries.extend(self.source_files.iter().map(|file| format!("!{file}")));

        output
            .define(".dockerignore", "{{ entries }}\n")?
            .param("entries", entries.join("\n"));
        Ok(())
    }
}

/// Final image assembled `FROM scratch` out of the artifacts of its direct
/// inputs.
#[derive(Debug)]
pub struct Image {
    base: BaseNode,
}

impl Image {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseNode::new(name),
        }
    }
}

impl Node for Image {
    fn base(&self) -> &BaseNode {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseNode {
        &mut self.base
    }

    fn capabilities(&self, caps: &mut Capabilities<Self>) {
        caps.provide::<dyn makefile::Compiler>(|n| n)
            .provide::<dyn dockerfile::Compiler>(|n| n)
            .provide::<dyn ci::Compiler>(|n| n);
    }
}

impl dockerfile::Compiler for Image {
    fn compile_dockerfile(&self, node: NodeRef<'_>, output: &mut dockerfile::Output) -> Result<()> {
        let producers: Vec<_> = node
            .inputs()
            .filter_map(|input| {
                input
                    .capability::<dyn ArtifactProducer>()
                    .map(|producer| (input.name(), producer.artifacts()))
            })
            .collect();

        if producers.is_empty() {
            bail!("image '{}' has no inputs producing artifacts", self.name());
        }

        let stage = output.stage(self.name())?;
        stage
            .description(format!("{} image", self.name()))
            .from("scratch");
        for (source, artifacts) in producers {
            for artifact in artifacts {
                stage.step(step::copy(&artifact, &artifact).from_stage(source));
            }
        }
        Ok(())
    }
}

impl makefile::Compiler for Image {
    fn compile_makefile(&self, node: NodeRef<'_>, output: &mut makefile::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn makefile::Compiler>(), Depth::Direct);

        output
            .target(self.name())?
            .description(format!("Builds image for {}.", self.name()))
            .depends(depends)
            .script("@$(MAKE) target-$@")
            .phony();
        Ok(())
    }
}

impl ci::Compiler for Image {
    fn compile_ci(&self, node: NodeRef<'_>, output: &mut ci::Output) -> Result<()> {
        let depends =
            node.gather_matching_input_names(implements::<dyn ci::Compiler>(), Depth::Unbounded);
        output.step(ci::make_step(self.name()).depends_on(depends))?;
        Ok(())
    }
}
