// src/project/js/protobuf.rs

use std::path::Path;

use anyhow::{Result, bail};

use crate::config::ProtobufSection;
use crate::dag::{BaseNode, Capabilities, Node};
use crate::output::dockerfile::{Stage, step};
use crate::project::common::ToolchainBuilder;
use crate::project::meta::Meta;

/// Generates JS stubs from `.proto` specs inside the toolchain stage.
#[derive(Debug)]
pub struct Protobuf {
    base: BaseNode,
    specs: Vec<String>,
    out_dir: String,
}

impl Protobuf {
    pub const NAME: &'static str = "protobuf";

    pub fn new(meta: &mut Meta, section: &ProtobufSection) -> Self {
        for spec in &section.specs {
            meta.add_source_file(spec.clone());
        }

        Self {
            base: BaseNode::new(Self::NAME),
            specs: section.specs.clone(),
            out_dir: section.out_dir.trim_matches('/').to_string(),
        }
    }
}

impl Node for Protobuf {
    fn base(&self) -> &BaseNode {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseNode {
        &mut self.base
    }

    fn capabilities(&self, caps: &mut Capabilities<Self>) {
        caps.provide::<dyn ToolchainBuilder>(|n| n);
    }
}

impl ToolchainBuilder for Protobuf {
    fn toolchain_build(&self, stage: &mut Stage) -> Result<()> {
        if self.specs.is_empty() {
            bail!("protobuf node has no spec files");
        }

        for spec in &self.specs {
            let Some(file_name) = Path::new(spec).file_name() else {
                bail!("protobuf spec '{spec}' has no file name");
            };
            stage.step(step::copy(
                spec,
                format!("/protobuf/{}", file_name.to_string_lossy()),
            ));
        }

        let out_dir = format!("./{}", self.out_dir);
        stage
            .step(step::run(["mkdir", "-p", out_dir.as_str()]))
            .step(step::script(format!(
                "protoc -I/protobuf --js_out=import_style=commonjs,binary:{out_dir} /protobuf/*.proto"
            )));
        Ok(())
    }
}
