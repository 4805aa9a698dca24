// src/dag/dispatch.rs

//! Capability dispatch: one pass per output format.
//!
//! An output format is an accumulator type plus the capability a node must
//! implement to render into it. [`dispatch`] walks the graph in dependency
//! order, hands the accumulator to every capable node and skips the rest.
//! Formats and node types only meet here, through the capability check, so
//! either side can grow without touching the other.

use tracing::{debug, info, trace};

use crate::dag::graph::{Graph, NodeRef};
use crate::errors::{PipegenError, Result};

/// A format-specific output accumulator.
pub trait OutputFormat: Default {
    /// Format name used in logs and error context.
    const NAME: &'static str;

    /// Capability a node must register to render into this format.
    type Compiler: ?Sized + 'static;

    /// Invoke the node's rendering method for this format.
    fn compile(
        compiler: &Self::Compiler,
        node: NodeRef<'_>,
        output: &mut Self,
    ) -> anyhow::Result<()>;
}

/// Run one dispatch pass and return the finished accumulator.
///
/// The first rendering failure aborts the pass; the partially filled
/// accumulator is dropped.
pub fn dispatch<F: OutputFormat>(graph: &Graph) -> Result<F> {
    let mut output = F::default();
    let mut rendered = 0usize;

    graph.walk(|node| {
        let Some(compiler) = node.capability::<F::Compiler>() else {
            trace!(format = F::NAME, node = node.name(), "node lacks capability; skipping");
            return Ok(());
        };

        debug!(format = F::NAME, node = node.name(), "compiling node");
        F::compile(compiler, node, &mut output).map_err(|source| PipegenError::Render {
            format: F::NAME,
            node: node.name().to_string(),
            source,
        })?;
        rendered += 1;
        Ok(())
    })?;

    info!(format = F::NAME, nodes = rendered, "dispatch pass complete");
    Ok(output)
}
