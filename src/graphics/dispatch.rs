use rayon::prelude::*;

use super::error::Error;
use super::shader::{StageContext, StageOutput, VertexStage};
use super::vertex::PosNormTex;

/// One batch of vertices pushed through a stage under a single parameter
/// block. When `indices` is present it selects vertices; `vertex_offset`
/// shifts every resolved index.
pub struct TransformCall<'a, S: VertexStage> {
    pub stage: &'a S,
    pub args: &'a S::Args,

    pub vertices: &'a [PosNormTex],
    pub vertex_offset: usize,
    pub indices: Option<&'a [u32]>,
}

/// Running totals across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub calls: usize,
    pub indexed_calls: usize,
    pub vertices: usize,
}

/// Executes transform calls. Invocations are independent, so each call
/// fans out over the rayon pool; output order matches submission order.
#[derive(Debug, Default)]
pub struct VertexDispatch {
    stats: DispatchStats,
}

impl VertexDispatch {
    pub fn new() -> VertexDispatch {
        VertexDispatch {
            stats: DispatchStats::default(),
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Transforms every vertex the call selects. Bounds are checked up
    /// front; a failed call transforms nothing and leaves the counters
    /// untouched.
    pub fn transform<S>(
        &mut self,
        call: &TransformCall<S>,
    ) -> Result<Vec<StageOutput<S::Varying>>, Error>
    where
        S: VertexStage + Sync,
    {
        let len = call.vertices.len();
        if call.vertex_offset > len {
            return Err(Error::OffsetOutOfBounds {
                offset: call.vertex_offset,
                len,
            });
        }

        let output: Vec<StageOutput<S::Varying>> = match call.indices {
            Some(indices) => {
                let reachable = len - call.vertex_offset;
                if let Some(&index) = indices.iter().find(|&&index| index as usize >= reachable) {
                    return Err(Error::IndexOutOfBounds {
                        index,
                        len: reachable,
                    });
                }

                indices
                    .par_iter()
                    .map(|&index| {
                        let vertex_id = call.vertex_offset + index as usize;
                        call.stage.transform(
                            &call.vertices[vertex_id],
                            &StageContext {
                                vertex_id,
                                args: call.args,
                            },
                        )
                    })
                    .collect()
            }
            None => call.vertices[call.vertex_offset..]
                .par_iter()
                .enumerate()
                .map(|(i, vertex)| {
                    let vertex_id = call.vertex_offset + i;
                    call.stage.transform(
                        vertex,
                        &StageContext {
                            vertex_id,
                            args: call.args,
                        },
                    )
                })
                .collect(),
        };

        self.stats.calls += 1;
        if call.indices.is_some() {
            self.stats.indexed_calls += 1;
        }
        self.stats.vertices += output.len();

        Ok(output)
    }
}
