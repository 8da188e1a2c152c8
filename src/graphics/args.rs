use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix3, Matrix4};

/// The three read-only transform parameters of a draw, in uniform block
/// order: projection, view, model. Constant across every vertex of a call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexArgs {
    pub proj: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub model: Matrix4<f32>,
}

impl VertexArgs {
    pub fn new(proj: Matrix4<f32>, view: Matrix4<f32>, model: Matrix4<f32>) -> VertexArgs {
        VertexArgs { proj, view, model }
    }

    /// Model transform with identity projection and view. A renderer falls
    /// back to this when no camera is active.
    pub fn model_only(model: Matrix4<f32>) -> VertexArgs {
        VertexArgs {
            model,
            ..VertexArgs::default()
        }
    }

    /// The composite `proj * view * model`.
    pub fn mvp(&self) -> Matrix4<f32> {
        self.proj * self.view * self.model
    }

    /// Upper-left 3x3 block of the model matrix, the transform applied to
    /// normals. Not the inverse-transpose: a non-uniform scale in `model`
    /// distorts normals.
    pub fn linear_model(&self) -> Matrix3<f32> {
        self.model.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn to_raw(&self) -> RawVertexArgs {
        RawVertexArgs {
            proj: self.proj.into(),
            view: self.view.into(),
            model: self.model.into(),
        }
    }
}

impl Default for VertexArgs {
    fn default() -> VertexArgs {
        VertexArgs {
            proj: Matrix4::identity(),
            view: Matrix4::identity(),
            model: Matrix4::identity(),
        }
    }
}

impl From<VertexArgs> for RawVertexArgs {
    fn from(args: VertexArgs) -> RawVertexArgs {
        args.to_raw()
    }
}

/// std140 image of the `VertexArgs` uniform block: three column-major
/// mat4s at byte offsets 0, 64 and 128, 192 bytes total. mat4 columns are
/// vec4-aligned already, so the packed layout is the wire layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RawVertexArgs {
    pub proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl RawVertexArgs {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
