use bytemuck::{Pod, Zeroable};
use nalgebra::{Point3, Vector2, Vector3, Vector4};

use super::shader::Blendable;

/// One vertex's input attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosNormTex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub tex_coord: Vector2<f32>,
}

impl PosNormTex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, tex_coord: Vector2<f32>) -> PosNormTex {
        PosNormTex {
            position,
            normal,
            tex_coord,
        }
    }

    pub fn to_raw(&self) -> RawPosNormTex {
        RawPosNormTex {
            position: self.position.into(),
            normal: self.normal.into(),
            tex_coord: self.tex_coord.into(),
        }
    }
}

/// Buffer image of `PosNormTex`: 32-byte stride, attributes at byte
/// offsets 0, 12 and 24.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RawPosNormTex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl From<PosNormTex> for RawPosNormTex {
    fn from(vertex: PosNormTex) -> RawPosNormTex {
        vertex.to_raw()
    }
}

impl From<RawPosNormTex> for PosNormTex {
    fn from(raw: RawPosNormTex) -> PosNormTex {
        PosNormTex {
            position: Point3::from(raw.position),
            normal: Vector3::from(raw.normal),
            tex_coord: Vector2::from(raw.tex_coord),
        }
    }
}

/// The record forwarded to the interpolating stage: homogeneous world-space
/// position, world-space normal, untouched texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexData {
    pub position: Vector4<f32>,
    pub normal: Vector3<f32>,
    pub tex_coord: Vector2<f32>,
}

impl VertexData {
    pub fn to_raw(&self) -> RawVertexData {
        RawVertexData {
            position: self.position.into(),
            normal: self.normal.into(),
            tex_coord: self.tex_coord.into(),
        }
    }
}

/// Buffer image of `VertexData`: 36 bytes, fields at offsets 0, 16 and 28.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RawVertexData {
    pub position: [f32; 4],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl From<VertexData> for RawVertexData {
    fn from(data: VertexData) -> RawVertexData {
        data.to_raw()
    }
}

impl Blendable for VertexData {
    fn blend(data: &[&Self], weights: &[f32]) -> Self {
        VertexData {
            position: Vector4::blend(
                &data.iter().map(|v| &v.position).collect::<Vec<_>>(),
                weights,
            ),
            normal: Vector3::blend(&data.iter().map(|v| &v.normal).collect::<Vec<_>>(), weights),
            tex_coord: Vector2::blend(
                &data.iter().map(|v| &v.tex_coord).collect::<Vec<_>>(),
                weights,
            ),
        }
    }
}
