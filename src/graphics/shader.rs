use nalgebra::{Vector2, Vector3, Vector4};

use super::args::VertexArgs;
use super::vertex::{PosNormTex, VertexData};

/// Per-invocation context handed to a stage. `vertex_id` is the index of
/// the vertex in the source buffer, after index resolution.
pub struct StageContext<'a, A> {
    pub vertex_id: usize,
    pub args: &'a A,
}

/// What one invocation hands the rest of the pipeline: the clip-space
/// position the rasterizer requires, plus the varyings interpolated across
/// the face. `clip_position` keeps its w component; perspective division
/// belongs to the consuming stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageOutput<W> {
    pub clip_position: Vector4<f32>,
    pub data: W,
}

/// Weighted recombination of varyings, as the interpolating stage performs
/// it with barycentric weights.
pub trait Blendable {
    fn blend(data: &[&Self], weights: &[f32]) -> Self;
}

impl Blendable for f32 {
    fn blend(data: &[&Self], weights: &[f32]) -> Self {
        data.iter()
            .zip(weights)
            .map(|(value, weight)| **value * *weight)
            .sum()
    }
}

impl Blendable for Vector2<f32> {
    fn blend(data: &[&Self], weights: &[f32]) -> Self {
        data.iter()
            .zip(weights)
            .fold(Vector2::zeros(), |acc, (value, weight)| {
                acc + **value * *weight
            })
    }
}

impl Blendable for Vector3<f32> {
    fn blend(data: &[&Self], weights: &[f32]) -> Self {
        data.iter()
            .zip(weights)
            .fold(Vector3::zeros(), |acc, (value, weight)| {
                acc + **value * *weight
            })
    }
}

impl Blendable for Vector4<f32> {
    fn blend(data: &[&Self], weights: &[f32]) -> Self {
        data.iter()
            .zip(weights)
            .fold(Vector4::zeros(), |acc, (value, weight)| {
                acc + **value * *weight
            })
    }
}

/// A vertex stage: one pure invocation per vertex, no state, no failure
/// path. Malformed inputs (NaN, Inf) propagate arithmetically.
pub trait VertexStage {
    type Args: Sync;
    type Varying: Blendable + Send;

    fn transform(
        &self,
        vertex: &PosNormTex,
        context: &StageContext<Self::Args>,
    ) -> StageOutput<Self::Varying>;
}

/// The fixed-function forward transform. Per invocation, in order:
///
/// 1. homogenize the input position with w = 1;
/// 2. world position = `model` * homogeneous position;
/// 3. world normal = upper-left 3x3 of `model` * normal (no
///    inverse-transpose correction);
/// 4. texture coordinate passes through bit-identically;
/// 5. clip position = `proj` * `view` * world position.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicStage;

impl VertexStage for BasicStage {
    type Args = VertexArgs;
    type Varying = VertexData;

    fn transform(
        &self,
        vertex: &PosNormTex,
        context: &StageContext<VertexArgs>,
    ) -> StageOutput<VertexData> {
        let args = context.args;

        let world_position = args.model * vertex.position.to_homogeneous();
        let world_normal = args.linear_model() * vertex.normal;
        let clip_position = args.proj * args.view * world_position;

        StageOutput {
            clip_position,
            data: VertexData {
                position: world_position,
                normal: world_normal,
                tex_coord: vertex.tex_coord,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix4, Point3};

    fn run(args: &VertexArgs, vertex: &PosNormTex) -> StageOutput<VertexData> {
        BasicStage.transform(vertex, &StageContext { vertex_id: 0, args })
    }

    fn vertex(position: Point3<f32>, normal: Vector3<f32>) -> PosNormTex {
        PosNormTex::new(position, normal, Vector2::new(0.5, 0.5))
    }

    #[test]
    fn identity_args_pass_the_position_through() {
        let out = run(
            &VertexArgs::default(),
            &vertex(Point3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
        );

        assert_eq!(out.data.position, Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(out.data.normal, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(out.clip_position, Vector4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(out.data.tex_coord, Vector2::new(0.5, 0.5));
    }

    #[test]
    fn world_and_clip_follow_the_matrix_chain() {
        let args = VertexArgs::new(
            Matrix4::new_perspective(4.0 / 3.0, 1.2, 0.1, 50.0),
            Matrix4::new_translation(&Vector3::new(0.0, -1.0, -4.0)),
            Matrix4::new_translation(&Vector3::new(2.0, 0.0, 0.0)) * Matrix4::new_scaling(3.0),
        );
        let input = vertex(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 0.0, 1.0));

        let out = run(&args, &input);

        let world = args.model * input.position.to_homogeneous();
        assert!((out.data.position - world).norm() < 1e-5);
        assert!((out.clip_position - args.proj * args.view * world).norm() < 1e-5);
    }

    #[test]
    fn normal_ignores_model_translation() {
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 3.0, 4.0));
        let translated = Matrix4::new_translation(&Vector3::new(10.0, -20.0, 30.0)) * scale;
        let input = vertex(Point3::origin(), Vector3::new(1.0, 1.0, 1.0));

        let near = run(&VertexArgs::model_only(scale), &input);
        let far = run(&VertexArgs::model_only(translated), &input);

        assert_eq!(near.data.normal, far.data.normal);
    }

    #[test]
    fn tex_coord_is_bit_identical() {
        let input = PosNormTex::new(
            Point3::new(0.3, 0.6, 0.9),
            Vector3::new(0.0, 1.0, 0.0),
            Vector2::new(0.1, 0.7),
        );

        let out = run(&VertexArgs::model_only(Matrix4::new_scaling(1.7)), &input);

        assert_eq!(out.data.tex_coord.x.to_bits(), input.tex_coord.x.to_bits());
        assert_eq!(out.data.tex_coord.y.to_bits(), input.tex_coord.y.to_bits());
    }

    #[test]
    fn non_uniform_scale_distorts_the_normal() {
        let args =
            VertexArgs::model_only(Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0)));
        let input = vertex(Point3::origin(), Vector3::new(1.0, 1.0, 0.0));

        let out = run(&args, &input);
        assert_eq!(out.data.normal, Vector3::new(2.0, 1.0, 0.0));

        // Neither the renormalized input nor the inverse-transpose result.
        let renormalized = input.normal.normalize();
        let corrected = (args.linear_model().try_inverse().unwrap().transpose() * input.normal)
            .normalize();
        assert!((out.data.normal.normalize() - renormalized).norm() > 0.1);
        assert!((out.data.normal.normalize() - corrected).norm() > 0.1);
    }

    #[test]
    fn scalar_and_vector_blends_are_weighted_sums() {
        let blended = f32::blend(&[&1.0, &3.0], &[0.25, 0.75]);
        assert!((blended - 2.5).abs() < 1e-6);

        let v = Vector3::blend(
            &[&Vector3::new(1.0, 0.0, 0.0), &Vector3::new(0.0, 1.0, 0.0)],
            &[0.5, 0.5],
        );
        assert!((v - Vector3::new(0.5, 0.5, 0.0)).norm() < 1e-6);
    }
}
