use nalgebra::{Matrix4, Point3, Vector3};

use super::args::VertexArgs;

/// Viewpoint feeding the stage: a stored projection plus the eye, forward
/// and up frame the view matrix is rebuilt from on every draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub proj: Matrix4<f32>,
}

impl Camera {
    /// Perspective camera at the origin looking down -z.
    pub fn perspective(aspect: f32, fovy: f32, znear: f32, zfar: f32) -> Camera {
        Camera {
            eye: Point3::origin(),
            forward: -Vector3::z(),
            up: Vector3::y(),
            proj: Matrix4::new_perspective(aspect, fovy, znear, zfar),
        }
    }

    /// Orthographic camera at the origin looking down -z, with a view
    /// volume centered on the forward axis.
    pub fn orthographic(width: f32, height: f32, znear: f32, zfar: f32) -> Camera {
        Camera {
            eye: Point3::origin(),
            forward: -Vector3::z(),
            up: Vector3::y(),
            proj: Matrix4::new_orthographic(
                -width / 2.0,
                width / 2.0,
                -height / 2.0,
                height / 2.0,
                znear,
                zfar,
            ),
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &(self.eye + self.forward), &self.up)
    }

    /// Assemble the per-draw parameter block for one model transform.
    pub fn vertex_args(&self, model: Matrix4<f32>) -> VertexArgs {
        VertexArgs {
            proj: self.proj,
            view: self.view_matrix(),
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_frame_views_along_negative_z() {
        let camera = Camera::perspective(1.0, 1.0, 0.1, 10.0);
        let view = camera.view_matrix();

        assert!((view - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn view_matrix_tracks_the_eye() {
        let mut camera = Camera::perspective(1.0, 1.0, 0.1, 10.0);
        camera.eye = Point3::new(0.0, 0.0, 5.0);
        camera.forward = Point3::origin() - camera.eye;

        let view = camera.view_matrix();
        let expected = Matrix4::look_at_rh(
            &Point3::new(0.0, 0.0, 5.0),
            &Point3::origin(),
            &Vector3::y(),
        );

        assert_eq!(view, expected);
    }

    #[test]
    fn vertex_args_wires_all_three_matrices() {
        let mut camera = Camera::perspective(16.0 / 9.0, 1.0, 0.1, 100.0);
        camera.eye = Point3::new(1.0, 2.0, 3.0);

        let model = Matrix4::new_scaling(0.5);
        let args = camera.vertex_args(model);

        assert_eq!(args.proj, camera.proj);
        assert_eq!(args.view, camera.view_matrix());
        assert_eq!(args.model, model);
    }

    #[test]
    fn orthographic_maps_the_half_width_to_the_clip_edge() {
        let camera = Camera::orthographic(4.0, 2.0, 0.1, 10.0);
        let edge = camera.proj.transform_point(&Point3::new(2.0, 0.0, -0.1));

        assert!((edge.x - 1.0).abs() < 1e-6);
    }
}
