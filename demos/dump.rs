use std::error::Error;
use std::f32::consts::PI;

use nalgebra::{Matrix4, Point3, Vector2, Vector3};

use vstage::graphics::*;

const WIDTH: u32 = 512;
const HEIGHT: u32 = 512;

fn cube() -> (Vec<PosNormTex>, Vec<u32>) {
    let faces: [(Vector3<f32>, Vector3<f32>, Vector3<f32>); 6] = [
        (Vector3::z(), Vector3::x(), Vector3::y()),
        (-Vector3::z(), -Vector3::x(), Vector3::y()),
        (Vector3::x(), -Vector3::z(), Vector3::y()),
        (-Vector3::x(), Vector3::z(), Vector3::y()),
        (Vector3::y(), Vector3::x(), -Vector3::z()),
        (-Vector3::y(), Vector3::x(), Vector3::z()),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, u, v) in faces {
        let base = vertices.len() as u32;

        for (su, sv, tex) in [
            (-1.0, -1.0, Vector2::new(0.0, 0.0)),
            (1.0, -1.0, Vector2::new(1.0, 0.0)),
            (1.0, 1.0, Vector2::new(1.0, 1.0)),
            (-1.0, 1.0, Vector2::new(0.0, 1.0)),
        ] {
            let position = Point3::from((normal + u * su + v * sv) * 0.5);
            vertices.push(PosNormTex::new(position, normal, tex));
        }

        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

fn splat(out: &StageOutput<VertexData>, image: &mut bmp::Image) -> bool {
    let clip = out.clip_position;
    if clip.w <= 0.0 {
        return false;
    }

    let ndc = clip.xyz() / clip.w;
    if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
        return false;
    }

    let x = ((ndc.x + 1.0) / 2.0 * WIDTH as f32) as u32;
    let y = ((1.0 - ndc.y) / 2.0 * HEIGHT as f32) as u32;

    let color = out.data.normal.map(|c| ((c * 0.5 + 0.5) * 255.0) as u8);
    let pixel = bmp::Pixel {
        r: color.x,
        g: color.y,
        b: color.z,
    };

    for dx in 0..2 {
        for dy in 0..2 {
            image.set_pixel(
                (x + dx).min(WIDTH - 1),
                (y + dy).min(HEIGHT - 1),
                pixel,
            );
        }
    }

    true
}

fn main() -> Result<(), Box<dyn Error>> {
    let (vertices, indices) = cube();

    let mut camera = Camera::perspective(WIDTH as f32 / HEIGHT as f32, PI / 4.0, 0.1, 100.0);
    camera.eye = Point3::new(1.5, 1.2, 1.5);
    camera.forward = Point3::origin() - camera.eye;

    let model = Matrix4::new_rotation(Vector3::new(0.0, PI / 5.0, 0.0));

    let mut dispatch = VertexDispatch::new();
    let output = dispatch.transform(&TransformCall {
        stage: &BasicStage,
        args: &camera.vertex_args(model),
        vertices: &vertices,
        vertex_offset: 0,
        indices: Some(&indices),
    })?;

    println!("Transformed");

    let mut image = bmp::Image::new(WIDTH, HEIGHT);
    let mut plotted = 0;

    for out in &output {
        if splat(out, &mut image) {
            plotted += 1;
        }
    }

    let stats = dispatch.stats();
    println!("{} calls", stats.calls);
    println!("{} vertices transformed", stats.vertices);
    println!("{} points plotted", plotted);

    image.save("dump.bmp")?;
    println!("Dumped image");
    Ok(())
}
