use std::error::Error;
use std::f32::consts::PI;
use std::iter;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use rand::prelude::*;

use vstage::graphics::{BasicStage, Camera, PosNormTex, TransformCall, VertexDispatch};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, OwnedDisplayHandle};
use winit::window::{Window, WindowAttributes, WindowId};

struct GraphicsContext {
    window: Rc<Window>,
    surface: softbuffer::Surface<OwnedDisplayHandle, Rc<Window>>,
}

impl GraphicsContext {
    fn new(event_loop: &ActiveEventLoop) -> Result<GraphicsContext, Box<dyn Error>> {
        let context = softbuffer::Context::new(event_loop.owned_display_handle())?;

        let window = Rc::new(event_loop.create_window(WindowAttributes::default())?);
        let surface = softbuffer::Surface::new(&context, window.clone())?;

        Ok(GraphicsContext { window, surface })
    }

    fn update_context(&mut self) -> Result<(), Box<dyn Error>> {
        let size = self.window.inner_size();
        self.surface.resize(
            NonZeroU32::new(size.width).unwrap(),
            NonZeroU32::new(size.height).unwrap(),
        )?;

        Ok(())
    }
}

struct AppData {
    dispatch: VertexDispatch,
    vertices: Vec<PosNormTex>,

    camera: Camera,
    model: Matrix4<f32>,

    t0: Instant,
    theta: f32,
}

struct App {
    graphics: Option<GraphicsContext>,
    initialized: bool,

    last_update: Option<Instant>,
    data: AppData,
}

fn scatter_sphere(rng: &mut StdRng, count: usize) -> Vec<PosNormTex> {
    Vec::from_iter(
        iter::repeat_with(|| {
            let u: f32 = rng.random_range(-1.0..1.0);
            let theta: f32 = rng.random_range(0.0..PI * 2.0);
            let ring = (1.0 - u * u).sqrt();

            let normal = Vector3::new(ring * theta.cos(), u, ring * theta.sin());
            let tex_coord = Vector2::new(theta / (PI * 2.0), (u + 1.0) / 2.0);

            PosNormTex::new(Point3::origin() + normal, normal, tex_coord)
        })
        .take(count),
    )
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn Error>> {
        self.graphics = Some(GraphicsContext::new(event_loop)?);

        Ok(())
    }

    fn update(data: &mut AppData, aspect: f32) {
        let t1 = Instant::now();
        let delta = t1 - data.t0;
        data.t0 = t1;

        data.theta += delta.as_secs_f32() * PI / 4.0;

        let radial = Vector3::new(data.theta.cos(), 0.4, data.theta.sin()) * 2.5;
        data.camera = Camera::perspective(aspect, PI / 4.0, 0.1, 100.0);
        data.camera.eye = Point3::origin() + radial;
        data.camera.forward = -radial;

        data.model = Matrix4::new_rotation(Vector3::new(0.0, -data.theta / 2.0, 0.0));
    }

    fn render(graphics: &mut GraphicsContext, data: &mut AppData) -> Result<(), Box<dyn Error>> {
        let size = graphics.window.inner_size();
        let (width, height) = (size.width as usize, size.height as usize);

        let output = data.dispatch.transform(&TransformCall {
            stage: &BasicStage,
            args: &data.camera.vertex_args(data.model),
            vertices: &data.vertices,
            vertex_offset: 0,
            indices: None,
        })?;

        let mut buffer = graphics.surface.buffer_mut()?;
        buffer.iter_mut().for_each(|p| *p = 0x00181818);

        for out in &output {
            let clip = out.clip_position;
            if clip.w <= 0.0 {
                continue;
            }

            let ndc = clip.xyz() / clip.w;
            if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
                continue;
            }

            let x = (((ndc.x + 1.0) / 2.0 * width as f32) as usize).min(width - 1);
            let y = (((1.0 - ndc.y) / 2.0 * height as f32) as usize).min(height - 1);

            let color = out.data.normal.map(|c| ((c * 0.5 + 0.5) * 255.0) as u32);
            buffer[y * width + x] = (color.x << 16) | (color.y << 8) | color.z;
        }

        buffer.present()?;
        Ok(())
    }

    fn should_update(&self) -> bool {
        if let Some(timestamp) = &self.last_update {
            timestamp.elapsed().as_secs_f32() > 1.0 / 60.0
        } else {
            true
        }
    }

    fn redraw_requested(&mut self) -> Result<(), Box<dyn Error>> {
        if let Some(graphics) = &mut self.graphics {
            graphics.window.request_redraw();
        }

        if !self.should_update() {
            return Ok(());
        }

        if let Some(graphics) = &mut self.graphics {
            graphics.update_context()?;

            let size = graphics.window.inner_size();
            let aspect = size.width as f32 / size.height as f32;

            Self::update(&mut self.data, aspect);
            Self::render(graphics, &mut self.data)?;
        }

        self.last_update = Some(Instant::now());
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.initialized {
            self.init(event_loop).unwrap();
            self.initialized = true;
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let should_ignore = match &self.graphics {
            Some(graphics) => window_id != graphics.window.id(),
            None => true,
        };

        if should_ignore {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw_requested().unwrap(),
            _ => (),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new()?;
    let mut rng = StdRng::from_os_rng();

    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut App {
        graphics: None,
        initialized: false,
        last_update: None,

        data: AppData {
            dispatch: VertexDispatch::new(),
            vertices: scatter_sphere(&mut rng, 4096),

            camera: Camera::perspective(1.0, PI / 4.0, 0.1, 100.0),
            model: Matrix4::identity(),

            t0: Instant::now(),
            theta: 0.0,
        },
    })?;

    Ok(())
}
