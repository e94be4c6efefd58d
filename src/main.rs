use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use capsule_cam::{logging, ui, DemoConfig};
use capsule_cam::controller::{FrameLoopContext, InputEvent};
use capsule_cam::view::{EguiFrame, GpuContext, RenderState};

/// Everything that exists once the window is up
struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    render_state: RenderState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    frame: FrameLoopContext,
}

impl AppState {
    fn new(window: Arc<Window>, config: &DemoConfig) -> Result<Self> {
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;
        let render_state = RenderState::new(&gpu, config);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let frame = FrameLoopContext::new(config, gpu.config.width, gpu.config.height, Instant::now());

        Ok(Self {
            window,
            gpu,
            render_state,
            egui_ctx,
            egui_state,
            frame,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.render_state.resize(self.gpu.device.as_ref(), width, height);
            self.frame.camera.set_aspect(width, height);
            tracing::debug!(width, height, "resized");
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent, consumed_by_ui: bool) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };

        match event.state {
            ElementState::Pressed => {
                let down = InputEvent::KeyDown { key, repeat: event.repeat };
                if !self.frame.input_state.process_shared_event(&down, consumed_by_ui) {
                    return;
                }
                if self.frame.input_processor.is_quit(key) {
                    tracing::info!("quit requested");
                    event_loop.exit();
                    return;
                }
                if !event.repeat && self.frame.input_processor.wants_to_toggle_debug(key) {
                    self.frame.input_state.toggle_debug();
                }
            }
            ElementState::Released => {
                self.frame
                    .input_state
                    .process_shared_event(&InputEvent::KeyUp(key), consumed_by_ui);
            }
        }
    }

    fn run_ui(&mut self) -> EguiFrame {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let frame = &self.frame;
        let output = self.egui_ctx.run(raw_input, |ctx| ui::build_ui(ctx, frame));
        self.egui_state.handle_platform_output(&self.window, output.platform_output);

        let pixels_per_point = output.pixels_per_point;
        let primitives = self.egui_ctx.tessellate(output.shapes, pixels_per_point);

        EguiFrame {
            primitives,
            textures_delta: output.textures_delta,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
                pixels_per_point,
            },
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.frame.update(Instant::now());
        self.render_state.write_uniforms(self.gpu.queue.as_ref(), &self.frame.uniforms());

        let egui_frame = self.run_ui();
        match self.render_state.draw_frame(&self.gpu, egui_frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => tracing::warn!(error = ?e, "dropped frame"),
        }
    }
}

struct App {
    config: DemoConfig,
    frame_interval: Duration,
    next_frame: Instant,
    state: Option<AppState>,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: DemoConfig) -> Self {
        let frame_interval = Duration::from_secs_f64(1.0 / config.window.target_fps as f64);
        Self {
            config,
            frame_interval,
            next_frame: Instant::now(),
            state: None,
            error: None,
        }
    }

    fn create_state(&self, event_loop: &ActiveEventLoop) -> Result<AppState> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(self.config.window.width, self.config.window.height));
        let window = event_loop.create_window(attributes).context("creating window")?;
        AppState::new(Arc::new(window), &self.config)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.create_state(event_loop) {
            Ok(state) => {
                tracing::info!("window ready");
                self.state = Some(state);
            }
            Err(err) => {
                tracing::error!("startup failed: {err:#}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if window_id != state.window.id() {
            return;
        }

        // egui may claim key presses, never releases, resize or redraw
        let egui_consumed = state.egui_state.on_window_event(&state.window, &event).consumed;

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::Focused(false) => state.frame.input_state.process_event(&InputEvent::FocusLost),
            WindowEvent::KeyboardInput { event, .. } => state.handle_key(event_loop, &event, egui_consumed),
            WindowEvent::RedrawRequested => state.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_ref() else {
            return;
        };

        let now = Instant::now();
        if now >= self.next_frame {
            state.window.request_redraw();
            self.next_frame += self.frame_interval;
            if self.next_frame < now {
                self.next_frame = now + self.frame_interval;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

fn main() -> Result<()> {
    logging::init();

    let config = DemoConfig::load()?;
    tracing::info!(
        width = config.window.width,
        height = config.window.height,
        target_fps = config.window.target_fps,
        "starting capsule-cam"
    );

    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("running event loop")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
