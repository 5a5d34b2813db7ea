//! Desktop presenter using winit and a wgpu surface.
//!
//! Frames are rasterized by a [`Canvas`] and uploaded to the swapchain texture
//! with `write_texture`. The animation timer is driven through winit's
//! `ControlFlow::WaitUntil`, rescheduled after every firing.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::animation::{AnimationState, DriverParams, TickTimer, log_tick};
use crate::render::gpu::GpuError;
use crate::render::{Canvas, MorphRenderer, RenderError};
use crate::schema::MorphConfig;

/// Error type for window setup and presentation.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error(transparent)]
    Gpu(#[from] GpuError),

    #[error("Surface does not support {0}")]
    UnsupportedSurface(&'static str),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Open the window and run the animation until it is closed.
pub fn run(config: MorphConfig) -> Result<(), WindowError> {
    let event_loop = EventLoop::new()?;
    let mut app = MorphApp::new(config);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Swapchain plumbing for one window.
struct Presenter {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    /// Surface expects BGRA byte order.
    bgra: bool,
}

impl Presenter {
    async fn new(window: Arc<Window>) -> Result<Self, WindowError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;
        log::debug!("Window adapter: {:?}", adapter.get_info());

        let (device, queue): (wgpu::Device, wgpu::Queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Shape Morph Window"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .map_err(GpuError::from)?;

        let caps = surface.get_capabilities(&adapter);
        if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
            return Err(WindowError::UnsupportedSurface("texture uploads"));
        }
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Bgra8Unorm
                )
            })
            .ok_or(WindowError::UnsupportedSurface("8-bit RGBA or BGRA"))?;

        let size = window.inner_size();
        let mut surface_config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(WindowError::UnsupportedSurface("this adapter"))?;
        surface_config.format = format;
        surface_config.usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_DST;
        surface_config.view_formats = Vec::new();
        surface.configure(&device, &surface_config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            surface_config,
            bgra: format == wgpu::TextureFormat::Bgra8Unorm,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Upload the canvas front buffer and present it.
    fn present(&mut self, canvas: &Canvas, scratch: &mut Vec<u8>) -> Result<(), RenderError> {
        let (width, height) = (self.surface_config.width, self.surface_config.height);
        if canvas.width() != width as usize || canvas.height() != height as usize {
            // Resize still in flight
            return Ok(());
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = if self.bgra {
            canvas.front_bgra_into(scratch);
            scratch.as_slice()
        } else {
            canvas.front_bytes()
        };
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::empty());
        self.window.pre_present_notify();
        frame.present();
        Ok(())
    }
}

struct MorphApp {
    config: MorphConfig,
    params: DriverParams,
    state: AnimationState,
    timer: TickTimer,
    renderer: MorphRenderer,
    canvas: Canvas,
    presenter: Option<Presenter>,
    scratch: Vec<u8>,
    error: Option<WindowError>,
}

impl MorphApp {
    fn new(config: MorphConfig) -> Self {
        let canvas = Canvas::new(
            config.window.width as usize,
            config.window.height as usize,
            config.window.background,
        );
        Self {
            params: DriverParams::from(&config),
            state: AnimationState::new(),
            timer: TickTimer::new(config.tick_interval(), Instant::now()),
            renderer: MorphRenderer::from_config(&config),
            canvas,
            presenter: None,
            scratch: Vec::new(),
            error: None,
            config,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: WindowError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_presenter(&mut self, event_loop: &ActiveEventLoop) -> Result<(), WindowError> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width as f64,
                self.config.window.height as f64,
            ));
        let window = Arc::new(event_loop.create_window(attributes)?);
        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        let size = window.inner_size();
        self.canvas
            .resize(size.width.max(1) as usize, size.height.max(1) as usize);
        log::info!(
            "Window open at {}x{}, ticking every {}ms",
            size.width,
            size.height,
            self.config.tick_interval_ms
        );
        window.request_redraw();
        self.presenter = Some(presenter);
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), WindowError> {
        let Some(presenter) = self.presenter.as_mut() else {
            return Ok(());
        };
        self.renderer.draw_frame(&mut self.canvas, &self.state)?;
        presenter.present(&self.canvas, &mut self.scratch)?;
        Ok(())
    }
}

impl ApplicationHandler for MorphApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.presenter.is_none() {
            if let Err(e) = self.create_presenter(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.resize(size);
                    if size.width > 0 && size.height > 0 {
                        self.canvas
                            .resize(size.width as usize, size.height as usize);
                    }
                    presenter.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.timer.poll(Instant::now()) {
            let event = self.state.tick(&self.params);
            log_tick(&self.state, event);
            if let Some(presenter) = self.presenter.as_ref() {
                presenter.window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.timer.deadline()));
    }
}
