//! GPU Canvas - compute-shader polygon fill with host readback.

use super::GpuError;
use crate::compute::{Point, Rgb};
use crate::render::{Framebuffer, Pixel, RenderError, Surface};
use crate::schema::SHAPE_POINTS;

const FILL_SHADER: &str = include_str!("shaders/fill.wgsl");

/// Uniform buffer struct for the fill shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FillParams {
    width: u32,
    height: u32,
    vertex_count: u32,
    /// RGBA8 packed little-endian.
    color: u32,
}

#[inline]
fn pack(pixel: Pixel) -> u32 {
    u32::from_le_bytes(pixel)
}

/// [`Surface`] rasterized on the GPU.
///
/// Drawing happens in a storage buffer on the device; `present` copies it to a
/// staging buffer and maps it back into [`GpuCanvas::front`].
pub struct GpuCanvas {
    device: wgpu::Device,
    queue: wgpu::Queue,
    width: u32,
    height: u32,

    fill_pipeline: wgpu::ComputePipeline,
    fill_bind_group_layout: wgpu::BindGroupLayout,

    params_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    pixel_buffer: wgpu::Buffer,
    staging_buffer: wgpu::Buffer,

    /// Background pixels uploaded on clear.
    clear_data: Vec<u32>,
    fill: u32,
    front: Vec<Pixel>,
    frames_presented: u64,
}

impl GpuCanvas {
    /// Create a GPU canvas cleared to `background`.
    pub async fn new(width: u32, height: u32, background: Rgb) -> Result<Self, GpuError> {
        // 1. Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // 2. Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;
        log::debug!("GPU canvas adapter: {:?}", adapter.get_info());

        // 3. Request device and queue
        let (device, queue): (wgpu::Device, wgpu::Queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Shape Morph GPU"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await?;

        // 4. Shader and pipeline
        let fill_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Fill Shader"),
            source: wgpu::ShaderSource::Wgsl(FILL_SHADER.into()),
        });
        let fill_bind_group_layout = create_fill_bind_group_layout(&device);
        let fill_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Fill Pipeline Layout"),
            bind_group_layouts: &[&fill_bind_group_layout],
            ..Default::default()
        });
        let fill_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Fill Pipeline"),
            layout: Some(&fill_pipeline_layout),
            module: &fill_shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        // 5. Buffers
        let pixel_count = width as usize * height as usize;
        let frame_size = (pixel_count * std::mem::size_of::<u32>()) as u64;

        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Fill Params"),
            size: std::mem::size_of::<FillParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let vertex_buffer = create_vertex_buffer(&device, SHAPE_POINTS);
        let pixel_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Pixel Buffer"),
            size: frame_size,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Staging Buffer"),
            size: frame_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let background = background.to_rgba8();
        let clear_data = vec![pack(background); pixel_count];
        queue.write_buffer(&pixel_buffer, 0, bytemuck::cast_slice(&clear_data));

        Ok(Self {
            device,
            queue,
            width,
            height,
            fill_pipeline,
            fill_bind_group_layout,
            params_buffer,
            vertex_buffer,
            vertex_capacity: SHAPE_POINTS,
            pixel_buffer,
            staging_buffer,
            clear_data,
            fill: pack([0, 0, 0, 255]),
            front: vec![background; pixel_count],
            frames_presented: 0,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height as usize
    }

    #[inline]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Last presented frame, row-major from the top row.
    #[inline]
    pub fn front(&self) -> &[Pixel] {
        &self.front
    }

    /// Number of presented pixels equal to `color`.
    pub fn count(&self, color: Pixel) -> usize {
        self.front.iter().filter(|&&p| p == color).count()
    }

    /// Block until the staging buffer maps, then copy it into `front`.
    fn read_frame_back(&mut self) -> Result<(), RenderError> {
        let buffer_slice = self.staging_buffer.slice(..);

        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.device.poll(wgpu::PollType::wait_indefinitely()).ok();
        rx.recv().map_err(|_| RenderError::ReadbackChannel)??;

        {
            let data = buffer_slice.get_mapped_range();
            self.front.copy_from_slice(bytemuck::cast_slice(&data));
        }

        self.staging_buffer.unmap();
        Ok(())
    }
}

impl Framebuffer for GpuCanvas {
    fn frame(&self) -> &[Pixel] {
        &self.front
    }
}

impl Surface for GpuCanvas {
    fn clear(&mut self) {
        self.queue
            .write_buffer(&self.pixel_buffer, 0, bytemuck::cast_slice(&self.clear_data));
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill = pack(color.to_rgba8());
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        if points.len() < 3 {
            return;
        }
        if points.len() > self.vertex_capacity {
            self.vertex_buffer = create_vertex_buffer(&self.device, points.len());
            self.vertex_capacity = points.len();
        }

        let params = FillParams {
            width: self.width,
            height: self.height,
            vertex_count: points.len() as u32,
            color: self.fill,
        };
        self.queue
            .write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&params));
        self.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(points));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Fill Bind Group"),
            layout: &self.fill_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.vertex_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.pixel_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Fill Encoder"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Fill Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.fill_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups((self.width + 15) / 16, (self.height + 15) / 16, 1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let frame_size = (self.front.len() * std::mem::size_of::<u32>()) as u64;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });
        encoder.copy_buffer_to_buffer(&self.pixel_buffer, 0, &self.staging_buffer, 0, frame_size);
        self.queue.submit(std::iter::once(encoder.finish()));

        self.read_frame_back()?;
        self.frames_presented += 1;
        Ok(())
    }
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Vertex Buffer"),
        size: (capacity * std::mem::size_of::<Point>()) as u64,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_fill_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Fill Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: false },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;
    use crate::render::{Canvas, MorphRenderer};

    fn gpu_canvas(width: u32, height: u32) -> Option<GpuCanvas> {
        match pollster::block_on(GpuCanvas::new(width, height, Rgb::WHITE)) {
            Ok(canvas) => Some(canvas),
            Err(GpuError::NoAdapter) => {
                eprintln!("Skipping GPU test: no adapter available");
                None
            }
            Err(e) => panic!("Failed to create GPU canvas: {:?}", e),
        }
    }

    #[test]
    fn test_gpu_canvas_creation() {
        let Some(canvas) = gpu_canvas(64, 48) else {
            return;
        };
        assert_eq!(canvas.front().len(), 64 * 48);
        assert_eq!(canvas.count([255, 255, 255, 255]), 64 * 48);
    }

    #[test]
    fn test_gpu_square_fill() {
        let Some(mut canvas) = gpu_canvas(100, 100) else {
            return;
        };
        canvas.clear();
        canvas.set_fill_color(Rgb::BLACK);
        canvas.fill_polygon(&[
            Point::new(0.25, 0.25),
            Point::new(0.75, 0.25),
            Point::new(0.75, 0.75),
            Point::new(0.25, 0.75),
        ]);
        canvas.present().unwrap();

        assert_eq!(canvas.count([0, 0, 0, 255]), 50 * 50);
        assert_eq!(canvas.frames_presented(), 1);
    }

    /// The compute rasterizer and the CPU canvas should agree away from edges.
    #[test]
    fn test_gpu_cpu_equivalence() {
        let (width, height) = (160, 120);
        let Some(mut gpu) = gpu_canvas(width, height) else {
            return;
        };
        let mut cpu = Canvas::new(width as usize, height as usize, Rgb::WHITE);
        let mut renderer = MorphRenderer::default();

        for phase in [0.0, 0.2, 1.0 / 3.0, 0.5, 2.0 / 3.0, 0.9] {
            let state = AnimationState {
                phase,
                ..Default::default()
            };
            renderer.draw_frame(&mut gpu, &state).unwrap();
            renderer.draw_frame(&mut cpu, &state).unwrap();

            let mismatches = gpu
                .front()
                .iter()
                .zip(cpu.front())
                .filter(|(a, b)| a != b)
                .count();
            let total = gpu.front().len();
            assert!(
                mismatches * 100 <= total,
                "phase {}: {} of {} pixels differ",
                phase,
                mismatches,
                total
            );
        }
    }
}
