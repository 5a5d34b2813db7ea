//! GPU Rasterizer Backend
//!
//! Fills polygons with a WebGPU (wgpu) compute shader and reads frames back
//! into host memory on present.

mod canvas;

pub use canvas::GpuCanvas;

/// Error type for GPU setup.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
}
