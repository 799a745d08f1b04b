//! Asynchronous GPU readback contract
//!
//! A readback request asks the renderer to copy a resource into CPU
//! memory and invoke the completion closure with it. The closure may run
//! on the renderer's thread, so it must only decode and hand the result
//! off through a channel - never touch the scene.

use super::render_target::RenderTargetRegistry;

/// Completion callback: `(data, row_pitch, block_size)`
pub type ReadbackComplete = Box<dyn FnOnce(&[u8], u32, u32) + Send>;

/// Parameters of a resource readback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadbackRequest {
    /// Renderer-side handle of the resource to read
    pub resource_handle: u64,
    /// Pixel format of the resource
    pub format: wgpu::TextureFormat,
    /// Bytes per row of the copied data
    pub row_pitch: u32,
    /// Bytes in one 2-D slice
    pub buffer_size: u32,
    /// Bytes per pixel block
    pub block_size: u32,
    /// Total bytes to copy
    pub total_size: u32,
}

/// Services the renderer provides to the engine
pub trait RenderBackend {
    /// Render targets the renderer has published
    fn render_targets(&self) -> &RenderTargetRegistry;

    /// Submit an asynchronous readback; `on_complete` fires once the copy
    /// has finished, possibly on another thread.
    fn read_back_resource(&self, request: ReadbackRequest, on_complete: ReadbackComplete);
}
