//! Render target descriptors
//!
//! The renderer owns the actual textures; the engine sees them as
//! descriptors looked up by name.

use std::collections::HashMap;

/// Registry key of the object-id picking target
pub const PICKING_TARGET: &str = "picking";

/// Description of a renderer-owned render target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTargetDesc {
    /// Renderer-side resource handle
    pub handle: u64,
    /// Pixel format
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl RenderTargetDesc {
    /// Whether the target has no readable pixels
    pub fn is_zero_sized(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes per pixel block of the target's format
    pub fn block_size(&self) -> u32 {
        self.format.block_copy_size(None).unwrap_or(4)
    }
}

/// Render targets published by the renderer, keyed by name
#[derive(Debug, Default)]
pub struct RenderTargetRegistry {
    targets: HashMap<String, RenderTargetDesc>,
}

impl RenderTargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish or replace a target
    pub fn insert(&mut self, id: impl Into<String>, desc: RenderTargetDesc) {
        self.targets.insert(id.into(), desc);
    }

    /// Look up a target by name
    pub fn get(&self, id: &str) -> Option<&RenderTargetDesc> {
        self.targets.get(id)
    }
}
