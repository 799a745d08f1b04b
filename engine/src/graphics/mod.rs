//! Contracts for the external renderer
//!
//! The engine never touches GPU objects directly; it describes render
//! targets and submits readback requests through these types.

pub mod readback;
pub mod render_target;

pub use readback::{ReadbackComplete, ReadbackRequest, RenderBackend};
pub use render_target::{RenderTargetDesc, RenderTargetRegistry, PICKING_TARGET};
