//! Developer tooling

pub mod debug_draw;

pub use debug_draw::DebugDraw;
