//! Editor panels
//!
//! Each panel is a free function taking `&imgui::Ui` plus the state it
//! edits; none of them own an imgui context.

pub mod anim;
pub mod scene_browser;
pub mod selection_list;
pub mod view;

pub use scene_browser::scene_browser_panel;
pub use selection_list::selection_list_panel;
pub use view::{camera_panel, view_panel};
