//! Input state tracking

pub mod state;

pub use state::InputState;
