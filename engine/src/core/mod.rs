//! Core camera and geometry utilities

pub mod camera;
pub mod maths;
