//! Application layer: the viewer controller.

pub mod controller;

pub use controller::{ViewerController, ViewerState};
