// SPDX-License-Identifier: MPL-2.0
//! The viewer: view transform math, the load/navigation state machine,
//! and the canvas that renders the active bitmap.

pub mod canvas;
pub mod state;
pub mod transform;

pub use canvas::ImagePane;
pub use state::{LoadFailure, LoadRequest, Phase, RenderFilter, State};
pub use transform::{FitMode, ViewTransform};
