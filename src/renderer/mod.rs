//! Rendering
//!
//! Games emit [`DrawList`]s; the WebGPU backend tessellates them into a
//! single triangle list per frame.

pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw::{Color, DrawCmd, DrawList, colors};
pub use pipeline::RenderState;
