#![forbid(unsafe_code)]

mod canvas;

pub use canvas::{init_tracing, AsciiCanvas, CanvasConfig};
