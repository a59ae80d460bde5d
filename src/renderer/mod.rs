//! WebGPU rendering module
//!
//! The scene is built on the CPU as flat-colored rectangles in screen pixels
//! ([`scene`]) and drawn with a single vertex pipeline ([`pipeline`]).

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::build_scene;
pub use vertex::Vertex;
