pub mod camera;
pub mod constants;
pub mod error;
pub mod lifecycle;
pub mod page;
pub mod pointer;
pub mod scene;
pub mod theme;

pub use camera::*;
pub use constants::*;
pub use error::*;
pub use lifecycle::*;
pub use pointer::*;
pub use scene::*;
pub use theme::*;

// Shaders bundled as string constants
pub static SCENE_WGSL: &str = include_str!("../../shaders/scene.wgsl");
