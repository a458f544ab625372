pub mod camera;
pub mod constants;
pub mod cursor;
pub mod field;
pub mod pointer;

pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");
pub static NEBULA_WGSL: &str = include_str!("../shaders/nebula.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use camera::*;
pub use constants::*;
pub use cursor::*;
pub use field::*;
pub use pointer::*;
