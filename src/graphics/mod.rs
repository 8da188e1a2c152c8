mod args;
mod vertex;

mod shader;
mod camera;

mod dispatch;
mod error;

pub use args::*;
pub use vertex::*;

pub use shader::*;
pub use camera::*;

pub use dispatch::*;
pub use error::*;
