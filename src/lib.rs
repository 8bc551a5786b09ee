mod camera;
mod config;
mod controller;
mod depth;
mod error;
mod measurement;
mod pose;
mod raycast;
mod render;
mod resolver;
mod smoothing;
mod snap;

pub use glam;

pub use camera::*;
pub use config::MeasureConfig;
pub use controller::*;
pub use depth::*;
pub use error::*;
pub use measurement::*;
pub use pose::*;
pub use raycast::*;
pub use render::*;
pub use resolver::*;
pub use smoothing::*;
pub use snap::*;
