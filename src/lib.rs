#![doc = include_str!("../README.md")]

mod dataset;
mod decode;
mod error;
pub mod layout;
mod ordering;
mod record;
mod splat;

pub use dataset::*;
pub use decode::*;
pub use error::*;
pub use ordering::*;
pub use record::*;
pub use splat::*;

pub use glam;
