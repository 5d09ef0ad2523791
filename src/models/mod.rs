//! Data models

pub mod sample;
pub mod record;

pub use sample::*;
pub use record::*;
