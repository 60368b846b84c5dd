pub mod codec;
pub mod color;
pub mod compression;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod scaling;
pub mod transform;
