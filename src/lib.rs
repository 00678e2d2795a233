#![allow(clippy::new_without_default)]

pub mod config;
pub mod hog;
mod prelude;
pub mod registry;
pub mod shutdown;
pub mod utils;
