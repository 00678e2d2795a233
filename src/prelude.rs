pub use anyhow::{Context as _, Result as Fallible};
pub use log::{debug, error, info};
