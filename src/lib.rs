pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{ChromiumRenderer, GotenbergRenderer, SqliteScenarioStore};
pub use app::{build_router, serve};
pub use config::{RendererKind, TomlConfig};
pub use core::{calculator::calculate_roi, engine::RoiEngine};
pub use utils::error::{Result, RoiError};
