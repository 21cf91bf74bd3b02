// Adapters layer: concrete implementations of the domain ports.

pub mod pdf;
pub mod sqlite_store;

pub use pdf::{ChromiumRenderer, GotenbergRenderer};
pub use sqlite_store::SqliteScenarioStore;
