pub mod catalog;
pub mod clock;
pub mod config;
pub mod derive;
pub mod error;
pub mod models;
pub mod roulette;
pub mod store;
pub mod tracing_setup;
pub mod tracker;

pub use catalog::Catalog;
pub use clock::{Clock, FixedClock, LocalClock};
pub use config::CoreConfig;
pub use error::{CatalogError, MutationError, StorageError};
pub use store::AppState;
pub use tracker::{Dashboard, Tracker};
