//! Watch data model and registry

pub mod model;
pub mod store;

pub use model::{InvalidWatch, ThresholdMode, Watch, WatchRequest};
pub use store::WatchStore;
