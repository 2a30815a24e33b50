//! pricewatch: one-shot price-threshold alerts
//!
//! Clients register a watch on an asset with an upper and/or lower price
//! limit; a background sweep polls the quote provider and delivers exactly
//! one notification the first time the condition holds.
//!
//! # Guarantees
//!
//! - A watch is notified at most once; after a successful trigger send its
//!   `notified` flag flips permanently and the watch goes inert.
//! - Sweeps never overlap: one timer drives them and each sweep finishes
//!   before the next tick fires.
//! - Failures are confined to the watch they occur on: a quote fetch error,
//!   a missing quote, or a failed send just leaves that watch pending for
//!   the next tick.
//!
//! # Example
//!
//! ```no_run
//! use pricewatch::api::{run_server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     run_server(config).await.unwrap();
//! }
//! ```

pub mod api;
pub mod notify;
pub mod price;
pub mod register;
pub mod sweep;
pub mod watch;

// Re-export commonly used types
pub use register::{Registration, RegistrationService};
pub use sweep::{SweepStats, Sweeper};
pub use watch::{InvalidWatch, ThresholdMode, Watch, WatchRequest, WatchStore};
