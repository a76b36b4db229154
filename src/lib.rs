//! Pinboard - pin collection client
//!
//! Scan a pin photo to identify it, keep pins on three boards (your own
//! collection, a wishlist and a trading board), inspect, remove and move
//! them between boards.
//!
//! ## Architecture
//!
//! - [`api`]: the `/api/pins/...` backend behind the [`api::CollectionApi`]
//!   trait, with a reqwest client and an in-memory collection
//! - [`section`]: the generic remote section (loading/ready/failed plus a
//!   request generation guard) every screen is built from
//! - [`screens`]: one view-state controller per route
//! - [`app`]: mounts screens, keeps the back stack, routes async results
//!   back to the screen that asked for them
//! - [`ui`]: ratatui rendering of the controller state
//!
//! ## Usage
//!
//! ```bash
//! cargo run -- --demo true pinboard://v1/boards
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod types;
pub mod util_text;

// Backend access
pub mod api;
pub mod net;
pub mod snapshot;

// Device capabilities
pub mod camera;
pub mod device;

// View state
pub mod app;
pub mod scope;
pub mod screens;
pub mod section;
pub mod toast;

// Deep link router
pub mod router;

pub mod ui;

pub use api::{CollectionApi, HttpCollectionClient, InMemoryCollection};
pub use app::App;
pub use error::ApiError;
pub use router::Route;
