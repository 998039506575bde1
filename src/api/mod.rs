//! HTTP surface: listing page, submission form handler, stored photos.
//!
//! `app_router()` returns a composable `Router`; `server` owns the
//! bind/serve/shutdown lifecycle.

pub mod endpoints;
pub mod error;
pub mod flash;
pub mod page;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server, RunningServer, ServerError};
pub use types::AppState;
