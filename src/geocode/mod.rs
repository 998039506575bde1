//! Reverse geocoding: coordinates → country name.
//!
//! `ReverseGeocoder` consults a `GeocodeCache` first and only falls through
//! to the remote `GeocodeClient` (Nominatim in production) on a miss. Remote
//! failures never surface to callers; they resolve to [`UNKNOWN_COUNTRY`]
//! and are not cached, so a later call retries the service.
//!
//! [`UNKNOWN_COUNTRY`]: crate::models::UNKNOWN_COUNTRY

pub mod cache;
pub mod geocoder;
pub mod nominatim;
pub mod throttle;

pub use cache::{CacheError, CacheStore, GeocodeCache, JsonFileStore, MemoryStore};
pub use geocoder::{GeocodeClient, ReverseGeocoder};
pub use nominatim::NominatimClient;
pub use throttle::RequestThrottle;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Geocoding service unreachable: {0}")]
    Transport(String),

    #[error("Geocoding service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed geocoding response: {0}")]
    Parse(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
