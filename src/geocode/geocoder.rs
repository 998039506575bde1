use std::sync::{Mutex, MutexGuard, PoisonError};

use super::cache::GeocodeCache;
use super::throttle::RequestThrottle;
use super::GeocodeError;
use crate::models::UNKNOWN_COUNTRY;

/// Remote reverse-geocoding lookup.
///
/// `Ok(country)` means the service answered successfully (HTTP 200) and the
/// result may be cached; every `Err` is treated as transient.
pub trait GeocodeClient: Send + Sync {
    fn reverse(&self, lat: f64, lon: f64) -> Result<String, GeocodeError>;
}

/// Cache-first resolver in front of a `GeocodeClient`.
pub struct ReverseGeocoder {
    client: Box<dyn GeocodeClient>,
    cache: Mutex<GeocodeCache>,
    throttle: RequestThrottle,
}

impl ReverseGeocoder {
    pub fn new(client: Box<dyn GeocodeClient>, cache: GeocodeCache, throttle: RequestThrottle) -> Self {
        Self {
            client,
            cache: Mutex::new(cache),
            throttle,
        }
    }

    /// Country for the coordinates, or "Unknown" when the service fails.
    pub fn resolve(&self, lat: f64, lon: f64) -> String {
        if let Some(country) = self.cache().lookup(lat, lon) {
            tracing::debug!(lat, lon, country, "Geocode cache hit");
            return country.to_string();
        }

        // Lock released during the remote call; only the throttle serializes.
        self.throttle.wait();

        match self.client.reverse(lat, lon) {
            Ok(country) => {
                if let Err(e) = self.cache().store(lat, lon, &country) {
                    tracing::warn!(error = %e, "Failed to persist geocode cache");
                }
                tracing::info!(lat, lon, country = %country, "Reverse geocode resolved");
                country
            }
            Err(e) => {
                tracing::warn!(lat, lon, error = %e, "Reverse geocode failed");
                UNKNOWN_COUNTRY.to_string()
            }
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache().len()
    }

    fn cache(&self) -> MutexGuard<'_, GeocodeCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::cache::{CacheError, CacheStore, JsonFileStore, MemoryStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted client that counts remote calls.
    struct ScriptedClient {
        calls: Arc<AtomicUsize>,
        answer: fn() -> Result<String, GeocodeError>,
    }

    impl ScriptedClient {
        fn new(answer: fn() -> Result<String, GeocodeError>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: calls.clone(),
                    answer,
                },
                calls,
            )
        }
    }

    impl GeocodeClient for ScriptedClient {
        fn reverse(&self, _lat: f64, _lon: f64) -> Result<String, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.answer)()
        }
    }

    struct FailingStore;

    impl CacheStore for FailingStore {
        fn load(&self) -> Result<Option<String>, CacheError> {
            Ok(None)
        }
        fn save(&self, _snapshot: &str) -> Result<(), CacheError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    fn geocoder(client: ScriptedClient, cache: GeocodeCache) -> ReverseGeocoder {
        ReverseGeocoder::new(Box::new(client), cache, RequestThrottle::disabled())
    }

    #[test]
    fn repeated_resolve_hits_remote_once() {
        let (client, calls) = ScriptedClient::new(|| Ok("Chile".into()));
        let geocoder = geocoder(client, GeocodeCache::in_memory());

        assert_eq!(geocoder.resolve(-33.45, -70.66), "Chile");
        assert_eq!(geocoder.resolve(-33.45, -70.66), "Chile");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_returns_unknown_and_is_not_cached() {
        let (client, calls) =
            ScriptedClient::new(|| Err(GeocodeError::Transport("connection refused".into())));
        let geocoder = geocoder(client, GeocodeCache::in_memory());

        assert_eq!(geocoder.resolve(1.0, 2.0), "Unknown");
        assert_eq!(geocoder.resolve(1.0, 2.0), "Unknown");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(geocoder.cached_entries(), 0);
    }

    #[test]
    fn non_200_status_returns_unknown() {
        let (client, _) = ScriptedClient::new(|| {
            Err(GeocodeError::Status {
                status: 503,
                body: "maintenance".into(),
            })
        });
        let geocoder = geocoder(client, GeocodeCache::in_memory());
        assert_eq!(geocoder.resolve(1.0, 2.0), "Unknown");
        assert_eq!(geocoder.cached_entries(), 0);
    }

    #[test]
    fn successful_unknown_answer_is_cached() {
        let (client, calls) = ScriptedClient::new(|| Ok(UNKNOWN_COUNTRY.into()));
        let geocoder = geocoder(client, GeocodeCache::in_memory());

        geocoder.resolve(0.0, -160.0);
        geocoder.resolve(0.0, -160.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn persisted_cache_answers_without_remote_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode_cache.json");
        {
            let (client, _) = ScriptedClient::new(|| Ok("Testland".into()));
            let cache = GeocodeCache::load(Box::new(JsonFileStore::new(&path)));
            geocoder(client, cache).resolve(10.0, 20.0);
        }

        let (client, calls) =
            ScriptedClient::new(|| Err(GeocodeError::Transport("offline".into())));
        let cache = GeocodeCache::load(Box::new(JsonFileStore::new(&path)));
        let geocoder = geocoder(client, cache);

        assert_eq!(geocoder.resolve(10.0, 20.0), "Testland");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn persist_failure_still_returns_country() {
        let (client, calls) = ScriptedClient::new(|| Ok("Peru".into()));
        let geocoder = geocoder(client, GeocodeCache::load(Box::new(FailingStore)));

        assert_eq!(geocoder.resolve(-12.0, -77.0), "Peru");
        // In-memory entry survives the failed save.
        assert_eq!(geocoder.resolve(-12.0, -77.0), "Peru");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn success_writes_snapshot_to_store() {
        let backend = MemoryStore::new();
        let (client, _) = ScriptedClient::new(|| Ok("Japan".into()));
        let geocoder = geocoder(client, GeocodeCache::load(Box::new(backend.clone())));

        geocoder.resolve(35.0, 139.5);
        assert_eq!(backend.snapshot().unwrap(), r#"{"35.0,139.5":"Japan"}"#);
    }
}
