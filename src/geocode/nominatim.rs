//! Nominatim reverse-geocoding client.
//!
//! One blocking `GET /reverse` per lookup with `addressdetails=1`. The
//! country is read from `address.country`; an HTTP 200 without it still
//! counts as a successful lookup that resolved to "Unknown".

use serde_json::Value;

use super::geocoder::GeocodeClient;
use super::GeocodeError;
use crate::models::UNKNOWN_COUNTRY;

pub struct NominatimClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    /// Build a client. `user_agent` identifies this application to the
    /// service, as its usage policy requires.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| GeocodeError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl GeocodeClient for NominatimClient {
    fn reverse(&self, lat: f64, lon: f64) -> Result<String, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        tracing::info!(lat, lon, status = status.as_u16(), "Reverse geocode response");

        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        Ok(country_from_response(&body))
    }
}

/// `address.country` of a reverse-geocode body, or "Unknown".
pub fn country_from_response(body: &Value) -> String {
    body.get("address")
        .and_then(|address| address.get("country"))
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_COUNTRY)
        .to_string()
}
