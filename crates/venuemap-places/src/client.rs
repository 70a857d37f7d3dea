//! HTTP client for the Google Maps geocoding and Places web services.
//!
//! Wraps `reqwest` with Google-specific status handling, API key management,
//! retry, and typed response deserialization. Every endpoint checks the
//! `"status"` field in the JSON envelope: `OK` proceeds, `ZERO_RESULTS` and
//! `NOT_FOUND` become empty results, anything else is a [`PlacesError::ApiError`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use venuemap_core::{Coordinate, PlaceDetails, PlaceSummary};

use crate::error::PlacesError;
use crate::normalize::{miles_to_meters, normalize_details, normalize_summary};
use crate::retry::retry_with_backoff;
use crate::types::{
    GeocodeResponse, NearbySearchResponse, PlaceDetailsResponse, STATUS_NOT_FOUND, STATUS_OK,
    STATUS_ZERO_RESULTS,
};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BACKOFF_BASE_MS: u64 = 500;

/// Fields requested from the details endpoint.
const DETAIL_FIELDS: &str = "place_id,name,formatted_address,geometry,rating,\
user_ratings_total,price_level,website,formatted_phone_number,opening_hours,types";

/// Client for the Google Maps web services.
///
/// Use [`GoogleMapsClient::new`] for production or
/// [`GoogleMapsClient::with_base_url`] to point at a mock server in tests.
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: Url,
    timeout: Duration,
    connect_timeout: Duration,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GoogleMapsClient {
    /// Creates a new client pointed at the production Google Maps API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let timeout = Duration::from_secs(timeout_secs);
        let connect_timeout = Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS);
        let client = http_client(timeout, connect_timeout)?;

        // Exactly one trailing slash so relative endpoint paths join beneath it.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            timeout,
            connect_timeout,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Rebuilds the HTTP client with a different TCP connect timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be rebuilt.
    pub fn with_connect_timeout(mut self, connect_timeout_secs: u64) -> Result<Self, PlacesError> {
        self.connect_timeout = Duration::from_secs(connect_timeout_secs);
        self.client = http_client(self.timeout, self.connect_timeout)?;
        Ok(self)
    }

    /// Overrides the retry policy for transient failures.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Resolves a free-text address to the coordinate of its best match.
    ///
    /// Returns `Ok(None)` when Google finds nothing.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiError`] if the API returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, PlacesError> {
        let url = self.build_url("geocode/json", &[("address", address)]);
        let Some(response) = self
            .fetch::<GeocodeResponse>(&url, &format!("geocode(address={address})"))
            .await?
        else {
            return Ok(None);
        };

        Ok(response
            .results
            .first()
            .map(|r| Coordinate::new(r.geometry.location.lat, r.geometry.location.lng)))
    }

    /// Lists places around `center`, optionally restricted to one place type.
    ///
    /// Only the first result page is fetched.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiError`] if the API returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_nearby(
        &self,
        center: Coordinate,
        radius_miles: f64,
        place_type: Option<&str>,
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        let location = format!("{},{}", center.latitude, center.longitude);
        let radius = miles_to_meters(radius_miles).to_string();
        let mut params = vec![("location", location.as_str()), ("radius", radius.as_str())];
        if let Some(kind) = place_type.map(str::trim).filter(|k| !k.is_empty()) {
            params.push(("type", kind));
        }

        let url = self.build_url("place/nearbysearch/json", &params);
        let Some(response) = self
            .fetch::<NearbySearchResponse>(&url, &format!("nearbysearch(location={location})"))
            .await?
        else {
            return Ok(Vec::new());
        };

        if response.next_page_token.is_some() {
            tracing::debug!(
                returned = response.results.len(),
                "nearby search has further pages; only the first is used"
            );
        }

        Ok(response.results.into_iter().map(normalize_summary).collect())
    }

    /// Fetches the extended record for one place.
    ///
    /// Returns `Ok(None)` when the place is unknown or its payload lacks a
    /// name or location.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::ApiError`] if the API returns an error status.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn get_place_details(
        &self,
        place_id: &str,
    ) -> Result<Option<PlaceDetails>, PlacesError> {
        let url = self.build_url(
            "place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        );
        let Some(response) = self
            .fetch::<PlaceDetailsResponse>(&url, &format!("details(place_id={place_id})"))
            .await?
        else {
            return Ok(None);
        };

        Ok(response.result.and_then(normalize_details))
    }

    /// Builds the full request URL with properly percent-encoded query parameters.
    ///
    /// Joins `path` onto the stored base URL and appends any parameters via
    /// [`Url::query_pairs_mut`], followed by the API key.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Requests `url` with retry, checks the status envelope, and decodes the
    /// body into `T`. Returns `Ok(None)` for the two "nothing matched" statuses.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<Option<T>, PlacesError> {
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            let body = self.request_json(url).await?;
            Self::check_status(body)
        })
        .await?;

        let Some(body) = body else {
            return Ok(None);
        };

        serde_json::from_value(body)
            .map(Some)
            .map_err(|e| PlacesError::Deserialize {
                context: context.to_owned(),
                source: e,
            })
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the response
    /// body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }

    /// Interprets the top-level `"status"` field.
    fn check_status(body: serde_json::Value) -> Result<Option<serde_json::Value>, PlacesError> {
        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();

        match status {
            STATUS_OK => Ok(Some(body)),
            STATUS_ZERO_RESULTS | STATUS_NOT_FOUND => Ok(None),
            other => Err(PlacesError::ApiError {
                status: if other.is_empty() {
                    "MISSING_STATUS".to_owned()
                } else {
                    other.to_owned()
                },
                message: body
                    .get("error_message")
                    .and_then(serde_json::Value::as_str)
                    .map(ToOwned::to_owned),
            }),
        }
    }
}

fn http_client(timeout: Duration, connect_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .user_agent("venuemap/0.1 (venue-discovery)")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> GoogleMapsClient {
        GoogleMapsClient::with_base_url("test-key", 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_joins_endpoint_path() {
        let client = test_client("https://maps.googleapis.com/maps/api");
        let url = client.build_url("geocode/json", &[("address", "Main St")]);
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/geocode/json?address=Main+St&key=test-key"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://maps.googleapis.com/maps/api/");
        let url = client.build_url("place/details/json", &[("place_id", "abc")]);
        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/details/json?place_id=abc&key=test-key"
        );
    }

    #[test]
    fn build_url_encodes_special_characters() {
        let client = test_client("https://maps.googleapis.com/maps/api");
        let url = client.build_url("geocode/json", &[("address", "Bar & Grill #2")]);
        assert!(
            url.as_str().contains("Bar+%26+Grill+%232"),
            "query param should be percent-encoded: {url}"
        );
    }

    #[test]
    fn check_status_maps_empty_statuses_to_none() {
        let zero = serde_json::json!({ "status": "ZERO_RESULTS", "results": [] });
        assert!(GoogleMapsClient::check_status(zero).unwrap().is_none());

        let missing = serde_json::json!({ "status": "NOT_FOUND" });
        assert!(GoogleMapsClient::check_status(missing).unwrap().is_none());
    }

    #[test]
    fn check_status_surfaces_error_message() {
        let denied = serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        });
        let err = GoogleMapsClient::check_status(denied).unwrap_err();
        match err {
            PlacesError::ApiError { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
    }

    #[test]
    fn connect_timeout_defaults_and_can_be_overridden() {
        let client = test_client("https://maps.googleapis.com/maps/api");
        assert_eq!(client.connect_timeout, Duration::from_secs(10));
        assert_eq!(client.timeout, Duration::from_secs(30));

        let client = client
            .with_connect_timeout(3)
            .expect("client rebuild should not fail");
        assert_eq!(client.connect_timeout, Duration::from_secs(3));
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GoogleMapsClient::with_base_url("k", 5, "not a url");
        assert!(matches!(result, Err(PlacesError::InvalidBaseUrl { .. })));
    }
}
