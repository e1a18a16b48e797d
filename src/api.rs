//! Blocking HTTP client for the sustainability backend.
//!
//! One method per endpoint, all returning typed results. The client never
//! retries; callers own the UI consequence of each [`ApiError`] class.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::ApiError;
use crate::model::{AnalysisResponse, BoundingBox, BuildingMetric, GreenZone};

/// A hung backend must not pin the loading indicator forever.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the sustainability REST backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL.
    ///
    /// `base_url` should be like `http://127.0.0.1:5000` (no trailing slash).
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Per-building solar potential, `GET /solar`.
    pub fn solar(&self) -> Result<Vec<BuildingMetric>, ApiError> {
        self.get_json("/solar")
    }

    /// Per-building carbon savings, `GET /carbon`.
    pub fn carbon(&self) -> Result<Vec<BuildingMetric>, ApiError> {
        self.get_json("/carbon")
    }

    /// Textual suggestions, `GET /recommendations`.
    pub fn recommendations(&self) -> Result<Vec<String>, ApiError> {
        self.get_json("/recommendations")
    }

    /// Suggested vegetation locations, `GET /green-zones`.
    pub fn green_zones(&self) -> Result<Vec<GreenZone>, ApiError> {
        self.get_json("/green-zones")
    }

    /// Server-side region analysis, `POST /analyze_region`.
    pub fn analyze_region(&self, bbox: &BoundingBox) -> Result<AnalysisResponse, ApiError> {
        self.post_json("/analyze_region", bbox)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "GET");
        let resp = self.client.get(&url).send().map_err(|source| {
            ApiError::Network {
                url: url.clone(),
                source,
            }
        })?;
        Self::decode(url, resp)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, "POST");
        let resp = self.client.post(&url).json(body).send().map_err(|source| {
            ApiError::Network {
                url: url.clone(),
                source,
            }
        })?;
        Self::decode(url, resp)
    }

    fn decode<T: DeserializeOwned>(
        url: String,
        resp: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Server {
                url,
                status: status.as_u16(),
            });
        }
        resp.json().map_err(|source| ApiError::Parse { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://127.0.0.1:5000/").unwrap();
        assert_eq!(client.endpoint("/solar"), "http://127.0.0.1:5000/solar");
    }

    #[test]
    fn endpoints_join_without_double_slash() {
        let client = ApiClient::new("http://127.0.0.1:5000").unwrap();
        assert_eq!(
            client.endpoint("/analyze_region"),
            "http://127.0.0.1:5000/analyze_region"
        );
    }
}
