use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const GOOGLE_GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// One geocoding match, kept exactly as the API returned it.
pub type Candidate = serde_json::Value;

#[derive(Debug, Error,)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error,),
    #[error("Geocoding API returned HTTP {status}: {body}")]
    Http { status: u16, body: String, },
    #[error("Geocoding API returned status {status}: {message}")]
    Api { status: String, message: String, },
    #[error("Unexpected geocoding response: {0}")]
    InvalidResponse(String,),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `query` to zero or more candidates.
    async fn geocode(&self, query: &str,) -> Result<Vec<Candidate,>, GeocodeError,>;
}

pub struct GoogleGeocoder {
    client:   Client,
    api_key:  String,
    endpoint: String,
}

impl GoogleGeocoder {
    pub fn new(api_key: String, endpoint: Option<String,>,) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: endpoint.unwrap_or_else(|| GOOGLE_GEOCODE_ENDPOINT.to_string(),),
        }
    }
}

#[derive(Deserialize,)]
struct GoogleResponse {
    status:        String,
    #[serde(default)]
    results:       Vec<Candidate,>,
    #[serde(default)]
    error_message: Option<String,>,
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str,) -> Result<Vec<Candidate,>, GeocodeError,> {
        debug!("Geocoding '{}'", query);
        let response = self
            .client
            .get(&self.endpoint,)
            .query(&[("address", query,), ("key", self.api_key.as_str(),),],)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Http { status, body, },);
        }

        let text = response.text().await?;
        let parsed: GoogleResponse = serde_json::from_str(&text,)
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string(),),)?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed.results,),
            "ZERO_RESULTS" => Ok(vec![],),
            _ => Err(GeocodeError::Api {
                message: parsed.error_message.unwrap_or_default(),
                status:  parsed.status,
            },),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer,) -> GoogleGeocoder {
        GoogleGeocoder::new("test-key".to_string(), Some(format!("{}/geocode/json", server.uri()),),)
    }

    #[tokio::test]
    async fn returns_every_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("GET",),)
            .and(path("/geocode/json",),)
            .and(query_param("address", "1 Main St",),)
            .and(query_param("key", "test-key",),)
            .respond_with(ResponseTemplate::new(200,).set_body_json(json!({
                "status": "OK",
                "results": [
                    {"formatted_address": "1 Main St, Springfield, IL"},
                    {"formatted_address": "1 Main St, Springfield, MO"}
                ]
            }),),)
            .mount(&server,)
            .await;

        let results = client_for(&server,).geocode("1 Main St",).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1]["formatted_address"], "1 Main St, Springfield, MO");
    }

    #[tokio::test]
    async fn zero_results_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET",),)
            .respond_with(
                ResponseTemplate::new(200,)
                    .set_body_json(json!({"status": "ZERO_RESULTS", "results": []}),),
            )
            .mount(&server,)
            .await;

        let results = client_for(&server,).geocode("nowhere",).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn api_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET",),)
            .respond_with(ResponseTemplate::new(200,).set_body_json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid.",
                "results": []
            }),),)
            .mount(&server,)
            .await;

        let err = client_for(&server,).geocode("1 Main St",).await.unwrap_err();
        match err {
            GeocodeError::Api { status, message, } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "The provided API key is invalid.");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_failure_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET",),)
            .respond_with(ResponseTemplate::new(503,).set_body_string("unavailable",),)
            .mount(&server,)
            .await;

        let err = client_for(&server,).geocode("1 Main St",).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET",),)
            .respond_with(ResponseTemplate::new(200,).set_body_string("<html></html>",),)
            .mount(&server,)
            .await;

        let err = client_for(&server,).geocode("1 Main St",).await.unwrap_err();
        assert!(matches!(err, GeocodeError::InvalidResponse(_)));
    }
}
