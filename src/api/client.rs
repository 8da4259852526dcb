use serde::{Serialize, de::DeserializeOwned};

use super::{ApiError, Endpoint, Method};
use crate::http_client;

/// Cap on JSON response bodies.
const MAX_JSON_BYTES: usize = 8 * 1024 * 1024;
/// Cap on error bodies read from non-2xx responses.
const MAX_ERROR_BYTES: usize = 256 * 1024;
const JSON_MEDIA_TYPE: &str = "application/json";

/// Thin JSON client bound to one backend base address.
///
/// Every call is a single attempt; failures come back as [`ApiError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url` (trailing slashes are dropped).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base address.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Perform the request described by endpoint `E`.
    pub fn call<E: Endpoint>(&self, request: &E::Request) -> Result<E::Response, ApiError> {
        let query = E::query(request);
        let query: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        match E::METHOD {
            Method::Get => self.get_json(E::PATH, &query),
            Method::Post => self.post_json(E::PATH, &query, request),
        }
    }

    /// GET `path` and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::Get, path, query, JSON_MEDIA_TYPE, None)?;
        decode(response)
    }

    /// POST `body` as JSON to `path` and decode the JSON reply.
    pub fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::Post, path, query, JSON_MEDIA_TYPE, Some(body))?;
        decode(response)
    }

    /// POST `body` as JSON and hand back the raw 2xx response for streaming.
    ///
    /// `accept` names the media type expected back.
    pub(crate) fn post_raw<B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        accept: &str,
        body: &B,
    ) -> Result<ureq::Response, ApiError> {
        self.send(Method::Post, path, query, accept, Some(body))
    }

    fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        accept: &str,
        body: Option<&B>,
    ) -> Result<ureq::Response, ApiError> {
        let url = self.url(path);
        tracing::debug!(method = method.as_str(), %url, accept, "backend request");
        let mut request = http_client::agent()
            .request(method.as_str(), &url)
            .set("Accept", accept)
            .set("Content-Type", JSON_MEDIA_TYPE);
        for (key, value) in query {
            request = request.query(key, value);
        }
        let outcome = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        match outcome {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, response)) => {
                let body = http_client::read_response_text(response, MAX_ERROR_BYTES)
                    .unwrap_or_default();
                let err = ApiError::from_status(status, body);
                tracing::warn!(%url, %err, "backend returned an error status");
                Err(err)
            }
            Err(ureq::Error::Transport(transport)) => {
                tracing::warn!(%url, error = %transport, "backend unreachable");
                Err(ApiError::Transport(transport.to_string()))
            }
        }
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
    let text = http_client::read_response_text(response, MAX_JSON_BYTES)
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    let trimmed = text.trim();
    // Some endpoints answer 2xx with an empty body; treat that as `null`.
    let source = if trimmed.is_empty() { "null" } else { trimmed };
    serde_json::from_str(source).map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slashes() {
        let client = ApiClient::new("http://127.0.0.1:5000/");
        assert_eq!(client.base_url(), "http://127.0.0.1:5000");
        assert_eq!(client.url("/predict"), "http://127.0.0.1:5000/predict");
        assert_eq!(client.url("market/prices"), "http://127.0.0.1:5000/market/prices");
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = ApiClient::new(format!("http://{addr}"));
        let err = client
            .get_json::<serde_json::Value>("/weather", &[])
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!err.user_message("Failed").is_empty());
    }
}
