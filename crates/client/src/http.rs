//! Shared HTTP plumbing for the API clients.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use estore_core::ErrorBody;

use crate::error::ClientError;
use crate::session::SessionContext;

/// Base URL, HTTP client and session shared by the API clients.
#[derive(Debug, Clone)]
pub struct ApiTransport {
    client: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl ApiTransport {
    /// Create a transport for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client fails to build.
    pub fn new(base_url: Url, session: SessionContext) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("estore-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// The session this transport authenticates with.
    #[must_use]
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Build an absolute URL from path segments, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Validation("API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get(&self, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        Ok(self.authorize(self.client.get(self.url(segments)?)))
    }

    pub(crate) fn post(&self, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        Ok(self.authorize(self.client.post(self.url(segments)?)))
    }

    /// Attach the session's bearer token, if there is one.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }
}

/// Decode a successful JSON response or map the failure to a [`ClientError`].
pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check(response).await?;
    Ok(response.json().await?)
}

/// Pass a successful response through or map the failure to a [`ClientError`].
pub(crate) async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text
            }
        });

    tracing::debug!(status = status.as_u16(), %message, "API request failed");
    Err(ClientError::from_status(status, message))
}
