//! HTTP client for the history server.
//!
//! Speaks the save/fetch protocol from [`sketch_core::protocol`] and maps
//! error statuses back into validation and persistence failures.

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use sketch_core::protocol::{HISTORY_PREFIX, SAVE_ROUTE};
use sketch_core::{DrawingArtifact, ErrorBody, HistoryListing, SaveAck, SaveRequest, UserIdentity};
use url::Url;

use crate::error::ClientError;

/// Asynchronous history client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct HistoryClient {
    inner: Arc<InnerClient>,
}

#[derive(Debug)]
struct InnerClient {
    http: Client,
    endpoint: Url,
}

impl HistoryClient {
    /// Create a client.
    ///
    /// `base_url` may be the server root (`http://localhost:5000`) or the
    /// history prefix itself (`http://localhost:5000/api/history`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the URL is malformed or cannot
    /// carry a path, and [`ClientError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        let mut url =
            Url::parse(base_url.as_ref()).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        if !url.path().trim_end_matches('/').ends_with(HISTORY_PREFIX) {
            let not_a_base = ClientError::InvalidUrl(format!("{url} cannot be a base"));
            url.path_segments_mut()
                .map_err(|()| not_a_base)?
                .pop_if_empty()
                .extend(HISTORY_PREFIX.split('/').filter(|s| !s.is_empty()));
        }

        let http = Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                endpoint: url,
            }),
        })
    }

    /// The normalized history endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Save one artifact for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] on 400, [`ClientError::Persistence`]
    /// on 500, [`ClientError::Http`] on transport failure and
    /// [`ClientError::UnexpectedResponse`] otherwise.
    pub async fn save(
        &self,
        owner: &UserIdentity,
        artifact: &DrawingArtifact,
    ) -> Result<SaveAck, ClientError> {
        let url = self.url_for(SAVE_ROUTE.trim_start_matches('/'))?;
        let request = SaveRequest::new(owner.as_str(), artifact);

        tracing::debug!(bytes = artifact.len(), "Saving drawing");
        let response = self.inner.http.post(url).json(&request).send().await?;
        let response = Self::check(response, StatusCode::CREATED).await?;
        Ok(response.json::<SaveAck>().await?)
    }

    /// Fetch the artifacts of `owner` in insertion order.
    ///
    /// # Errors
    ///
    /// Same mapping as [`HistoryClient::save`], with 200 as success.
    pub async fn fetch(&self, owner: &UserIdentity) -> Result<Vec<DrawingArtifact>, ClientError> {
        let url = self.url_for(owner.as_str())?;
        let response = self.inner.http.get(url).send().await?;
        let response = Self::check(response, StatusCode::OK).await?;
        let listing = response.json::<HistoryListing>().await?;
        tracing::debug!(count = listing.history.len(), "History fetched");
        Ok(listing.history)
    }

    fn url_for(&self, segment: &str) -> Result<Url, ClientError> {
        let mut url = self.inner.endpoint.clone();
        let not_a_base = ClientError::InvalidUrl(format!("{url} cannot be a base"));
        url.path_segments_mut()
            .map_err(|()| not_a_base)?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    async fn check(response: Response, expected: StatusCode) -> Result<Response, ClientError> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.message);

        Err(match status {
            StatusCode::BAD_REQUEST => ClientError::Validation(message),
            StatusCode::INTERNAL_SERVER_ERROR => ClientError::Persistence(message),
            _ => ClientError::UnexpectedResponse { status, message },
        })
    }
}
