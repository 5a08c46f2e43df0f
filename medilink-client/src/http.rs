use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ErrorBody};

/// Shared transport for the gateways
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub(crate) fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn get(&self, segments: &[&str]) -> ClientResult<RequestBuilder> {
        Ok(self.client.get(self.config.url(segments)?))
    }

    pub(crate) fn put(&self, segments: &[&str]) -> ClientResult<RequestBuilder> {
        Ok(self.client.put(self.config.url(segments)?))
    }

    pub(crate) fn patch(&self, segments: &[&str]) -> ClientResult<RequestBuilder> {
        Ok(self.client.patch(self.config.url(segments)?))
    }

    pub(crate) fn delete(&self, segments: &[&str]) -> ClientResult<RequestBuilder> {
        Ok(self.client.delete(self.config.url(segments)?))
    }

    /// Send a request and decode a JSON success body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Send a request, turning non-2xx statuses into [`ClientError::Status`]
    pub(crate) async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "API response");
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status,
            body: ErrorBody::parse(&text),
        })
    }
}
