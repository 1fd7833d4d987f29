//! Minimal Azure Resource Manager REST client
//!
//! Speaks JSON over `{endpoint}{id}?api-version=...` with a bearer token.
//! Non-success responses are decoded from the ARM error envelope.

use crate::remote::RemoteError;
use armflow_core::Environment;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::result::Result;

#[derive(Debug, Clone)]
pub struct ArmClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

/// One page of a list response
#[derive(Debug, serde::Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

impl ArmClient {
    pub fn new(environment: &Environment, token: impl Into<String>) -> Self {
        Self::with_endpoint(environment.resource_manager_endpoint, token)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, id: &str, api_version: &str) -> String {
        format!("{}{}?api-version={}", self.endpoint, id, api_version)
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str, api_version: &str) -> Result<T, RemoteError> {
        let response = self.send(Method::GET, &self.url(id, api_version), None::<&()>).await?;
        Ok(response.json().await?)
    }

    pub async fn put<B, T>(&self, id: &str, api_version: &str, body: &B) -> Result<T, RemoteError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PUT, &self.url(id, api_version), Some(body)).await?;
        Ok(response.json().await?)
    }

    /// Delete; `204 No Content` and `202 Accepted` both count as done.
    pub async fn delete(&self, id: &str, api_version: &str) -> Result<(), RemoteError> {
        self.send(Method::DELETE, &self.url(id, api_version), None::<&()>)
            .await
            .map(|_| ())
    }

    /// List a collection, following `nextLink` until exhausted.
    pub async fn list<T: DeserializeOwned>(&self, path: &str, api_version: &str) -> Result<Vec<T>, RemoteError> {
        let mut items = Vec::new();
        let mut next = Some(self.url(path, api_version));

        while let Some(url) = next.take() {
            let response = self.send(Method::GET, &url, None::<&()>).await?;
            let page: Page<T> = response.json().await?;
            items.extend(page.value);
            next = page.next_link.filter(|link| !link.is_empty());
        }

        Ok(items)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, RemoteError> {
        tracing::debug!(%method, %url, "ARM request");

        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = RemoteError::from_response(status.as_u16(), &body);
        if status != StatusCode::NOT_FOUND {
            tracing::debug!(status = status.as_u16(), error = %error, "ARM request failed");
        }
        Err(error)
    }
}
