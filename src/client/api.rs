use std::{marker::PhantomData, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

use crate::{
    constants::API_PREFIX,
    entities::resource::Resource,
    errors::ClientError,
};

/// Remote CRUD calls for one resource collection.
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, ClientError>;
    async fn create(&self, new: &R::New) -> Result<R, ClientError>;
    async fn update(&self, id: &str, patch: &R::Patch) -> Result<R, ClientError>;
    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

/// Talks to the resource endpoints of a running server.
pub struct HttpResourceApi<R> {
    client: Client,
    base_url: Url,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for HttpResourceApi<R> {
    fn clone(&self) -> Self {
        HttpResourceApi { client: self.client.clone(), base_url: self.base_url.clone(), _resource: PhantomData }
    }
}

impl<R: Resource> HttpResourceApi<R> {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Network(format!("invalid base URL: {e}")))?;
        Ok(HttpResourceApi { client, base_url, _resource: PhantomData })
    }

    fn collection_url(&self, id: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::Network("base URL cannot carry a path".into()))?;
            segments.pop_if_empty();
            segments.extend(API_PREFIX.trim_start_matches('/').split('/'));
            segments.push("resources").push(R::PATH);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

/// Non-2xx responses are surfaced with the server's `error` message when it sent one.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);

    Err(ClientError::Rejected { status: status.as_u16(), message })
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for HttpResourceApi<R> {
    async fn list(&self) -> Result<Vec<R>, ClientError> {
        let response = self.client.get(self.collection_url(None)?).send().await?;
        Ok(ensure_success(response).await?.json::<Vec<R>>().await?)
    }

    async fn create(&self, new: &R::New) -> Result<R, ClientError> {
        let response = self.client.post(self.collection_url(None)?).json(new).send().await?;
        Ok(ensure_success(response).await?.json::<R>().await?)
    }

    async fn update(&self, id: &str, patch: &R::Patch) -> Result<R, ClientError> {
        let response = self.client.put(self.collection_url(Some(id))?).json(patch).send().await?;
        Ok(ensure_success(response).await?.json::<R>().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        // Any 2xx counts; the body is informational.
        let response = self.client.delete(self.collection_url(Some(id))?).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
