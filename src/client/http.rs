use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use crate::client::{ClientError, ClientResult, ResourceClient};
use crate::config::ResourceConfig;
use crate::models::{Fields, Record};

/// Resource client over HTTP/JSON.
///
/// No timeout is configured and nothing is retried.
pub struct HttpResourceClient {
    client: Client,
    config: ResourceConfig,
}

impl HttpResourceClient {
    pub fn new(config: ResourceConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Network(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// `{collection}/{id}` with the id encoded as a single path segment.
    fn item_url(&self, id: &str) -> ClientResult<Url> {
        let collection = self.config.collection_url();
        let mut url = Url::parse(&collection)
            .map_err(|e| ClientError::Network(format!("Invalid url {}: {}", collection, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Network(format!("Invalid url {}", collection)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    async fn send_record(&self, request: RequestBuilder) -> ClientResult<Record> {
        let body = self.send(request).await?;
        Ok(serde_json::from_str::<Record>(&body)?)
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    fn resource(&self) -> &str {
        &self.config.resource_path
    }

    async fn list(&self) -> ClientResult<Vec<Record>> {
        let url = self.config.collection_url();
        debug!("GET {}", url);

        let body = self.send(self.client.get(&url)).await?;
        match serde_json::from_str::<Value>(&body)? {
            value @ Value::Array(_) => Ok(serde_json::from_value(value)?),
            other => Err(ClientError::Decode(format!(
                "expected a JSON array from {}, got {}",
                url,
                type_name(&other)
            ))),
        }
    }

    async fn create(&self, fields: &Fields) -> ClientResult<Record> {
        let url = self.config.collection_url();
        debug!("POST {}", url);
        self.send_record(self.client.post(&url).json(fields)).await
    }

    async fn update(&self, id: &str, fields: &Fields) -> ClientResult<Record> {
        let url = self.item_url(id)?;
        debug!("PUT {}", url);
        self.send_record(self.client.put(url).json(fields)).await
    }

    async fn delete(&self, id: &str) -> ClientResult<()> {
        let url = self.item_url(id)?;
        debug!("DELETE {}", url);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
