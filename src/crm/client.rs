//! HTTP client for the CRM object API
//!
//! Speaks the HubSpot-style v3 object endpoints with a private app token.

use crate::config::CrmConfig;
use crate::crm::store::{CrmRecord, CrmStore, SearchRequest};
use crate::error::{CrmError, CrmResult};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<CrmRecord>,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    url: Option<String>,
}

/// CRM client over HTTPS
pub struct HttpCrmClient {
    config: CrmConfig,
    http: Client,
}

impl HttpCrmClient {
    pub fn new(config: CrmConfig, timeout: Duration) -> CrmResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { config, http })
    }

    /// `base_url` plus one percent-encoded path segment per entry
    fn url(&self, segments: &[&str]) -> CrmResult<Url> {
        if let Some(bad) = segments.iter().find(|s| !is_path_segment(s)) {
            return Err(CrmError::InvalidInput(format!("Invalid CRM path segment {:?}", bad)));
        }

        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| CrmError::InvalidInput(format!("Invalid CRM base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CrmError::InvalidInput("CRM base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check(response: Response) -> CrmResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CrmError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Dot segments and empty values would change which resource a path names
fn is_path_segment(value: &str) -> bool {
    !value.is_empty() && value != "." && value != ".."
}

#[async_trait]
impl CrmStore for HttpCrmClient {
    async fn search(&self, object_type: &str, request: &SearchRequest) -> CrmResult<Vec<CrmRecord>> {
        let body = serde_json::json!({
            "filterGroups": [{ "filters": request.filters }],
            "properties": request.properties,
            "limit": request.limit,
        });

        debug!("CRM search {} with {} filters", object_type, request.filters.len());

        let response = self
            .http
            .post(self.url(&["crm", "v3", "objects", object_type, "search"])?)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await?;

        let parsed: SearchResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CrmError::Decode(e.to_string()))?;

        Ok(parsed.results)
    }

    async fn get(
        &self,
        object_type: &str,
        id: &str,
        properties: &[&str],
    ) -> CrmResult<Option<CrmRecord>> {
        if !is_path_segment(id) {
            debug!("No CRM {} record can have id {:?}", object_type, id);
            return Ok(None);
        }

        let response = self
            .http
            .get(self.url(&["crm", "v3", "objects", object_type, id])?)
            .bearer_auth(&self.config.api_token)
            .query(&[("properties", properties.join(","))])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record = Self::check(response)
            .await?
            .json::<CrmRecord>()
            .await
            .map_err(|e| CrmError::Decode(e.to_string()))?;

        Ok(Some(record))
    }

    async fn create(
        &self,
        object_type: &str,
        properties: HashMap<String, String>,
    ) -> CrmResult<CrmRecord> {
        if properties.is_empty() {
            return Err(CrmError::InvalidInput(format!(
                "Refusing to create empty {} record",
                object_type
            )));
        }

        let response = self
            .http
            .post(self.url(&["crm", "v3", "objects", object_type])?)
            .bearer_auth(&self.config.api_token)
            .json(&serde_json::json!({ "properties": properties }))
            .send()
            .await?;

        let record = Self::check(response)
            .await?
            .json::<CrmRecord>()
            .await
            .map_err(|e| CrmError::Decode(e.to_string()))?;

        debug!("Created CRM {} record {}", object_type, record.id);
        Ok(record)
    }

    async fn file_url(&self, file_id: &str) -> CrmResult<Option<String>> {
        if !is_path_segment(file_id) {
            return Ok(None);
        }

        let response = self
            .http
            .get(self.url(&["files", "v3", "files", file_id, "signed-url"])?)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let parsed: SignedUrlResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CrmError::Decode(e.to_string()))?;

        Ok(parsed.url)
    }
}
