use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::models::{DictEntry, DictResponse, PageResponse, RawRecord, SUCCESS_CODE};
use crate::api::RecordSource;
use crate::app_config::ApiConfig;
use crate::errors::FetchError;
use crate::retry::{retry, RetryPolicy};

/// HTTP client for the dictionary and page endpoints
#[derive(Debug)]
pub struct ApiClient {
    /// HTTP client for making requests
    client: Client,
    /// Full URL of the tag dictionary endpoint
    dictionary_url: Url,
    /// Full URL of the paginated list endpoint
    page_url: Url,
    /// Backoff schedule applied to every request
    policy: RetryPolicy,
}

impl ApiClient {
    /// Create a new client from the API configuration
    pub fn new(api: &ApiConfig, policy: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(api.timeout())
            .connect_timeout(api.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            dictionary_url: api.dictionary_url()?,
            page_url: api.page_url()?,
            policy,
        })
    }

    /// GET `url` with `query` and decode the JSON body, retrying transport and parse failures
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        retry(&self.policy, |attempt| async move {
            debug!("GET {} {:?} (attempt {})", url, query, attempt);

            let response = self
                .client
                .get(url.clone())
                .query(query)
                .send()
                .await
                .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to get error response text".to_string());
                return Err(FetchError::RequestFailed(format!(
                    "HTTP {} from {}: {}",
                    status, url, error_text
                )));
            }

            let body = response
                .text()
                .await
                .map_err(|e| FetchError::RequestFailed(e.to_string()))?;

            serde_json::from_str::<T>(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                error!("Failed to parse response from {}: {}. Body starts with: {}", url, e, preview);
                FetchError::ParseError(e.to_string())
            })
        })
        .await
    }
}

#[async_trait]
impl RecordSource for ApiClient {
    async fn fetch_dictionary(&self) -> Result<Vec<DictEntry>, FetchError> {
        let response: DictResponse = self.get_json(&self.dictionary_url, &[]).await?;
        if response.code != SUCCESS_CODE {
            return Err(FetchError::ApiError {
                code: response.code,
                context: "fetching the tag dictionary".to_string(),
            });
        }
        Ok(response.data)
    }

    async fn fetch_page(&self, page_num: u32, page_size: u32) -> Result<Vec<RawRecord>, FetchError> {
        let query = [
            ("pageNum", page_num.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        let response: PageResponse = self.get_json(&self.page_url, &query).await?;
        if response.code != SUCCESS_CODE {
            return Err(FetchError::ApiError {
                code: response.code,
                context: format!("fetching page {}", page_num),
            });
        }
        Ok(response.data.list)
    }
}
