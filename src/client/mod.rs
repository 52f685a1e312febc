mod builder;

use crate::error::{ClientError, Result};
pub use builder::ClientBuilder;
use rquest::Client as RquestClient;
use url::Url;

#[derive(Debug)]
pub struct FetchResponse {
    pub status: u16,
    pub bytes: Vec<u8>,
}

pub struct Client {
    inner: RquestClient,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Fetch the raw body of an absolute URL. Non-success statuses are
    /// surfaced as [`ClientError::ResponseError`].
    pub async fn get_bytes(&self, url: &str) -> Result<FetchResponse> {
        Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let is_success = response.status().is_success();

        if !is_success {
            return Err(ClientError::ResponseError {
                status_code: status,
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(|e| {
            ClientError::RequestFailed(format!("Failed to read response body: {}", e))
        })?;

        Ok(FetchResponse {
            status,
            bytes: bytes.to_vec(),
        })
    }
}
