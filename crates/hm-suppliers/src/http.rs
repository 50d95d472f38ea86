use std::time::Duration;

use hm_config::SupplierEndpoint;
use hm_reconcile::RawRecord;
use tracing::{debug, warn};

use crate::{records_from_payload, FetchRequest, Supplier, SupplierError};

/// Supplier served as a JSON array over HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSupplier {
    name: String,
    url: String,
    http: reqwest::Client,
}

impl HttpSupplier {
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout: Duration) -> Self {
        let name = name.into();
        let http = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(error) => {
                warn!(
                    supplier = %name,
                    %error,
                    "http client build failed; falling back to default client without timeout"
                );
                reqwest::Client::new()
            }
        };
        Self {
            name,
            url: url.into(),
            http,
        }
    }

    pub fn from_endpoint(endpoint: &SupplierEndpoint, timeout: Duration) -> Self {
        Self::new(endpoint.name.clone(), endpoint.url.clone(), timeout)
    }
}

#[async_trait::async_trait]
impl Supplier for HttpSupplier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_fetch(&self, req: &FetchRequest) -> Result<Vec<RawRecord>, SupplierError> {
        let resp = self
            .http
            .get(&self.url)
            .query(&req.query_pairs())
            .send()
            .await
            .map_err(|e| SupplierError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SupplierError::Status {
                code: status.as_u16(),
            });
        }

        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| SupplierError::Decode(e.to_string()))?;

        let records = records_from_payload(&self.name, payload)?;
        debug!(
            supplier = %self.name,
            url = %self.url,
            records = records.len(),
            "supplier fetch ok"
        );
        Ok(records)
    }
}
