//! hm-config
//!
//! Supplier endpoint configuration.
//!
//! The built-in defaults point at the three production suppliers, so no file
//! is required. A YAML file may replace them:
//!
//! ```yaml
//! request_timeout_secs: 10
//! suppliers:
//!   - name: acme
//!     url: https://example.test/suppliers/acme
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const DEFAULT_BASE_URL: &str = "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers";
const DEFAULT_SUPPLIERS: &[&str] = &["acme", "patagonia", "paperflies"];
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierEndpoint {
    pub name: String,
    pub url: String,
}

impl SupplierEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Suppliers are queried, and their batches reconciled, in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregatorConfig {
    pub suppliers: Vec<SupplierEndpoint>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            suppliers: DEFAULT_SUPPLIERS
                .iter()
                .map(|name| SupplierEndpoint::new(*name, format!("{DEFAULT_BASE_URL}/{name}")))
                .collect(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AggregatorConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: AggregatorConfig =
            serde_yaml::from_str(s).context("supplier config: invalid YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read supplier config failed: {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("load supplier config failed: {}", path.display()))
    }

    /// Replace the supplier list with ad-hoc URLs, named `supplier-<n>`.
    pub fn with_supplier_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suppliers = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| SupplierEndpoint::new(format!("supplier-{}", i + 1), url))
            .collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.suppliers.is_empty() {
            bail!("supplier config: at least one supplier is required");
        }
        if self.request_timeout_secs == 0 {
            bail!("supplier config: request_timeout_secs must be > 0");
        }

        let mut seen = BTreeSet::new();
        for s in &self.suppliers {
            if s.name.trim().is_empty() {
                bail!("supplier config: supplier name must not be empty");
            }
            if s.url.trim().is_empty() {
                bail!("supplier config: supplier '{}' has an empty url", s.name);
            }
            if !seen.insert(s.name.as_str()) {
                bail!("supplier config: duplicate supplier name '{}'", s.name);
            }
        }
        Ok(())
    }
}
