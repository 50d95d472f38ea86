//! Command handler modules for the `hotelmerge` binary.
//!
//! Shared argument/output helpers live here; the aggregation flow lives in
//! [`aggregate`].

pub mod aggregate;

use std::path::Path;

use anyhow::{Context, Result};
use hm_config::AggregatorConfig;
use serde::Serialize;

/// Parse a positional id list: `none` (any case) means no filter, otherwise
/// comma-separated ids with blanks dropped.
pub fn parse_id_list(raw: &str) -> Vec<String> {
    if raw.trim().eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Config file (if any), then `--supplier-url` overrides.
pub fn load_config(path: Option<&Path>, supplier_urls: &[String]) -> Result<AggregatorConfig> {
    let mut config = match path {
        Some(p) => AggregatorConfig::load_yaml(p)?,
        None => AggregatorConfig::default(),
    };
    if !supplier_urls.is_empty() {
        config = config.with_supplier_urls(supplier_urls.iter().cloned());
        config.validate().context("invalid --supplier-url")?;
    }
    Ok(config)
}

/// Pretty JSON with a 4-space indent.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .context("serialize result as JSON failed")?;
    String::from_utf8(buf).context("serialized JSON is not UTF-8")
}
