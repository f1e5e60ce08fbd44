use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, Dataset};
use crate::error::{LensError, Result};
use crate::executor::LoadExecutor;
use crate::pipeline::readers::{BaseReader, CsvReader};
use crate::source::{source_for, PayloadCache, PayloadSource};

use std::sync::Arc;
use tracing::{debug, info};

/// Parses a CSV payload into a dataset. Fails as a whole on malformed CSV.
pub fn parse_dataset(payload: &str, config: &DashboardConfig) -> Result<Dataset> {
    let rows = CsvReader::new(payload).read_rows()?;
    let (events, report) = LoadExecutor::new(&config.data).run(rows)?;
    Ok(Dataset::new(events, report))
}

/// Fetches the raw payload, consulting the session cache first when allowed.
///
/// Returns the payload and whether it came from the cache.
pub async fn fetch_payload(
    source: &dyn PayloadSource,
    cache: Option<&PayloadCache>,
) -> Result<(String, bool)> {
    if let Some(cache) = cache {
        if let Some(cached) = cache.get(source.origin()).await {
            return Ok((cached, true));
        }
    }
    let text = source.fetch().await.map_err(|e| LensError::LoadFailed {
        origin: source.origin().to_string(),
        reason: e.to_string(),
    })?;
    Ok((text, false))
}

/// Loads the whole dataset or nothing.
///
/// With `use_cache` false the cache is not read, but a fresh payload still
/// replaces it when caching is enabled. Payloads are only cached once they parse.
pub async fn load_dataset(config: &DashboardConfig, use_cache: bool) -> Result<Dataset> {
    let source = source_for(&config.data.source.url)?;
    let caching = &config.data.source.caching;
    let cache = caching.enabled.then(|| PayloadCache::from_config(caching));
    let read_cache = if use_cache { cache.as_ref() } else { None };

    info!(origin = source.origin(), "Loading dataset");
    let (payload, from_cache) = fetch_payload(source.as_ref(), read_cache).await?;
    debug!(bytes = payload.len(), from_cache, "Payload ready");

    let dataset = parse_dataset(&payload, config).map_err(|e| LensError::LoadFailed {
        origin: source.origin().to_string(),
        reason: e.to_string(),
    })?;

    if !from_cache {
        if let Some(cache) = &cache {
            cache.set(source.origin(), &payload).await;
        }
    }
    info!(
        events = dataset.len(),
        rejected = dataset.report().rows_rejected(),
        from_cache,
        "Dataset loaded"
    );
    Ok(dataset)
}

pub async fn load_dashboard(config: Arc<DashboardConfig>, use_cache: bool) -> Result<Dashboard> {
    let dataset = load_dataset(&config, use_cache).await?;
    Ok(Dashboard::new(dataset, config))
}
