//! Cache-aware resolvers, one per resource kind
//!
//! Every resolver checks the exact key first, then (for kinds with
//! listings) a cached listing of the parent, and only then goes to the
//! network. A cached listing is authoritative: an id missing from it is a
//! `NotFound`, not a reason to fetch.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{item_key, ClientCache, ResourceCache};
use crate::fetcher::{Endpoints, Fetch, FetchError, HttpFetcher};
use crate::types::resources::AnalysesPayload;
use crate::types::{
    Analysis, AppVersion, ClientConfig, Listing, ResourceKind, TaskGroup, WorkOrderType,
};

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Transport(#[from] FetchError),
    #[error("Cannot find {kind} id {id} for app version {parent}")]
    NotFound {
        kind: ResourceKind,
        id: String,
        parent: String,
    },
    #[error("Unexpected {kind} payload for {key}: {message}")]
    Decode {
        kind: ResourceKind,
        key: String,
        message: String,
    },
}

/// Read-only client for one organization and site.
///
/// Owns its cache; drop the client to drop everything it memoized.
pub struct WorkOrderClient<F = HttpFetcher> {
    fetcher: F,
    endpoints: Endpoints,
    cache: ClientCache,
}

impl WorkOrderClient<HttpFetcher> {
    pub fn from_config(config: &ClientConfig, token: &str) -> Result<Self, FetchError> {
        let timeout = Some(Duration::from_secs(config.timeout_seconds));
        let fetcher = HttpFetcher::new(token, timeout)?;
        Ok(Self::new(fetcher, Endpoints::from_config(config)?))
    }
}

impl<F: Fetch> WorkOrderClient<F> {
    pub fn new(fetcher: F, endpoints: Endpoints) -> Self {
        info!(base_url = endpoints.base_url(), "Initializing client");
        Self {
            fetcher,
            endpoints,
            cache: ClientCache::default(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn cache(&self) -> &ClientCache {
        &self.cache
    }

    #[cfg(test)]
    pub(crate) fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub(crate) async fn fetch_as<T: DeserializeOwned>(
        &self,
        kind: ResourceKind,
        key: &str,
        url: &str,
    ) -> Result<T, ResolveError> {
        let value = self.fetcher.fetch(url).await?;
        decode(kind, key, value)
    }

    /// Resolve an app version by id.
    pub async fn app_version(&self, id: &str) -> Result<AppVersion, ResolveError> {
        info!("Fetching app version {}", id);
        if let Some(app_version) = self.cache.app_versions.get(id) {
            debug!("Cache hit for app version {}", id);
            return Ok(app_version);
        }

        let url = self.endpoints.app_version(id);
        self.cache
            .app_versions
            .get_or_try_init(id, || self.fetch_as(ResourceKind::AppVersion, id, &url))
            .await
    }

    /// All task groups of an app version, priming the per-id entries.
    pub async fn task_groups(&self, app_version_id: &str) -> Result<Vec<TaskGroup>, ResolveError> {
        info!("Fetching task groups for app version {}", app_version_id);
        if let Some(listing) = self.cache.task_groups.listing(app_version_id) {
            debug!("Cache hit for task group listing of {}", app_version_id);
            return Ok(listing);
        }

        let url = self.endpoints.task_groups(app_version_id);
        self.cache
            .task_groups
            .listing_or_try_init(app_version_id, || async {
                let listing: Listing<TaskGroup> = self
                    .fetch_as(ResourceKind::TaskGroup, &item_key(app_version_id, ""), &url)
                    .await?;
                for task_group in &listing.results {
                    self.cache
                        .task_groups
                        .put(&item_key(app_version_id, &task_group.id), task_group.clone());
                }
                Ok::<_, ResolveError>(listing.results)
            })
            .await
    }

    /// One task group, from the cache, a cached listing, or its own endpoint.
    pub async fn task_group(
        &self,
        app_version_id: &str,
        task_group_id: &str,
    ) -> Result<TaskGroup, ResolveError> {
        info!(
            "Fetching task group {} for app version {}",
            task_group_id, app_version_id
        );
        let key = item_key(app_version_id, task_group_id);
        if let Some(task_group) = self.cache.task_groups.get(&key) {
            debug!("Cache hit for task group {}", key);
            return Ok(task_group);
        }

        if let Some(listing) = self.cache.task_groups.listing(app_version_id) {
            debug!("Cache hit for task group listing of {}", app_version_id);
            return take_from_listing(
                &self.cache.task_groups,
                ResourceKind::TaskGroup,
                listing,
                app_version_id,
                task_group_id,
                |tg| &tg.id,
            );
        }

        let url = self.endpoints.task_group(app_version_id, task_group_id);
        self.cache
            .task_groups
            .get_or_try_init(&key, || self.fetch_as(ResourceKind::TaskGroup, &key, &url))
            .await
    }

    /// All work-order types of an app version, priming the per-id entries.
    pub async fn work_order_types(
        &self,
        app_version_id: &str,
    ) -> Result<Vec<WorkOrderType>, ResolveError> {
        info!("Fetching work order types for app version {}", app_version_id);
        if let Some(listing) = self.cache.work_order_types.listing(app_version_id) {
            debug!("Cache hit for work order type listing of {}", app_version_id);
            return Ok(listing);
        }

        let url = self.endpoints.work_order_types(app_version_id);
        self.cache
            .work_order_types
            .listing_or_try_init(app_version_id, || async {
                let listing: Listing<WorkOrderType> = self
                    .fetch_as(
                        ResourceKind::WorkOrderType,
                        &item_key(app_version_id, ""),
                        &url,
                    )
                    .await?;
                for wot in &listing.results {
                    self.cache
                        .work_order_types
                        .put(&item_key(app_version_id, &wot.id), wot.clone());
                }
                Ok::<_, ResolveError>(listing.results)
            })
            .await
    }

    /// One work-order type. Misses go through the listing endpoint, so the
    /// first lookup for an app version caches every type it has.
    pub async fn work_order_type(
        &self,
        app_version_id: &str,
        wot_id: &str,
    ) -> Result<WorkOrderType, ResolveError> {
        info!(
            "Fetching work order type {} for app version {}",
            wot_id, app_version_id
        );
        let key = item_key(app_version_id, wot_id);
        if let Some(wot) = self.cache.work_order_types.get(&key) {
            debug!("Cache hit for work order type {}", key);
            return Ok(wot);
        }

        let listing = match self.cache.work_order_types.listing(app_version_id) {
            Some(listing) => {
                debug!("Cache hit for work order type listing of {}", app_version_id);
                listing
            }
            None => self.work_order_types(app_version_id).await?,
        };

        take_from_listing(
            &self.cache.work_order_types,
            ResourceKind::WorkOrderType,
            listing,
            app_version_id,
            wot_id,
            |wot| &wot.id,
        )
    }

    /// Analyses of a task group for a work order; never empty.
    pub async fn analyses(
        &self,
        work_order_id: &str,
        task_group_id: &str,
    ) -> Result<Vec<Analysis>, ResolveError> {
        info!(
            "Fetching analyses for work order {} and task group {}",
            work_order_id, task_group_id
        );
        let key = item_key(work_order_id, task_group_id);
        if let Some(analyses) = self.cache.analyses.get(&key) {
            debug!("Cache hit for analyses {}", key);
            return Ok(analyses);
        }

        let url = self.endpoints.analyses(work_order_id, task_group_id);
        self.cache
            .analyses
            .get_or_try_init(&key, || async {
                let payload: AnalysesPayload =
                    self.fetch_as(ResourceKind::Analysis, &key, &url).await?;
                let mut analyses = payload.into_vec();
                if analyses.is_empty() {
                    debug!("No analyses for {}, using an empty placeholder", key);
                    analyses.push(Analysis::default());
                }
                Ok::<_, ResolveError>(analyses)
            })
            .await
    }
}

/// Pick `id` out of an authoritative listing and prime its exact key.
fn take_from_listing<T: Clone>(
    cache: &ResourceCache<T>,
    kind: ResourceKind,
    listing: Vec<T>,
    parent: &str,
    id: &str,
    id_of: impl Fn(&T) -> &String,
) -> Result<T, ResolveError> {
    let found = listing
        .into_iter()
        .find(|item| id_of(item) == id)
        .ok_or_else(|| ResolveError::NotFound {
            kind,
            id: id.to_string(),
            parent: parent.to_string(),
        })?;
    cache.put(&item_key(parent, id), found.clone());
    Ok(found)
}

fn decode<T: DeserializeOwned>(
    kind: ResourceKind,
    key: &str,
    value: Value,
) -> Result<T, ResolveError> {
    serde_json::from_value(value).map_err(|e| ResolveError::Decode {
        kind,
        key: key.to_string(),
        message: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
