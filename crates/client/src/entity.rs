//! Generic CRUD client over the server's uniform entity surface.
//!
//! One [`EntityClient`] instance per entity type.  The client keeps the
//! last listed records in a local cache, publishes every operation
//! outcome on a broadcast channel, and offers both awaitable operations
//! and fire-and-forget background dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use tetres_core::{DbId, EntityInfo};

use crate::error::ApiError;
use crate::events::DataEvent;
use crate::http::{unwrap_envelope, FormData, HttpGateway};
use crate::protocol::ListPayload;
use crate::urls::EndpointSet;

/// Broadcast channel capacity for outcome events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Generic entity client.
///
/// Shared via `Arc`; all state is interior.  The cached list is only
/// replaced by successful list operations and pruned by successful
/// deletes.  Inserts and updates do not patch it; panels re-list after
/// a change.
pub struct EntityClient<T> {
    gateway: Arc<HttpGateway>,
    endpoints: EndpointSet,
    cache: RwLock<Vec<T>>,
    /// Suppresses overlapping list refreshes.
    list_in_flight: AtomicBool,
    events: broadcast::Sender<DataEvent<T>>,
}

impl<T> EntityClient<T>
where
    T: EntityInfo + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create a client for one entity's endpoint set.
    pub fn new(gateway: Arc<HttpGateway>, endpoints: EndpointSet) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            gateway,
            endpoints,
            cache: RwLock::new(Vec::new()),
            list_in_flight: AtomicBool::new(false),
            events,
        })
    }

    /// Subscribe to operation outcomes.
    pub fn subscribe(&self) -> broadcast::Receiver<DataEvent<T>> {
        self.events.subscribe()
    }

    /// Snapshot of the cached list.
    pub async fn cached(&self) -> Vec<T> {
        self.cache.read().await.clone()
    }

    // ---- list ----

    /// Fetch the full list, replacing the cache.
    ///
    /// Returns `Ok(false)` when another refresh is already in flight
    /// (the pending refresh will publish the outcome).
    pub async fn refresh(&self) -> Result<bool, ApiError> {
        let url = self.endpoint("list", &self.endpoints.list)?.to_string();
        if self.begin_list() {
            return Ok(false);
        }
        let result = self.gateway.get_envelope::<ListPayload<T>>(&url).await;
        self.finish_list(result.and_then(unwrap_envelope)).await
    }

    /// Fetch the list filtered to one year (or unfiltered when `None`),
    /// replacing the cache.
    pub async fn refresh_by_year(&self, year: Option<i32>) -> Result<bool, ApiError> {
        let url = self
            .endpoint("list by year", &self.endpoints.list_by_year)?
            .to_string();
        if self.begin_list() {
            return Ok(false);
        }
        let mut form = FormData::new();
        if let Some(year) = year {
            form = form.raw("year", year.to_string());
        }
        let result = self.gateway.post_form::<ListPayload<T>>(&url, &form).await;
        self.finish_list(result.and_then(unwrap_envelope)).await
    }

    // ---- single-record operations ----

    /// Fetch one record by id.
    pub async fn get(&self, id: DbId) -> Result<T, ApiError> {
        let url = self.endpoint("get", &self.endpoints.get)?;
        let form = FormData::new().raw("id", id.to_string());
        let result = self
            .gateway
            .post_form::<T>(url, &form)
            .await
            .and_then(unwrap_envelope);
        match result {
            Ok(item) => {
                self.publish(DataEvent::Fetched {
                    item: Box::new(item.clone()),
                });
                Ok(item)
            }
            Err(error) => {
                tracing::warn!(entity = T::ENTITY, id, %error, "Get failed");
                self.publish(DataEvent::FetchFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Fetch one record by its unique name.
    pub async fn get_by_name(&self, name: &str) -> Result<T, ApiError> {
        let url = self.endpoint("get", &self.endpoints.get)?;
        let form = FormData::new().raw("name", name);
        let result = self
            .gateway
            .post_form::<T>(url, &form)
            .await
            .and_then(unwrap_envelope);
        match result {
            Ok(item) => {
                self.publish(DataEvent::Fetched {
                    item: Box::new(item.clone()),
                });
                Ok(item)
            }
            Err(error) => {
                self.publish(DataEvent::FetchFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Insert a record, returning the server-assigned id.
    pub async fn insert(&self, item: &T) -> Result<DbId, ApiError> {
        let url = self.endpoint("insert", &self.endpoints.insert)?;
        let result = async {
            let form = FormData::new().json("data", item)?;
            let envelope = self.gateway.post_form::<serde_json::Value>(url, &form).await?;
            coerce_db_id(unwrap_envelope(envelope)?)
        }
        .await;

        match result {
            Ok(id) => {
                tracing::info!(entity = T::ENTITY, id, "Inserted");
                self.publish(DataEvent::Inserted { id });
                Ok(id)
            }
            Err(error) => {
                tracing::warn!(entity = T::ENTITY, %error, "Insert failed");
                self.publish(DataEvent::InsertFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Insert many records in one request.
    ///
    /// The wire format is a JSON array of individually JSON-encoded
    /// records; the server answers with a bare success envelope, so the
    /// caller re-lists instead of patching the cache.
    pub async fn insert_all(&self, items: &[T]) -> Result<(), ApiError> {
        let url = self.endpoint("insert all", &self.endpoints.insert_all)?;
        let result = async {
            let encoded: Vec<String> = items
                .iter()
                .map(serde_json::to_string)
                .collect::<Result<_, _>>()?;
            let form = FormData::new().json("data", &encoded)?;
            let envelope = self
                .gateway
                .post_form::<serde_json::Value>(url, &form)
                .await?;
            crate::http::ensure_envelope_success(&envelope)
        }
        .await;

        match result {
            Ok(()) => {
                tracing::info!(entity = T::ENTITY, count = items.len(), "Bulk insert done");
                self.publish(DataEvent::InsertedAll { count: items.len() });
                Ok(())
            }
            Err(error) => {
                self.publish(DataEvent::InsertAllFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Replace the record with id `id`, returning the echoed id.
    pub async fn update(&self, id: DbId, item: &T) -> Result<DbId, ApiError> {
        let url = self.endpoint("update", &self.endpoints.update)?;
        let result = async {
            let form = FormData::new().raw("id", id.to_string()).json("data", item)?;
            let envelope = self.gateway.post_form::<serde_json::Value>(url, &form).await?;
            coerce_db_id(unwrap_envelope(envelope)?)
        }
        .await;

        match result {
            Ok(id) => {
                tracing::info!(entity = T::ENTITY, id, "Updated");
                self.publish(DataEvent::Updated { id });
                Ok(id)
            }
            Err(error) => {
                tracing::warn!(entity = T::ENTITY, id, %error, "Update failed");
                self.publish(DataEvent::UpdateFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Delete records by id, returning the ids the server actually
    /// removed.  Only those ids are pruned from the cache.
    pub async fn delete(&self, ids: &[DbId]) -> Result<Vec<DbId>, ApiError> {
        let url = self.endpoint("delete", &self.endpoints.delete)?;
        let result = async {
            let form = FormData::new().json("ids", &ids)?;
            let envelope = self.gateway.post_form::<Vec<DbId>>(url, &form).await?;
            unwrap_envelope(envelope)
        }
        .await;

        match result {
            Ok(deleted) => {
                let mut cache = self.cache.write().await;
                cache.retain(|item| match item.id() {
                    Some(id) => !deleted.contains(&id),
                    None => true,
                });
                drop(cache);

                tracing::info!(entity = T::ENTITY, count = deleted.len(), "Deleted");
                self.publish(DataEvent::Deleted {
                    ids: deleted.clone(),
                });
                Ok(deleted)
            }
            Err(error) => {
                tracing::warn!(entity = T::ENTITY, %error, "Delete failed");
                self.publish(DataEvent::DeleteFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Distinct years the server has records for.
    pub async fn years(&self) -> Result<Vec<i32>, ApiError> {
        let url = self.endpoint("years", &self.endpoints.years)?;
        let result = self
            .gateway
            .get_envelope::<Vec<i32>>(url)
            .await
            .and_then(unwrap_envelope);
        match result {
            Ok(years) => {
                self.publish(DataEvent::YearsLoaded {
                    years: years.clone(),
                });
                Ok(years)
            }
            Err(error) => {
                self.publish(DataEvent::YearsFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    // ---- background dispatch ----

    /// Run [`refresh`](Self::refresh) on a background task; the outcome
    /// arrives only through the event channel.
    pub fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            let _ = client.refresh().await;
        })
    }

    /// Run [`refresh_by_year`](Self::refresh_by_year) on a background
    /// task.
    pub fn spawn_refresh_by_year(self: &Arc<Self>, year: Option<i32>) -> JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            let _ = client.refresh_by_year(year).await;
        })
    }

    /// Run [`insert`](Self::insert) on a background task.
    pub fn spawn_insert(self: &Arc<Self>, item: T) -> JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            let _ = client.insert(&item).await;
        })
    }

    /// Run [`update`](Self::update) on a background task.
    pub fn spawn_update(self: &Arc<Self>, id: DbId, item: T) -> JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            let _ = client.update(id, &item).await;
        })
    }

    /// Run [`delete`](Self::delete) on a background task.
    pub fn spawn_delete(self: &Arc<Self>, ids: Vec<DbId>) -> JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            let _ = client.delete(&ids).await;
        })
    }

    // ---- private helpers ----

    fn endpoint<'a>(
        &self,
        op: &'static str,
        url: &'a Option<String>,
    ) -> Result<&'a str, ApiError> {
        url.as_deref().ok_or(ApiError::Unsupported(op))
    }

    /// Mark a list refresh as started; `true` means one was already
    /// running and this call should back off.
    fn begin_list(&self) -> bool {
        if self.list_in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!(entity = T::ENTITY, "List refresh already in flight");
            return true;
        }
        false
    }

    /// Install a fetched list (sorted) or publish the failure, always
    /// clearing the in-flight flag.
    async fn finish_list(&self, result: Result<ListPayload<T>, ApiError>) -> Result<bool, ApiError> {
        self.list_in_flight.store(false, Ordering::SeqCst);
        match result {
            Ok(payload) => {
                let mut list = payload.list;
                list.sort_by_key(|item| item.sort_key());
                let count = list.len();
                *self.cache.write().await = list;

                tracing::info!(entity = T::ENTITY, count, "List refreshed");
                self.publish(DataEvent::ListUpdated { count });
                Ok(true)
            }
            Err(error) => {
                tracing::warn!(entity = T::ENTITY, %error, "List refresh failed");
                self.publish(DataEvent::ListFailed {
                    error: error.to_string(),
                });
                Err(error)
            }
        }
    }

    /// Publish ignoring the zero-receiver send error.
    fn publish(&self, event: DataEvent<T>) {
        let _ = self.events.send(event);
    }
}

/// Accept an id payload as either a JSON number or a numeric string.
/// Update responses echo back the form-encoded id they received, which
/// arrives as a string.
fn coerce_db_id(value: serde_json::Value) -> Result<DbId, ApiError> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().ok_or(ApiError::MissingPayload),
        serde_json::Value::String(s) => s.parse().map_err(|_| ApiError::MissingPayload),
        _ => Err(ApiError::MissingPayload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_db_id_accepts_number_and_string() {
        assert_eq!(coerce_db_id(serde_json::json!(42)).unwrap(), 42);
        assert_eq!(coerce_db_id(serde_json::json!("42")).unwrap(), 42);
        assert!(coerce_db_id(serde_json::json!([42])).is_err());
        assert!(coerce_db_id(serde_json::json!("4x")).is_err());
    }
}
