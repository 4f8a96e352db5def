//! Async operations: sequence loading flags, one transport call, and the
//! resulting actions and notifications.
//!
//! Operations never write state. They read the tenant before the transport
//! call and only dispatch afterwards. Nothing read before a suspension point
//! is trusted afterwards, since other operations may have run in between: a
//! list refresh checks the tenant again before replacing the slice, and the
//! reducer drops records of any other tenant.
//!
//! Every record the backend returns must carry its id and version; a
//! response without them fails the operation before anything is dispatched.
//!
//! | Operation | Transport | On success | On refusal |
//! |---|---|---|---|
//! | `refresh_list` | `GET /tenant/{t}/{kind}/` | `RefreshList` | - |
//! | `add` | `POST .../add` | `add<Kind>` alert, `Add` | - |
//! | `update` | `POST .../update` | `update<Kind>` alert, `Update` | - |
//! | `remove` | `DELETE .../{id}` | `remove<Kind>` alert, `Remove` | `remove<Kind>Error` alert |

use crate::alert::{params, show_error_message, show_success_message};
use crate::app::{AppAction, AppState};
use crate::domain::{Skill, Spot, TenantId};
use crate::entity::{Entity, EntityAction};
use roster_core::dispatch::{Dispatch, DispatchError};
use roster_core::rest::{RestClient, RestError};
use serde_json::Value;
use thiserror::Error;

/// Errors returned by operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The transport call failed.
    #[error("Transport error: {0}")]
    Transport(#[from] RestError),

    /// A record could not be converted to or from JSON.
    #[error("Malformed record JSON: {0}")]
    Decode(String),

    /// The store rejected an action.
    #[error("Dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// The record has no id, so the backend cannot address it.
    #[error("{entity} has not been persisted yet")]
    TransientRecord {
        /// Entity kind name
        entity: &'static str,
    },

    /// The backend answered with a record lacking its id or version.
    #[error("Backend returned a {entity} without id or version")]
    UnpersistedResponse {
        /// Entity kind name
        entity: &'static str,
    },

    /// The tenant changed while the call was in flight; the response was
    /// discarded.
    #[error("Tenant changed from {requested} to {current} during the call")]
    TenantChanged {
        /// Tenant the call was made for
        requested: TenantId,
        /// Tenant selected when the response arrived
        current: TenantId,
    },
}

impl From<serde_json::Error> for OperationError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

fn ensure_persisted<T: Entity>(record: &T) -> Result<(), OperationError> {
    if record.id().is_some() && record.version().is_some() {
        Ok(())
    } else {
        Err(OperationError::UnpersistedResponse {
            entity: T::KIND.name,
        })
    }
}

fn record_outcome(entity: &'static str, operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "operations.completed",
        "entity" => entity,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Operations over every entity slice.
///
/// `D` is the store (or a test double), `C` the transport.
#[derive(Debug, Clone)]
pub struct Operations<D, C> {
    store: D,
    client: C,
}

impl<D, C> Operations<D, C>
where
    D: Dispatch<State = AppState, Action = AppAction>,
    C: RestClient,
{
    /// Create operations over a store and a transport
    #[must_use]
    pub const fn new(store: D, client: C) -> Self {
        Self { store, client }
    }

    /// The store actions are dispatched to
    #[must_use]
    pub const fn store(&self) -> &D {
        &self.store
    }

    /// The transport
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    async fn current_tenant(&self) -> TenantId {
        self.store
            .select(|state| state.tenant_data.current_tenant_id)
            .await
    }

    /// Reload the whole collection of `T` for the current tenant.
    ///
    /// Dispatches `SetIsLoading(true)`, then `RefreshList` on success, then
    /// `SetIsLoading(false)` on every path. Returns the number of records
    /// fetched.
    ///
    /// # Errors
    ///
    /// Transport, decode and [`OperationError::UnpersistedResponse`] failures
    /// are returned after the loading flag is reset. If the tenant changed
    /// during the call the list is discarded with
    /// [`OperationError::TenantChanged`].
    #[tracing::instrument(skip(self), fields(entity = T::KIND.name))]
    pub async fn refresh_list<T: Entity>(&self) -> Result<usize, OperationError> {
        let (tenant_id, in_flight) = self
            .store
            .select(|state| (state.tenant_data.current_tenant_id, T::slice(state).is_loading))
            .await;
        if in_flight {
            tracing::debug!("Another refresh is in flight, both will run");
        }

        self.store
            .dispatch(T::wrap(EntityAction::SetIsLoading(true)))
            .await?;

        let refreshed = match self.fetch_list::<T>(tenant_id).await {
            Ok(records) => self.apply_list(tenant_id, records).await,
            Err(error) => Err(error),
        };

        let reset = self
            .store
            .dispatch(T::wrap(EntityAction::SetIsLoading(false)))
            .await;

        let outcome = if refreshed.is_ok() && reset.is_ok() {
            "success"
        } else {
            "failure"
        };
        record_outcome(T::KIND.name, "refresh", outcome);

        let count = refreshed?;
        reset?;
        tracing::debug!(count, "List refreshed");
        Ok(count)
    }

    async fn fetch_list<T: Entity>(&self, tenant_id: TenantId) -> Result<Vec<T>, OperationError> {
        let body = self.client.get(&T::KIND.list_path(tenant_id)).await?;
        let records: Vec<T> = serde_json::from_value(body)?;
        records.iter().try_for_each(ensure_persisted)?;
        Ok(records)
    }

    /// Replace the slice with `records`, unless the tenant moved on while
    /// they were being fetched.
    async fn apply_list<T: Entity>(
        &self,
        tenant_id: TenantId,
        records: Vec<T>,
    ) -> Result<usize, OperationError> {
        let current = self.current_tenant().await;
        if current != tenant_id {
            tracing::warn!(requested = tenant_id, current, "Tenant changed, discarding list");
            return Err(OperationError::TenantChanged {
                requested: tenant_id,
                current,
            });
        }

        let count = records.len();
        self.store
            .dispatch(T::wrap(EntityAction::RefreshList(records)))
            .await?;
        Ok(count)
    }

    /// Create a record on the backend and add the persisted copy.
    ///
    /// The transient input is never added; on failure nothing is
    /// dispatched. Returns the record with its backend id and version.
    ///
    /// # Errors
    ///
    /// Returns the transport or decode failure, or
    /// [`OperationError::UnpersistedResponse`] if the backend's copy has no id
    /// or version.
    #[tracing::instrument(skip(self, record), fields(entity = T::KIND.name))]
    pub async fn add<T: Entity>(&self, record: T) -> Result<T, OperationError> {
        let tenant_id = self.current_tenant().await;
        let result = self
            .save(&T::KIND.path(tenant_id, "add"), &record)
            .await;

        let saved = match result {
            Ok(saved) => saved,
            Err(error) => {
                record_outcome(T::KIND.name, "add", "failure");
                return Err(error);
            },
        };

        self.store
            .dispatch(
                show_success_message(
                    T::KIND.message_key("add", ""),
                    params([("name", record.display_name())]),
                )
                .into(),
            )
            .await?;
        self.store
            .dispatch(T::wrap(EntityAction::Add(saved.clone())))
            .await?;

        record_outcome(T::KIND.name, "add", "success");
        Ok(saved)
    }

    /// Replace a persisted record on the backend and store the returned copy.
    ///
    /// The record must carry its id and latest known version; a stale
    /// version is rejected by the backend as a transport failure. Returns the
    /// record with its bumped version.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::TransientRecord`] before any transport call
    /// if the record has no id, otherwise the transport or decode failure or
    /// [`OperationError::UnpersistedResponse`].
    #[tracing::instrument(skip(self, record), fields(entity = T::KIND.name, id = ?record.id()))]
    pub async fn update<T: Entity>(&self, record: T) -> Result<T, OperationError> {
        if record.id().is_none() {
            return Err(OperationError::TransientRecord {
                entity: T::KIND.name,
            });
        }

        let tenant_id = self.current_tenant().await;
        let result = self
            .save(&T::KIND.path(tenant_id, "update"), &record)
            .await;

        let saved = match result {
            Ok(saved) => saved,
            Err(error) => {
                record_outcome(T::KIND.name, "update", "failure");
                return Err(error);
            },
        };

        self.store
            .dispatch(
                show_success_message(
                    T::KIND.message_key("update", ""),
                    params([("id", Value::from(record.id()))]),
                )
                .into(),
            )
            .await?;
        self.store
            .dispatch(T::wrap(EntityAction::Update(saved.clone())))
            .await?;

        record_outcome(T::KIND.name, "update", "success");
        Ok(saved)
    }

    async fn save<T: Entity>(&self, path: &str, record: &T) -> Result<T, OperationError> {
        let body = serde_json::to_value(record)?;
        let response = self.client.post(path, body).await?;
        let saved: T = serde_json::from_value(response)?;
        ensure_persisted(&saved)?;
        Ok(saved)
    }

    /// Delete a record on the backend.
    ///
    /// The backend answers with a boolean. `true` raises `remove<Kind>` and
    /// removes the record; `false` (e.g. the record is still referenced)
    /// raises `remove<Kind>Error` and keeps it. Returns the backend's answer.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::TransientRecord`] before any transport call
    /// if the record has no id, otherwise the transport failure.
    #[tracing::instrument(skip(self, record), fields(entity = T::KIND.name, id = ?record.id()))]
    pub async fn remove<T: Entity>(&self, record: T) -> Result<bool, OperationError> {
        let Some(id) = record.id() else {
            return Err(OperationError::TransientRecord {
                entity: T::KIND.name,
            });
        };

        let tenant_id = self.current_tenant().await;
        let deleted = match self.client.delete(&T::KIND.path(tenant_id, id)).await {
            Ok(deleted) => deleted,
            Err(error) => {
                record_outcome(T::KIND.name, "remove", "failure");
                return Err(error.into());
            },
        };

        let name = params([("name", record.display_name())]);
        if deleted {
            self.store
                .dispatch(show_success_message(T::KIND.message_key("remove", ""), name).into())
                .await?;
            self.store
                .dispatch(T::wrap(EntityAction::Remove(record)))
                .await?;
            record_outcome(T::KIND.name, "remove", "success");
        } else {
            tracing::warn!(id, "Backend refused deletion");
            self.store
                .dispatch(show_error_message(T::KIND.message_key("remove", "Error"), name).into())
                .await?;
            record_outcome(T::KIND.name, "remove", "refused");
        }

        Ok(deleted)
    }

    /// Reload the skill list.
    ///
    /// # Errors
    ///
    /// See [`Operations::refresh_list`].
    pub async fn refresh_skill_list(&self) -> Result<usize, OperationError> {
        self.refresh_list::<Skill>().await
    }

    /// Reload the spot list.
    ///
    /// # Errors
    ///
    /// See [`Operations::refresh_list`].
    pub async fn refresh_spot_list(&self) -> Result<usize, OperationError> {
        self.refresh_list::<Spot>().await
    }

    /// Create a spot.
    ///
    /// # Errors
    ///
    /// See [`Operations::add`].
    pub async fn add_spot(&self, spot: Spot) -> Result<Spot, OperationError> {
        self.add(spot).await
    }

    /// Replace a spot.
    ///
    /// # Errors
    ///
    /// See [`Operations::update`].
    pub async fn update_spot(&self, spot: Spot) -> Result<Spot, OperationError> {
        self.update(spot).await
    }

    /// Delete a spot.
    ///
    /// # Errors
    ///
    /// See [`Operations::remove`].
    pub async fn remove_spot(&self, spot: Spot) -> Result<bool, OperationError> {
        self.remove(spot).await
    }
}
