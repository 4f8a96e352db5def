//! # Roster Store
//!
//! Client-side synchronization of roster entities with the REST backend.
//!
//! ```text
//! caller → Operations → RestClient → AppAction → AppReducer → AppState → selectors
//! ```
//!
//! - [`collection`]: the normalized, insertion-ordered [`IdMap`]
//! - [`entity`]: the slice state, actions and reducer shared by every entity kind
//! - [`operations`]: async coordinators dispatching loading flags, results and alerts
//! - [`selectors`]: readiness-checked, denormalized read views
//! - [`alert`] and [`tenant`]: the notification and tenant slices
//! - [`app`]: the root state, action and reducer held by the store
//!
//! # Example
//!
//! ```ignore
//! let store = Store::new(AppState::default(), AppReducer, AppEnvironment::default());
//! let operations = Operations::new(store.clone(), HttpRestClient::new(config)?);
//!
//! operations.refresh_skill_list().await?;
//! operations.refresh_spot_list().await?;
//! let spots = store.state(|state| SpotSelectors::from_app(state).list()).await;
//! ```

pub mod alert;
pub mod app;
pub mod collection;
pub mod domain;
pub mod entity;
pub mod operations;
pub mod selectors;
pub mod tenant;

pub use alert::{
    Alert, AlertAction, AlertConfig, AlertEnvironment, AlertKind, AlertParams, AlertReducer,
    AlertState, show_error_message, show_info_message, show_success_message,
};
pub use app::{AppAction, AppEnvironment, AppReducer, AppState};
pub use collection::{CollectionError, IdMap};
pub use domain::{DomainObject, EntityId, Skill, Spot, SpotView, TenantId, Version};
pub use entity::{Entity, EntityAction, EntityKind, EntityReducer, EntityState};
pub use operations::{OperationError, Operations};
pub use selectors::{
    SelectorError, SpotSelectors, get_skill_by_id, get_skill_list, get_spot_by_id, get_spot_list,
};
pub use tenant::{TenantAction, TenantReducer, TenantState};

/// The production store type
pub type AppStore = roster_runtime::Store<AppState, AppAction, AppEnvironment, AppReducer>;
