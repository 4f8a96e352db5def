//! Generic entity slice: state, actions and reducer shared by every entity kind.
//!
//! Each entity kind (Skill, Spot) owns one [`EntityState`] inside
//! [`AppState`]. The wire record `T` travels in actions; the reducer stores
//! its normalized view `T::View`.

use crate::app::{AppAction, AppState};
use crate::collection::{CollectionError, IdMap};
use crate::domain::{DomainObject, Skill, Spot, SpotView, TenantId};
use roster_core::{SmallVec, effect::Effect, reducer::Reducer};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::marker::PhantomData;

/// Naming facts about an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityKind {
    /// Message-key stem, e.g. `Spot` in `addSpot`
    pub name: &'static str,
    /// REST path segment, e.g. `spot` in `/tenant/0/spot/`
    pub path_segment: &'static str,
}

impl EntityKind {
    /// Collection endpoint for a tenant: `/tenant/{tenant}/{segment}/`
    #[must_use]
    pub fn list_path(&self, tenant_id: TenantId) -> String {
        format!("/tenant/{tenant_id}/{}/", self.path_segment)
    }

    /// Endpoint below the collection: `/tenant/{tenant}/{segment}/{suffix}`
    #[must_use]
    pub fn path(&self, tenant_id: TenantId, suffix: impl std::fmt::Display) -> String {
        format!("/tenant/{tenant_id}/{}/{suffix}", self.path_segment)
    }

    /// Message key for an operation, e.g. `removeSpotError`
    #[must_use]
    pub fn message_key(&self, operation: &str, suffix: &str) -> String {
        format!("{operation}{}{suffix}", self.name)
    }
}

/// A record kind synchronized through its own slice.
///
/// Ties the wire type to its normalized view and to its place in
/// [`AppState`] / [`AppAction`], so operations and reducers can be written
/// once for every kind.
pub trait Entity:
    DomainObject + Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Shape stored in the slice
    type View: DomainObject + Clone + Debug + PartialEq + Send + Sync + 'static;

    /// Naming facts
    const KIND: EntityKind;

    /// Normalize the record for storage.
    fn to_view(&self) -> Self::View;

    /// Name used in notification parameters.
    fn display_name(&self) -> &str;

    /// Lift a slice action into the application action.
    fn wrap(action: EntityAction<Self>) -> AppAction;

    /// This kind's slice inside the application state.
    fn slice(state: &AppState) -> &EntityState<Self::View>;
}

impl Entity for Skill {
    type View = Self;

    const KIND: EntityKind = EntityKind {
        name: "Skill",
        path_segment: "skill",
    };

    fn to_view(&self) -> Self {
        self.clone()
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn wrap(action: EntityAction<Self>) -> AppAction {
        AppAction::Skill(action)
    }

    fn slice(state: &AppState) -> &EntityState<Self> {
        &state.skill_list
    }
}

impl Entity for Spot {
    type View = SpotView;

    const KIND: EntityKind = EntityKind {
        name: "Spot",
        path_segment: "spot",
    };

    fn to_view(&self) -> SpotView {
        Spot::to_view(self)
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn wrap(action: EntityAction<Self>) -> AppAction {
        AppAction::Spot(action)
    }

    fn slice(state: &AppState) -> &EntityState<SpotView> {
        &state.spot_list
    }
}

/// State of one entity slice.
///
/// While `is_loading` is true the collection is stale and selectors refuse
/// to read it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<V> {
    /// A list refresh is in flight
    pub is_loading: bool,
    /// Records by id
    pub map_by_id: IdMap<V>,
}

impl<V> Default for EntityState<V> {
    fn default() -> Self {
        Self {
            is_loading: false,
            map_by_id: IdMap::new(),
        }
    }
}

impl<V> EntityState<V>
where
    V: DomainObject + Clone,
{
    /// A loaded (not loading) slice holding `records`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::MissingId`] if any record is transient.
    pub fn loaded(records: impl IntoIterator<Item = V>) -> Result<Self, CollectionError> {
        Ok(Self {
            is_loading: false,
            map_by_id: IdMap::from_list(records)?,
        })
    }
}

/// State transitions of one entity slice.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityAction<T> {
    /// Replace the loading flag
    SetIsLoading(bool),
    /// Insert a persisted record
    Add(T),
    /// Remove a record
    Remove(T),
    /// Replace a record
    Update(T),
    /// Replace the whole collection after a list fetch
    RefreshList(Vec<T>),
}

impl<T> EntityAction<T> {
    /// Action name, for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetIsLoading(_) => "SetIsLoading",
            Self::Add(_) => "Add",
            Self::Remove(_) => "Remove",
            Self::Update(_) => "Update",
            Self::RefreshList(_) => "RefreshList",
        }
    }
}

impl<T: DomainObject> EntityAction<T> {
    /// Whether every record carried by the action belongs to `tenant_id`.
    ///
    /// Actions without records, and `Remove`, always match: removing a
    /// record the slice does not hold is a no-op.
    #[must_use]
    pub fn is_for_tenant(&self, tenant_id: TenantId) -> bool {
        match self {
            Self::SetIsLoading(_) | Self::Remove(_) => true,
            Self::Add(record) | Self::Update(record) => record.tenant_id() == tenant_id,
            Self::RefreshList(records) => records.iter().all(|r| r.tenant_id() == tenant_id),
        }
    }
}

/// Reducer for one entity slice.
///
/// Produces no effects. A transient record in `Add`, `Update` or
/// `RefreshList` leaves the state unchanged.
pub struct EntityReducer<T>(PhantomData<fn() -> T>);

impl<T> EntityReducer<T> {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for EntityReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EntityReducer<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityReducer<T> {}

impl<T> Debug for EntityReducer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityReducer").finish()
    }
}

impl<T: Entity> Reducer for EntityReducer<T> {
    type State = EntityState<T::View>;
    type Action = EntityAction<T>;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &(),
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let action_name = action.name();

        let next = match action {
            EntityAction::SetIsLoading(is_loading) => {
                state.is_loading = is_loading;
                return SmallVec::new();
            },
            EntityAction::Add(record) => state.map_by_id.with_element(record.to_view()),
            EntityAction::Update(record) => state.map_by_id.with_updated_element(record.to_view()),
            EntityAction::Remove(record) => Ok(state.map_by_id.without_element(&record.to_view())),
            EntityAction::RefreshList(records) => {
                IdMap::from_list(records.iter().map(Entity::to_view))
            },
        };

        match next {
            Ok(map_by_id) => state.map_by_id = map_by_id,
            Err(error) => {
                tracing::warn!(
                    entity = T::KIND.name,
                    action = action_name,
                    %error,
                    "Ignoring action with malformed record"
                );
            },
        }

        SmallVec::new()
    }
}
