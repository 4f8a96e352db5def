//! Domain records synchronized with the backend.
//!
//! Every record is scoped to a tenant and carries an optional id and version:
//! both are absent until the backend persists the record. Records are never
//! patched; an update replaces the whole record and must carry the latest
//! known version.
//!
//! [`Spot`] is the wire shape (skills embedded). The slice stores
//! [`SpotView`], which references skills by id only.

use serde::{Deserialize, Serialize};

/// Tenant (partition) identifier
pub type TenantId = i64;

/// Record identifier assigned by the backend
pub type EntityId = i64;

/// Optimistic-concurrency counter, bumped by the backend on every mutation
pub type Version = i64;

/// Fields shared by every synchronized record.
pub trait DomainObject {
    /// Tenant the record belongs to
    fn tenant_id(&self) -> TenantId;

    /// Backend id, `None` while the record is transient
    fn id(&self) -> Option<EntityId>;

    /// Backend version, `None` while the record is transient
    fn version(&self) -> Option<Version>;
}

macro_rules! impl_domain_object {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl DomainObject for $ty {
                fn tenant_id(&self) -> TenantId {
                    self.tenant_id
                }

                fn id(&self) -> Option<EntityId> {
                    self.id
                }

                fn version(&self) -> Option<Version> {
                    self.version
                }
            }
        )+
    };
}

impl_domain_object!(Skill, Spot, SpotView);

/// A skill an employee can have and a spot can require.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Backend id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Backend version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    /// Display name
    pub name: String,
}

impl Skill {
    /// Create a transient skill (no id, no version).
    #[must_use]
    pub fn new(tenant_id: TenantId, name: impl Into<String>) -> Self {
        Self {
            tenant_id,
            id: None,
            version: None,
            name: name.into(),
        }
    }

    /// Return the record as persisted under `id` at `version`.
    #[must_use]
    pub fn persisted(mut self, id: EntityId, version: Version) -> Self {
        self.id = Some(id);
        self.version = Some(version);
        self
    }
}

/// A place where shifts happen, requiring a set of skills.
///
/// This is the denormalized shape: the backend sends and accepts embedded
/// skills, and selectors return spots in this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Backend id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Backend version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    /// Display name
    pub name: String,
    /// Skills an employee needs to work this spot
    #[serde(default)]
    pub required_skill_set: Vec<Skill>,
}

impl Spot {
    /// Create a transient spot (no id, no version).
    #[must_use]
    pub fn new(tenant_id: TenantId, name: impl Into<String>) -> Self {
        Self {
            tenant_id,
            id: None,
            version: None,
            name: name.into(),
            required_skill_set: Vec::new(),
        }
    }

    /// Return the record as persisted under `id` at `version`.
    #[must_use]
    pub fn persisted(mut self, id: EntityId, version: Version) -> Self {
        self.id = Some(id);
        self.version = Some(version);
        self
    }

    /// Replace the required skills.
    #[must_use]
    pub fn with_required_skills(mut self, skills: Vec<Skill>) -> Self {
        self.required_skill_set = skills;
        self
    }

    /// Normalized form: embedded skills replaced by their ids.
    ///
    /// Transient skills cannot be referenced and are dropped.
    #[must_use]
    pub fn to_view(&self) -> SpotView {
        SpotView {
            tenant_id: self.tenant_id,
            id: self.id,
            version: self.version,
            name: self.name.clone(),
            required_skill_set: self
                .required_skill_set
                .iter()
                .filter_map(DomainObject::id)
                .collect(),
        }
    }
}

/// A spot as stored in the slice: skills referenced by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotView {
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Backend id
    pub id: Option<EntityId>,
    /// Backend version
    pub version: Option<Version>,
    /// Display name
    pub name: String,
    /// Ids into the skill slice
    pub required_skill_set: Vec<EntityId>,
}
