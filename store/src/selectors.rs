//! Read views over the application state.
//!
//! Selectors take the slices they read as typed inputs, so the readiness
//! check covers exactly the slices a view depends on. A slice is ready when
//! it is not loading.
//!
//! Single-record lookups fail while a dependency is loading; list views
//! return an empty list instead.

use crate::app::AppState;
use crate::domain::{EntityId, Skill, Spot, SpotView};
use crate::entity::{Entity, EntityState};
use thiserror::Error;

/// Errors returned by single-record selectors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// A slice the view depends on is loading.
    #[error("{slice} list is loading")]
    NotReady {
        /// Entity kind of the loading slice
        slice: &'static str,
    },

    /// No record is stored under the requested id.
    #[error("{slice} {id} not found")]
    NotFound {
        /// Entity kind searched
        slice: &'static str,
        /// Requested id
        id: EntityId,
    },

    /// A record references an id missing from the referenced slice.
    #[error("Referenced {slice} {id} is not loaded")]
    DanglingReference {
        /// Entity kind referenced
        slice: &'static str,
        /// Referenced id
        id: EntityId,
    },
}

fn ensure_ready<V>(slice: &EntityState<V>, name: &'static str) -> Result<(), SelectorError> {
    if slice.is_loading {
        Err(SelectorError::NotReady { slice: name })
    } else {
        Ok(())
    }
}

/// The skill stored under `id`.
///
/// # Errors
///
/// [`SelectorError::NotReady`] while skills load, [`SelectorError::NotFound`]
/// for an unknown id.
pub fn get_skill_by_id(skills: &EntityState<Skill>, id: EntityId) -> Result<Skill, SelectorError> {
    ensure_ready(skills, Skill::KIND.name)?;
    skills
        .map_by_id
        .get(id)
        .cloned()
        .ok_or(SelectorError::NotFound {
            slice: Skill::KIND.name,
            id,
        })
}

/// All skills in insertion order; empty while skills load.
#[must_use]
pub fn get_skill_list(skills: &EntityState<Skill>) -> Vec<Skill> {
    if skills.is_loading {
        return Vec::new();
    }
    skills.map_by_id.values().cloned().collect()
}

fn denormalize(view: &SpotView, required_skill_set: Vec<Skill>) -> Spot {
    Spot {
        tenant_id: view.tenant_id,
        id: view.id,
        version: view.version,
        name: view.name.clone(),
        required_skill_set,
    }
}

/// The spot stored under `id`, with its required skills resolved.
///
/// # Errors
///
/// [`SelectorError::NotReady`] while spots or skills load,
/// [`SelectorError::NotFound`] for an unknown id,
/// [`SelectorError::DanglingReference`] if a required skill is not in the
/// skill slice.
pub fn get_spot_by_id(
    spots: &EntityState<SpotView>,
    skills: &EntityState<Skill>,
    id: EntityId,
) -> Result<Spot, SelectorError> {
    ensure_ready(spots, Spot::KIND.name)?;
    ensure_ready(skills, Skill::KIND.name)?;

    let view = spots.map_by_id.get(id).ok_or(SelectorError::NotFound {
        slice: Spot::KIND.name,
        id,
    })?;

    let required_skill_set = view
        .required_skill_set
        .iter()
        .map(|skill_id| {
            skills
                .map_by_id
                .get(*skill_id)
                .cloned()
                .ok_or(SelectorError::DanglingReference {
                    slice: Skill::KIND.name,
                    id: *skill_id,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(denormalize(view, required_skill_set))
}

/// All spots in insertion order with required skills resolved; empty while
/// spots or skills load.
///
/// Skill references missing from the skill slice are skipped.
#[must_use]
pub fn get_spot_list(spots: &EntityState<SpotView>, skills: &EntityState<Skill>) -> Vec<Spot> {
    if spots.is_loading || skills.is_loading {
        return Vec::new();
    }

    spots
        .map_by_id
        .values()
        .map(|view| {
            let required_skill_set = view
                .required_skill_set
                .iter()
                .filter_map(|skill_id| {
                    let skill = skills.map_by_id.get(*skill_id);
                    if skill.is_none() {
                        tracing::warn!(spot = ?view.id, skill = skill_id, "Skipping dangling skill reference");
                    }
                    skill.cloned()
                })
                .collect();
            denormalize(view, required_skill_set)
        })
        .collect()
}

/// Spot views bound to the two slices of an [`AppState`].
#[derive(Debug, Clone, Copy)]
pub struct SpotSelectors<'a> {
    spots: &'a EntityState<SpotView>,
    skills: &'a EntityState<Skill>,
}

impl<'a> SpotSelectors<'a> {
    /// Bind to the spot and skill slices of `state`
    #[must_use]
    pub const fn from_app(state: &'a AppState) -> Self {
        Self {
            spots: &state.spot_list,
            skills: &state.skill_list,
        }
    }

    /// See [`get_spot_by_id`].
    ///
    /// # Errors
    ///
    /// See [`get_spot_by_id`].
    pub fn by_id(&self, id: EntityId) -> Result<Spot, SelectorError> {
        get_spot_by_id(self.spots, self.skills, id)
    }

    /// See [`get_spot_list`].
    #[must_use]
    pub fn list(&self) -> Vec<Spot> {
        get_spot_list(self.spots, self.skills)
    }
}
