//! Application root: the global state, its action vocabulary and the reducer
//! routing each action to its slice.

use crate::alert::{AlertAction, AlertConfig, AlertEnvironment, AlertReducer, AlertState};
use crate::domain::{DomainObject, Skill, Spot, SpotView, TenantId};
use crate::entity::{EntityAction, EntityReducer, EntityState};
use crate::tenant::{TenantAction, TenantReducer, TenantState};
use roster_core::environment::{Clock, SystemClock};
use roster_core::{SmallVec, effect::Effect, reducer::Reducer};
use std::sync::Arc;

/// The state held by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Current tenant
    pub tenant_data: TenantState,
    /// Skill slice
    pub skill_list: EntityState<Skill>,
    /// Spot slice, skills referenced by id
    pub spot_list: EntityState<SpotView>,
    /// Raised notifications
    pub alerts: AlertState,
}

/// Every action the store reduces.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Tenant slice
    Tenant(TenantAction),
    /// Skill slice
    Skill(EntityAction<Skill>),
    /// Spot slice
    Spot(EntityAction<Spot>),
    /// Alert slice
    Alert(AlertAction),
}

impl AppAction {
    /// Slice and action names, for logs
    #[must_use]
    pub const fn name(&self) -> (&'static str, &'static str) {
        match self {
            Self::Tenant(TenantAction::ChangeTenant(_)) => ("tenant", "ChangeTenant"),
            Self::Skill(action) => ("skill", action.name()),
            Self::Spot(action) => ("spot", action.name()),
            Self::Alert(AlertAction::Show(_)) => ("alert", "Show"),
            Self::Alert(AlertAction::Dismiss(_)) => ("alert", "Dismiss"),
        }
    }
}

impl From<TenantAction> for AppAction {
    fn from(action: TenantAction) -> Self {
        Self::Tenant(action)
    }
}

impl From<AlertAction> for AppAction {
    fn from(action: AlertAction) -> Self {
        Self::Alert(action)
    }
}

/// Dependencies of the application reducer.
#[derive(Clone, Debug)]
pub struct AppEnvironment {
    /// Alert slice dependencies
    pub alerts: AlertEnvironment,
}

impl AppEnvironment {
    /// Create an environment
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, alert_config: AlertConfig) -> Self {
        Self {
            alerts: AlertEnvironment::new(clock, alert_config),
        }
    }
}

impl Default for AppEnvironment {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock), AlertConfig::default())
    }
}

/// Routes every [`AppAction`] to the reducer of its slice.
///
/// An action for one slice leaves every other slice untouched, except
/// switching to a different tenant, which empties the entity slices: their
/// records belong to the previous tenant. Entity actions carrying records of
/// a tenant other than the current one are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppReducer;

/// Entity records of another tenant are late responses to calls made before
/// a tenant switch; they must not land in the current tenant's slices.
fn accepts<T: DomainObject>(action: &EntityAction<T>, tenant_id: TenantId, slice: &str) -> bool {
    let accepted = action.is_for_tenant(tenant_id);
    if !accepted {
        tracing::warn!(
            slice,
            action = action.name(),
            current_tenant = tenant_id,
            "Dropping records of another tenant"
        );
    }
    accepted
}

fn lift<A>(
    effects: SmallVec<[Effect<A>; 4]>,
    wrap: fn(A) -> AppAction,
) -> SmallVec<[Effect<AppAction>; 4]> {
    effects.into_iter().map(|effect| effect.map(wrap)).collect()
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut AppState,
        action: AppAction,
        env: &AppEnvironment,
    ) -> SmallVec<[Effect<AppAction>; 4]> {
        let (slice, name) = action.name();
        tracing::debug!(slice, action = name, "Reducing action");

        match action {
            AppAction::Tenant(action) => {
                let previous = state.tenant_data.current_tenant_id;
                let effects = TenantReducer.reduce(&mut state.tenant_data, action, &());
                if state.tenant_data.current_tenant_id != previous {
                    state.skill_list = EntityState::default();
                    state.spot_list = EntityState::default();
                }
                lift(effects, AppAction::Tenant)
            },
            AppAction::Skill(action) => {
                if !accepts(&action, state.tenant_data.current_tenant_id, slice) {
                    return SmallVec::new();
                }
                lift(
                    EntityReducer::<Skill>::new().reduce(&mut state.skill_list, action, &()),
                    AppAction::Skill,
                )
            },
            AppAction::Spot(action) => {
                if !accepts(&action, state.tenant_data.current_tenant_id, slice) {
                    return SmallVec::new();
                }
                lift(
                    EntityReducer::<Spot>::new().reduce(&mut state.spot_list, action, &()),
                    AppAction::Spot,
                )
            },
            AppAction::Alert(action) => lift(
                AlertReducer.reduce(&mut state.alerts, action, &env.alerts),
                AppAction::Alert,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::show_success_message;
    use crate::alert::AlertParams;
    use roster_testing::{ReducerTest, assertions, test_clock};
    use std::time::Duration;

    fn test_env(config: AlertConfig) -> AppEnvironment {
        AppEnvironment::new(Arc::new(test_clock()), config)
    }

    fn populated() -> AppState {
        let mut state = AppState::default();
        let env = test_env(AlertConfig::default());
        AppReducer.reduce(
            &mut state,
            AppAction::Skill(EntityAction::Add(Skill::new(0, "Skill 1").persisted(1, 0))),
            &env,
        );
        AppReducer.reduce(
            &mut state,
            AppAction::Spot(EntityAction::Add(Spot::new(0, "Spot 1").persisted(1, 0))),
            &env,
        );
        state
    }

    #[test]
    fn test_spot_action_leaves_other_slices() {
        let initial = populated();
        let before = initial.clone();

        ReducerTest::new(AppReducer)
            .with_env(test_env(AlertConfig::default()))
            .given_state(initial)
            .when_action(AppAction::Spot(EntityAction::SetIsLoading(true)))
            .then_state(move |state| {
                assert!(state.spot_list.is_loading);
                assert_eq!(state.skill_list, before.skill_list);
                assert_eq!(state.alerts, before.alerts);
                assert_eq!(state.tenant_data, before.tenant_data);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_alert_delay_lifted_into_app_action() {
        let config = AlertConfig::default().with_auto_dismiss(Duration::from_millis(100));

        ReducerTest::new(AppReducer)
            .with_env(test_env(config))
            .given_state(AppState::default())
            .when_action(show_success_message("addSpot", AlertParams::new()).into())
            .then_effects(|effects| {
                assert_eq!(
                    effects,
                    [Effect::delay(
                        Duration::from_millis(100),
                        AppAction::Alert(AlertAction::Dismiss(0))
                    )]
                );
            })
            .run();
    }

    #[test]
    fn test_changing_tenant_empties_entity_slices() {
        ReducerTest::new(AppReducer)
            .with_env(test_env(AlertConfig::default()))
            .given_state(populated())
            .when_action(TenantAction::ChangeTenant(1).into())
            .then_state(|state| {
                assert_eq!(state.tenant_data.current_tenant_id, 1);
                assert!(state.skill_list.map_by_id.is_empty());
                assert!(state.spot_list.map_by_id.is_empty());
            })
            .run();
    }

    #[test]
    fn test_records_of_previous_tenant_are_dropped() {
        let late = vec![Spot::new(0, "Tenant 0 spot").persisted(0, 0)];

        ReducerTest::new(AppReducer)
            .with_env(test_env(AlertConfig::default()))
            .given_state(populated())
            .when_action(TenantAction::ChangeTenant(1).into())
            .when_action(AppAction::Spot(EntityAction::RefreshList(late)))
            .when_action(AppAction::Skill(EntityAction::Add(
                Skill::new(0, "Tenant 0 skill").persisted(5, 0),
            )))
            .then_state(|state| {
                assert_eq!(state.tenant_data.current_tenant_id, 1);
                assert!(state.spot_list.map_by_id.is_empty());
                assert!(state.skill_list.map_by_id.is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_records_of_current_tenant_are_kept_after_switch() {
        ReducerTest::new(AppReducer)
            .with_env(test_env(AlertConfig::default()))
            .given_state(populated())
            .when_action(TenantAction::ChangeTenant(1).into())
            .when_action(AppAction::Spot(EntityAction::Add(
                Spot::new(1, "Tenant 1 spot").persisted(3, 0),
            )))
            .then_state(|state| {
                assert_eq!(state.spot_list.map_by_id.ids().collect::<Vec<_>>(), vec![3]);
            })
            .run();
    }

    #[test]
    fn test_same_tenant_keeps_entity_slices() {
        ReducerTest::new(AppReducer)
            .with_env(test_env(AlertConfig::default()))
            .given_state(populated())
            .when_action(TenantAction::ChangeTenant(0).into())
            .then_state(|state| {
                assert_eq!(state.skill_list.map_by_id.len(), 1);
                assert_eq!(state.spot_list.map_by_id.len(), 1);
            })
            .run();
    }
}
