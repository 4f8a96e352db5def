//! Alert slice: user notifications raised by operations.
//!
//! Operations never talk to a notification service directly. They dispatch
//! [`AlertAction::Show`] through the same store, built with
//! [`show_success_message`] or [`show_error_message`]. The UI renders
//! [`AlertState::alerts`] and dismisses them with [`AlertAction::Dismiss`].

use chrono::{DateTime, Utc};
use roster_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Identifier assigned to an alert by the reducer
pub type AlertId = u64;

/// Interpolation values for a message key, e.g. `{ "name": "Spot 1" }`
pub type AlertParams = serde_json::Map<String, Value>;

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    /// A mutation went through
    Success,
    /// The backend refused a mutation
    Error,
    /// Informational
    Info,
}

/// A notification to raise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    /// Severity
    pub kind: AlertKind,
    /// Translation key, e.g. `removeSpotError`
    pub message_key: String,
    /// Interpolation values
    pub params: AlertParams,
}

/// A raised notification, as held in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Assigned by the reducer, unique for the store's lifetime
    pub id: AlertId,
    /// When the reducer raised it
    pub created_at: DateTime<Utc>,
    /// Severity
    pub kind: AlertKind,
    /// Translation key
    pub message_key: String,
    /// Interpolation values
    pub params: AlertParams,
}

/// Alert slice actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertAction {
    /// Raise a notification
    Show(AlertRequest),
    /// Remove a notification; unknown ids are ignored
    Dismiss(AlertId),
}

/// Build parameters from key/value pairs.
#[must_use]
pub fn params<I, K, V>(entries: I) -> AlertParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

fn show(kind: AlertKind, message_key: impl Into<String>, params: AlertParams) -> AlertAction {
    AlertAction::Show(AlertRequest {
        kind,
        message_key: message_key.into(),
        params,
    })
}

/// Success notification for `message_key`.
#[must_use]
pub fn show_success_message(message_key: impl Into<String>, params: AlertParams) -> AlertAction {
    show(AlertKind::Success, message_key, params)
}

/// Error notification for `message_key`.
#[must_use]
pub fn show_error_message(message_key: impl Into<String>, params: AlertParams) -> AlertAction {
    show(AlertKind::Error, message_key, params)
}

/// Informational notification for `message_key`.
#[must_use]
pub fn show_info_message(message_key: impl Into<String>, params: AlertParams) -> AlertAction {
    show(AlertKind::Info, message_key, params)
}

/// Alert slice state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertState {
    /// Raised alerts, oldest first
    pub alerts: Vec<Alert>,
    next_id: AlertId,
}

/// Alert behavior settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertConfig {
    /// Dismiss each alert after this long; `None` keeps alerts until dismissed
    pub auto_dismiss: Option<Duration>,
    /// Keep at most this many alerts, dropping the oldest
    pub max_alerts: usize,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            auto_dismiss: None,
            max_alerts: 10,
        }
    }
}

impl AlertConfig {
    /// Dismiss alerts automatically after `duration`.
    #[must_use]
    pub const fn with_auto_dismiss(mut self, duration: Duration) -> Self {
        self.auto_dismiss = Some(duration);
        self
    }

    /// Cap the number of alerts kept.
    #[must_use]
    pub const fn with_max_alerts(mut self, max_alerts: usize) -> Self {
        self.max_alerts = max_alerts;
        self
    }
}

/// Dependencies of the alert reducer.
#[derive(Clone)]
pub struct AlertEnvironment {
    /// Timestamps for raised alerts
    pub clock: Arc<dyn Clock>,
    /// Behavior settings
    pub config: AlertConfig,
}

impl AlertEnvironment {
    /// Create an environment
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, config: AlertConfig) -> Self {
        Self { clock, config }
    }
}

impl std::fmt::Debug for AlertEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Reducer for the alert slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertReducer;

impl Reducer for AlertReducer {
    type State = AlertState;
    type Action = AlertAction;
    type Environment = AlertEnvironment;

    fn reduce(
        &self,
        state: &mut AlertState,
        action: AlertAction,
        env: &AlertEnvironment,
    ) -> SmallVec<[Effect<AlertAction>; 4]> {
        match action {
            AlertAction::Show(request) => {
                let id = state.next_id;
                state.next_id += 1;

                state.alerts.push(Alert {
                    id,
                    created_at: env.clock.now(),
                    kind: request.kind,
                    message_key: request.message_key,
                    params: request.params,
                });

                let overflow = state.alerts.len().saturating_sub(env.config.max_alerts);
                state.alerts.drain(..overflow);

                match env.config.auto_dismiss {
                    Some(duration) => smallvec![Effect::delay(duration, AlertAction::Dismiss(id))],
                    None => SmallVec::new(),
                }
            },
            AlertAction::Dismiss(id) => {
                state.alerts.retain(|alert| alert.id != id);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_testing::{ReducerTest, assertions, test_clock};

    fn env(config: AlertConfig) -> AlertEnvironment {
        AlertEnvironment::new(Arc::new(test_clock()), config)
    }

    fn state_with(count: usize) -> AlertState {
        let mut state = AlertState::default();
        let env = env(AlertConfig::default());
        for n in 0..count {
            AlertReducer.reduce(
                &mut state,
                show_info_message(format!("message{n}"), AlertParams::new()),
                &env,
            );
        }
        state
    }

    #[test]
    fn test_show_stamps_id_and_time() {
        let now = test_clock().now();

        ReducerTest::new(AlertReducer)
            .with_env(env(AlertConfig::default()))
            .given_state(AlertState::default())
            .when_action(show_success_message("removeSpot", params([("name", "Spot 1")])))
            .then_state(move |state| {
                assert_eq!(state.alerts.len(), 1);
                let alert = &state.alerts[0];
                assert_eq!(alert.id, 0);
                assert_eq!(alert.created_at, now);
                assert_eq!(alert.kind, AlertKind::Success);
                assert_eq!(alert.message_key, "removeSpot");
                assert_eq!(alert.params.get("name"), Some(&Value::from("Spot 1")));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_ids_are_monotonic_after_dismiss() {
        let mut state = state_with(2);
        let env = env(AlertConfig::default());

        AlertReducer.reduce(&mut state, AlertAction::Dismiss(1), &env);
        AlertReducer.reduce(
            &mut state,
            show_error_message("removeSpotError", AlertParams::new()),
            &env,
        );

        let ids: Vec<_> = state.alerts.iter().map(|alert| alert.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn test_oldest_alert_dropped_at_capacity() {
        ReducerTest::new(AlertReducer)
            .with_env(env(AlertConfig::default().with_max_alerts(3)))
            .given_state(state_with(3))
            .when_action(show_info_message("message3", AlertParams::new()))
            .then_state(|state| {
                let keys: Vec<_> = state.alerts.iter().map(|a| a.message_key.as_str()).collect();
                assert_eq!(keys, vec!["message1", "message2", "message3"]);
            })
            .run();
    }

    #[test]
    fn test_auto_dismiss_schedules_delay() {
        let config = AlertConfig::default().with_auto_dismiss(Duration::from_secs(5));

        ReducerTest::new(AlertReducer)
            .with_env(env(config))
            .given_state(state_with(1))
            .when_action(show_success_message("addSpot", AlertParams::new()))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_delay_effect(effects);
                assert_eq!(
                    effects[0],
                    Effect::delay(Duration::from_secs(5), AlertAction::Dismiss(1))
                );
            })
            .run();
    }

    #[test]
    fn test_dismiss_unknown_id_is_noop() {
        let initial = state_with(2);
        let expected = initial.clone();

        ReducerTest::new(AlertReducer)
            .with_env(env(AlertConfig::default()))
            .given_state(initial)
            .when_action(AlertAction::Dismiss(42))
            .then_state(move |state| assert_eq!(*state, expected))
            .run();
    }

    #[test]
    fn test_params_builder_keeps_json_values() {
        let built = params([("id", Value::from(3)), ("name", Value::from("Spot 3"))]);
        assert_eq!(
            Value::Object(built),
            serde_json::json!({ "id": 3, "name": "Spot 3" })
        );
    }
}
