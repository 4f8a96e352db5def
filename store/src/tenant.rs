//! Tenant slice: which partition every operation is scoped to.

use crate::domain::TenantId;
use roster_core::{SmallVec, effect::Effect, reducer::Reducer};

/// Tenant slice state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TenantState {
    /// Tenant used to build every REST path
    pub current_tenant_id: TenantId,
}

/// Tenant slice actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantAction {
    /// Switch to another tenant
    ChangeTenant(TenantId),
}

/// Reducer for the tenant slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantReducer;

impl Reducer for TenantReducer {
    type State = TenantState;
    type Action = TenantAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut TenantState,
        action: TenantAction,
        _env: &(),
    ) -> SmallVec<[Effect<TenantAction>; 4]> {
        match action {
            TenantAction::ChangeTenant(tenant_id) => state.current_tenant_id = tenant_id,
        }
        SmallVec::new()
    }
}
