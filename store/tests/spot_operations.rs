//! Spot operations: dispatched action sequences against a recording store.

use roster_core::rest::RestError;
use roster_store::alert::params;
use roster_store::{
    AppAction, AppState, EntityAction, OperationError, Operations, Skill, Spot, TenantAction,
    TenantState, show_error_message, show_success_message,
};
use roster_testing::{MockRestClient, MockStore, RestCall};
use serde_json::json;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn harness() -> (MockStore<AppState, AppAction>, MockRestClient) {
    (MockStore::new(AppState::default()), MockRestClient::new())
}

fn skill(id: i64) -> Skill {
    Skill::new(0, format!("Skill {id}")).persisted(id, 0)
}

fn spot(id: i64, version: i64) -> Spot {
    Spot::new(0, format!("Spot {id}"))
        .persisted(id, version)
        .with_required_skills(vec![skill(1)])
}

fn spot_action(action: EntityAction<Spot>) -> AppAction {
    AppAction::Spot(action)
}

#[tokio::test]
async fn test_refresh_spot_list_dispatches_loading_and_list() -> TestResult {
    let (store, client) = harness();
    let records = vec![spot(0, 0), spot(1, 0), spot(3, 0)];
    client.on_get("/tenant/0/spot/", serde_json::to_value(&records)?);

    let count = Operations::new(store.clone(), client.clone())
        .refresh_spot_list()
        .await?;

    assert_eq!(count, 3);
    assert_eq!(
        store.actions(),
        vec![
            spot_action(EntityAction::SetIsLoading(true)),
            spot_action(EntityAction::RefreshList(records)),
            spot_action(EntityAction::SetIsLoading(false)),
        ]
    );
    assert_eq!(
        client.calls(),
        vec![RestCall::Get {
            path: "/tenant/0/spot/".into()
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_refresh_failure_still_resets_loading() {
    let (store, client) = harness();
    client.on_get_error("/tenant/0/spot/", RestError::Request("connection refused".into()));

    let result = Operations::new(store.clone(), client).refresh_spot_list().await;

    assert_eq!(
        result,
        Err(OperationError::Transport(RestError::Request("connection refused".into())))
    );
    assert_eq!(
        store.actions(),
        vec![
            spot_action(EntityAction::SetIsLoading(true)),
            spot_action(EntityAction::SetIsLoading(false)),
        ]
    );
}

#[tokio::test]
async fn test_refresh_decode_failure_still_resets_loading() {
    let (store, client) = harness();
    client.on_get("/tenant/0/spot/", json!({ "not": "a list" }));

    let result = Operations::new(store.clone(), client).refresh_spot_list().await;

    assert!(matches!(result, Err(OperationError::Decode(_))));
    assert_eq!(
        store.actions().last(),
        Some(&spot_action(EntityAction::SetIsLoading(false)))
    );
}

#[tokio::test]
async fn test_refresh_rejects_records_without_id() -> TestResult {
    let (store, client) = harness();
    client.on_get(
        "/tenant/0/spot/",
        serde_json::to_value(vec![spot(5, 0), Spot::new(0, "Draft")])?,
    );

    let result = Operations::new(store.clone(), client).refresh_spot_list().await;

    assert_eq!(result, Err(OperationError::UnpersistedResponse { entity: "Spot" }));
    assert_eq!(
        store.actions(),
        vec![
            spot_action(EntityAction::SetIsLoading(true)),
            spot_action(EntityAction::SetIsLoading(false)),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_refresh_rejects_records_without_version() {
    let (store, client) = harness();
    client.on_get(
        "/tenant/0/spot/",
        json!([{ "tenantId": 0, "id": 2, "name": "Spot 2", "requiredSkillSet": [] }]),
    );

    let result = Operations::new(store.clone(), client).refresh_spot_list().await;

    assert_eq!(result, Err(OperationError::UnpersistedResponse { entity: "Spot" }));
    assert!(!store.actions().iter().any(|a| matches!(a, AppAction::Spot(EntityAction::RefreshList(_)))));
}

#[tokio::test]
async fn test_add_spot_dispatches_success_then_add() -> TestResult {
    let (store, client) = harness();
    let input = Spot::new(0, "New Spot");
    let saved = input.clone().persisted(4, 0);
    client.on_post("/tenant/0/spot/add", serde_json::to_value(&saved)?);

    let returned = Operations::new(store.clone(), client.clone())
        .add_spot(input)
        .await?;

    assert_eq!(returned, saved);
    assert_eq!(
        store.actions(),
        vec![
            AppAction::Alert(show_success_message("addSpot", params([("name", "New Spot")]))),
            spot_action(EntityAction::Add(saved)),
        ]
    );
    assert_eq!(
        client.calls(),
        vec![RestCall::Post {
            path: "/tenant/0/spot/add".into(),
            body: json!({ "tenantId": 0, "name": "New Spot", "requiredSkillSet": [] }),
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_add_response_without_id_dispatches_nothing() -> TestResult {
    let (store, client) = harness();
    client.on_post(
        "/tenant/0/spot/add",
        serde_json::to_value(Spot::new(0, "New Spot"))?,
    );

    let result = Operations::new(store.clone(), client)
        .add_spot(Spot::new(0, "New Spot"))
        .await;

    assert_eq!(result, Err(OperationError::UnpersistedResponse { entity: "Spot" }));
    assert!(store.actions().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_add_alert_names_the_submitted_record() -> TestResult {
    let (store, client) = harness();
    let saved = Spot::new(0, "New Spot (2)").persisted(4, 0);
    client.on_post("/tenant/0/spot/add", serde_json::to_value(&saved)?);

    Operations::new(store.clone(), client)
        .add_spot(Spot::new(0, "New Spot"))
        .await?;

    assert_eq!(
        store.actions().first(),
        Some(&AppAction::Alert(show_success_message(
            "addSpot",
            params([("name", "New Spot")])
        )))
    );
    Ok(())
}

#[tokio::test]
async fn test_update_response_without_version_dispatches_nothing() -> TestResult {
    let (store, client) = harness();
    let mut reply = serde_json::to_value(spot(1, 1))?;
    if let Some(fields) = reply.as_object_mut() {
        fields.remove("version");
    }
    client.on_post("/tenant/0/spot/update", reply);

    let result = Operations::new(store.clone(), client).update_spot(spot(1, 0)).await;

    assert_eq!(result, Err(OperationError::UnpersistedResponse { entity: "Spot" }));
    assert!(store.actions().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_add_failure_dispatches_nothing() {
    let (store, client) = harness();
    client.on_post_error(
        "/tenant/0/spot/add",
        RestError::Status {
            status: 500,
            body: "boom".into(),
        },
    );

    let result = Operations::new(store.clone(), client)
        .add_spot(Spot::new(0, "New Spot"))
        .await;

    assert!(matches!(result, Err(OperationError::Transport(_))));
    assert!(store.actions().is_empty());
}

#[tokio::test]
async fn test_update_spot_dispatches_success_then_update() -> TestResult {
    let (store, client) = harness();
    let record = spot(1, 0);
    let bumped = spot(1, 1);
    client.on_post("/tenant/0/spot/update", serde_json::to_value(&bumped)?);

    let returned = Operations::new(store.clone(), client.clone())
        .update_spot(record.clone())
        .await?;

    assert_eq!(returned.version, Some(1));
    assert_eq!(
        store.actions(),
        vec![
            AppAction::Alert(show_success_message("updateSpot", params([("id", 1)]))),
            spot_action(EntityAction::Update(bumped)),
        ]
    );
    assert_eq!(
        client.calls(),
        vec![RestCall::Post {
            path: "/tenant/0/spot/update".into(),
            body: serde_json::to_value(&record)?,
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_update_version_conflict_dispatches_nothing() {
    let (store, client) = harness();
    client.on_post_error(
        "/tenant/0/spot/update",
        RestError::Status {
            status: 409,
            body: "stale version".into(),
        },
    );

    let result = Operations::new(store.clone(), client).update_spot(spot(1, 0)).await;

    assert!(matches!(
        result,
        Err(OperationError::Transport(RestError::Status { status: 409, .. }))
    ));
    assert!(store.actions().is_empty());
}

#[tokio::test]
async fn test_remove_spot_confirmed() -> TestResult {
    let (store, client) = harness();
    let record = spot(1, 0);
    client.on_delete("/tenant/0/spot/1", true);

    let deleted = Operations::new(store.clone(), client)
        .remove_spot(record.clone())
        .await?;

    assert!(deleted);
    assert_eq!(
        store.actions(),
        vec![
            AppAction::Alert(show_success_message("removeSpot", params([("name", "Spot 1")]))),
            spot_action(EntityAction::Remove(record)),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_remove_spot_refused() -> TestResult {
    let (store, client) = harness();
    client.on_delete("/tenant/0/spot/1", false);

    let deleted = Operations::new(store.clone(), client)
        .remove_spot(spot(1, 0))
        .await?;

    assert!(!deleted);
    assert_eq!(
        store.actions(),
        vec![AppAction::Alert(show_error_message("removeSpotError", params([("name", "Spot 1")])))]
    );
    Ok(())
}

#[tokio::test]
async fn test_transient_records_rejected_before_transport() {
    let (store, client) = harness();
    let operations = Operations::new(store.clone(), client.clone());

    assert_eq!(
        operations.remove_spot(Spot::new(0, "Draft")).await,
        Err(OperationError::TransientRecord { entity: "Spot" })
    );
    assert_eq!(
        operations.update_spot(Spot::new(0, "Draft")).await,
        Err(OperationError::TransientRecord { entity: "Spot" })
    );
    assert!(client.calls().is_empty());
    assert!(store.actions().is_empty());
}

#[tokio::test]
async fn test_paths_use_current_tenant() -> TestResult {
    let (store, client) = harness();
    store.set_state(AppState {
        tenant_data: TenantState {
            current_tenant_id: 7,
        },
        ..AppState::default()
    });
    client.on_get("/tenant/7/skill/", json!([]));
    client.on_delete("/tenant/7/spot/1", true);

    let operations = Operations::new(store.clone(), client.clone());
    operations.refresh_skill_list().await?;
    operations.remove_spot(spot(1, 0)).await?;

    assert_eq!(
        client.calls(),
        vec![
            RestCall::Get {
                path: "/tenant/7/skill/".into()
            },
            RestCall::Delete {
                path: "/tenant/7/spot/1".into()
            },
        ]
    );
    assert!(!store.actions().contains(&AppAction::Tenant(TenantAction::ChangeTenant(7))));
    Ok(())
}

#[tokio::test]
async fn test_closed_store_surfaces_dispatch_error() {
    let (store, client) = harness();
    store.close();

    let result = Operations::new(store, client).refresh_spot_list().await;

    assert!(matches!(result, Err(OperationError::Dispatch(_))));
}
