//! `roster-sync`: load skills and spots for one tenant and print the spot list.
//!
//! ```text
//! ROSTER_API_URL=http://localhost:8080/rest ROSTER_TENANT_ID=0 roster-sync
//! ```

use anyhow::Context;
use roster_client::{ClientConfig, HttpRestClient};
use roster_runtime::Store;
use roster_store::{
    AppAction, AppEnvironment, AppReducer, AppState, Operations, SpotSelectors, TenantAction,
    TenantId,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TENANT_VAR: &str = "ROSTER_TENANT_ID";

fn tenant_from_env() -> anyhow::Result<TenantId> {
    match std::env::var(TENANT_VAR) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{TENANT_VAR} must be an integer, got {raw:?}")),
        Err(_) => Ok(0),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_store=info,roster_runtime=info,roster_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env().context("loading client configuration")?;
    let tenant_id = tenant_from_env()?;
    let client = HttpRestClient::new(&config).context("building HTTP client")?;

    tracing::info!(base_url = %config.base_url, tenant_id, "Starting roster sync");

    let store = Store::new(AppState::default(), AppReducer, AppEnvironment::default());
    store
        .send(AppAction::Tenant(TenantAction::ChangeTenant(tenant_id)))
        .await?;

    let operations = Operations::new(store.clone(), client);
    let skills = operations.refresh_skill_list().await?;
    let spots = operations.refresh_spot_list().await?;
    tracing::info!(skills, spots, "Lists refreshed");

    let spot_list = store.state(|state| SpotSelectors::from_app(state).list()).await;
    for spot in &spot_list {
        let skills: Vec<&str> = spot
            .required_skill_set
            .iter()
            .map(|skill| skill.name.as_str())
            .collect();
        println!(
            "{:>6}  {}  [{}]",
            spot.id.unwrap_or_default(),
            spot.name,
            skills.join(", ")
        );
    }

    store.shutdown_default().await?;
    Ok(())
}
