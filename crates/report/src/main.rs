use anyhow::Context;
use serde::Serialize;
use stockflow_infra::{InventorySync, JsonFileSnapshotStore, SyncConfig};
use stockflow_inventory::{ProjectedItem, StockAlerts};

#[derive(Debug, Serialize)]
struct Report {
    alerts: StockAlerts,
    theoretical_inventory: Vec<ProjectedItem>,
    reorder: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    stockflow_observability::init();

    let config = SyncConfig::from_env();
    let store = JsonFileSnapshotStore::new(config.snapshot_path.clone());
    let sync = InventorySync::load_from(&store, config)
        .with_context(|| format!("failed to load snapshot from {}", store.path().display()))?;

    let alerts = sync.stock_alerts()?;
    let theoretical_inventory = sync.theoretical_inventory()?;
    let reorder = theoretical_inventory
        .iter()
        .filter(|item| item.needs_reorder())
        .map(|item| item.item_id.to_string())
        .collect();

    tracing::info!(
        snapshot = %store.path().display(),
        low_stock = alerts.low_stock.len(),
        out_of_stock = alerts.out_of_stock.len(),
        "inventory report generated"
    );

    let report = Report {
        alerts,
        theoretical_inventory,
        reorder,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
