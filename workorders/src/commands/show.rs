//! Show command - Enrich and print a single work order

use std::path::Path;

use anyhow::bail;

use crate::fetcher::Fetch;
use crate::resolver::WorkOrderClient;
use crate::types::EnrichedWorkOrder;

pub fn run(config_path: Option<&Path>, work_order_id: &str) -> anyhow::Result<()> {
    let client = super::connect(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;

    let work_order = rt.block_on(find_work_order(&client, work_order_id))?;
    println!("{}", serde_json::to_string_pretty(&work_order)?);
    Ok(())
}

/// Enrich only the work order with `work_order_id`.
pub async fn find_work_order<F: Fetch>(
    client: &WorkOrderClient<F>,
    work_order_id: &str,
) -> anyhow::Result<EnrichedWorkOrder> {
    let Some(work_order) = client
        .list_work_orders()
        .await?
        .into_iter()
        .find(|wo| wo.id == work_order_id)
    else {
        bail!("Work order {work_order_id} not found");
    };

    Ok(client.enrich_work_order(work_order).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::ScriptedFetcher;
    use crate::fetcher::Endpoints;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_work_order_enriches_only_match() {
        let e = Endpoints::new("api.test", "/api", "acme", "site-1").unwrap();
        let fetcher = ScriptedFetcher::new()
            .route(
                e.work_orders(),
                json!({"results": [
                    {"id": "WO1", "app_version_id": "AV1"},
                    {"id": "WO2", "app_version_id": "AV2"}
                ]}),
            )
            .route(
                e.task_groups("AV2"),
                json!({"results": [{"id": "TG9", "tasks": []}]}),
            )
            .route(e.analyses("WO2", "TG9"), json!([]));
        let client = WorkOrderClient::new(fetcher, e.clone());

        let wo2 = find_work_order(&client, "WO2").await.unwrap();

        assert_eq!(wo2.work_order.id, "WO2");
        assert_eq!(wo2.task_groups.len(), 1);
        assert_eq!(client.fetcher().calls_to(&e.task_groups("AV1")), 0);
    }

    #[tokio::test]
    async fn test_find_work_order_missing() {
        let e = Endpoints::new("api.test", "/api", "acme", "site-1").unwrap();
        let fetcher = ScriptedFetcher::new().route(e.work_orders(), json!({"results": []}));
        let client = WorkOrderClient::new(fetcher, e);

        let err = find_work_order(&client, "WO7").await.unwrap_err();
        assert!(err.to_string().contains("WO7"));
    }
}
