//! List command - Stream every enriched work order to stdout

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use futures::StreamExt;
use tracing::info;

use crate::fetcher::Fetch;
use crate::resolver::WorkOrderClient;
use crate::types::{AppVersion, EnrichedWorkOrder, OutputFormat};

pub fn run(config_path: Option<&Path>, format: Option<&str>) -> anyhow::Result<()> {
    let format: OutputFormat = match format {
        Some(f) => f.parse().map_err(anyhow::Error::msg)?,
        None => OutputFormat::default(),
    };

    let client = super::connect(config_path)?;
    let rt = tokio::runtime::Runtime::new()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    rt.block_on(write_work_orders(&client, format, &mut out))
}

/// Write each work order as soon as it is enriched. Stops at the first error,
/// after whatever was already written.
pub async fn write_work_orders<F: Fetch, W: Write>(
    client: &WorkOrderClient<F>,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let stream = client.work_orders();
    futures::pin_mut!(stream);

    let mut count = 0usize;
    while let Some(work_order) = stream.next().await {
        let work_order = work_order?;
        match format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&work_order)?)?,
            OutputFormat::Pretty => {
                writeln!(out, "{}", serde_json::to_string_pretty(&work_order)?)?
            }
            OutputFormat::Summary => {
                let app_version = client
                    .app_version(&work_order.work_order.app_version_id)
                    .await?;
                writeln!(out, "{}", summary_line(&work_order, &app_version))?;
            }
        }
        out.flush()?;
        count += 1;
    }

    info!("Listed {} work orders", count);
    Ok(())
}

fn summary_line(work_order: &EnrichedWorkOrder, app_version: &AppVersion) -> String {
    let completed = work_order.completed_tasks();
    let total = work_order.tasks.len();
    let progress = format!("{completed}/{total} tasks with outcome");
    let progress = if total > 0 && completed == total {
        progress.green().to_string()
    } else if completed > 0 {
        progress.yellow().to_string()
    } else {
        progress.dimmed().to_string()
    };

    format!(
        "{}  {}  {} task groups  {}",
        work_order.work_order.id.bold(),
        app_version.name().unwrap_or(&app_version.id).cyan(),
        work_order.task_groups.len(),
        progress
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::ScriptedFetcher;
    use crate::fetcher::Endpoints;
    use serde_json::json;

    fn client() -> WorkOrderClient<ScriptedFetcher> {
        let e = Endpoints::new("api.test", "/api", "acme", "site-1").unwrap();
        let fetcher = ScriptedFetcher::new()
            .route(
                e.work_orders(),
                json!({"results": [
                    {"id": "WO1", "app_version_id": "AV1"},
                    {"id": "WO2", "app_version_id": "AV1", "types": ["MISSING"]}
                ]}),
            )
            .route(e.app_version("AV1"), json!({"id": "AV1", "name": "Fiber v2"}))
            .route(
                e.task_groups("AV1"),
                json!({"results": [{"id": "TG1", "tasks": [{"id": "T1"}]}]}),
            )
            .route(e.work_order_types("AV1"), json!({"results": []}))
            .route(
                e.analyses("WO1", "TG1"),
                json!([{"outcomes": [{"task_id": "T1", "status": "pass"}]}]),
            );
        WorkOrderClient::new(fetcher, e)
    }

    #[tokio::test]
    async fn test_json_lines_written_before_error() {
        let client = client();
        let mut out = Vec::new();

        let result = write_work_orders(&client, OutputFormat::Json, &mut out).await;

        assert!(result.is_err());
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        let wo1: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(wo1["id"], json!("WO1"));
        assert_eq!(wo1["tasks"][0]["state"]["status"], json!("pass"));
    }

    #[tokio::test]
    async fn test_summary_uses_app_version_name() {
        let client = client();
        let mut out = Vec::new();

        let _ = write_work_orders(&client, OutputFormat::Summary, &mut out).await;

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("WO1"));
        assert!(text.contains("Fiber v2"));
        assert!(text.contains("1/1 tasks with outcome"));
    }
}
