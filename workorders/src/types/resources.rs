//! Resource models for the field-service app API.
//!
//! Only the fields the aggregator navigates are typed; everything else the
//! service returns is kept verbatim in `attributes` and written back out
//! unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Paginated collection envelope (`{"results": [...]}`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Listing<T> {
    pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppVersion {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl AppVersion {
    /// Human-readable name, when the service provides one.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderType {
    pub id: String,
    /// Ids of the task groups this type applies to.
    #[serde(default, deserialize_with = "null_as_default")]
    pub task_groups: Vec<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Per-task result produced by an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub task_id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// Result of evaluating one task group for one work order.
///
/// `Analysis::default()` is the empty placeholder substituted when the
/// service has nothing for a (work order, task group) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub outcomes: Vec<Outcome>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// The analyses endpoint answers either with a bare array or a listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AnalysesPayload {
    Bare(Vec<Analysis>),
    Listed(Listing<Analysis>),
}

impl AnalysesPayload {
    pub(crate) fn into_vec(self) -> Vec<Analysis> {
        match self {
            AnalysesPayload::Bare(analyses) => analyses,
            AnalysesPayload::Listed(listing) => listing.results,
        }
    }
}

/// A work order as listed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: String,
    pub app_version_id: String,
    /// Declared work-order type ids. Missing or null means none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: Vec<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A task annotated with its outcome.
///
/// `state` is always serialized; a task without an outcome carries `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedTask {
    #[serde(flatten)]
    pub task: Task,
    pub state: Option<Outcome>,
}

impl AnnotatedTask {
    /// Drops any `state` the service sent with the task so the outcome is
    /// the only one written.
    pub fn new(mut task: Task, state: Option<Outcome>) -> Self {
        task.attributes.remove("state");
        Self { task, state }
    }
}

/// A work order with its applicable task groups and annotated tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedWorkOrder {
    #[serde(flatten)]
    pub work_order: WorkOrder,
    pub task_groups: Vec<TaskGroup>,
    pub tasks: Vec<AnnotatedTask>,
}

impl EnrichedWorkOrder {
    /// Replaces any `task_groups` or `tasks` the service sent with the work
    /// order.
    pub fn new(
        mut work_order: WorkOrder,
        task_groups: Vec<TaskGroup>,
        tasks: Vec<AnnotatedTask>,
    ) -> Self {
        work_order.attributes.remove("task_groups");
        work_order.attributes.remove("tasks");
        Self {
            work_order,
            task_groups,
            tasks,
        }
    }

    /// Number of tasks that received an outcome.
    pub fn completed_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| t.state.is_some()).count()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
