//! Work order aggregation
//!
//! Builds the denormalized view of each work order: the task groups that
//! apply to it, and every task of those groups annotated with its outcome.
//! Work orders are processed one at a time, each fully resolved before the
//! next is started.

use std::collections::HashMap;

use futures::stream::{self, Stream};
use tracing::{debug, info};

use crate::fetcher::Fetch;
use crate::resolver::{ResolveError, WorkOrderClient};
use crate::types::{
    Analysis, AnnotatedTask, EnrichedWorkOrder, Listing, Outcome, ResourceKind, TaskGroup,
    WorkOrder,
};

type Pending = std::vec::IntoIter<WorkOrder>;

impl<F: Fetch> WorkOrderClient<F> {
    /// Fetch the work-order listing. Never cached: every call hits the API.
    pub async fn list_work_orders(&self) -> Result<Vec<WorkOrder>, ResolveError> {
        info!("Fetching work orders");
        let url = self.endpoints().work_orders();
        let listing: Listing<WorkOrder> = self
            .fetch_as(ResourceKind::WorkOrder, "work-orders/", &url)
            .await?;
        Ok(listing.results)
    }

    /// Lazily enrich every work order of the listing.
    ///
    /// The listing is fetched when the stream is first polled. The first
    /// error ends the stream; items already yielded stay valid. Calling this
    /// again starts over with a fresh listing but reuses the cache.
    pub fn work_orders(
        &self,
    ) -> impl Stream<Item = Result<EnrichedWorkOrder, ResolveError>> + '_ {
        stream::try_unfold(None, move |pending| self.advance(pending))
    }

    async fn advance(
        &self,
        pending: Option<Pending>,
    ) -> Result<Option<(EnrichedWorkOrder, Option<Pending>)>, ResolveError> {
        let mut pending = match pending {
            Some(pending) => pending,
            None => self.list_work_orders().await?.into_iter(),
        };

        match pending.next() {
            Some(work_order) => {
                let enriched = self.enrich_work_order(work_order).await?;
                Ok(Some((enriched, Some(pending))))
            }
            None => Ok(None),
        }
    }

    /// Task groups that apply to a work order.
    ///
    /// Those referenced by its types, or every task group of its app version
    /// when it declares no types or the types reference none.
    pub async fn applicable_task_groups(
        &self,
        work_order: &WorkOrder,
    ) -> Result<Vec<TaskGroup>, ResolveError> {
        let app_version_id = &work_order.app_version_id;

        let mut all_task_groups = Vec::new();
        for listed in self.task_groups(app_version_id).await? {
            all_task_groups.push(self.task_group(app_version_id, &listed.id).await?);
        }

        let mut wo_task_groups = Vec::new();
        for type_id in &work_order.types {
            let wot = self.work_order_type(app_version_id, type_id).await?;
            for task_group_id in &wot.task_groups {
                wo_task_groups.push(self.task_group(app_version_id, task_group_id).await?);
            }
        }

        if wo_task_groups.is_empty() {
            debug!(
                "Work order {} has no typed task groups, using all {} of app version {}",
                work_order.id,
                all_task_groups.len(),
                app_version_id
            );
            wo_task_groups = all_task_groups;
        }

        Ok(wo_task_groups)
    }

    /// Resolve task groups and outcomes for one work order.
    pub async fn enrich_work_order(
        &self,
        work_order: WorkOrder,
    ) -> Result<EnrichedWorkOrder, ResolveError> {
        info!("Enriching work order {}", work_order.id);
        let task_groups = self.applicable_task_groups(&work_order).await?;

        let mut analyses = Vec::with_capacity(task_groups.len());
        for task_group in &task_groups {
            let first = self
                .analyses(&work_order.id, &task_group.id)
                .await?
                .into_iter()
                .next()
                .unwrap_or_default();
            analyses.push(first);
        }

        let tasks = annotate_tasks(&task_groups, &analyses);

        Ok(EnrichedWorkOrder::new(work_order, task_groups, tasks))
    }
}

/// Index outcomes by task id. Later analyses win on duplicate task ids.
pub fn index_outcomes(analyses: &[Analysis]) -> HashMap<&str, &Outcome> {
    analyses
        .iter()
        .flat_map(|analysis| analysis.outcomes.iter())
        .map(|outcome| (outcome.task_id.as_str(), outcome))
        .collect()
}

/// Flatten the tasks of `task_groups` in order, each with its outcome or `None`.
pub fn annotate_tasks(task_groups: &[TaskGroup], analyses: &[Analysis]) -> Vec<AnnotatedTask> {
    let outcomes = index_outcomes(analyses);

    task_groups
        .iter()
        .flat_map(|tg| tg.tasks.iter())
        .map(|task| {
            let state = outcomes.get(task.id.as_str()).map(|o| (*o).clone());
            AnnotatedTask::new(task.clone(), state)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
