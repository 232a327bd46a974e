//! Dependency-aware concurrent task execution.
//!
//! Eligible tasks (all dependencies Done) run in parallel on a
//! semaphore-bounded pool; every completion re-scans for newly unblocked
//! tasks. The first failure fails the whole run: nothing new is scheduled,
//! in-flight tasks finish on their own (no cancellation propagates into a
//! started task), and the failing task's error is returned.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::graph::{AnalysisGraph, TaskInputs, TaskStatus};

/// Executes one [`AnalysisGraph`] under a bounded worker pool.
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator {
    max_workers: usize,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl Orchestrator {
    /// Create an orchestrator with the given pool bound (minimum 1).
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Run the graph to completion and return every task's result, keyed by
    /// task name. The mapping is a pure function of the completed results —
    /// completion order never affects it.
    #[instrument(skip_all, fields(max_workers = self.max_workers))]
    pub async fn run(&self, graph: AnalysisGraph) -> DomainResult<BTreeMap<String, Value>> {
        graph.validate()?;

        let run_id = Uuid::new_v4();
        let total = graph.len();
        let started = Instant::now();
        info!(%run_id, tasks = total, "starting analysis run");

        let dependencies = graph.dependency_map();
        let mut tasks = graph.into_tasks();
        let mut status: HashMap<String, TaskStatus> = dependencies
            .keys()
            .map(|name| (name.clone(), TaskStatus::Pending))
            .collect();
        let mut results: BTreeMap<String, Value> = BTreeMap::new();

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut running: JoinSet<(String, anyhow::Result<Value>)> = JoinSet::new();
        let mut failure: Option<DomainError> = None;

        loop {
            if failure.is_none() {
                let ready: Vec<String> = status
                    .iter()
                    .filter(|(name, state)| {
                        **state == TaskStatus::Pending
                            && dependencies.get(*name).is_some_and(|deps| {
                                deps.iter()
                                    .all(|dep| status.get(dep) == Some(&TaskStatus::Done))
                            })
                    })
                    .map(|(name, _)| name.clone())
                    .collect();

                for name in ready {
                    let Some(task) = tasks.remove(&name) else {
                        continue;
                    };
                    status.insert(name.clone(), TaskStatus::Running);

                    // Resolve dependency results before the task leaves the
                    // scheduler; validated graphs guarantee they are all Done.
                    let inputs: TaskInputs = task
                        .depends_on
                        .iter()
                        .filter_map(|dep| results.get(dep).map(|v| (dep.clone(), v.clone())))
                        .collect();

                    let semaphore = Arc::clone(&semaphore);
                    let action = task.action;
                    running.spawn(async move {
                        let _permit = match semaphore.acquire_owned().await {
                            Ok(permit) => permit,
                            Err(err) => return (name, Err(anyhow::anyhow!(err))),
                        };
                        debug!(task = %name, "task started");
                        let output = action(inputs).await;
                        (name, output)
                    });
                }
            }

            let Some(joined) = running.join_next().await else {
                break;
            };

            match joined {
                Ok((name, Ok(value))) => {
                    debug!(task = %name, "task complete");
                    status.insert(name.clone(), TaskStatus::Done);
                    results.insert(name, value);
                }
                Ok((name, Err(err))) => {
                    error!(task = %name, error = %err, "task failed");
                    status.insert(name.clone(), TaskStatus::Failed);
                    if failure.is_none() {
                        failure = Some(DomainError::TaskFailed {
                            task: name,
                            message: err.to_string(),
                        });
                    }
                }
                Err(join_err) => {
                    error!(error = %join_err, "task aborted");
                    if failure.is_none() {
                        failure = Some(DomainError::ExecutionFailed(join_err.to_string()));
                    }
                }
            }
        }

        if let Some(err) = failure {
            error!(%run_id, error = %err, "analysis run failed");
            return Err(err);
        }

        if results.len() != total {
            return Err(DomainError::ExecutionFailed(format!(
                "run stalled: {} of {total} tasks completed",
                results.len()
            )));
        }

        info!(
            %run_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis run complete"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::graph::Task;
    use serde_json::json;

    #[tokio::test]
    async fn test_empty_graph() {
        let orchestrator = Orchestrator::default();
        let results = orchestrator.run(AnalysisGraph::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_single_task() {
        let mut graph = AnalysisGraph::new();
        graph
            .add(Task::new("only", &[], |_| async { Ok(json!({"v": 1})) }))
            .unwrap();

        let results = Orchestrator::default().run(graph).await.unwrap();
        assert_eq!(results["only"], json!({"v": 1}));
    }

    #[tokio::test]
    async fn test_dependency_receives_result() {
        let mut graph = AnalysisGraph::new();
        graph
            .add(Task::new("base", &[], |_| async { Ok(json!({"n": 2})) }))
            .unwrap();
        graph
            .add(Task::new("double", &["base"], |inputs| async move {
                let n = inputs["base"]["n"].as_i64().unwrap_or(0);
                Ok(json!({"n": n * 2}))
            }))
            .unwrap();

        let results = Orchestrator::default().run(graph).await.unwrap();
        assert_eq!(results["double"], json!({"n": 4}));
    }

    #[tokio::test]
    async fn test_invalid_graph_rejected_before_execution() {
        let mut graph = AnalysisGraph::new();
        graph
            .add(Task::new("a", &["ghost"], |_| async { Ok(json!({})) }))
            .unwrap();

        let err = Orchestrator::default().run(graph).await.unwrap_err();
        assert!(matches!(err, DomainError::UnknownDependency { .. }));
    }
}
