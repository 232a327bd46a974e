//! Analysis task graph: named tasks connected by "depends on" edges.

use std::collections::{HashMap, HashSet};

use futures::future::BoxFuture;
use serde_json::Value;

use crate::domain::errors::{DomainError, DomainResult};

/// Resolved dependency results handed to a task body, keyed by task name.
pub type TaskInputs = HashMap<String, Value>;

type TaskAction = Box<dyn FnOnce(TaskInputs) -> BoxFuture<'static, anyhow::Result<Value>> + Send>;

/// Lifecycle of a task within one orchestrator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    Failed,
}

/// A named unit of work with explicit dependency edges.
///
/// The body receives the results of every declared dependency and produces a
/// structured result. Data may only flow between tasks through declared
/// edges; submission order carries no meaning.
pub struct Task {
    pub name: String,
    pub depends_on: Vec<String>,
    pub(crate) action: TaskAction,
}

impl Task {
    /// Create a task from an async closure over its resolved dependencies.
    pub fn new<F, Fut>(name: impl Into<String>, depends_on: &[&str], action: F) -> Self
    where
        F: FnOnce(TaskInputs) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self {
            name: name.into(),
            depends_on: depends_on.iter().map(|d| (*d).to_string()).collect(),
            action: Box::new(move |inputs| Box::pin(action(inputs))),
        }
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// A directed acyclic graph of named tasks, owned by a single orchestrator run.
#[derive(Debug, Default)]
pub struct AnalysisGraph {
    tasks: HashMap<String, Task>,
}

// Standalone helper for cycle detection (no self needed)
fn detect_cycle_util(
    node: &str,
    graph: &HashMap<&str, Vec<&str>>,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> bool {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(neighbors) = graph.get(node) {
        for &neighbor in neighbors {
            if !visited.contains(neighbor) {
                if detect_cycle_util(neighbor, graph, visited, rec_stack, path) {
                    return true;
                }
            } else if rec_stack.contains(neighbor) {
                // Cycle detected; trim the path to the cycle itself
                if let Some(cycle_start) = path.iter().position(|n| n == neighbor) {
                    path.drain(0..cycle_start);
                    path.push(neighbor.to_string());
                    return true;
                }
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    false
}

impl AnalysisGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task, rejecting duplicate names.
    pub fn add(&mut self, task: Task) -> DomainResult<()> {
        if self.tasks.contains_key(&task.name) {
            return Err(DomainError::DuplicateTask(task.name));
        }
        self.tasks.insert(task.name.clone(), task);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate that every dependency names a known task and no cycle exists.
    pub fn validate(&self) -> DomainResult<()> {
        for task in self.tasks.values() {
            for dep in &task.depends_on {
                if !self.tasks.contains_key(dep) {
                    return Err(DomainError::UnknownDependency {
                        task: task.name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        if let Some(cycle) = self.detect_cycle() {
            return Err(DomainError::DependencyCycle(cycle));
        }

        Ok(())
    }

    /// DFS-based cycle detection over the dependency edges.
    fn detect_cycle(&self) -> Option<Vec<String>> {
        let graph: HashMap<&str, Vec<&str>> = self
            .tasks
            .values()
            .map(|t| {
                (
                    t.name.as_str(),
                    t.depends_on.iter().map(String::as_str).collect(),
                )
            })
            .collect();

        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();

        for name in graph.keys() {
            if !visited.contains(*name)
                && detect_cycle_util(name, &graph, &mut visited, &mut rec_stack, &mut path)
            {
                return Some(path);
            }
        }

        None
    }

    /// Dependency edges by task name, for the scheduler.
    pub(crate) fn dependency_map(&self) -> HashMap<String, Vec<String>> {
        self.tasks
            .iter()
            .map(|(name, task)| (name.clone(), task.depends_on.clone()))
            .collect()
    }

    /// Consume the graph into its tasks.
    pub(crate) fn into_tasks(self) -> HashMap<String, Task> {
        self.tasks
    }
}
