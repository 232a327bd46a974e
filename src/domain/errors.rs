//! Domain errors for the dealscope analysis pipeline.

use thiserror::Error;

/// Format a cycle path as a human-readable string: `a -> b -> c -> a`.
fn format_cycle_path(path: &[String]) -> String {
    path.join(" -> ")
}

/// Domain-level errors that can occur while building or running an analysis graph.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("duplicate task name: {0}")]
    DuplicateTask(String),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("task dependency cycle detected: {}", format_cycle_path(.0))]
    DependencyCycle(Vec<String>),

    #[error("task '{task}' failed: {message}")]
    TaskFailed { task: String, message: String },

    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Convenience alias for results carrying a [`DomainError`].
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_path_formatting() {
        let err = DomainError::DependencyCycle(vec![
            "market".to_string(),
            "integration".to_string(),
            "market".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "task dependency cycle detected: market -> integration -> market"
        );
    }

    #[test]
    fn test_task_failed_display() {
        let err = DomainError::TaskFailed {
            task: "decision".to_string(),
            message: "rate limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "task 'decision' failed: rate limit exceeded");
    }
}
