use serde::{Deserialize, Serialize};

/// Composite key of an [`Assignment`].
///
/// The pair itself is the identity: an employee is linked to a given task at
/// most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignmentKey {
    pub employee_id: String,
    pub task_id: i64,
}

/// An employee assigned to a task with a role label (e.g. "Dev").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub employee_id: String,
    pub task_id: i64,
    pub role: String,
}

impl AssignmentKey {
    pub fn new(employee_id: impl Into<String>, task_id: i64) -> Self {
        Self {
            employee_id: employee_id.into(),
            task_id,
        }
    }
}
