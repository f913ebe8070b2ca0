use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A unit of work belonging to exactly one project.
///
/// `project_id` is fixed at creation; updates never move a task to another
/// project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: TaskStatus,
}

/// The progress status of a task.
///
/// - `Pending`: Not yet started (initial value)
/// - `InProgress`: Someone is working on it
/// - `Done`: Finished; never counted as overdue
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "IN_PROGRESS" => Some(Self::InProgress),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Input for creating a task under a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Defaults to [`TaskStatus::Pending`].
    pub status: Option<TaskStatus>,
}

/// Input for updating a task. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Merge an update into this task. Id and project are never changed.
    pub fn apply(self, input: UpdateTaskInput) -> Task {
        Task {
            id: self.id,
            project_id: self.project_id,
            title: input.title.unwrap_or(self.title),
            description: input.description.or(self.description),
            start_date: input.start_date.unwrap_or(self.start_date),
            end_date: input.end_date.or(self.end_date),
            status: input.status.unwrap_or(self.status),
        }
    }

    /// Overdue means the end date has passed and the task is not done.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.end_date.is_some_and(|end| end < today)
    }
}
