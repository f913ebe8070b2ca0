use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A project containing tasks.
///
/// Projects are the top-level organizational unit. The id is assigned by the
/// store on insert and is sequential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    /// Open-ended projects have no end date.
    pub end_date: Option<NaiveDate>,
}

/// Input for creating a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Input for updating an existing project. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Project {
    /// Merge an update into this project. The id is never changed.
    pub fn apply(self, input: UpdateProjectInput) -> Project {
        Project {
            id: self.id,
            name: input.name.unwrap_or(self.name),
            description: input.description.or(self.description),
            start_date: input.start_date.unwrap_or(self.start_date),
            end_date: input.end_date.or(self.end_date),
        }
    }
}
