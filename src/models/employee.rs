use serde::{Deserialize, Serialize};

/// A staff member who can be assigned to tasks.
///
/// `id` is the external matricule (e.g. `EMP001`), chosen by the caller and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    /// Unique across all employees.
    pub email: String,
}

/// Input for creating an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeInput {
    pub id: String,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
}

/// Input for updating an employee. All fields are optional for partial updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployeeInput {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
}

impl Employee {
    pub fn apply(self, input: UpdateEmployeeInput) -> Employee {
        Employee {
            id: self.id,
            last_name: input.last_name.unwrap_or(self.last_name),
            first_name: input.first_name.unwrap_or(self.first_name),
            email: input.email.unwrap_or(self.email),
        }
    }
}

impl From<CreateEmployeeInput> for Employee {
    fn from(input: CreateEmployeeInput) -> Self {
        Employee {
            id: input.id,
            last_name: input.last_name,
            first_name: input.first_name,
            email: input.email,
        }
    }
}

/// Loose email check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
