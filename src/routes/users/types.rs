use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::users::{self, Plan};
use crate::error::{AppError, AppResult};
use crate::services::identifier::ResourceId;
use crate::services::sparse_update::SparseUpdate;

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub plan: Plan,
}

impl From<users::Model> for UserResponse {
    fn from(u: users::Model) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            plan: u.plan,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    /// Defaults to the configured placeholder address
    pub email: Option<String>,
    /// One of `free`, `plus`, `ultra` (default `free`)
    pub plan: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub plan: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_update(self, id: ResourceId) -> AppResult<SparseUpdate<users::ActiveModel>> {
        let mut update = SparseUpdate::new("User", users::Column::Id, id);
        update
            .set_with(users::Column::Name, self.name, |name| required_text("name", name))?
            .set_with(users::Column::Email, self.email, |email| required_text("email", email))?
            .set_with(users::Column::Plan, self.plan, |plan| parse_plan(&plan))?;
        Ok(update)
    }
}

pub fn parse_plan(raw: &str) -> AppResult<Plan> {
    Plan::parse(raw).ok_or_else(|| {
        AppError::InvalidArgument(format!(
            "Invalid plan '{raw}'. Allowed values: free, plus, ultra"
        ))
    })
}

/// Reject blank strings for fields that must carry text.
pub fn required_text(field: &str, value: String) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
