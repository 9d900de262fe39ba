//! GraphQL mutations for the Taskboard API
//!
//! Mutations write through the stores directly; batch loaders are only used
//! for reads. Every mutation returns the stored record.

mod task;
mod todo;
mod user;

pub use task::TaskMutation;
pub use todo::TodoMutation;
pub use user::UserMutation;

use async_graphql::MergedObject;

use crate::error::ApiError;
use crate::models::{Principal, Task};
use crate::repositories::Stores;

// =============================================================================
// Input Validation Limits
// =============================================================================

/// Maximum length of task and todo text
pub const MAX_TEXT_LENGTH: usize = 1000;

/// Maximum length of a user's display name
pub const MAX_NAME_LENGTH: usize = 255;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(UserMutation, TaskMutation, TodoMutation);

/// Trim `value` and check it is non-empty and within `max` characters
fn validate_text(field: &str, value: &str, max: usize) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }
    if value.chars().count() > max {
        return Err(ApiError::ValidationError(format!(
            "{} cannot exceed {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

/// Fetch a task the principal owns
///
/// Tasks of other users are reported as not found so their existence is not
/// revealed.
async fn owned_task(stores: &Stores, principal: &Principal, id: &str) -> Result<Task, ApiError> {
    match stores.tasks.get(id).await? {
        Some(task) if task.user_id == principal.subject() => Ok(task),
        _ => Err(ApiError::not_found("task", id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fake::FakeStore;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_text_trims() {
        assert_eq!(validate_text("text", "  buy milk \n", 100).unwrap(), "buy milk");
    }

    #[test]
    fn test_validate_text_rejects_blank() {
        assert_matches!(
            validate_text("text", "   ", 100),
            Err(ApiError::ValidationError(msg)) if msg == "text cannot be empty"
        );
    }

    #[test]
    fn test_validate_text_counts_characters() {
        let long = "é".repeat(MAX_NAME_LENGTH);
        assert!(validate_text("name", &long, MAX_NAME_LENGTH).is_ok());

        let too_long = "a".repeat(MAX_TEXT_LENGTH + 1);
        assert_matches!(
            validate_text("text", &too_long, MAX_TEXT_LENGTH),
            Err(ApiError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn test_owned_task_hides_other_users_tasks() {
        let fake = FakeStore::new();
        let task = Task::new("mine", "u1");
        fake.insert_task(task.clone());
        let stores = fake.stores();

        let owner = Principal::new("u1", "write:tasks");
        assert_eq!(owned_task(&stores, &owner, &task.id).await.unwrap(), task);

        let stranger = Principal::new("u2", "write:tasks");
        assert_matches!(
            owned_task(&stores, &stranger, &task.id).await,
            Err(ApiError::NotFound { resource_type: "task", .. })
        );
    }
}
