use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Course, CourseUpdate, Event, EventUpdate};

/// The `courses` and `events` collections of the hosted document store.
/// Reads are scoped to one owner; writes address documents by id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn fetch_courses(&self, user_id: &str) -> Result<Vec<Course>, AppError>;
    /// Events owned by `user_id`, ordered by `startDate`.
    async fn fetch_events(&self, user_id: &str) -> Result<Vec<Event>, AppError>;
    async fn update_course(&self, course_id: &str, update: &CourseUpdate) -> Result<(), AppError>;
    async fn update_event(&self, event_id: &str, update: &EventUpdate) -> Result<(), AppError>;
    async fn delete_event(&self, event_id: &str) -> Result<(), AppError>;
}
