use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Course, CourseUpdate, Event, EventUpdate, NewCourseRequest, NewEventRequest, ScheduleSession,
};
use crate::remote::DocumentStore;

/// The `courses` and `events` collections kept in a local SQLite database.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    db: SqlitePool,
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: String,
    user_id: String,
    title: String,
    color: Option<String>,
    created_at: Option<String>,
    schedule: String,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        let schedule = serde_json::from_str::<Vec<ScheduleSession>>(&row.schedule)
            .unwrap_or_else(|e| {
                warn!("course {} has an unreadable schedule: {}", row.id, e);
                Vec::new()
            });
        Course {
            id: row.id,
            title: row.title,
            color: row.color,
            user_id: row.user_id,
            created_at: row.created_at,
            schedule,
        }
    }
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: String,
    user_id: String,
    title: String,
    start_time: String,
    end_time: String,
    start_date: String,
    is_recurring: bool,
    recurrence_pattern: Option<String>,
    course_id: Option<String>,
    course_title: Option<String>,
    color: Option<String>,
    location: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            start_time: row.start_time,
            end_time: row.end_time,
            start_date: row.start_date,
            user_id: Some(row.user_id),
            is_recurring: row.is_recurring,
            recurrence_pattern: row.recurrence_pattern,
            course_id: row.course_id,
            course_title: row.course_title,
            color: row.color,
            location: row.location,
            is_class: false,
        }
    }
}

const COURSE_COLUMNS: &str = "id, user_id, title, color, created_at, schedule";
const EVENT_COLUMNS: &str = "id, user_id, title, start_time, end_time, start_date, is_recurring, \
     recurrence_pattern, course_id, course_title, color, location";

fn encode_schedule(schedule: &[ScheduleSession]) -> Result<String, AppError> {
    serde_json::to_string(schedule)
        .map_err(|e| AppError::BadRequest(format!("Failed to encode schedule: {}", e)))
}

impl SqliteDocumentStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    pub async fn insert_course(&self, req: NewCourseRequest) -> Result<Course, AppError> {
        let id = Uuid::new_v4().to_string();
        let schedule = encode_schedule(&req.schedule)?;

        sqlx::query(
            "INSERT INTO courses (id, user_id, title, color, created_at, schedule) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&req.user_id)
        .bind(&req.title)
        .bind(&req.color)
        .bind(&req.created_at)
        .bind(&schedule)
        .execute(&self.db)
        .await?;

        Ok(Course {
            id,
            title: req.title,
            color: req.color,
            user_id: req.user_id,
            created_at: req.created_at,
            schedule: req.schedule,
        })
    }

    pub async fn insert_event(&self, req: NewEventRequest) -> Result<Event, AppError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO events
                (id, user_id, title, start_time, end_time, start_date, is_recurring,
                recurrence_pattern, course_id, course_title, color, location)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.user_id)
        .bind(&req.title)
        .bind(&req.start_time)
        .bind(&req.end_time)
        .bind(&req.start_date)
        .bind(req.is_recurring)
        .bind(&req.recurrence_pattern)
        .bind(&req.course_id)
        .bind(&req.color)
        .bind(&req.location)
        .execute(&self.db)
        .await?;

        self.find_event_by_id(&id).await?.ok_or(AppError::NotFound)
    }

    pub async fn find_course_by_id(&self, id: &str) -> Result<Option<Course>, AppError> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {} FROM courses WHERE id = ?",
            COURSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Course::from))
    }

    pub async fn find_event_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = ?",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Event::from))
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn fetch_courses(&self, user_id: &str) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {} FROM courses WHERE user_id = ? ORDER BY rowid",
            COURSE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn fetch_events(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE user_id = ? ORDER BY start_date ASC",
            EVENT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn update_course(&self, course_id: &str, update: &CourseUpdate) -> Result<(), AppError> {
        let mut current = self
            .find_course_by_id(course_id)
            .await?
            .ok_or(AppError::NotFound)?;
        update.apply(&mut current);
        let schedule = encode_schedule(&current.schedule)?;

        sqlx::query("UPDATE courses SET title = ?, color = ?, schedule = ? WHERE id = ?")
            .bind(&current.title)
            .bind(&current.color)
            .bind(&schedule)
            .bind(course_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    async fn update_event(&self, event_id: &str, update: &EventUpdate) -> Result<(), AppError> {
        let mut current = self
            .find_event_by_id(event_id)
            .await?
            .ok_or(AppError::NotFound)?;
        update.apply(&mut current);

        sqlx::query(
            r#"
            UPDATE events
            SET title = ?,
                start_time = ?,
                end_time = ?,
                start_date = ?,
                is_recurring = ?,
                recurrence_pattern = ?,
                location = ?,
                color = ?
            WHERE id = ?
            "#,
        )
        .bind(&current.title)
        .bind(&current.start_time)
        .bind(&current.end_time)
        .bind(&current.start_date)
        .bind(current.is_recurring)
        .bind(&current.recurrence_pattern)
        .bind(&current.location)
        .bind(&current.color)
        .bind(event_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        let affected = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event_id)
            .execute(&self.db)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_store() -> SqliteDocumentStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test db");

        let store = SqliteDocumentStore::new(pool);
        store.run_migrations().await.expect("Failed to run migrations");
        store
    }

    fn new_course(user_id: &str, title: &str) -> NewCourseRequest {
        NewCourseRequest {
            title: title.to_string(),
            color: Some("blue".to_string()),
            user_id: user_id.to_string(),
            created_at: Some("2024-09-01".to_string()),
            schedule: vec![ScheduleSession {
                day: Some("Monday".to_string()),
                start: Some("09:00".to_string()),
                end: Some("10:00".to_string()),
                location: Some("B12".to_string()),
            }],
        }
    }

    fn new_event(user_id: &str, title: &str, start_date: &str) -> NewEventRequest {
        NewEventRequest {
            title: title.to_string(),
            start_time: "12:00".to_string(),
            end_time: "13:00".to_string(),
            start_date: start_date.to_string(),
            user_id: user_id.to_string(),
            is_recurring: false,
            recurrence_pattern: None,
            course_id: None,
            location: None,
            color: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_course() {
        let store = setup_test_store().await;

        let course = store
            .insert_course(new_course("u1", "Algebra"))
            .await
            .expect("Failed to insert course");
        store
            .insert_course(new_course("u2", "Chemistry"))
            .await
            .expect("Failed to insert course");

        let courses = store.fetch_courses("u1").await.expect("Failed to fetch courses");
        assert_eq!(courses, vec![course]);
        assert_eq!(courses[0].schedule[0].location.as_deref(), Some("B12"));
    }

    #[tokio::test]
    async fn test_events_are_ordered_by_start_date() {
        let store = setup_test_store().await;

        store.insert_event(new_event("u1", "Exam", "2024-12-10")).await.unwrap();
        store.insert_event(new_event("u1", "Quiz", "2024-10-01")).await.unwrap();
        store.insert_event(new_event("u2", "Other", "2024-01-01")).await.unwrap();

        let titles: Vec<String> = store
            .fetch_events("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Quiz", "Exam"]);
    }

    #[tokio::test]
    async fn test_update_course_writes_only_given_fields() {
        let store = setup_test_store().await;
        let course = store.insert_course(new_course("u1", "Algebra")).await.unwrap();

        let update = CourseUpdate {
            title: Some("Linear Algebra".to_string()),
            ..Default::default()
        };
        store.update_course(&course.id, &update).await.unwrap();

        let stored = store.find_course_by_id(&course.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Linear Algebra");
        assert_eq!(stored.color, course.color);
        assert_eq!(stored.schedule, course.schedule);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_event() {
        let store = setup_test_store().await;

        let err = store
            .update_event("missing", &EventUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        let err = store.delete_event("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_event() {
        let store = setup_test_store().await;
        let event = store.insert_event(new_event("u1", "Exam", "2024-12-10")).await.unwrap();

        store.delete_event(&event.id).await.unwrap();
        assert!(store.find_event_by_id(&event.id).await.unwrap().is_none());
    }
}
