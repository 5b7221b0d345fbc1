#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use classboard::auth::AuthUser;
use classboard::error::AppError;
use classboard::models::{Course, CourseUpdate, Event, EventUpdate, ScheduleSession};
use classboard::remote::DocumentStore;

/// In-memory document store that records writes and can be told to fail.
#[derive(Default)]
pub struct MockDocumentStore {
    pub courses: Mutex<Vec<Course>>,
    pub events: Mutex<Vec<Event>>,
    pub course_updates: Mutex<Vec<(String, CourseUpdate)>>,
    pub event_updates: Mutex<Vec<(String, EventUpdate)>>,
    pub deleted: Mutex<Vec<String>>,
    /// Delay applied to successive `fetch_courses` calls, after the snapshot.
    pub fetch_delays: Mutex<VecDeque<Duration>>,
    pub fetches: AtomicUsize,
    pub fail: AtomicBool,
}

impl MockDocumentStore {
    pub fn with_data(courses: Vec<Course>, events: Vec<Event>) -> Self {
        Self {
            courses: Mutex::new(courses),
            events: Mutex::new(events),
            ..Default::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Remote("permission denied".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn fetch_courses(&self, user_id: &str) -> Result<Vec<Course>, AppError> {
        self.check()?;
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let snapshot: Vec<Course> = self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        let delay = self.fetch_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(snapshot)
    }

    async fn fetch_events(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        self.check()?;
        let mut events: Vec<Event> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        events.sort_by(|a, b| a.start_date.cmp(&b.start_date));
        Ok(events)
    }

    async fn update_course(&self, course_id: &str, update: &CourseUpdate) -> Result<(), AppError> {
        self.check()?;
        self.course_updates
            .lock()
            .unwrap()
            .push((course_id.to_string(), update.clone()));
        Ok(())
    }

    async fn update_event(&self, event_id: &str, update: &EventUpdate) -> Result<(), AppError> {
        self.check()?;
        self.event_updates
            .lock()
            .unwrap()
            .push((event_id.to_string(), update.clone()));
        Ok(())
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        self.check()?;
        self.deleted.lock().unwrap().push(event_id.to_string());
        Ok(())
    }
}

pub fn user(uid: &str) -> AuthUser {
    AuthUser {
        uid: uid.to_string(),
        email: Some(format!("{}@example.com", uid)),
        id_token: format!("token-{}", uid),
        refresh_token: None,
    }
}

pub fn session(day: &str, start: &str, end: &str) -> ScheduleSession {
    ScheduleSession {
        day: Some(day.to_string()),
        start: Some(start.to_string()),
        end: Some(end.to_string()),
        location: None,
    }
}

pub fn course(id: &str, title: &str, schedule: Vec<ScheduleSession>) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        color: Some("blue".to_string()),
        user_id: "u1".to_string(),
        created_at: Some("2024-09-01".to_string()),
        schedule,
    }
}

pub fn event(id: &str, start_date: &str, course_id: Option<&str>) -> Event {
    Event {
        id: id.to_string(),
        title: format!("Event {}", id),
        start_time: "12:00".to_string(),
        end_time: "13:00".to_string(),
        start_date: start_date.to_string(),
        user_id: Some("u1".to_string()),
        course_id: course_id.map(str::to_string),
        ..Default::default()
    }
}
