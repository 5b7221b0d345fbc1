use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Local;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{AuthSession, EventsStore, Store};
use crate::error::AppError;
use crate::models::{CourseUpdate, CourseView, Event};
use crate::remote::DocumentStore;
use crate::schedule::generate_class_events;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Nobody is signed in.
    Skipped,
    Applied { courses: usize, events: usize },
    /// A newer load published first; this result was dropped.
    Stale,
}

/// Orders concurrent loads: a result is published only if no load that
/// started later has published already.
#[derive(Debug, Default)]
struct LoadSequence {
    issued: AtomicU64,
    applied: Mutex<u64>,
}

impl LoadSequence {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn publish(&self, ticket: u64, publish: impl FnOnce()) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(|e| e.into_inner());
        if ticket <= *applied {
            return false;
        }
        *applied = ticket;
        publish();
        true
    }
}

#[derive(Clone)]
pub struct CoursesStore {
    courses: Store<Vec<CourseView>>,
    events: EventsStore,
    base_events: Store<Vec<Event>>,
    session: AuthSession,
    remote: Arc<dyn DocumentStore>,
    sequence: Arc<LoadSequence>,
}

impl CoursesStore {
    pub fn new(
        remote: Arc<dyn DocumentStore>,
        session: AuthSession,
        events: EventsStore,
        base_events: Store<Vec<Event>>,
    ) -> Self {
        Self {
            courses: Store::default(),
            events,
            base_events,
            session,
            remote,
            sequence: Arc::default(),
        }
    }

    pub fn get(&self) -> Vec<CourseView> {
        self.courses.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<CourseView>> {
        self.courses.subscribe()
    }

    /// Rebuild the courses and events caches from the remote store.
    pub async fn load(&self) -> Result<LoadOutcome, AppError> {
        let Some(user) = self.session.current_user() else {
            debug!("no signed-in user, skipping load");
            return Ok(LoadOutcome::Skipped);
        };
        let ticket = self.sequence.issue();
        info!("loading courses for {} (load #{})", user.uid, ticket);

        let courses = self.remote.fetch_courses(&user.uid).await?;
        let stored = self.remote.fetch_events(&user.uid).await?;
        let derived = generate_class_events(&courses, Local::now().date_naive());
        debug!(
            "fetched {} courses, {} events; generated {} class events",
            courses.len(),
            stored.len(),
            derived.len()
        );

        let mut combined = stored;
        combined.extend(derived);

        let views: Vec<CourseView> = courses
            .into_iter()
            .map(|course| {
                let events = combined
                    .iter()
                    .filter(|e| e.course_id.as_deref() == Some(course.id.as_str()))
                    .cloned()
                    .collect();
                CourseView { course, events }
            })
            .collect();

        let outcome = LoadOutcome::Applied {
            courses: views.len(),
            events: combined.len(),
        };
        let published = self.sequence.publish(ticket, || {
            self.events.set(combined.clone());
            self.base_events.set(combined);
            self.courses.set(views);
        });

        if published {
            Ok(outcome)
        } else {
            warn!("load #{} finished after a newer load, dropping result", ticket);
            Ok(LoadOutcome::Stale)
        }
    }

    /// Empty the courses, events and base events caches. Loads already in
    /// flight become stale and publish nothing.
    pub fn reset(&self) {
        let ticket = self.sequence.issue();
        self.sequence.publish(ticket, || {
            self.courses.set(Vec::new());
            self.events.set(Vec::new());
            self.base_events.set(Vec::new());
        });
        debug!("cleared cached courses and events (load #{})", ticket);
    }

    /// Persist `update` on the course, then merge it into the cached course.
    /// Events are not regenerated until the next load.
    pub async fn update_course(&self, course_id: &str, update: CourseUpdate) -> Result<(), AppError> {
        if update.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        self.remote.update_course(course_id, &update).await?;

        self.courses.update(|views| {
            for view in views.iter_mut().filter(|v| v.course.id == course_id) {
                update.apply(&mut view.course);
            }
        });
        debug!("updated course {} ({:?})", course_id, update.field_paths());

        Ok(())
    }
}
