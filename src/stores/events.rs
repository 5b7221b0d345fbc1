use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::Store;
use crate::error::AppError;
use crate::models::{Event, EventUpdate};
use crate::remote::DocumentStore;

/// Calendar events: stored events followed by class session events.
#[derive(Clone)]
pub struct EventsStore {
    events: Store<Vec<Event>>,
    remote: Arc<dyn DocumentStore>,
}

impl EventsStore {
    pub fn new(remote: Arc<dyn DocumentStore>) -> Self {
        Self {
            events: Store::default(),
            remote,
        }
    }

    pub fn get(&self) -> Vec<Event> {
        self.events.get()
    }

    pub fn set(&self, events: Vec<Event>) {
        self.events.set(events);
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Event>> {
        self.events.subscribe()
    }

    /// Persist `update` on the event, then merge it into the cached copy.
    /// Returns the applied fields so a caller can patch dependent views.
    pub async fn update_event(
        &self,
        event_id: &str,
        update: EventUpdate,
    ) -> Result<EventUpdate, AppError> {
        ensure_stored(event_id)?;
        if update.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }

        self.remote.update_event(event_id, &update).await?;

        self.events.update(|events| {
            for event in events.iter_mut().filter(|e| e.id == event_id) {
                update.apply(event);
            }
        });
        debug!("updated event {} ({:?})", event_id, update.field_paths());

        Ok(update)
    }

    pub async fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        ensure_stored(event_id)?;

        self.remote.delete_event(event_id).await?;

        self.events.update(|events| events.retain(|e| e.id != event_id));
        debug!("deleted event {}", event_id);

        Ok(())
    }
}

// Class session events only live in memory; writing them would persist a copy
// that the next load duplicates.
fn ensure_stored(event_id: &str) -> Result<(), AppError> {
    if Event::is_derived_id(event_id) {
        return Err(AppError::BadRequest(format!(
            "{} is generated from a course schedule and cannot be changed directly",
            event_id
        )));
    }
    Ok(())
}
