use std::sync::Arc;

use crate::models::Event;
use crate::remote::DocumentStore;
use crate::stores::{AuthSession, CoursesStore, EventsStore, ModalStore, Store};

/// Owns every store of one client session. Consumers get handles from here
/// instead of reaching for shared globals.
#[derive(Clone)]
pub struct Planner {
    pub session: AuthSession,
    pub courses: CoursesStore,
    pub events: EventsStore,
    /// Unfiltered copy of the combined events published by each load.
    pub base_events: Store<Vec<Event>>,
    pub modal: ModalStore,
}

impl Planner {
    pub fn new(remote: Arc<dyn DocumentStore>, session: AuthSession) -> Self {
        let events = EventsStore::new(remote.clone());
        let base_events = Store::default();
        let courses = CoursesStore::new(remote, session.clone(), events.clone(), base_events.clone());

        Self {
            session,
            courses,
            events,
            base_events,
            modal: ModalStore::new(),
        }
    }

    /// Sign out and return every store to its empty state.
    pub fn reset(&self) {
        self.session.sign_out();
        self.courses.reset();
        self.modal.clear_modal();
    }
}
