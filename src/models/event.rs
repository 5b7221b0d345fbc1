use serde::{Deserialize, Serialize};

/// Prefix of every id minted for a class session event.
pub const CLASS_EVENT_PREFIX: &str = "class-";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub is_class: bool,
}

impl Event {
    /// Whether `id` names a class session event rather than a stored one.
    pub fn is_derived_id(id: &str) -> bool {
        id.starts_with(CLASS_EVENT_PREFIX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventRequest {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub start_date: String,
    pub user_id: String,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub course_id: Option<String>,
    pub location: Option<String>,
    pub color: Option<String>,
}

/// Partial event fields, written remotely and merged into the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.field_paths().is_empty()
    }

    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.title.is_some() {
            paths.push("title");
        }
        if self.start_time.is_some() {
            paths.push("startTime");
        }
        if self.end_time.is_some() {
            paths.push("endTime");
        }
        if self.start_date.is_some() {
            paths.push("startDate");
        }
        if self.is_recurring.is_some() {
            paths.push("isRecurring");
        }
        if self.recurrence_pattern.is_some() {
            paths.push("recurrencePattern");
        }
        if self.location.is_some() {
            paths.push("location");
        }
        if self.color.is_some() {
            paths.push("color");
        }
        paths
    }

    pub fn apply(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(start_time) = &self.start_time {
            event.start_time = start_time.clone();
        }
        if let Some(end_time) = &self.end_time {
            event.end_time = end_time.clone();
        }
        if let Some(start_date) = &self.start_date {
            event.start_date = start_date.clone();
        }
        if let Some(is_recurring) = self.is_recurring {
            event.is_recurring = is_recurring;
        }
        if let Some(pattern) = &self.recurrence_pattern {
            event.recurrence_pattern = Some(pattern.clone());
        }
        if let Some(location) = &self.location {
            event.location = Some(location.clone());
        }
        if let Some(color) = &self.color {
            event.color = Some(color.clone());
        }
    }
}
