use serde::{Deserialize, Serialize};

use crate::models::Event;

/// One weekly time block of a course. Stored data may omit any field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub schedule: Vec<ScheduleSession>,
}

/// A course as published to subscribers: the record plus every combined
/// event pointing back at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseView {
    #[serde(flatten)]
    pub course: Course,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
    pub title: String,
    pub color: Option<String>,
    pub user_id: String,
    pub created_at: Option<String>,
    #[serde(default)]
    pub schedule: Vec<ScheduleSession>,
}

/// Partial course fields. Only the `Some` fields are written remotely and
/// merged into the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleSession>>,
}

impl CourseUpdate {
    pub fn is_empty(&self) -> bool {
        self.field_paths().is_empty()
    }

    /// Remote field names touched by this update.
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::new();
        if self.title.is_some() {
            paths.push("title");
        }
        if self.color.is_some() {
            paths.push("color");
        }
        if self.schedule.is_some() {
            paths.push("schedule");
        }
        paths
    }

    pub fn apply(&self, course: &mut Course) {
        if let Some(title) = &self.title {
            course.title = title.clone();
        }
        if let Some(color) = &self.color {
            course.color = Some(color.clone());
        }
        if let Some(schedule) = &self.schedule {
            course.schedule = schedule.clone();
        }
    }
}
