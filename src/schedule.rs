use chrono::{DateTime, NaiveDate};

use crate::models::event::CLASS_EVENT_PREFIX;
use crate::models::{Course, Event, ScheduleSession};

const WEEKDAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Expand every course's weekly schedule into one recurring class event per
/// session. Sessions without a day, start and end, or with an unknown day
/// name, are skipped.
///
/// `today` is the start date for courses with no creation date.
pub fn generate_class_events(courses: &[Course], today: NaiveDate) -> Vec<Event> {
    courses
        .iter()
        .flat_map(|course| {
            course
                .schedule
                .iter()
                .filter_map(move |session| class_event(course, session, today))
        })
        .collect()
}

fn class_event(course: &Course, session: &ScheduleSession, today: NaiveDate) -> Option<Event> {
    let (Some(day), Some(start), Some(end)) = (&session.day, &session.start, &session.end) else {
        return None;
    };
    if day.is_empty() || start.is_empty() || end.is_empty() {
        return None;
    }
    let pattern = day.to_lowercase();
    if !WEEKDAYS.contains(&pattern.as_str()) {
        return None;
    }

    Some(Event {
        // the day keeps its original casing here
        id: format!("{}{}-{}", CLASS_EVENT_PREFIX, course.id, day),
        title: format!("{} Class", course.title),
        start_time: start.clone(),
        end_time: end.clone(),
        start_date: start_date(course.created_at.as_deref(), today),
        user_id: None,
        is_recurring: true,
        recurrence_pattern: Some(pattern),
        course_id: Some(course.id.clone()),
        course_title: Some(course.title.clone()),
        color: course.color.clone(),
        location: Some(session.location.clone().unwrap_or_default()),
        is_class: true,
    })
}

/// Calendar date of a course's creation timestamp. Values that are neither
/// RFC3339 nor `YYYY-MM-DD` pass through untouched.
fn start_date(created_at: Option<&str>, today: NaiveDate) -> String {
    match created_at {
        Some(raw) if !raw.is_empty() => {
            if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
                ts.date_naive().format("%Y-%m-%d").to_string()
            } else if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                date.format("%Y-%m-%d").to_string()
            } else {
                raw.to_string()
            }
        }
        _ => today.format("%Y-%m-%d").to_string(),
    }
}
