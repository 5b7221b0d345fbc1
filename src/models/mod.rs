pub mod course;
pub mod event;

pub use course::{Course, CourseUpdate, CourseView, NewCourseRequest, ScheduleSession};
pub use event::{Event, EventUpdate, NewEventRequest};
