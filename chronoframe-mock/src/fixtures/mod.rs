pub mod calendars;
pub mod tables;
