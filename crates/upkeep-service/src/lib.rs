//! Event storage seams and the calendar feed service.

pub mod error;
pub mod feed;
pub mod store;
