pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::availability::{generate_slots, weekday_index, AvailabilityService};
pub use services::doctor::DoctorService;
pub use services::schedule::ScheduleService;
