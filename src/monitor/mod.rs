// Live terminal monitor for the alert scheduler.
pub mod dashboard;

pub use dashboard::{Dashboard, DashboardState};
