pub mod catalog;
pub mod notifications;
pub mod picker;
pub mod scheduler;

pub use catalog::{AlertCatalog, IncidentCategory, Suggestion, Urgency};
pub use notifications::DesktopNotifier;
pub use picker::{FixedPicker, RandomPicker, SuggestionPicker};
pub use scheduler::{ActiveAlert, AlertEvent, AlertScheduler, DismissReason};
