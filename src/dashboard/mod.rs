// src/dashboard/mod.rs
pub mod controller;
pub mod criteria;
pub mod stats;
pub mod view_model;

pub use controller::{DashboardController, DashboardEvent, PendingAction};
pub use criteria::{FilterCriteria, SortConfig, SortDirection, SortKey};
pub use stats::{DashboardStats, ScoreBand};
pub use view_model::{ApplicantView, DashboardViewModel};
