// src/lib.rs
//! Client for a recruitment service: job posts, applications with resumes,
//! a recruiter dashboard with AI scores, and generated interview questions.

pub mod cli;
pub mod core;
pub mod dashboard;
pub mod environment;
pub mod events;
pub mod interview;
pub mod links;
pub mod logging;
pub mod routes;
pub mod session;
pub mod types;
pub mod validation;

pub use crate::core::{RequestError, RequestState, ServiceClient, Transport};
pub use dashboard::{DashboardController, DashboardViewModel, FilterCriteria, SortConfig, SortKey};
pub use environment::EnvironmentConfig;
pub use interview::InterviewFlow;
pub use session::{AppState, DashboardSession, Notice};
