// src/types/mod.rs
pub mod application;
pub mod json_text;
pub mod language;
pub mod post;
pub mod response;

pub use application::{Application, ApplicationDetail, ApplicationId, Interview, QuestionAnswer};
pub use language::{Language, UnsupportedLanguage};
pub use post::{CreatedPost, JobPost, NewPost, PostId};
pub use response::{DashboardData, Envelope};
