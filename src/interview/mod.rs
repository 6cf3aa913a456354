// src/interview/mod.rs
pub mod flow;

pub use flow::{FlowError, GenerationOutcome, GenerationTicket, InterviewFlow, InterviewState};
