// src/interview/flow.rs
//! Interview modal state machine.
//!
//! ```text
//! Idle -> LanguageSelect -> Generating -> ResponseView
//!              ^                               |
//!              +---------- regenerate ---------+
//! ```
//!
//! Every `open` and `close` bumps an epoch. A generation started under an
//! older epoch is still allowed to finish on the server, but its result no
//! longer drives the modal.

use thiserror::Error;

use crate::types::{Application, ApplicationId, Interview, Language};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum InterviewState {
    #[default]
    Idle,
    LanguageSelect {
        applicant_id: ApplicationId,
        language: Option<Language>,
    },
    Generating {
        applicant_id: ApplicationId,
        language: Language,
    },
    ResponseView {
        applicant_id: ApplicationId,
        interview: Interview,
    },
}

impl InterviewState {
    pub fn applicant_id(&self) -> Option<ApplicationId> {
        match self {
            InterviewState::Idle => None,
            InterviewState::LanguageSelect { applicant_id, .. }
            | InterviewState::Generating { applicant_id, .. }
            | InterviewState::ResponseView { applicant_id, .. } => Some(*applicant_id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InterviewState::Idle => "idle",
            InterviewState::LanguageSelect { .. } => "language-select",
            InterviewState::Generating { .. } => "generating",
            InterviewState::ResponseView { .. } => "response-view",
        }
    }
}

/// Identifies one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    pub applicant_id: ApplicationId,
    pub language: Language,
    epoch: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The refreshed interview is now displayed
    Shown,
    /// The modal was closed or reopened while the request was in flight
    Suppressed,
    /// The refreshed applicant came back without questions
    Empty,
    /// Generated on the server, but the dashboard could not be reloaded
    RefreshFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Please select a language")]
    NoLanguage,
    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

#[derive(Debug, Clone, Default)]
pub struct InterviewFlow {
    state: InterviewState,
    epoch: u64,
}

impl InterviewFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InterviewState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != InterviewState::Idle
    }

    pub fn open(&mut self, applicant: &Application) {
        self.epoch += 1;
        self.state = if applicant.has_interview() {
            InterviewState::ResponseView {
                applicant_id: applicant.id,
                interview: applicant.detail.interview.clone(),
            }
        } else {
            InterviewState::LanguageSelect {
                applicant_id: applicant.id,
                language: None,
            }
        };
    }

    pub fn select_language(&mut self, lang: Language) -> Result<(), FlowError> {
        match &mut self.state {
            InterviewState::LanguageSelect { language, .. } => {
                *language = Some(lang);
                Ok(())
            }
            other => Err(invalid("select a language", other)),
        }
    }

    pub fn start_generation(&mut self) -> Result<GenerationTicket, FlowError> {
        let (applicant_id, language) = match &self.state {
            InterviewState::LanguageSelect {
                applicant_id,
                language: Some(language),
            } => (*applicant_id, *language),
            InterviewState::LanguageSelect { language: None, .. } => {
                return Err(FlowError::NoLanguage)
            }
            other => return Err(invalid("generate", other)),
        };
        self.state = InterviewState::Generating {
            applicant_id,
            language,
        };
        Ok(GenerationTicket {
            applicant_id,
            language,
            epoch: self.epoch,
        })
    }

    pub fn is_current(&self, ticket: &GenerationTicket) -> bool {
        ticket.epoch == self.epoch
            && matches!(
                self.state,
                InterviewState::Generating { applicant_id, .. } if applicant_id == ticket.applicant_id
            )
    }

    /// Apply a refreshed applicant record once generation completed.
    pub fn finish_generation(
        &mut self,
        ticket: &GenerationTicket,
        refreshed: Option<&Application>,
    ) -> GenerationOutcome {
        if !self.is_current(ticket) {
            return GenerationOutcome::Suppressed;
        }
        match refreshed.filter(|a| a.has_interview()) {
            Some(applicant) => {
                self.state = InterviewState::ResponseView {
                    applicant_id: ticket.applicant_id,
                    interview: applicant.detail.interview.clone(),
                };
                GenerationOutcome::Shown
            }
            None => {
                self.state = InterviewState::LanguageSelect {
                    applicant_id: ticket.applicant_id,
                    language: Some(ticket.language),
                };
                GenerationOutcome::Empty
            }
        }
    }

    /// Return to language selection after a failed request. Returns whether the
    /// ticket was still current.
    pub fn fail_generation(&mut self, ticket: &GenerationTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = InterviewState::LanguageSelect {
            applicant_id: ticket.applicant_id,
            language: Some(ticket.language),
        };
        true
    }

    /// Discard the displayed questions and pick a language again.
    pub fn regenerate(&mut self) -> Result<(), FlowError> {
        match &self.state {
            InterviewState::ResponseView { applicant_id, .. } => {
                self.state = InterviewState::LanguageSelect {
                    applicant_id: *applicant_id,
                    language: None,
                };
                Ok(())
            }
            other => Err(invalid("regenerate", other)),
        }
    }

    pub fn close(&mut self) {
        self.epoch += 1;
        self.state = InterviewState::Idle;
    }
}

fn invalid(action: &'static str, state: &InterviewState) -> FlowError {
    FlowError::InvalidTransition {
        action,
        state: state.name(),
    }
}
