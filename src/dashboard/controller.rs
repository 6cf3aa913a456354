// src/dashboard/controller.rs
//! Recruiter dashboard orchestration: fetch, favourite, delete with
//! confirmation and the interview generation round trip.
//!
//! Every outcome a user should see goes through [`AppState`]; methods return
//! a plain success flag for callers that want to branch.

use serde_json::Value;

use super::view_model::DashboardViewModel;
use crate::app_log;
use crate::core::{
    DeleteApplication, DeletePost, GetDashboard, MarkFavourite, RequestInterview, ServiceClient,
};
use crate::events::{EventBus, Subscription};
use crate::interview::{GenerationOutcome, GenerationTicket, InterviewFlow, InterviewState};
use crate::session::{AppState, DashboardSession};
use crate::types::{ApplicationId, Language};

/// Destructive action waiting for the user's confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    DeleteApplication(ApplicationId),
    DeletePost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    ListRefreshed { applicants: usize },
    FavoriteChanged { id: ApplicationId, is_favorite: bool },
    FlowChanged { state: &'static str },
    SessionCleared,
}

pub struct DashboardController {
    client: ServiceClient,
    session: Option<DashboardSession>,
    dashboard: GetDashboard,
    delete_post: DeletePost,
    delete_application: DeleteApplication,
    mark_favourite: MarkFavourite,
    request_interview: RequestInterview,
    view: DashboardViewModel,
    flow: InterviewFlow,
    pending: Option<PendingAction>,
    fetch_attempted: bool,
    state: AppState,
    events: EventBus<DashboardEvent>,
}

impl DashboardController {
    pub fn new(client: ServiceClient, session: DashboardSession) -> Self {
        let dashboard = client.dashboard(&session.dashboard_id, &session.access_token);
        Self {
            dashboard,
            delete_post: client.delete_post(),
            delete_application: client.delete_application(),
            mark_favourite: client.mark_favourite(),
            request_interview: client.request_interview(),
            client,
            session: Some(session),
            view: DashboardViewModel::new(),
            flow: InterviewFlow::new(),
            pending: None,
            fetch_attempted: false,
            state: AppState::new(),
            events: EventBus::new(),
        }
    }

    pub fn session(&self) -> Option<&DashboardSession> {
        self.session.as_ref()
    }

    pub fn view(&self) -> &DashboardViewModel {
        &self.view
    }

    /// Criteria and sort changes go straight to the view model.
    pub fn view_mut(&mut self) -> &mut DashboardViewModel {
        &mut self.view
    }

    pub fn flow(&self) -> &InterviewFlow {
        &self.flow
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&DashboardEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Fetch the dashboard and replace the applicant list. On failure the
    /// previous list stays and the fetch guard is reset so a retry is possible.
    pub async fn load(&mut self) -> bool {
        self.fetch_attempted = true;
        self.state.set_loading(true);
        let fetched = self.dashboard.get().await;
        self.state.set_loading(false);

        match fetched {
            Some(data) => {
                self.view.load(data);
                let applicants = self.view.applicants().len();
                app_log!(info, "Dashboard loaded with {} applicants", applicants);
                self.events.emit(&DashboardEvent::ListRefreshed { applicants });
                true
            }
            None => {
                self.fetch_attempted = false;
                self.state
                    .report_request_error(self.dashboard.snapshot().error, "Failed to load dashboard");
                false
            }
        }
    }

    /// Fetch once per session.
    pub async fn ensure_loaded(&mut self) -> bool {
        if self.fetch_attempted {
            return true;
        }
        self.load().await
    }

    /// Flip the favourite flag at once, then confirm with the backend. A
    /// failed request restores the previous flag.
    pub async fn toggle_favorite(&mut self, id: ApplicationId) -> bool {
        let Some(flipped) = self.view.toggle_favorite_local(id) else {
            self.state.report_error(format!("Applicant {} not found", id));
            return false;
        };
        self.emit_favorite(id, flipped);

        if self.mark_favourite.toggle(id).await.is_some() {
            app_log!(info, "Applicant {} favourite set to {}", id, flipped);
            return true;
        }

        if let Some(restored) = self.view.toggle_favorite_local(id) {
            self.emit_favorite(id, restored);
        }
        self.state
            .report_request_error(self.mark_favourite.snapshot().error, "Failed to update favourite");
        false
    }

    pub fn request_delete(&mut self, id: ApplicationId) -> bool {
        if self.view.find(id).is_none() {
            self.state.report_error(format!("Applicant {} not found", id));
            return false;
        }
        self.pending = Some(PendingAction::DeleteApplication(id));
        true
    }

    pub fn request_post_deletion(&mut self) -> bool {
        if self.session.is_none() {
            self.state.report_error("No job post to delete");
            return false;
        }
        self.pending = Some(PendingAction::DeletePost);
        true
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Carry out the pending action. Returns false when nothing was pending
    /// or the request failed.
    pub async fn confirm(&mut self) -> bool {
        match self.pending.take() {
            Some(PendingAction::DeleteApplication(id)) => self.delete_application(id).await,
            Some(PendingAction::DeletePost) => self.delete_post().await,
            None => false,
        }
    }

    async fn delete_application(&mut self, id: ApplicationId) -> bool {
        if self.delete_application.delete(id).await.is_none() {
            self.state.report_request_error(
                self.delete_application.snapshot().error,
                "Failed to delete application",
            );
            return false;
        }
        self.state.report_success("Application deleted");
        self.load().await
    }

    async fn delete_post(&mut self) -> bool {
        let Some(session) = self.session.clone() else {
            self.state.report_error("No job post to delete");
            return false;
        };
        if self
            .delete_post
            .delete(&session.dashboard_id, &session.access_token)
            .await
            .is_none()
        {
            self.state
                .report_request_error(self.delete_post.snapshot().error, "Failed to delete job post");
            return false;
        }

        self.session = None;
        self.dashboard = self.client.dashboard("", "");
        self.view.clear();
        self.flow.close();
        self.fetch_attempted = false;
        self.events.emit(&DashboardEvent::SessionCleared);
        self.state.report_success("Job post deleted");
        true
    }

    pub fn open_interview(&mut self, id: ApplicationId) -> bool {
        let Some(applicant) = self.view.find(id).cloned() else {
            self.state.report_error(format!("Applicant {} not found", id));
            return false;
        };
        self.flow.open(&applicant);
        self.emit_flow();
        true
    }

    /// Choose a language and move the flow to generating.
    pub fn begin_generation(&mut self, language: Language) -> Option<GenerationTicket> {
        let started = self
            .flow
            .select_language(language)
            .and_then(|_| self.flow.start_generation());
        match started {
            Ok(ticket) => {
                self.emit_flow();
                Some(ticket)
            }
            Err(e) => {
                self.state.report_error(e.to_string());
                None
            }
        }
    }

    /// Handle the interview response. The dashboard is refetched in every
    /// successful case; the flow only moves on if `ticket` is still current.
    /// Returns `None` when the interview request itself failed. A failed
    /// refetch keeps its own notice and yields `RefreshFailed`.
    pub async fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        response: Option<Value>,
    ) -> Option<GenerationOutcome> {
        if response.is_none() {
            if self.flow.fail_generation(&ticket) {
                self.emit_flow();
            }
            self.state.report_request_error(
                self.request_interview.snapshot().error,
                "Failed to generate interview",
            );
            return None;
        }

        if !self.load().await {
            if self.flow.fail_generation(&ticket) {
                self.emit_flow();
            }
            app_log!(
                warn,
                "Interview for applicant {} generated but the dashboard could not be reloaded",
                ticket.applicant_id
            );
            return Some(GenerationOutcome::RefreshFailed);
        }

        let refreshed = self.view.find(ticket.applicant_id).cloned();
        let outcome = self.flow.finish_generation(&ticket, refreshed.as_ref());
        match outcome {
            GenerationOutcome::Shown => {
                self.emit_flow();
                self.state.report_success("Interview generated");
            }
            GenerationOutcome::Empty => {
                self.emit_flow();
                self.state.report_error("The interview came back without questions");
            }
            GenerationOutcome::Suppressed | GenerationOutcome::RefreshFailed => {
                app_log!(
                    debug,
                    "Interview for applicant {} ready after the modal closed",
                    ticket.applicant_id
                );
            }
        }
        Some(outcome)
    }

    /// Full round trip: request generation, refetch, show the result.
    pub async fn generate_interview(&mut self, language: Language) -> Option<GenerationOutcome> {
        let ticket = self.begin_generation(language)?;
        let response = self
            .request_interview
            .request(ticket.applicant_id, Some(ticket.language))
            .await;
        self.complete_generation(ticket, response).await
    }

    pub fn regenerate_interview(&mut self) -> bool {
        match self.flow.regenerate() {
            Ok(()) => {
                self.emit_flow();
                true
            }
            Err(e) => {
                self.state.report_error(e.to_string());
                false
            }
        }
    }

    pub fn close_interview(&mut self) {
        self.flow.close();
        self.emit_flow();
    }

    /// Handle on the interview request, usable while the controller is
    /// borrowed elsewhere.
    pub fn interview_requester(&self) -> RequestInterview {
        self.request_interview.clone()
    }

    pub fn interview_state(&self) -> &InterviewState {
        self.flow.state()
    }

    fn emit_favorite(&self, id: ApplicationId, is_favorite: bool) {
        self.events
            .emit(&DashboardEvent::FavoriteChanged { id, is_favorite });
    }

    fn emit_flow(&self) {
        self.events.emit(&DashboardEvent::FlowChanged {
            state: self.flow.state().name(),
        });
    }
}
