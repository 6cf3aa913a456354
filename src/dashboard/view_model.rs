// src/dashboard/view_model.rs
//! Applicant table state: the authoritative list from the last fetch plus a
//! filtered, sorted projection recomputed after every change.

use super::criteria::{FilterCriteria, SortConfig, SortKey};
use super::stats::DashboardStats;
use crate::types::{Application, ApplicationId, DashboardData, JobPost};

/// What the applicant table should render.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicantView<'a> {
    /// The post has no applicants at all
    NoApplicants,
    /// Applicants exist but none passes the current criteria
    NoMatches,
    Rows(Vec<&'a Application>),
}

#[derive(Debug, Clone, Default)]
pub struct DashboardViewModel {
    post: Option<JobPost>,
    applicants: Vec<Application>,
    criteria: FilterCriteria,
    sort: SortConfig,
    display: Vec<usize>,
}

impl DashboardViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly fetched dashboard. Criteria and sort are kept.
    pub fn load(&mut self, data: DashboardData) {
        self.post = Some(data.post);
        self.applicants = data.applies;
        self.recompute();
    }

    pub fn replace_applicants(&mut self, applicants: Vec<Application>) {
        self.applicants = applicants;
        self.recompute();
    }

    pub fn post(&self) -> Option<&JobPost> {
        self.post.as_ref()
    }

    pub fn applicants(&self) -> &[Application] {
        &self.applicants
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.recompute();
    }

    pub fn set_name_query(&mut self, query: impl Into<String>) {
        self.criteria.name_query = query.into();
        self.recompute();
    }

    pub fn set_skills_query(&mut self, query: impl Into<String>) {
        self.criteria.skills_query = query.into();
        self.recompute();
    }

    pub fn set_min_experience(&mut self, years: f64) {
        self.criteria.min_experience = years;
        self.recompute();
    }

    pub fn reset_criteria(&mut self) {
        self.criteria = FilterCriteria::default();
        self.sort = SortConfig::default();
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: SortConfig) {
        self.sort = sort;
        self.recompute();
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
        self.recompute();
    }

    pub fn rows(&self) -> Vec<&Application> {
        self.display.iter().map(|&i| &self.applicants[i]).collect()
    }

    pub fn view(&self) -> ApplicantView<'_> {
        if self.applicants.is_empty() {
            ApplicantView::NoApplicants
        } else if self.display.is_empty() {
            ApplicantView::NoMatches
        } else {
            ApplicantView::Rows(self.rows())
        }
    }

    pub fn find(&self, id: ApplicationId) -> Option<&Application> {
        self.applicants.iter().find(|a| a.id == id)
    }

    /// Flip one applicant's favourite flag. Returns the new value, or `None`
    /// when the id is unknown.
    pub fn toggle_favorite_local(&mut self, id: ApplicationId) -> Option<bool> {
        let applicant = self.applicants.iter_mut().find(|a| a.id == id)?;
        applicant.is_favorite = !applicant.is_favorite;
        let flipped = applicant.is_favorite;
        self.recompute();
        Some(flipped)
    }

    /// Forget post and applicants. Criteria go back to their defaults.
    pub fn clear(&mut self) {
        self.post = None;
        self.applicants.clear();
        self.criteria = FilterCriteria::default();
        self.sort = SortConfig::default();
        self.display.clear();
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(&self.applicants)
    }

    fn recompute(&mut self) {
        let filter = self.criteria.compile();
        let mut display: Vec<usize> = self
            .applicants
            .iter()
            .enumerate()
            .filter(|(_, a)| filter.matches(a))
            .map(|(i, _)| i)
            .collect();
        if self.sort.key != SortKey::None {
            display.sort_by(|&a, &b| self.sort.compare(&self.applicants[a], &self.applicants[b]));
        }
        self.display = display;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::criteria::SortDirection;
    use crate::types::ApplicationDetail;

    fn applicant(id: u64, ai_score: f64) -> Application {
        Application {
            id,
            name: format!("applicant {}", id),
            email: String::new(),
            phone: String::new(),
            resume_path: None,
            is_favorite: false,
            detail: ApplicationDetail {
                ai_score,
                ..Default::default()
            },
        }
    }

    fn ids(view: &DashboardViewModel) -> Vec<u64> {
        view.rows().iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_sort_by_ai_score() {
        let mut view = DashboardViewModel::new();
        view.replace_applicants(vec![applicant(1, 7.0), applicant(2, 9.0), applicant(3, 5.0)]);
        assert_eq!(ids(&view), vec![1, 2, 3]);

        view.toggle_sort(SortKey::AiScore);
        assert_eq!(ids(&view), vec![2, 1, 3]);
        view.toggle_sort(SortKey::AiScore);
        assert_eq!(view.sort().direction, SortDirection::Asc);
        assert_eq!(ids(&view), vec![3, 1, 2]);
    }

    #[test]
    fn test_empty_states() {
        let mut view = DashboardViewModel::new();
        assert_eq!(view.view(), ApplicantView::NoApplicants);

        view.replace_applicants(vec![applicant(1, 7.0)]);
        view.set_name_query("nobody");
        assert_eq!(view.view(), ApplicantView::NoMatches);

        view.reset_criteria();
        assert!(matches!(view.view(), ApplicantView::Rows(rows) if rows.len() == 1));
    }

    #[test]
    fn test_toggle_favorite_local() {
        let mut view = DashboardViewModel::new();
        view.replace_applicants(vec![applicant(1, 7.0), applicant(2, 6.0)]);
        assert_eq!(view.toggle_favorite_local(2), Some(true));
        assert_eq!(view.toggle_favorite_local(2), Some(false));
        assert_eq!(view.toggle_favorite_local(9), None);
        assert!(view.applicants().iter().all(|a| !a.is_favorite));
    }

    #[test]
    fn test_clear() {
        let mut view = DashboardViewModel::new();
        view.replace_applicants(vec![applicant(1, 7.0)]);
        view.set_skills_query("rust");
        view.clear();
        assert!(view.applicants().is_empty());
        assert!(view.criteria().is_empty());
        assert_eq!(view.view(), ApplicantView::NoApplicants);
    }
}
