// src/dashboard/stats.rs
use serde::Serialize;
use std::fmt;

use crate::types::Application;

/// AI score above which an applicant counts as a high scorer.
pub const HIGH_AI_SCORE: f64 = 7.5;
/// Skills match above which an applicant counts as a strong match.
pub const STRONG_SKILLS_MATCH: f64 = 0.6;

/// Summary counters shown above the applicant table. Computed over the whole
/// applicant list, never over the filtered rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub high_ai_score: usize,
    pub strong_skills_match: usize,
    pub favourites: usize,
    pub interviewed: usize,
}

impl DashboardStats {
    pub fn compute(applicants: &[Application]) -> Self {
        applicants.iter().fold(Self::default(), |mut stats, a| {
            stats.total += 1;
            if a.detail.ai_score > HIGH_AI_SCORE {
                stats.high_ai_score += 1;
            }
            if a.detail.skills_match > STRONG_SKILLS_MATCH {
                stats.strong_skills_match += 1;
            }
            if a.is_favorite {
                stats.favourites += 1;
            }
            if a.has_interview() {
                stats.interviewed += 1;
            }
            stats
        })
    }
}

/// Colour band for score badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn for_ai_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreBand::High
        } else if score >= 6.0 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    pub fn for_skills_match(ratio: f64) -> Self {
        if ratio >= 0.7 {
            ScoreBand::High
        } else if ratio >= 0.5 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreBand::High => "high",
            ScoreBand::Medium => "medium",
            ScoreBand::Low => "low",
        })
    }
}
