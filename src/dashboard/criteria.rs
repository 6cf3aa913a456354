// src/dashboard/criteria.rs
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::types::Application;

/// Client-side filter. Every active dimension must pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the applicant name
    pub name_query: String,
    /// Comma-separated tokens; any applicant skill containing any token passes
    pub skills_query: String,
    /// Years; `<= 0` disables the filter
    pub min_experience: f64,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.name_query.trim().is_empty()
            && self.skill_tokens().is_empty()
            && self.min_experience <= 0.0
    }

    pub fn skill_tokens(&self) -> Vec<String> {
        self.skills_query
            .split(',')
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .collect()
    }

    pub fn matches(&self, applicant: &Application) -> bool {
        self.compile().matches(applicant)
    }

    /// Applicants passing the filter, in input order.
    pub fn apply<'a>(&self, applicants: &'a [Application]) -> Vec<&'a Application> {
        let filter = self.compile();
        applicants.iter().filter(|a| filter.matches(a)).collect()
    }

    pub(crate) fn compile(&self) -> CompiledFilter {
        CompiledFilter {
            name: self.name_query.trim().to_lowercase(),
            skills: self.skill_tokens(),
            min_experience: self.min_experience,
        }
    }
}

/// Criteria with the queries lowercased and tokenised once.
pub(crate) struct CompiledFilter {
    name: String,
    skills: Vec<String>,
    min_experience: f64,
}

impl CompiledFilter {
    pub(crate) fn matches(&self, applicant: &Application) -> bool {
        self.matches_name(applicant) && self.matches_skills(applicant) && self.matches_experience(applicant)
    }

    fn matches_name(&self, applicant: &Application) -> bool {
        self.name.is_empty() || applicant.name.to_lowercase().contains(&self.name)
    }

    fn matches_skills(&self, applicant: &Application) -> bool {
        if self.skills.is_empty() {
            return true;
        }
        applicant.detail.skills.iter().any(|skill| {
            let skill = skill.to_lowercase();
            self.skills.iter().any(|token| skill.contains(token.as_str()))
        })
    }

    fn matches_experience(&self, applicant: &Application) -> bool {
        self.min_experience <= 0.0 || applicant.detail.experience >= self.min_experience
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    None,
    SkillsMatch,
    AiScore,
    Experience,
}

impl SortKey {
    pub fn value(&self, applicant: &Application) -> Option<f64> {
        match self {
            SortKey::None => None,
            SortKey::SkillsMatch => Some(applicant.detail.skills_match),
            SortKey::AiScore => Some(applicant.detail.ai_score),
            SortKey::Experience => Some(applicant.detail.experience),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::None => "none",
            SortKey::SkillsMatch => "skills-match",
            SortKey::AiScore => "ai-score",
            SortKey::Experience => "experience",
        })
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "" | "none" => Ok(SortKey::None),
            "skills-match" | "skills" => Ok(SortKey::SkillsMatch),
            "ai-score" | "score" => Ok(SortKey::AiScore),
            "experience" => Ok(SortKey::Experience),
            other => Err(format!(
                "Unknown sort key: {}. Use skills-match, ai-score or experience",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Column-header click: same key flips direction, another key starts descending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.toggled();
        } else {
            self.key = key;
            self.direction = SortDirection::Desc;
        }
    }

    /// Stable sort: ties keep their incoming order. `SortKey::None` is a no-op.
    pub fn sort(&self, rows: &mut [&Application]) {
        if self.key == SortKey::None {
            return;
        }
        rows.sort_by(|a, b| self.compare(a, b));
    }

    /// Ordering of two applicants under this key and direction.
    pub fn compare(&self, a: &Application, b: &Application) -> Ordering {
        let (a, b) = (
            self.key.value(a).unwrap_or(0.0),
            self.key.value(b).unwrap_or(0.0),
        );
        match self.direction {
            SortDirection::Asc => a.total_cmp(&b),
            SortDirection::Desc => b.total_cmp(&a),
        }
    }

    /// Whether `a` may come before `b` under this ordering.
    pub fn in_order(&self, a: &Application, b: &Application) -> bool {
        let (Some(a), Some(b)) = (self.key.value(a), self.key.value(b)) else {
            return true;
        };
        match self.direction {
            SortDirection::Asc => a.total_cmp(&b) != Ordering::Greater,
            SortDirection::Desc => a.total_cmp(&b) != Ordering::Less,
        }
    }
}
