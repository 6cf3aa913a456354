// src/cli.rs
use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::app_log;
use crate::core::ServiceClient;
use crate::dashboard::{
    ApplicantView, DashboardController, FilterCriteria, ScoreBand, SortConfig, SortDirection,
    SortKey,
};
use crate::environment::EnvironmentConfig;
use crate::interview::{GenerationOutcome, InterviewState};
use crate::links::ShareLinks;
use crate::routes::{DashboardRef, Route};
use crate::session::{AppState, DashboardSession, Notice};
use crate::types::{Application, ApplicationId, Interview, JobPost, Language};
use crate::validation::{ApplicationForm, PostForm, ResumeFile, SkillSet};

#[derive(Parser)]
#[command(name = "hireflow")]
#[command(about = "Publish job posts, apply to them and review applicants")]
pub struct HireflowCli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Publish a job post and print its share and dashboard links
    Post {
        /// AI provider key used to score applicants
        #[arg(long, env = "HIREFLOW_AI_TOKEN")]
        token: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Comma-separated list of required skills
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        min_experience: i64,
    },
    /// Show a public job post
    Show { share: String },
    /// Apply to a job post with a resume
    Apply {
        share: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        resume: PathBuf,
    },
    /// List applicants of a dashboard
    Dashboard {
        #[command(flatten)]
        target: DashboardArgs,
        /// Filter by applicant name
        #[arg(long, default_value = "")]
        name: String,
        /// Comma-separated skills; any match passes
        #[arg(long, default_value = "")]
        skills: String,
        #[arg(long, default_value_t = 0.0)]
        min_experience: f64,
        /// skills-match, ai-score or experience
        #[arg(long, default_value = "none")]
        sort: SortKey,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
    },
    /// Toggle the favourite flag of an applicant
    Favorite {
        #[command(flatten)]
        target: DashboardArgs,
        applicant: ApplicationId,
    },
    /// Delete one application
    DeleteApplication {
        #[command(flatten)]
        target: DashboardArgs,
        applicant: ApplicationId,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Delete the job post and all its applications
    DeletePost {
        #[command(flatten)]
        target: DashboardArgs,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show or generate the interview questions of an applicant
    Interview {
        #[command(flatten)]
        target: DashboardArgs,
        applicant: ApplicationId,
        /// fr, en or es
        #[arg(long)]
        lang: Option<Language>,
        /// Generate new questions even if some exist
        #[arg(long)]
        regenerate: bool,
    },
    /// Print the links of a job post
    Links { share: String },
    /// Resolve an app path or URL to a route
    Route { path: String },
}

#[derive(Args, Clone)]
pub struct DashboardArgs {
    /// Dashboard id or dashboard URL
    pub dashboard: DashboardRef,
    /// Access token (may also come from the dashboard URL)
    #[arg(long, env = "HIREFLOW_ACCESS_TOKEN")]
    pub token: Option<String>,
}

impl DashboardArgs {
    fn session(self) -> Result<DashboardSession> {
        let token = self
            .token
            .or(self.dashboard.access_token)
            .ok_or_else(|| anyhow!("Access token required: pass --token or a dashboard URL"))?;
        Ok(DashboardSession::new(self.dashboard.dashboard_id, token))
    }
}

pub async fn handle_command(
    command: Command,
    config: &EnvironmentConfig,
    client: ServiceClient,
) -> Result<()> {
    match command {
        Command::Post {
            token,
            title,
            description,
            skills,
            city,
            min_experience,
        } => {
            let mut state = AppState::new();
            let skills = match SkillSet::parse_list(&skills) {
                Ok(skills) => skills,
                Err(e) => {
                    state.report_error(e.to_string());
                    return flush_notice(&mut state);
                }
            };
            let form = PostForm {
                token,
                title,
                description,
                skills,
                city,
                min_experience,
            };
            let post = match form.validate() {
                Ok(post) => post,
                Err(errors) => {
                    state.report_validation(&errors);
                    return flush_notice(&mut state);
                }
            };

            let create = client.create_post();
            match create.create(&post).await {
                Some(created) => {
                    let links = ShareLinks::from_created(&config.app_url, &created);
                    state.report_success("Job post published");
                    flush_notice(&mut state)?;
                    print_links(&links);
                    Ok(())
                }
                None => {
                    state.report_request_error(create.snapshot().error, "Failed to create job post");
                    flush_notice(&mut state)
                }
            }
        }

        Command::Show { share } => {
            let post = fetch_post(&client, &share).await?;
            print_post(&post);
            Ok(())
        }

        Command::Apply {
            share,
            name,
            email,
            phone,
            resume,
        } => {
            let mut state = AppState::new();
            let post = fetch_post(&client, &share).await?;
            let resume = ResumeFile::from_path(&resume).await?;
            if let Err(e) = resume.validate() {
                state.report_error(e.to_string());
                return flush_notice(&mut state);
            }

            let form = ApplicationForm {
                name,
                email,
                phone,
                resume: Some(resume),
                post_id: post.id,
            };
            let application = match form.validate() {
                Ok(application) => application,
                Err(errors) => {
                    state.report_validation(&errors);
                    return flush_notice(&mut state);
                }
            };

            let submit = client.submit_application();
            if submit.submit(&application).await.is_some() {
                state.report_success(format!("Application sent for \"{}\"", post.title));
            } else {
                state.report_request_error(submit.snapshot().error, "Failed to submit application");
            }
            flush_notice(&mut state)
        }

        Command::Dashboard {
            target,
            name,
            skills,
            min_experience,
            sort,
            asc,
        } => {
            let mut controller = DashboardController::new(client.clone(), target.session()?);
            if !controller.ensure_loaded().await {
                return flush_notice(controller.state_mut());
            }

            let direction = if asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            };
            controller.view_mut().set_criteria(FilterCriteria {
                name_query: name,
                skills_query: skills,
                min_experience,
            });
            controller.view_mut().set_sort(SortConfig::new(sort, direction));
            print_dashboard(&controller, &client);
            Ok(())
        }

        Command::Favorite { target, applicant } => {
            let mut controller = load_controller(client, target).await?;
            if controller.toggle_favorite(applicant).await {
                let favourite = controller
                    .view()
                    .find(applicant)
                    .map(|a| a.is_favorite)
                    .unwrap_or_default();
                println!(
                    "Applicant {} {}",
                    applicant,
                    if favourite {
                        "marked as favourite"
                    } else {
                        "removed from favourites"
                    }
                );
            }
            flush_notice(controller.state_mut())
        }

        Command::DeleteApplication {
            target,
            applicant,
            yes,
        } => {
            let mut controller = load_controller(client, target).await?;
            if !controller.request_delete(applicant) {
                return flush_notice(controller.state_mut());
            }
            if !yes {
                controller.cancel();
                bail!(
                    "Deleting applicant {} cannot be undone. Re-run with --yes to confirm",
                    applicant
                );
            }
            controller.confirm().await;
            flush_notice(controller.state_mut())
        }

        Command::DeletePost { target, yes } => {
            let mut controller = DashboardController::new(client, target.session()?);
            if !yes {
                bail!("Deleting the job post removes every application. Re-run with --yes to confirm");
            }
            controller.request_post_deletion();
            controller.confirm().await;
            flush_notice(controller.state_mut())
        }

        Command::Interview {
            target,
            applicant,
            lang,
            regenerate,
        } => {
            let mut controller = load_controller(client, target).await?;
            if !controller.open_interview(applicant) {
                return flush_notice(controller.state_mut());
            }

            let showing = matches!(controller.interview_state(), InterviewState::ResponseView { .. });
            if showing && regenerate {
                controller.regenerate_interview();
            }
            if let InterviewState::ResponseView { interview, .. } = controller.interview_state() {
                print_interview(interview);
                return Ok(());
            }

            let language = lang.ok_or_else(|| {
                anyhow!(
                    "No interview yet. Pick a language with --lang ({})",
                    Language::ALL
                        .iter()
                        .map(|l| l.code())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })?;
            println!("Generating interview in {}...", language.label());
            let outcome = controller.generate_interview(language).await;
            if outcome == Some(GenerationOutcome::Shown) {
                if let InterviewState::ResponseView { interview, .. } = controller.interview_state() {
                    print_interview(interview);
                }
            }
            flush_notice(controller.state_mut())
        }

        Command::Links { share } => {
            let post = fetch_post(&client, &share).await?;
            match ShareLinks::from_post(&config.app_url, &post) {
                Some(links) => print_links(&links),
                None => println!(
                    "Apply link: {}",
                    Route::Apply { share: share.clone() }.url(&config.app_url)
                ),
            }
            Ok(())
        }

        Command::Route { path } => {
            let route = Route::parse(&path)?;
            println!("{:?}", route);
            println!("{}", route.url(&config.app_url));
            Ok(())
        }
    }
}

async fn load_controller(client: ServiceClient, target: DashboardArgs) -> Result<DashboardController> {
    let mut controller = DashboardController::new(client, target.session()?);
    if !controller.ensure_loaded().await {
        flush_notice(controller.state_mut())?;
    }
    Ok(controller)
}

async fn fetch_post(client: &ServiceClient, share: &str) -> Result<JobPost> {
    let request = client.post_by_share(share);
    match request.get().await {
        Some(post) => Ok(post),
        None => {
            let mut state = AppState::new();
            state.report_request_error(request.snapshot().error, "Job post not found");
            flush_notice(&mut state)?;
            Err(anyhow!("Job post not found"))
        }
    }
}

/// Print a success notice, or turn an error notice into the command's error.
fn flush_notice(state: &mut AppState) -> Result<()> {
    match state.dismiss() {
        Some(Notice::Error(message)) => Err(anyhow!(message)),
        Some(notice) => {
            println!("{}", notice);
            Ok(())
        }
        None => Ok(()),
    }
}

fn print_links(links: &ShareLinks) {
    println!("Apply link:     {}", links.apply_link);
    println!("Dashboard link: {}", links.dashboard_link);
    if let Some(token) = &links.access_token {
        println!("Access token:   {}", token);
        println!("Keep the access token safe: it is required to open the dashboard.");
    }
}

fn print_post(post: &JobPost) {
    println!("{}", post.title);
    if let Some(city) = post.city.as_deref().filter(|c| !c.is_empty()) {
        println!("City: {}", city);
    }
    if post.min_experience > 0.0 {
        println!("Minimum experience: {} years", post.min_experience);
    }
    if !post.skills.is_empty() {
        println!("Skills: {}", post.skills.join(", "));
    }
    if let Some(date) = post.posted_on() {
        println!("Posted on: {}", date);
    }
    println!();
    println!("{}", post.description);
}

fn print_dashboard(controller: &DashboardController, client: &ServiceClient) {
    let view = controller.view();
    if let Some(post) = view.post() {
        println!("{}", post.title);
    }

    let stats = view.stats();
    println!(
        "Applicants: {}  High AI score: {}  Strong skills match: {}  Favourites: {}",
        stats.total, stats.high_ai_score, stats.strong_skills_match, stats.favourites
    );
    println!();

    match view.view() {
        ApplicantView::NoApplicants => println!("No applications yet."),
        ApplicantView::NoMatches => println!("No applicants match the current filters."),
        ApplicantView::Rows(rows) => {
            println!(
                "{:<6} {:<25} {:<12} {:<14} {:<6} {:<4} {:<9}",
                "ID", "Name", "AI score", "Skills match", "Exp", "Fav", "Interview"
            );
            println!("{}", "-".repeat(82));
            for applicant in rows {
                print_row(applicant);
            }
            app_log!(debug, "Printed {} dashboard rows", view.rows().len());
            for applicant in view.rows() {
                if let Some(path) = &applicant.resume_path {
                    println!("Resume {}: {}", applicant.id, client.resume_url(path));
                }
            }
        }
    }
}

fn print_row(applicant: &Application) {
    let detail = &applicant.detail;
    println!(
        "{:<6} {:<25} {:<12} {:<14} {:<6} {:<4} {:<9}",
        applicant.id,
        truncate(&applicant.name, 25),
        format!(
            "{:.1} ({})",
            detail.ai_score,
            ScoreBand::for_ai_score(detail.ai_score)
        ),
        format!(
            "{:.0}% ({})",
            detail.skills_match * 100.0,
            ScoreBand::for_skills_match(detail.skills_match)
        ),
        detail.experience,
        if applicant.is_favorite { "*" } else { "" },
        if applicant.has_interview() { "yes" } else { "no" },
    );
}

fn print_interview(interview: &Interview) {
    for (i, qa) in interview.questions.iter().enumerate() {
        println!("{}. {}", i + 1, qa.question);
        println!("   {}", qa.answer);
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Ada", 5), "Ada");
        assert_eq!(truncate("Ada Lovelace", 5), "Ada …");
    }

    #[test]
    fn test_parse_dashboard_command() {
        let cli = HireflowCli::try_parse_from([
            "hireflow",
            "dashboard",
            "https://app.example.com/dashboard/d-1?access_token=t",
            "--skills",
            "go, java",
            "--sort",
            "ai-score",
            "--asc",
        ])
        .unwrap();

        match cli.command {
            Command::Dashboard {
                target,
                skills,
                sort,
                asc,
                ..
            } => {
                let session = target.session().unwrap();
                assert_eq!(session.dashboard_id, "d-1");
                assert_eq!(session.access_token, "t");
                assert_eq!(skills, "go, java");
                assert_eq!(sort, SortKey::AiScore);
                assert!(asc);
            }
            _ => panic!("expected dashboard command"),
        }
    }

    #[test]
    fn test_missing_token() {
        let args = DashboardArgs {
            dashboard: "d-1".parse().unwrap(),
            token: None,
        };
        assert!(args.session().is_err());
    }

    #[test]
    fn test_flush_notice() {
        let mut state = AppState::new();
        state.report_error("boom");
        assert_eq!(flush_notice(&mut state).unwrap_err().to_string(), "boom");
        assert!(flush_notice(&mut state).is_ok());
    }
}
