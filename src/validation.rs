// src/validation.rs
//! Form checks that run before any network call.

use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

use crate::core::transport::{FilePart, MultipartForm};
use crate::types::{NewPost, PostId};

pub const MAX_RESUME_BYTES: u64 = 2 * 1024 * 1024;
pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
pub const MAX_SKILLS: usize = 20;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Resume,
    Token,
    Title,
    Description,
    Skills,
    MinExperience,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Name => "Full name",
            Field::Email => "Email",
            Field::Phone => "Phone number",
            Field::Resume => "Resume",
            Field::Token => "API key",
            Field::Title => "Job title",
            Field::Description => "Job description",
            Field::Skills => "Skills",
            Field::MinExperience => "Minimum experience",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(Field),

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter a valid phone number (numbers only, 7 to 15 digits).")]
    InvalidPhone,

    #[error("File size must be less than {}MB", MAX_RESUME_BYTES / (1024 * 1024))]
    ResumeTooLarge { size: u64 },

    #[error("Resume file is empty")]
    EmptyResume,

    #[error("Unsupported file type: {0}. Accepted formats: .pdf, .doc, .docx")]
    ResumeType(String),

    #[error("Skill cannot be empty")]
    EmptySkill,

    #[error("This skill has already been added: {0}")]
    DuplicateSkill(String),

    #[error("Maximum {} skills allowed", MAX_SKILLS)]
    TooManySkills,

    #[error("Minimum experience cannot be negative")]
    NegativeExperience,
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            ValidationError::Required(field) => *field,
            ValidationError::InvalidEmail => Field::Email,
            ValidationError::InvalidPhone => Field::Phone,
            ValidationError::ResumeTooLarge { .. }
            | ValidationError::EmptyResume
            | ValidationError::ResumeType(_) => Field::Resume,
            ValidationError::EmptySkill
            | ValidationError::DuplicateSkill(_)
            | ValidationError::TooManySkills => Field::Skills,
            ValidationError::NegativeExperience => Field::MinExperience,
        }
    }
}

/// All problems found in one form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field() == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Keep digits only, the way the phone input filters keystrokes.
pub fn sanitize_phone(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.len();
    phone.chars().all(|c| c.is_ascii_digit()) && (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// A resume picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a resume from disk. The size limit is checked on the metadata
    /// before any byte is read.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid resume path: {}", path.display()))?
            .to_string();

        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
        let size = metadata.len();
        if size == 0 {
            return Err(ValidationError::EmptyResume.into());
        }
        if size > MAX_RESUME_BYTES {
            return Err(ValidationError::ResumeTooLarge { size }.into());
        }

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self { file_name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check size and type, the same rules the drop zone applies.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ext = get_file_extension(&self.file_name)
            .ok_or_else(|| ValidationError::ResumeType(self.file_name.clone()))?;
        if !RESUME_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ValidationError::ResumeType(format!(".{}", ext)));
        }
        if self.size() == 0 {
            return Err(ValidationError::EmptyResume);
        }
        if self.size() > MAX_RESUME_BYTES {
            return Err(ValidationError::ResumeTooLarge { size: self.size() });
        }
        Ok(())
    }

    pub fn content_type(&self) -> &'static str {
        match get_file_extension(&self.file_name).as_deref() {
            Some("pdf") => "application/pdf",
            Some("doc") => "application/msword",
            Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            _ => "application/octet-stream",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume: Option<ResumeFile>,
    pub post_id: PostId,
}

/// An application that passed every check. Only `ApplicationForm::validate`
/// builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidApplication {
    name: String,
    email: String,
    phone: String,
    resume: ResumeFile,
    post_id: PostId,
}

impl ApplicationForm {
    pub fn validate(self) -> Result<ValidApplication, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(ValidationError::Required(Field::Name));
        }

        let email = self.email.trim().to_string();
        if !is_valid_email(&email) {
            errors.push(ValidationError::InvalidEmail);
        }

        let phone = sanitize_phone(&self.phone);
        if !is_valid_phone(&phone) {
            errors.push(ValidationError::InvalidPhone);
        }

        match &self.resume {
            None => errors.push(ValidationError::Required(Field::Resume)),
            Some(resume) => {
                if let Err(e) = resume.validate() {
                    errors.push(e);
                }
            }
        }

        match self.resume {
            Some(resume) if errors.is_empty() => Ok(ValidApplication {
                name,
                email,
                phone,
                resume,
                post_id: self.post_id,
            }),
            _ => Err(errors),
        }
    }
}

impl ValidApplication {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn resume(&self) -> &ResumeFile {
        &self.resume
    }

    /// Multipart body for `POST /applies`.
    pub fn to_multipart(&self) -> MultipartForm {
        MultipartForm::new()
            .text("name", self.name.clone())
            .text("email", self.email.clone())
            .text("phone", self.phone.clone())
            .text("post_id", self.post_id.to_string())
            .file(FilePart {
                field: "resume".to_string(),
                file_name: self.resume.file_name.clone(),
                mime: self.resume.content_type().to_string(),
                bytes: self.resume.bytes.clone(),
            })
    }
}

/// Ordered, de-duplicated list of required skills.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    skills: Vec<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from comma-separated input, rejecting the first bad entry.
    pub fn parse_list(input: &str) -> Result<Self, ValidationError> {
        let mut set = Self::new();
        for skill in input.split(',').filter(|s| !s.trim().is_empty()) {
            set.add(skill)?;
        }
        Ok(set)
    }

    pub fn add(&mut self, skill: &str) -> Result<(), ValidationError> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Err(ValidationError::EmptySkill);
        }
        if self.skills.iter().any(|s| s == skill) {
            return Err(ValidationError::DuplicateSkill(skill.to_string()));
        }
        if self.skills.len() >= MAX_SKILLS {
            return Err(ValidationError::TooManySkills);
        }
        self.skills.push(skill.to_string());
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.skills.len()).then(|| self.skills.remove(index))
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.skills
    }

    pub fn into_vec(self) -> Vec<String> {
        self.skills
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub token: String,
    pub title: String,
    pub description: String,
    pub skills: SkillSet,
    pub city: String,
    pub min_experience: i64,
}

impl PostForm {
    pub fn validate(self) -> Result<NewPost, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (value, field) in [
            (&self.token, Field::Token),
            (&self.title, Field::Title),
            (&self.description, Field::Description),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::Required(field));
            }
        }
        if self.min_experience < 0 {
            errors.push(ValidationError::NegativeExperience);
        }

        let min_experience = u32::try_from(self.min_experience.max(0)).unwrap_or(u32::MAX);
        errors.into_result(NewPost {
            token: self.token.trim().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            skills: self.skills.into_vec(),
            city: self.city.trim().to_string(),
            min_experience,
        })
    }
}
