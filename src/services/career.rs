//! Career analysis service — LLM prompts and free-text response parsing.
//!
//! DESIGN
//! ======
//! Each operation sends one single-turn prompt and parses the provider's
//! free-text reply into a typed result. Parsing is tolerant: replies that
//! drift from the requested format degrade to fewer entries or a zero score
//! rather than an error, since the provider output is not contractual.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm::LlmChat;
use crate::llm::types::LlmError;

const NAME_MAX_TOKENS: u32 = 100;
const ROLE_MAX_TOKENS: u32 = 100;
const SCORE_MAX_TOKENS: u32 = 100;
const SKILLS_MAX_TOKENS: u32 = 1000;
const COMPARE_MAX_TOKENS: u32 = 1000;
const ANALYSIS_MAX_TOKENS: u32 = 1500;
const TEAM_MAX_TOKENS: u32 = 2000;

const ROLE_TITLE_MAX_WORDS: usize = 4;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CareerError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("invalid or overly long role title: {0:?}")]
    InvalidRoleTitle(String),
}

/// One recommended skill with its rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub title: String,
    pub reason: String,
}

/// Sectioned resume analysis parsed from a free-text reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub skills_recommendation: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub overall_analysis: String,
}

/// Company context for the aggregate team report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProfile {
    pub company_name: String,
    pub team_size: String,
    pub funding_stage: String,
    pub industry_focus: String,
    pub objectives: String,
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Extract the candidate's full name from resume text.
pub async fn employee_name(llm: &Arc<dyn LlmChat>, resume: &str) -> Result<String, CareerError> {
    let prompt = format!(
        "Extract and return only the candidate's full name from the following resume. \
         Do not include any additional text, explanations, or formatting. Only return \
         the name. Resume: {resume}"
    );
    let completion = llm.complete(NAME_MAX_TOKENS, 0.3, &prompt).await?;
    Ok(completion.text.trim().to_owned())
}

/// Suggest the next logical higher role for the resume's owner.
///
/// # Errors
///
/// Returns [`CareerError::InvalidRoleTitle`] when the provider replies with
/// an empty title or one longer than four words.
pub async fn next_role(llm: &Arc<dyn LlmChat>, resume: &str) -> Result<String, CareerError> {
    let prompt = format!(
        "Based on the person's current role and experience as described in their resume \
         below, return ONLY the next logical higher role with a maximum of {ROLE_TITLE_MAX_WORDS} \
         words. Do not include any additional text, explanations, or formatting. Only \
         return the role title.\n\nHere is their current resume:\n\n{resume}"
    );
    let completion = llm.complete(ROLE_MAX_TOKENS, 0.3, &prompt).await?;
    let title = completion.text.trim().to_owned();
    if title.is_empty() || title.split_whitespace().count() > ROLE_TITLE_MAX_WORDS {
        return Err(CareerError::InvalidRoleTitle(title));
    }
    Ok(title)
}

/// Score how well a resume matches a role's required skills, 0–100.
pub async fn compatibility(
    llm: &Arc<dyn LlmChat>,
    resume: &str,
    role_title: &str,
    skills_required: &[String],
) -> Result<u8, CareerError> {
    let mut skills = skills_required.to_vec();
    skills.sort();
    let prompt = format!(
        "You are an expert evaluator analyzing a candidate's resume against the role \
         \"{role_title}\". Count only exact or directly related matches for the required \
         skills. Assign a compatibility score between 1 and 100 where 90-100 means all \
         required skills are present and 1-29 means very few or none are. Output only \
         the compatibility score as a single number without any additional text.\n\n\
         Role Required Skills: {skills}.\n\nResume: {resume}",
        skills = skills.join(", "),
    );
    let completion = llm.complete(SCORE_MAX_TOKENS, 0.0, &prompt).await?;
    let score = parse_compatibility_score(&completion.text);
    info!(role = role_title, score, "career: compatibility scored");
    Ok(score)
}

/// Recommend three skills the candidate should learn next.
pub async fn skills_to_learn(llm: &Arc<dyn LlmChat>, resume: &str) -> Result<Vec<SkillEntry>, CareerError> {
    let prompt = format!(
        "I want to upskill to get a job in the tech industry. Identify 3 distinct skills \
         the candidate does not already know and would benefit from learning. Return each \
         skill as a single-line title, then a line of dashes, then a reason roughly 3 \
         sentences long. Separate each skill entry with a blank line. Here is the current \
         skillset:\n\n{resume}"
    );
    let completion = llm.complete(SKILLS_MAX_TOKENS, 0.5, &prompt).await?;
    Ok(parse_skill_entries(&completion.text))
}

/// Full resume critique: recommended skills, weaknesses, suggestions, summary.
pub async fn resume_analysis(llm: &Arc<dyn LlmChat>, resume: &str) -> Result<ResumeAnalysis, CareerError> {
    let prompt = format!(
        "Analyze the resume below. Reply with these exact section headers, each followed \
         by bullet lines: \"Skills Recommendation:\", \"Weaknesses:\", \
         \"Improvement Suggestions:\", then an \"Overall Analysis:\" header followed by \
         a short summary paragraph.\n\nResume:\n\n{resume}"
    );
    let completion = llm.complete(ANALYSIS_MAX_TOKENS, 0.5, &prompt).await?;
    Ok(parse_resume_analysis(&completion.text))
}

/// Compare two certifications on market demand, pay, and job titles. The
/// reply is a markdown-ish table consumed verbatim by the UI.
pub async fn compare_certifications(
    llm: &Arc<dyn LlmChat>,
    first: &str,
    second: &str,
) -> Result<String, CareerError> {
    let prompt = format!(
        "Compare the following two certifications in a table format. Include the \
         following:\n\
         - Certification Demand (Low, Medium, High)\n\
         - Pay Range\n\
         - Top 3 Job Titles\n\n\
         Certification 1: {first}\n\
         Certification 2: {second}"
    );
    let completion = llm.complete(COMPARE_MAX_TOKENS, 0.5, &prompt).await?;
    Ok(strip_break_tags(completion.text.trim()))
}

/// Aggregate skills-gap report across a whole team's resumes.
pub async fn team_analysis(
    llm: &Arc<dyn LlmChat>,
    profile: &TeamProfile,
    resumes: &[String],
) -> Result<String, CareerError> {
    let prompt = format!(
        "Analyze the following company data and provide a team analysis report \
         highlighting collective strengths and skills gaps.\n\
         Company Name: {company}\n\
         Team Size: {team_size}\n\
         Funding Stage: {funding}\n\
         Industry Focus: {industry}\n\
         Objectives: {objectives}\n\
         Resumes: {resumes}",
        company = profile.company_name,
        team_size = profile.team_size,
        funding = profile.funding_stage,
        industry = profile.industry_focus,
        objectives = profile.objectives,
        resumes = resumes.join("\n\n"),
    );
    let completion = llm.complete(TEAM_MAX_TOKENS, 0.5, &prompt).await?;
    Ok(completion.text.trim().to_owned())
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

/// Pull the first integer out of a scoring reply and clamp it to 0..=100.
/// Replies with no digits score 0.
pub(crate) fn parse_compatibility_score(reply: &str) -> u8 {
    let digits: String = reply
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    let score = digits.parse::<u32>().unwrap_or(0).min(100);
    #[allow(clippy::cast_possible_truncation)]
    {
        score as u8
    }
}

/// Split a skills reply into entries: blocks separated by blank lines, each
/// block split into title and reason by a line of two or more dashes. Blocks
/// without a dash separator are dropped.
pub(crate) fn parse_skill_entries(reply: &str) -> Vec<SkillEntry> {
    let mut entries = Vec::new();

    for block in split_blocks(reply) {
        let Some(sep) = block.iter().position(|l| is_dash_line(l)) else {
            continue;
        };
        let title = strip_numbering(block[..sep].join(" ").trim());
        let reason = block[sep + 1..].join("\n").trim().to_owned();
        if !title.is_empty() && !reason.is_empty() {
            entries.push(SkillEntry { title, reason });
        }
    }

    entries
}

/// Parse a sectioned analysis reply. Text outside any known header (including
/// a fully headerless reply) falls into the overall analysis.
pub(crate) fn parse_resume_analysis(reply: &str) -> ResumeAnalysis {
    #[derive(Clone, Copy, PartialEq)]
    enum Section {
        Skills,
        Weaknesses,
        Improvements,
        Overall,
    }

    let mut analysis = ResumeAnalysis::default();
    let mut section = Section::Overall;
    let mut overall_lines: Vec<String> = Vec::new();

    for line in reply.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with("Skills Recommendation:") {
            section = Section::Skills;
            continue;
        }
        if line.starts_with("Weaknesses:") {
            section = Section::Weaknesses;
            continue;
        }
        if line.starts_with("Improvement Suggestions:") {
            section = Section::Improvements;
            continue;
        }
        if line.starts_with("Overall Analysis:") {
            section = Section::Overall;
            continue;
        }

        let entry = strip_numbering(line.trim_start_matches("- ").trim());
        match section {
            Section::Skills => analysis.skills_recommendation.push(entry),
            Section::Weaknesses => analysis.weaknesses.push(entry),
            Section::Improvements => analysis.improvement_suggestions.push(entry),
            Section::Overall => overall_lines.push(line.to_owned()),
        }
    }

    analysis.overall_analysis = overall_lines.join("\n");
    analysis
}

/// Group a reply's lines into blocks separated by blank lines.
fn split_blocks(reply: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in reply.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn is_dash_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.chars().all(|c| c == '-')
}

/// Some providers emit HTML line breaks inside table cells; flatten them to
/// spaces so the comparison stays a plain-text table.
fn strip_break_tags(text: &str) -> String {
    let mut out = text.to_owned();
    for tag in ["<br>", "<br/>", "<br />", "<BR>", "<BR/>", "<BR />"] {
        out = out.replace(tag, " ");
    }
    out
}

/// Strip a leading "1. " style list number.
fn strip_numbering(text: &str) -> String {
    let trimmed = text.trim();
    let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() < trimmed.len() {
        if let Some(after_dot) = rest.strip_prefix('.') {
            return after_dot.trim_start().to_owned();
        }
    }
    trimmed.to_owned()
}

#[cfg(test)]
#[path = "career_test.rs"]
mod tests;
