//! Input validation for repository settings.
//!
//! Runs before any external command. Collects every violated rule so
//! the user can fix them all in one pass; an empty result means the
//! configuration is acceptable.

use crate::config::RepositoryConfig;
use regex::Regex;

/// Provider limit on repository name length.
pub const MAX_NAME_LEN: usize = 100;
/// Descriptions are kept short so they display cleanly on the
/// repository page.
pub const MAX_DESCRIPTION_LEN: usize = 160;
/// Provider limit on topic count.
pub const MAX_TOPICS: usize = 20;
/// Provider limit on individual topic length.
pub const MAX_TOPIC_LEN: usize = 35;

const NAME_PATTERN: &str = r"^[A-Za-z0-9._-]+$";
const TOPIC_PATTERN: &str = r"^[a-z0-9][a-z0-9-]*$";

/// Validate a repository configuration.
///
/// Returns one human-readable message per violated rule; empty means
/// valid. Performs no side effects and touches nothing outside the
/// given snapshot.
pub fn validate(config: &RepositoryConfig) -> Vec<String> {
    let mut problems = Vec::new();

    validate_name(&config.name, &mut problems);
    validate_description(&config.description, &mut problems);
    validate_topics(&config.topics, &mut problems);

    problems
}

fn validate_name(name: &str, problems: &mut Vec<String>) {
    if name.is_empty() {
        problems.push("Repository name is required".to_string());
        return;
    }

    if name == "." || name == ".." {
        problems.push("Repository name cannot be '.' or '..'".to_string());
        return;
    }

    if name.len() > MAX_NAME_LEN {
        problems.push(format!(
            "Repository name cannot exceed {} characters",
            MAX_NAME_LEN
        ));
    }

    if !matches_pattern(NAME_PATTERN, name) {
        problems.push(
            "Repository name can only contain alphanumeric characters, \
             hyphens (-), underscores (_), and dots (.)"
                .to_string(),
        );
    }

    if name.starts_with('.') || name.starts_with('-') {
        problems.push("Repository name cannot start with a dot (.) or hyphen (-)".to_string());
    }

    if name.ends_with(".git") {
        problems.push("Repository name cannot end with '.git'".to_string());
    } else if name.ends_with('.') {
        problems.push("Repository name cannot end with a dot (.)".to_string());
    }
}

fn validate_description(description: &str, problems: &mut Vec<String>) {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        problems.push(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        ));
    }

    if description.chars().any(|c| c.is_control()) {
        problems.push(
            "Description contains invalid characters (newlines or control characters)"
                .to_string(),
        );
    }
}

fn validate_topics(topics: &[String], problems: &mut Vec<String>) {
    if topics.len() > MAX_TOPICS {
        problems.push(format!("Maximum {} topics allowed", MAX_TOPICS));
    }

    for topic in topics {
        if topic.len() > MAX_TOPIC_LEN {
            problems.push(format!(
                "Topic '{}' exceeds maximum length of {} characters",
                topic, MAX_TOPIC_LEN
            ));
        }
        if !matches_pattern(TOPIC_PATTERN, topic) {
            problems.push(format!(
                "Topic '{}' contains invalid characters. Topics can only contain \
                 lowercase letters, numbers, and hyphens, and must start with a \
                 letter or number",
                topic
            ));
        }
    }
}

fn matches_pattern(pattern: &str, text: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}
