use std::collections::HashMap;

use crate::error::{Result, TaskError};

pub const FIELD_KEYS: [&str; 4] = ["due", "project", "priority", "notes"];

#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct TaskFields {
    pub title: Option<String>,
    pub project: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && key.chars().all(|c| c.is_ascii_alphabetic()) {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(TaskError::Validation(format!("Unknown key: '{}'", key))),
        _ => Err(TaskError::Validation(format!(
            "Ambiguous key: '{}' matches {:?}",
            key, matches
        ))),
    }
}

// Blank values count as "not given", which is how the edit command leaves
// a field unchanged.
pub fn parse_task_fields(args: &[String]) -> Result<TaskFields> {
    let parsed = parse_args(args);
    let mut fields = TaskFields {
        title: non_blank(parsed.name),
        ..TaskFields::default()
    };

    for (key, value) in parsed.metadata {
        let value = non_blank(value);
        match expand_key(&key, &FIELD_KEYS)?.as_str() {
            "due" => fields.due = value,
            "project" => fields.project = value,
            "priority" => fields.priority = value,
            "notes" => fields.notes = value,
            _ => unreachable!("expand_key only returns FIELD_KEYS"),
        }
    }
    Ok(fields)
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
