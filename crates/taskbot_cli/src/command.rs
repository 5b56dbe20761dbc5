//! Chat command parsing.
//!
//! # Invariants
//! - Parameterless commands match only without trailing arguments.
//! - Parsing never touches storage; argument validation happens in handlers.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^/([a-z_]+)(?:\s+(.*))?$").expect("valid command regex"));
static EDIT_ARGS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(\S+)\s+(.*)$").expect("valid edit args regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    /// Raw description, possibly blank.
    Add(String),
    List,
    /// Raw task id argument.
    Done(String),
    Delete(String),
    /// Raw `<id> <description>` argument string.
    Edit(String),
    EnableReminders,
    DisableReminders,
    Unknown,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(captures) = COMMAND_RE.captures(line.trim()) else {
            return Self::Unknown;
        };
        let name = captures.get(1).map_or("", |m| m.as_str());
        let args = captures.get(2).map_or("", |m| m.as_str().trim()).to_string();

        match (name, args.is_empty()) {
            ("start", true) => Self::Start,
            ("list", true) => Self::List,
            ("enable_reminders", true) => Self::EnableReminders,
            ("disable_reminders", true) => Self::DisableReminders,
            ("add", _) => Self::Add(args),
            ("done", _) => Self::Done(args),
            ("delete", _) => Self::Delete(args),
            ("edit", _) => Self::Edit(args),
            _ => Self::Unknown,
        }
    }
}

/// Splits `/edit` arguments into raw id and raw description.
pub fn split_edit_args(args: &str) -> Option<(&str, &str)> {
    let captures = EDIT_ARGS_RE.captures(args)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}
