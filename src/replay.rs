//! Event scripts for driving a control without a UI
//!
//! One step per line. A `#` at the start of a line or after whitespace
//! starts a comment:
//!
//! ```text
//! # comment
//! type an        # input text changed (rest of line, may be empty)
//! focus          # input gained focus
//! choose 1       # dropdown row chosen
//! remove 1       # chip removed
//! backspace      # backspace on an empty input
//! ```

use crate::SearchSelectError;
use crate::controller::SearchSelect;
use crate::record::Identifier;
use crate::source::DataSource;
use std::fmt;
use std::str::FromStr;

/// One host event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Type(String),
    Focus,
    Choose(Identifier),
    Remove(Identifier),
    Backspace,
}

impl Step {
    /// Deliver the event to a control
    ///
    /// # Errors
    ///
    /// Returns `SearchSelectError` if the control rejects the event.
    pub fn apply<S: DataSource>(&self, control: &mut SearchSelect<S>) -> Result<(), SearchSelectError> {
        match self {
            Self::Type(term) => control.on_search_term_changed(term.as_str()),
            Self::Focus => control.on_focus_gained(),
            Self::Choose(id) => control.on_option_chosen(id.clone()),
            Self::Remove(id) => control.on_chip_removed(id.clone()),
            Self::Backspace => control.on_backspace_at_empty_term(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(term) => write!(f, "type {term}"),
            Self::Focus => f.write_str("focus"),
            Self::Choose(id) => write!(f, "choose {id}"),
            Self::Remove(id) => write!(f, "remove {id}"),
            Self::Backspace => f.write_str("backspace"),
        }
    }
}

fn required_id(command: &str, rest: &str) -> Result<Identifier, SearchSelectError> {
    if rest.trim().is_empty() {
        return Err(SearchSelectError::InvalidInput(format!(
            "'{command}' needs an identifier"
        )));
    }
    Ok(Identifier::parse(rest))
}

impl FromStr for Step {
    type Err = SearchSelectError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command.trim_end() {
            "type" => Ok(Self::Type(rest.to_string())),
            "focus" => Ok(Self::Focus),
            "choose" => Ok(Self::Choose(required_id(command, rest)?)),
            "remove" => Ok(Self::Remove(required_id(command, rest)?)),
            "backspace" => Ok(Self::Backspace),
            other => Err(SearchSelectError::InvalidInput(format!(
                "unknown step '{other}'"
            ))),
        }
    }
}

/// Cut a trailing `#` comment; a `#` inside a word is kept
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    line.match_indices('#')
        .find(|(index, _)| *index == 0 || bytes[index - 1].is_ascii_whitespace())
        .map_or(line, |(index, _)| line[..index].trim_end())
}

/// Parse a script, skipping blank lines and `#` comments
///
/// # Errors
///
/// Returns `SearchSelectError::InvalidInput` naming the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<Step>, SearchSelectError> {
    text.lines()
        .enumerate()
        .map(|(number, line)| (number, strip_comment(line)))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            line.parse::<Step>().map_err(|e| {
                SearchSelectError::InvalidInput(format!("line {}: {e}", number + 1))
            })
        })
        .collect()
}
