//! Interactive commands for the terminal driver

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add an object constraint
    Add { label: String, count: u32 },
    /// Remove an object constraint
    Remove { label: String },
    /// Show the constraint widgets
    List,
    /// Set a form field; an empty value clears it
    SetField { field: FormField, value: String },
    /// Show or hide advanced filters
    ToggleFilters,
    /// Submit the form
    Search,
    /// Open the preview for result `n` (1-based)
    Open { position: usize },
    /// Report a failed thumbnail load for result `n` (1-based)
    ThumbnailFailed { position: usize },
    /// Press the modal close button
    Close,
    /// Click the overlay outside the modal content
    ClickOverlay,
    /// Click inside the modal content
    ClickContent,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Query,
    Text,
    Metadata,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
Commands:
  query <text>        set the main query
  text <text>         set the on-screen text filter
  metadata <text>     set the metadata filter
  add <label> <n>     require at least n instances of an object
  remove <label>      drop an object constraint
  list                show object constraints
  filters             toggle advanced filters
  search              submit the search
  open <n>            preview result n
  thumbfail <n>       simulate a failed thumbnail for result n
  close               close the preview
  overlay             click outside the preview
  content             click inside the preview
  status              show state
  quit                exit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "add" => {
                // Labels may contain spaces ("traffic light"); the count is the last word
                let (label, count) = rest
                    .rsplit_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("add <label> <count>"))?;
                let count = count
                    .parse()
                    .map_err(|_| CommandError::InvalidNumber(count.to_string()))?;
                Ok(Command::Add {
                    label: label.trim().to_string(),
                    count,
                })
            }
            "remove" | "rm" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("remove <label>"));
                }
                Ok(Command::Remove {
                    label: rest.to_string(),
                })
            }
            "list" | "ls" => Ok(Command::List),
            "query" | "q" => Ok(set_field(FormField::Query, rest)),
            "text" => Ok(set_field(FormField::Text, rest)),
            "metadata" | "meta" => Ok(set_field(FormField::Metadata, rest)),
            "filters" => Ok(Command::ToggleFilters),
            "search" | "s" => Ok(Command::Search),
            "open" => Ok(Command::Open {
                position: parse_position(rest, "open <n>")?,
            }),
            "thumbfail" => Ok(Command::ThumbnailFailed {
                position: parse_position(rest, "thumbfail <n>")?,
            }),
            "close" => Ok(Command::Close),
            "overlay" => Ok(Command::ClickOverlay),
            "content" => Ok(Command::ClickContent),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn set_field(field: FormField, value: &str) -> Command {
    Command::SetField {
        field,
        value: value.to_string(),
    }
}

/// 1-based position as typed, converted to a 0-based index
fn parse_position(arg: &str, usage: &'static str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidNumber(arg.to_string())),
    }
}
