//! In-session command set.
//!
//! Each input line is split by [`crate::tokenize`] and parsed as a clap
//! multicall command, so the first word picks the command. Names are matched
//! case-insensitively with `_` and `-` treated alike.

pub mod activity;
pub mod help;
pub mod operator;
pub mod review;

use std::io::Write;

use anyhow::Result;
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use colored::Colorize;

use excursion_core::{Registry, RegistryError};
use excursion_renderer::{Operation, RenderError, Renderer};

use crate::tokenize;

// ---------------------------------------------------------------------------
// Command grammar
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(multicall = true, disable_help_subcommand = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Register an operator at a location.
    CreateOperator { name: String, location: String },

    /// Find operators by name or location; `*` lists all.
    SearchOperators {
        #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        keyword: Vec<String>,
    },

    /// Add an activity to an operator.
    CreateActivity {
        name: String,
        activity_type: String,
        operator_id: String,
    },

    /// List every activity of one operator.
    ViewActivities { operator_id: String },

    /// Find activities by name, type, or location; `*` lists all.
    SearchActivities {
        #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        keyword: Vec<String>,
    },

    /// Review options: AUTHOR ANONYMOUS RATING TEXT.
    AddPublicReview(ReviewArgs),

    /// Review options: AUTHOR CONTACT RATING TEXT FOLLOW_UP.
    AddPrivateReview(ReviewArgs),

    /// Review options: AUTHOR RATING TEXT RECOMMENDED.
    AddExpertReview(ReviewArgs),

    /// Show every review of an activity.
    DisplayReviews { activity_id: String },

    /// Endorse a public review.
    EndorseReview { review_id: String },

    /// Record a response to a private review.
    ResolveReview {
        review_id: String,
        #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        response: Vec<String>,
    },

    /// Attach an image name to an expert review.
    UploadReviewImage { review_id: String, image: String },

    /// Best-rated activity of each location.
    DisplayTopActivities,

    /// List the available commands.
    Help,

    /// Leave the session.
    #[command(alias = "quit")]
    Exit,
}

// Target activity plus the raw review options; arity is checked by the
// registry, so any number of options is accepted here.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ReviewArgs {
    pub activity_id: String,
    #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub options: Vec<String>,
}

/// `Create_Operator` → `create-operator`.
pub fn normalize_command_name(word: &str) -> String {
    word.to_lowercase().replace('_', "-")
}

fn is_known_command(name: &str) -> bool {
    ReplLine::command()
        .get_subcommands()
        .any(|sub| sub.get_name() == name || sub.get_all_aliases().any(|alias| alias == name))
}

/// Why a line produced no command.
#[derive(Debug)]
pub enum LineError {
    UnbalancedQuote(tokenize::UnbalancedQuote),
    UnknownCommand(String),
    Usage(clap::Error),
}

impl std::fmt::Display for LineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineError::UnbalancedQuote(err) => write!(f, "Command not read: {err}."),
            LineError::UnknownCommand(name) => {
                write!(f, "Unknown command '{name}'. Type 'help' to list the commands.")
            }
            LineError::Usage(err) => write!(f, "{}", err.to_string().trim_end()),
        }
    }
}

/// Parse one input line. `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, LineError> {
    let mut words = tokenize::split(line).map_err(LineError::UnbalancedQuote)?;
    let Some(first) = words.first_mut() else {
        return Ok(None);
    };
    *first = normalize_command_name(first);
    if !is_known_command(first) {
        return Err(LineError::UnknownCommand(first.clone()));
    }
    ReplLine::try_parse_from(words)
        .map(|parsed| Some(parsed.command))
        .map_err(LineError::Usage)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// One registry plus the renderer that reports on it. Lives for the whole
/// process; nothing is persisted.
pub struct Session {
    registry: Registry,
    renderer: Renderer,
}

impl Session {
    pub fn new(renderer: Renderer) -> Self {
        Session { registry: Registry::new(), renderer }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse and run one line. Input and domain problems are written to
    /// `out`; only rendering and I/O failures are returned.
    pub fn run_line(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow> {
        match parse_line(line) {
            Ok(Some(command)) => self.execute(command, out),
            Ok(None) => Ok(Flow::Continue),
            Err(LineError::Usage(err))
                if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
            {
                writeln!(out, "{}", err.to_string().trim_end())?;
                Ok(Flow::Continue)
            }
            Err(err) => {
                tracing::debug!(line, "line rejected");
                writeln!(out, "{}", err.to_string().red())?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: ReplCommand, out: &mut dyn Write) -> Result<Flow> {
        match command {
            ReplCommand::CreateOperator { name, location } => {
                operator::create(self, &name, &location, out)?
            }
            ReplCommand::SearchOperators { keyword } => {
                operator::search(self, &keyword.join(" "), out)?
            }
            ReplCommand::CreateActivity { name, activity_type, operator_id } => {
                activity::create(self, &name, &activity_type, &operator_id, out)?
            }
            ReplCommand::ViewActivities { operator_id } => activity::view(self, &operator_id, out)?,
            ReplCommand::SearchActivities { keyword } => {
                activity::search(self, &keyword.join(" "), out)?
            }
            ReplCommand::AddPublicReview(args) => {
                review::add(self, review::Submission::Public, &args, out)?
            }
            ReplCommand::AddPrivateReview(args) => {
                review::add(self, review::Submission::Private, &args, out)?
            }
            ReplCommand::AddExpertReview(args) => {
                review::add(self, review::Submission::Expert, &args, out)?
            }
            ReplCommand::DisplayReviews { activity_id } => review::display(self, &activity_id, out)?,
            ReplCommand::EndorseReview { review_id } => review::endorse(self, &review_id, out)?,
            ReplCommand::ResolveReview { review_id, response } => {
                review::resolve(self, &review_id, &response.join(" "), out)?
            }
            ReplCommand::UploadReviewImage { review_id, image } => {
                review::upload_image(self, &review_id, &image, out)?
            }
            ReplCommand::DisplayTopActivities => activity::top(self, out)?,
            ReplCommand::Help => help::print(out)?,
            ReplCommand::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }
}

/// Write the success text, or the operation's failure message.
fn report<T>(
    renderer: &Renderer,
    operation: Operation,
    outcome: Result<T, RegistryError>,
    success: impl FnOnce(T) -> Result<String, RenderError>,
    out: &mut dyn Write,
) -> Result<()> {
    match outcome {
        Ok(value) => writeln!(out, "{}", success(value)?)?,
        Err(err) => {
            tracing::debug!(?operation, error = %err, "operation rejected");
            let text = renderer.failure(operation, &err)?;
            if matches!(err, RegistryError::NoMatches { .. }) {
                writeln!(out, "{text}")?;
            } else {
                writeln!(out, "{}", text.red())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ReplCommand {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn command_names_ignore_case_and_underscores() {
        let expected = ReplCommand::ViewActivities { operator_id: "AT-AKL-001".into() };
        assert_eq!(parse("view-activities AT-AKL-001"), expected);
        assert_eq!(parse("VIEW_ACTIVITIES AT-AKL-001"), expected);
    }

    #[test]
    fn review_options_accept_negative_ratings() {
        let command = parse(r#"add-public-review AT-AKL-001-001 Ana n -3 "So so""#);
        assert_eq!(
            command,
            ReplCommand::AddPublicReview(ReviewArgs {
                activity_id: "AT-AKL-001-001".into(),
                options: vec!["Ana".into(), "n".into(), "-3".into(), "So so".into()],
            })
        );
    }

    #[test]
    fn review_options_may_be_short() {
        let command = parse("add-expert-review AT-AKL-001-001 Lee");
        let ReplCommand::AddExpertReview(args) = command else {
            panic!("expected add-expert-review, got {command:?}");
        };
        assert_eq!(args.options, ["Lee"]);
    }

    #[test]
    fn keywords_are_optional_and_joined_later() {
        assert_eq!(parse("search-operators"), ReplCommand::SearchOperators { keyword: vec![] });
        assert_eq!(
            parse("search-activities bungee jump"),
            ReplCommand::SearchActivities { keyword: vec!["bungee".into(), "jump".into()] }
        );
    }

    #[test]
    fn exit_and_quit() {
        assert_eq!(parse("exit"), ReplCommand::Exit);
        assert_eq!(parse("QUIT"), ReplCommand::Exit);
    }

    #[test]
    fn blank_line_is_not_a_command() {
        assert!(parse_line("   ").unwrap().is_none());
    }

    #[test]
    fn unknown_command_is_named() {
        let err = parse_line("fly-away now").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown command 'fly-away'. Type 'help' to list the commands."
        );
    }

    #[test]
    fn missing_argument_is_a_usage_error() {
        assert!(matches!(parse_line("create-operator Solo"), Err(LineError::Usage(_))));
    }

    #[test]
    fn every_subcommand_is_known() {
        for name in ["create-operator", "display-top-activities", "upload-review-image", "help"] {
            assert!(is_known_command(name), "{name}");
        }
    }
}
