//! CLI command definitions for the `swright` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod brief_card;
pub mod chat;
pub mod check;
pub mod site;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

/// Talk a website into existence.
#[derive(Parser)]
#[command(name = "swright", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Describe your project in conversation, then generate the site.
    Chat {
        /// Session to write the generated site to (a new id is generated if omitted).
        #[arg(short, long)]
        session: Option<String>,

        /// Aesthetic label handed to the builder (defaults to the configured style).
        #[arg(long)]
        style: Option<String>,
    },

    /// Apply a natural-language change to a generated site.
    Edit {
        /// Session id of the site.
        session: String,

        /// What to change, e.g. "make the hero darker".
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        instruction: Vec<String>,
    },

    /// Print a generated site's source, or its preview page path.
    Show {
        /// Session id of the site.
        session: String,

        /// Print the path of the standalone HTML preview instead of the source.
        #[arg(long)]
        preview: bool,
    },

    /// Verify the configured provider answers a minimal request.
    Check,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Log filter directive for the given verbosity flags.
pub fn log_directive(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,sitewright=debug",
        _ => "trace",
    }
}

/// A cyan spinner with a message, ticking until finished.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_edit_joins_trailing_words() {
        let cli = Cli::parse_from(["swright", "edit", "abc", "make", "it", "darker"]);
        match cli.command {
            Commands::Edit {
                session,
                instruction,
            } => {
                assert_eq!(session, "abc");
                assert_eq!(instruction.join(" "), "make it darker");
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["swright", "show", "abc", "--preview", "--json", "-vv"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Show { preview: true, .. }));
    }

    #[test]
    fn test_log_directive() {
        assert_eq!(log_directive(0, true), "error");
        assert_eq!(log_directive(0, false), "warn");
        assert_eq!(log_directive(1, false), "info,sitewright=debug");
        assert_eq!(log_directive(3, false), "trace");
    }
}
