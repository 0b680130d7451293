//! Clap argument definitions for the `scout` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Scout - Learning resource recommendations for your documents")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v for progress details, -vv for debugging)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Flags shared by commands that extract keywords.
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractArgs {
    /// Documents or folders to read (.txt and .md files)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Number of keywords to select [default: 10]
    #[arg(short = 'k', long)]
    pub keywords: Option<usize>,

    /// Relevance/diversity trade-off for keyword selection (0.0-1.0) [default: 0.7]
    #[arg(long)]
    pub lambda: Option<f64>,

    /// Document language tag for stop-words [default: en]
    #[arg(long)]
    pub language: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `scout run`.
#[derive(Args, Debug, Clone)]
pub struct RunCommand {
    /// Document and keyword selection flags.
    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Resources shown per type [default: 5]
    #[arg(short = 'n', long)]
    pub show: Option<usize>,

    /// Platforms to search (can be specified multiple times)
    #[arg(short = 'p', long = "platform")]
    pub platforms: Vec<String>,

    /// API key for AI-generated summaries
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_key: Option<String>,

    /// Do not attach summaries to recommendations
    #[arg(long)]
    pub no_summary: bool,

    /// Also write recommendations to this folder, one subfolder per type
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Arguments for `scout keywords`.
#[derive(Args, Debug, Clone)]
pub struct KeywordsCommand {
    /// Document and keyword selection flags.
    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Also list every scored candidate
    #[arg(long)]
    pub candidates: bool,
}

/// Arguments for `scout init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.scout.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `scout` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Extract keywords and recommend resources for documents
    Run(RunCommand),

    /// Extract keywords only, without searching
    Keywords(KeywordsCommand),

    /// Show effective configuration settings
    Config,

    /// Initialize scout configuration in current directory
    Init(InitCommand),
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;
    use scout_config::{DisplaySettings, KeywordSettings};

    use super::*;

    /// Gets help text for a subcommand's argument.
    fn get_arg_help(cmd: &clap::Command, subcmd: &str, arg: &str) -> String {
        cmd.get_subcommands()
            .find(|c| c.get_name() == subcmd)
            .and_then(|c| c.get_arguments().find(|a| a.get_id() == arg))
            .and_then(|a| a.get_help().map(|h| h.to_string()))
            .unwrap_or_default()
    }

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    /// Catches drift between configuration defaults and help text.
    #[test]
    fn help_defaults_match_config() {
        let cmd = Cli::command();
        let keywords = KeywordSettings::default();
        let display = DisplaySettings::default();

        let count_help = get_arg_help(&cmd, "run", "keywords");
        assert!(
            count_help.contains(&format!("[default: {}]", keywords.count)),
            "run --keywords help should contain default {}: {count_help}",
            keywords.count
        );

        let lambda_help = get_arg_help(&cmd, "keywords", "lambda");
        assert!(
            lambda_help.contains(&format!("[default: {}]", keywords.lambda)),
            "keywords --lambda help should contain default {}: {lambda_help}",
            keywords.lambda
        );

        let language_help = get_arg_help(&cmd, "run", "language");
        assert!(language_help.contains(&format!("[default: {}]", keywords.language)));

        let show_help = get_arg_help(&cmd, "run", "show");
        assert!(show_help.contains(&format!("[default: {}]", display.text)));
    }

    #[test]
    fn parses_repeated_platforms() {
        let cli = Cli::try_parse_from([
            "scout",
            "run",
            "notes",
            "--platform",
            "wikipedia",
            "-p",
            "github",
            "--no-summary",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run(cmd) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(cmd.platforms, ["wikipedia", "github"]);
        assert!(cmd.no_summary);
        assert_eq!(cmd.extract.paths, [PathBuf::from("notes")]);
    }

    #[test]
    fn requires_a_path() {
        assert!(Cli::try_parse_from(["scout", "keywords"]).is_err());
    }
}
