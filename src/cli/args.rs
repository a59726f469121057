use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cleaner::MatchStrategy;
use crate::spec::Platform;

/// podclean — removes files from an installed pod that none of its specs use
#[derive(Parser, Debug)]
#[command(
    name = "podclean",
    version,
    about = "Removes files from an installed package that none of its specs reference",
    long_about = "podclean keeps the vendored frameworks, libraries, resources, license,\n\
                   prefix header, preserved paths, readme and source files that a package's\n\
                   specs reference on any platform, and deletes everything else under its root.",
    after_help = "EXAMPLES:\n  \
        podclean unused Pods/Foo --spec Foo.podspec.json         List what would be removed\n  \
        podclean clean Pods/Foo --spec Foo.podspec.json --dry-run\n  \
        podclean clean Pods/Foo --spec Foo.podspec.json -p ios -y\n  \
        podclean used Pods/Foo --spec Foo.podspec.json --format json\n  \
        podclean config show                                      Show configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (defaults to the configured format)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove every entry under the package root that no spec uses
    Clean {
        #[command(flatten)]
        target: TargetArgs,

        /// Show what would be removed without deleting
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Matching strategy (defaults to the configured strategy)
        #[arg(long)]
        strategy: Option<StrategyArg>,
    },

    /// List the paths the specs keep
    Used {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List the entries that would be removed
    Unused {
        #[command(flatten)]
        target: TargetArgs,

        /// Matching strategy (defaults to the configured strategy)
        #[arg(long)]
        strategy: Option<StrategyArg>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: CompletionShell,
    },
}

/// Package root and the specs that describe it
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Installed package directory
    pub root: PathBuf,

    /// Podspec JSON manifest (repeatable)
    #[arg(long = "spec", short = 's', value_name = "FILE", required = true)]
    pub specs: Vec<PathBuf>,

    /// Only consider these platforms (repeatable or comma separated)
    #[arg(long = "platform", short = 'p', value_name = "PLATFORM", value_delimiter = ',')]
    pub platforms: Vec<Platform>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

impl From<crate::common::config::OutputFormat> for OutputFormat {
    fn from(format: crate::common::config::OutputFormat) -> Self {
        match format {
            crate::common::config::OutputFormat::Human => OutputFormat::Human,
            crate::common::config::OutputFormat::Json => OutputFormat::Json,
            crate::common::config::OutputFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Substring,
    Segment,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Substring => MatchStrategy::Substring,
            StrategyArg::Segment => MatchStrategy::Segment,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_clean_with_platforms() {
        let cli = Cli::parse_from([
            "podclean", "clean", "Pods/Foo", "--spec", "Foo.json", "-p", "ios,osx", "--dry-run",
        ]);
        match cli.command {
            Commands::Clean { target, dry_run, .. } => {
                assert!(dry_run);
                assert_eq!(target.root, PathBuf::from("Pods/Foo"));
                assert_eq!(target.platforms, vec![Platform::Ios, Platform::Osx]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_spec_is_required() {
        assert!(Cli::try_parse_from(["podclean", "used", "Pods/Foo"]).is_err());
    }
}
