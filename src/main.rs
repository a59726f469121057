use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use podclean::cleaner::{self, CleanMode, CleanOptions};
use podclean::cli::args::{Cli, Commands, ConfigAction, OutputFormat, StrategyArg, TargetArgs};
use podclean::cli::output;
use podclean::common::config::Config;
use podclean::common::format;
use podclean::spec::{self, ManifestSpec, SpecsByPlatform};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("podclean=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    let config = Config::load()?;
    let format = if cli.quiet {
        OutputFormat::Quiet
    } else {
        cli.format
            .clone()
            .unwrap_or_else(|| config.output_format.clone().into())
    };

    match cli.command {
        Commands::Clean {
            ref target,
            dry_run,
            yes,
            strategy,
        } => cmd_clean(&config, &format, target, dry_run, yes, strategy),

        Commands::Used { ref target } => cmd_used(&format, target),

        Commands::Unused {
            ref target,
            strategy,
        } => cmd_unused(&config, &format, target, strategy),

        Commands::Config { ref action } => cmd_config(action),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                podclean::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                podclean::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                podclean::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "podclean", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load every manifest and group its specs by platform
fn load_specs(target: &TargetArgs) -> Result<SpecsByPlatform<ManifestSpec>> {
    let mut specs = Vec::new();
    for path in &target.specs {
        let loaded = ManifestSpec::load(path)
            .with_context(|| format!("Failed to load spec: {}", path.display()))?;
        specs.extend(loaded);
    }

    let grouped = spec::specs_by_platform(&specs, &target.platforms);
    if grouped.is_empty() {
        // An empty mapping would mark every entry under the root as unused
        anyhow::bail!("No spec supports the requested platforms");
    }
    Ok(grouped)
}

/// Resolve the root the same way the cleaner does
fn resolve_root(root: &std::path::Path) -> Result<PathBuf> {
    root.canonicalize()
        .with_context(|| format!("Failed to resolve package root: {}", root.display()))
}

// ─── Clean ────────────────────────────────────────────────────────────────────

fn cmd_clean(
    config: &Config,
    format: &OutputFormat,
    target: &TargetArgs,
    dry_run: bool,
    yes: bool,
    strategy: Option<StrategyArg>,
) -> Result<()> {
    let specs = load_specs(target)?;
    let strategy = strategy
        .map(Into::into)
        .unwrap_or(config.match_strategy);

    let mode = if dry_run {
        CleanMode::DryRun
    } else {
        config.default_mode
    };

    // Confirm unless --yes
    if mode == CleanMode::Delete && !yes {
        let preview = cleaner::clean(
            &target.root,
            &specs,
            &CleanOptions {
                mode: CleanMode::DryRun,
                strategy,
                show_progress: false,
            },
        )?;

        if preview.removed.is_empty() {
            if matches!(format, OutputFormat::Human) {
                output::print_clean_report(&preview);
            }
            return Ok(());
        }

        print!(
            "\n  {} {} {} ({}) under {}? [y/N] ",
            "❓",
            "PERMANENTLY DELETE",
            format::format_count(preview.removed.len()),
            format::format_size(preview.bytes_freed),
            preview.root.display()
        );
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("  {} Cancelled", "✗".red());
            return Ok(());
        }
    }

    let options = CleanOptions {
        mode,
        strategy,
        show_progress: config.show_progress && matches!(format, OutputFormat::Human),
    };
    let report = cleaner::clean(&target.root, &specs, &options)?;

    match format {
        OutputFormat::Human => output::print_clean_report(&report),
        OutputFormat::Json => output::print_clean_json(&report),
        OutputFormat::Quiet => output::print_clean_quiet(&report),
    }

    if !report.is_clean() {
        anyhow::bail!(
            "{} entries under {} could not be removed",
            report.errors.len(),
            report.root.display()
        );
    }

    Ok(())
}

// ─── Used / Unused ────────────────────────────────────────────────────────────

fn cmd_used(format: &OutputFormat, target: &TargetArgs) -> Result<()> {
    let specs = load_specs(target)?;
    let root = resolve_root(&target.root)?;
    let used = cleaner::collect_used_paths(&root, &specs)?;

    match format {
        OutputFormat::Human => output::print_used_paths(&root, &used),
        OutputFormat::Json => output::print_json(&used),
        OutputFormat::Quiet => output::print_plain(&used),
    }
    Ok(())
}

fn cmd_unused(
    config: &Config,
    format: &OutputFormat,
    target: &TargetArgs,
    strategy: Option<StrategyArg>,
) -> Result<()> {
    let specs = load_specs(target)?;
    let root = resolve_root(&target.root)?;
    let strategy = strategy
        .map(Into::into)
        .unwrap_or(config.match_strategy);

    let used = cleaner::collect_used_paths(&root, &specs)?;
    let candidates = cleaner::find_unused_paths(&root, &used, strategy)?;

    match format {
        OutputFormat::Human => output::print_unused_paths(&root, &candidates),
        OutputFormat::Json => output::print_json(&candidates),
        OutputFormat::Quiet => output::print_plain(&candidates),
    }
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path().display());
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "default_mode" => config.default_mode = parse_value(value)?,
                "match_strategy" => config.match_strategy = parse_value(value)?,
                "output_format" => config.output_format = parse_value(value)?,
                "show_progress" => config.show_progress = value.parse()?,
                _ => anyhow::bail!("Unknown config key: {}", key),
            }
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}

/// Parse a snake_case enum value the way the config file spells it
fn parse_value<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .with_context(|| format!("Invalid value: {}", value))
}
