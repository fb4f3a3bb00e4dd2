use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use meshguard::config::Config;
use meshguard::error::GuardError;
use meshguard::output::OutputFormat;
use meshguard::profile::{document, Profile};
use meshguard::report::Severity;
use meshguard::rules::builtin_rules;
use meshguard::scanner::ScanRequest;
use meshguard::ScanOptions;

#[derive(Parser)]
#[command(
    name = "meshguard",
    about = "Rule-based inspection and remediation for mesh asset pipelines",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a mesh repository for pipeline issues
    Scan {
        /// Project root directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Restrict the scan to these folders (relative to the root)
        #[arg(long)]
        folder: Vec<String>,

        /// Profile document path (overrides the config file)
        #[arg(long, short = 'p')]
        profile: Option<PathBuf>,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Minimum severity to fail (info, warning, error, critical)
        #[arg(long)]
        fail_on: Option<String>,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Execute every available fix, then re-scan
        #[arg(long)]
        fix_all: bool,
    },

    /// List all built-in check rules
    ListRules,

    /// Generate a starter .meshguard.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Write the default inspection profile as a JSON document
    ExportProfile {
        /// Destination path
        #[arg(default_value = "meshguard-profile.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            path,
            folder,
            profile,
            config,
            format,
            fail_on,
            output,
            fix_all,
        } => cmd_scan(path, folder, profile, config, format, fail_on, output, fix_all),
        Commands::ListRules => cmd_list_rules(),
        Commands::Init { force } => cmd_init(force),
        Commands::ExportProfile { path, force } => cmd_export_profile(path, force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_scan(
    path: PathBuf,
    folders: Vec<String>,
    profile: Option<PathBuf>,
    config: Option<PathBuf>,
    format_str: String,
    fail_on_str: Option<String>,
    output_path: Option<PathBuf>,
    fix_all: bool,
) -> Result<i32, GuardError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let fail_on = fail_on_str.and_then(|s| {
        let sev = Severity::from_str_lenient(&s);
        if sev.is_none() {
            eprintln!("Warning: unknown severity '{}', using config default", s);
        }
        sev
    });

    let options = ScanOptions {
        config_path: config,
        profile_path: profile,
        fail_on_override: fail_on,
        ..Default::default()
    };

    let request = if folders.is_empty() {
        ScanRequest::WholeProject
    } else {
        ScanRequest::SelectedFolders { folders }
    };

    let mut outcome = meshguard::scan(&path, request.clone(), &options)?;

    if fix_all && outcome.report.fixable() > 0 {
        let fix_reports = meshguard::apply_fixes(&path, &outcome.report);
        for report in &fix_reports {
            eprintln!("{} [{}]: {}", report.asset, report.rule_id, report.outcome);
        }
        // Fixes are single-shot and may be partial; the rendered report
        // reflects the state after them.
        outcome = meshguard::scan(&path, request, &options)?;
    }

    let rendered = format.render(&outcome.report)?;
    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = pass, 1 = results at or above the failure gate
    Ok(if outcome.passed() { 0 } else { 1 })
}

fn cmd_list_rules() -> Result<i32, GuardError> {
    println!("{:<22} DESCRIPTION", "ID");
    println!("{}", "-".repeat(80));
    for rule in builtin_rules() {
        println!("{:<22} {}", rule.id(), rule.description());
    }
    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, GuardError> {
    let path = PathBuf::from(".meshguard.toml");

    if path.exists() && !force {
        eprintln!(".meshguard.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .meshguard.toml");

    Ok(0)
}

fn cmd_export_profile(path: PathBuf, force: bool) -> Result<i32, GuardError> {
    if path.exists() && !force {
        eprintln!("{} already exists. Use --force to overwrite.", path.display());
        return Ok(1);
    }

    let profile = Profile::with_default_rules();
    std::fs::write(&path, document::export(&profile)?)?;
    println!("Exported default profile to {}", path.display());

    Ok(0)
}
