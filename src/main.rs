//! CLI entry point for `maildetach`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use maildetach::config::{self, Config};
use maildetach::error::ExitStatus;
use maildetach::logging::{self, Facility};
use maildetach::pipeline;

/// Detach MIME attachments from a message on stdin into a shared directory.
///
/// Exits 0 when every attachment was delivered and 75 (EX_TEMPFAIL) on any
/// failure, so the MTA retries later.
#[derive(Parser)]
#[command(name = "maildetach", version)]
struct Cli {
    /// Destination directory (must exist, same filesystem as its staging area)
    #[arg(short = 'd', long, env = "MAILDETACH_DEST_DIR", value_name = "DIR")]
    dest_dir: Option<PathBuf>,

    /// Logging facility (user, mail, daemon, local0..local7, ...)
    #[arg(short = 'f', long, value_name = "FACILITY")]
    facility: Option<String>,

    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<clap_complete::Shell>,

    /// Print a man page and exit
    #[arg(long)]
    manpage: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        return report(cmd_completions(shell));
    }
    if cli.manpage {
        return report(cmd_manpage());
    }

    let loaded = config::load_config(cli.config.as_deref());
    let config = loaded.as_ref().cloned().unwrap_or_default();

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let dispatch = logging::build_dispatch(log_level, config.general.log_dir.as_deref());

    let status = tracing::dispatcher::with_default(&dispatch, || {
        if let Err(e) = &loaded {
            tracing::error!(error = %e, "Cannot load configuration");
            return ExitStatus::TempFail;
        }
        run(&cli, &config)
    });
    status.into()
}

/// Run one job with logging already in place.
fn run(cli: &Cli, config: &Config) -> ExitStatus {
    let selector = cli.facility.as_deref().unwrap_or(&config.general.facility);
    let facility = match selector.parse::<Facility>() {
        Ok(f) => f,
        Err(e) => {
            tracing::error!(error = %e, "Invalid logging facility");
            return e.exit_status();
        }
    };

    let span = tracing::info_span!("maildetach", facility = %facility);
    let _enter = span.enter();

    let Some(dest_dir) = cli.dest_dir.as_ref().or(config.delivery.dest_dir.as_ref()) else {
        tracing::error!("No destination directory given (-d or delivery.dest_dir)");
        return ExitStatus::TempFail;
    };

    let result = pipeline::process(
        std::io::stdin().lock(),
        dest_dir,
        &config.delivery.job_options(),
    );
    ExitStatus::from(&result)
}

/// Turn the result of an auxiliary command into an exit code.
fn report(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("maildetach: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "maildetach", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
