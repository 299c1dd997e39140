//! Logging setup.
//!
//! Nothing here installs a global subscriber. [`build_dispatch`] returns a
//! [`Dispatch`] that the binary makes current for the length of one run.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;

use crate::error::DetachError;

/// Log file name inside the configured log directory.
pub const LOG_FILE_NAME: &str = "maildetach.log";

/// Logging facility selector, named after the syslog facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facility {
    Kern,
    User,
    Mail,
    Daemon,
    Auth,
    Syslog,
    Lpr,
    News,
    Uucp,
    Cron,
    Authpriv,
    Ftp,
    /// `local0` through `local7`.
    Local(u8),
}

impl FromStr for Facility {
    type Err = DetachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let facility = match name.as_str() {
            "" | "user" => Self::User,
            "kern" => Self::Kern,
            "mail" => Self::Mail,
            "daemon" => Self::Daemon,
            "auth" => Self::Auth,
            "syslog" => Self::Syslog,
            "lpr" => Self::Lpr,
            "news" => Self::News,
            "uucp" => Self::Uucp,
            "cron" => Self::Cron,
            "authpriv" => Self::Authpriv,
            "ftp" => Self::Ftp,
            other => match other.strip_prefix("local").map(str::parse::<u8>) {
                Some(Ok(n)) if n <= 7 => Self::Local(n),
                _ => return Err(DetachError::Facility(s.to_string())),
            },
        };
        Ok(facility)
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::Authpriv => "authpriv",
            Self::Ftp => "ftp",
            Self::Local(n) => return write!(f, "local{n}"),
        };
        f.write_str(name)
    }
}

/// Build the run's subscriber: stderr, plus a log file when `log_dir` is
/// set and usable.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn build_dispatch(level: &str, log_dir: Option<&Path>) -> Dispatch {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(std::io::stderr);

    // Fall back to stderr only when the directory cannot be created.
    let file_layer = log_dir
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| {
            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender)
        });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    Dispatch::new(subscriber)
}
