//! Logging for a single report run.
//!
//! Events go to `<LOG_DIR>/<YYYY-MM-DD>.log` as
//! `<timestamp> - <target> - <LEVEL> - Ln <line> - <message>` and, in compact
//! form, to stderr. The subscriber is installed for the current thread only
//! and removed when the returned [`LogSession`] is dropped.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt as tfmt, prelude::*, EnvFilter, Registry};

use crate::config::LogSettings;

pub struct ReportFormatter;

impl<S, N> FormatEvent<S, N> for ReportFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} - {} - {} - Ln {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            meta.target(),
            meta.level(),
            meta.line().unwrap_or(0),
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

pub struct LogSession {
    path: PathBuf,
    _guard: DefaultGuard,
}

impl LogSession {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn log_file_path(dir: &Path, day: NaiveDate) -> PathBuf {
    dir.join(format!("{}.log", day.format("%Y-%m-%d")))
}

pub fn init(settings: &LogSettings) -> anyhow::Result<LogSession> {
    fs::create_dir_all(&settings.dir)
        .with_context(|| format!("cannot create log dir {}", settings.dir.display()))?;

    let path = log_file_path(&settings.dir, Local::now().date_naive());
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let env_filter = EnvFilter::try_new(&settings.filter)?;
    let subscriber = Registry::default()
        .with(env_filter)
        .with(
            tfmt::layer()
                .event_format(ReportFormatter)
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(tfmt::layer().compact().with_writer(std::io::stderr));

    let guard = tracing::subscriber::set_default(subscriber);
    Ok(LogSession { path, _guard: guard })
}

/// Used when the log file cannot be opened.
pub fn init_stderr(filter: &str) -> DefaultGuard {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(env_filter)
        .with(tfmt::layer().compact().with_writer(std::io::stderr));
    tracing::subscriber::set_default(subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_the_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(log_file_path(Path::new("logs"), day), PathBuf::from("logs/2024-03-07.log"));
    }

    #[test]
    fn error_lines_use_report_format() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings {
            dir: dir.path().join("nested"),
            filter: "info".into(),
        };

        let session = init(&settings).unwrap();
        let path = session.path().to_path_buf();
        tracing::error!("appliance unreachable");
        tracing::debug!("filtered out");
        drop(session);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1, "{contents}");
        let line = lines[0];
        assert!(line.contains(" - infoblox_node_report::telemetry::tests - ERROR - Ln "), "{line}");
        assert!(line.ends_with("appliance unreachable"), "{line}");
    }

    #[test]
    fn appends_to_existing_day_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LogSettings {
            dir: dir.path().to_path_buf(),
            filter: "info".into(),
        };

        for msg in ["first", "second"] {
            let session = init(&settings).unwrap();
            tracing::warn!("{msg}");
            drop(session);
        }

        let path = log_file_path(dir.path(), Local::now().date_naive());
        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
