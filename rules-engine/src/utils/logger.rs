//! Logging Infrastructure
//!
//! Structured logging setup for development and production.
//! Features:
//! - Console output, pretty or JSON
//! - Daily rotating application logs (pruned after `keep_days`)
//! - Daily rotating audit logs for `target: "audit"` events (never pruned)

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

const APP_PREFIX: &str = "app";
const AUDIT_TARGET: &str = "audit";

/// Date encoded in a rotated app log name (`app.YYYY-MM-DD` or `app-YYYY-MM-DD.log`)
fn rotated_date(name: &str) -> Option<NaiveDate> {
    let rest = name
        .strip_prefix(APP_PREFIX)?
        .trim_start_matches(['.', '-']);
    let date_part = rest.strip_suffix(".log").unwrap_or(rest);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Delete rotated application logs older than `keep_days`
///
/// Audit logs live in their own directory and are never touched. Returns the
/// number of files removed.
pub fn cleanup_old_logs(log_dir: &Path, keep_days: i64) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join(APP_PREFIX);
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Local::now() - chrono::Duration::days(keep_days);
    let mut removed = 0;
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = rotated_date(name) else {
            continue;
        };
        let Some(midnight) = date
            .and_hms_opt(0, 0, 0)
            .and_then(|dt| Local.from_local_datetime(&dt).single())
        else {
            continue;
        };
        if midnight < cutoff {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
            removed += 1;
        }
    }
    Ok(removed)
}

/// Initialize the logging system with optional daily rotating files
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug"); `RUST_LOG` takes precedence
/// * `json_format` - JSON console output (production) or pretty (development)
/// * `log_dir` - Optional directory for `app/` and `audit/` log files
/// * `keep_days` - Retention for rotated app logs
///
/// # Examples
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// rules_engine::init_logger_with_file("info", true, Some("./logs"), 14)?;
/// # Ok(())
/// # }
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
    keep_days: i64,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let Some(dir) = log_dir else {
        subscriber.with(console_layer).try_init()?;
        return Ok(());
    };

    let log_dir = Path::new(dir);
    let app_log_dir = log_dir.join(APP_PREFIX);
    let audit_log_dir = log_dir.join(AUDIT_TARGET);
    fs::create_dir_all(&app_log_dir)?;
    fs::create_dir_all(&audit_log_dir)?;

    // Application logs: everything except audit events
    let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, APP_PREFIX);
    let app_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(app_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() != AUDIT_TARGET
        }));

    // Audit logs: only `target: "audit"`
    let audit_log = RollingFileAppender::new(Rotation::DAILY, audit_log_dir, AUDIT_TARGET);
    let audit_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(audit_log))
        .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
            meta.target() == AUDIT_TARGET
        }));

    subscriber
        .with(console_layer)
        .with(app_layer)
        .with(audit_layer)
        .try_init()?;

    if tokio::runtime::Handle::try_current().is_ok() {
        tokio::spawn(periodic_cleanup(log_dir.to_path_buf(), keep_days));
    }
    Ok(())
}

/// Periodic cleanup task - runs every hour to prune old app logs
async fn periodic_cleanup(log_dir: PathBuf, keep_days: i64) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&log_dir, keep_days) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None, 14)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotated_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert_eq!(rotated_date("app.2026-03-01"), expected);
        assert_eq!(rotated_date("app-2026-03-01.log"), expected);
        assert_eq!(rotated_date("audit.2026-03-01"), None);
        assert_eq!(rotated_date("app.current"), None);
    }

    #[test]
    fn test_cleanup_removes_only_old_app_logs() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("app");
        let audit = dir.path().join("audit");
        fs::create_dir_all(&app).unwrap();
        fs::create_dir_all(&audit).unwrap();

        let old = (Local::now() - chrono::Duration::days(30)).format("%Y-%m-%d");
        let today = Local::now().format("%Y-%m-%d");
        fs::write(app.join(format!("app.{old}")), "old").unwrap();
        fs::write(app.join(format!("app.{today}")), "new").unwrap();
        fs::write(audit.join(format!("audit.{old}")), "keep").unwrap();

        let removed = cleanup_old_logs(dir.path(), 14).unwrap();
        assert_eq!(removed, 1);
        assert!(!app.join(format!("app.{old}")).exists());
        assert!(app.join(format!("app.{today}")).exists());
        assert!(audit.join(format!("audit.{old}")).exists());
    }

    #[test]
    fn test_cleanup_without_directory_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_old_logs(&dir.path().join("missing"), 14).unwrap(), 0);
    }
}
