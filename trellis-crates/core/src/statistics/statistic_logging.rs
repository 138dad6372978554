//! Global configuration of where and how statistics are written.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::RwLock;

use convert_case::Case;
use convert_case::Casing;

/// How statistics are written: every statistic becomes a line `{prefix} {name}={value}`, and a
/// block of statistics can be closed with a postfix line.
pub struct StatisticOptions {
    prefix: &'static str,
    postfix: Option<&'static str>,
    /// When set, statistic names are converted to this casing before they are written.
    casing: Option<Case>,
    writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticOptions")
            .field("prefix", &self.prefix)
            .field("postfix", &self.postfix)
            .field("casing", &self.casing)
            .field("writer", &"<Writer>")
            .finish()
    }
}

static STATISTIC_OPTIONS: OnceLock<RwLock<StatisticOptions>> = OnceLock::new();

/// Configures the logging of statistics; only the first call has an effect.
///
/// When no writer is given the statistics are written to stdout.
pub fn configure_statistic_logging(
    prefix: &'static str,
    postfix: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        RwLock::new(StatisticOptions {
            prefix,
            postfix,
            casing,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

/// Writes the statistic `name` with `value`; does nothing if statistic logging is not configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    let Some(lock) = STATISTIC_OPTIONS.get() else {
        return;
    };
    let Ok(mut options) = lock.write() else {
        return;
    };

    let name = match options.casing {
        Some(casing) => name.to_string().to_case(casing),
        None => name.to_string(),
    };
    let prefix = options.prefix;
    let _ = writeln!(options.writer, "{prefix} {name}={value}");
}

/// Writes the closing line of a block of statistics, if one is configured.
pub fn log_statistic_postfix() {
    let Some(lock) = STATISTIC_OPTIONS.get() else {
        return;
    };
    let Ok(mut options) = lock.write() else {
        return;
    };

    if let Some(postfix) = options.postfix {
        let _ = writeln!(options.writer, "{postfix}");
    }
}

/// Returns whether statistic logging has been configured.
pub fn should_log_statistics() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}
