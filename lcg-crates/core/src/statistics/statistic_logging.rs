//! The process-wide destination of statistics. Nothing is written until
//! [`configure_statistic_logging`] has been called.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::stdout;
use std::io::Write;
use std::sync::Mutex;
use std::sync::OnceLock;

struct StatisticSink {
    /// Every statistic is written as `{prefix} {name}={value}`.
    prefix: &'static str,
    closing_line: Option<&'static str>,
    writer: Box<dyn Write + Send + Sync>,
}

impl Debug for StatisticSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticSink")
            .field("prefix", &self.prefix)
            .field("closing_line", &self.closing_line)
            .finish_non_exhaustive()
    }
}

static SINK: OnceLock<Mutex<StatisticSink>> = OnceLock::new();

fn with_sink(write: impl FnOnce(&mut StatisticSink)) {
    if let Some(Ok(mut sink)) = SINK.get().map(Mutex::lock) {
        write(&mut sink);
    }
}

/// Start writing statistics to `writer`, or to stdout. `closing_line` ends every block of
/// statistics, see [`log_statistic_postfix`]. Later calls are ignored.
pub fn configure_statistic_logging(
    prefix: &'static str,
    closing_line: Option<&'static str>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = SINK.get_or_init(|| {
        Mutex::new(StatisticSink {
            prefix,
            closing_line,
            writer: writer.unwrap_or_else(|| Box::new(stdout())),
        })
    });
}

pub fn log_statistic(name: impl Display, value: impl Display) {
    with_sink(|sink| {
        let _ = writeln!(sink.writer, "{} {name}={value}", sink.prefix);
    });
}

/// Close a block of statistics.
pub fn log_statistic_postfix() {
    with_sink(|sink| {
        if let Some(line) = sink.closing_line {
            let _ = writeln!(sink.writer, "{line}");
        }
    });
}

pub fn should_log_statistics() -> bool {
    SINK.get().is_some()
}
