use std::cell::RefCell;
use std::io::{self, Write};

use chrono::Local;
use tracing::debug;

/// Timestamped progress lines, stdout by default, one before each step.
pub struct Progress {
    quiet: bool,
    sink: RefCell<Box<dyn Write>>,
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        Self::with_sink(quiet, Box::new(io::stdout()))
    }

    pub fn with_sink(quiet: bool, sink: Box<dyn Write>) -> Self {
        Self {
            quiet,
            sink: RefCell::new(sink),
        }
    }

    pub fn line(&self, message: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        let line = format_line(&Local::now(), message.as_ref());
        let mut sink = self.sink.borrow_mut();
        if let Err(err) = writeln!(sink, "{}", line).and_then(|_| sink.flush()) {
            debug!("progress line not written: {}", err);
        }
    }
}

fn format_line<Tz>(now: &chrono::DateTime<Tz>, message: &str) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S"), message)
}
