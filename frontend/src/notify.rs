use std::fmt;
use std::str::FromStr;

use log::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    Error,
    #[default]
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }

    /// Severity named by a page script's `type` argument; missing or unknown means info.
    pub fn from_js_type(kind: Option<&str>) -> Severity {
        match kind.map(str::parse::<Severity>) {
            Some(Ok(severity)) => severity,
            Some(Err(e)) => {
                warn!("{}, using info", e);
                Severity::Info
            }
            None => Severity::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "success" => Ok(Severity::Success),
            "error" => Ok(Severity::Error),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown notification type `{}`", other)),
        }
    }
}

/// Surfaces a message to the visitor.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);
}

/// The console record every notifier writes, `[INFO] message`.
pub fn console_record(message: &str, severity: Severity) -> String {
    format!("[{}] {}", severity.as_str().to_uppercase(), message)
}

pub fn log_notification(message: &str, severity: Severity) {
    let record = console_record(message, severity);
    match severity {
        Severity::Error => error!("{}", record),
        _ => info!("{}", record),
    }
}
