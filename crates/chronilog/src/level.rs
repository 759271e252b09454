//! Severity levels, including the SUCCESS level between INFO and WARNING.

use std::fmt;
use std::str::FromStr;

/// Log severity.
///
/// Severities follow the familiar numeric scale (DEBUG = 10 ... CRITICAL = 50)
/// so that [`Level::Custom`] values order naturally against the named ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Debug,
    Info,
    /// Positive outcome; ranks between INFO and WARNING.
    Success,
    Warning,
    Error,
    Critical,
    /// Any other numeric severity (e.g. TRACE from `log`/`tracing` maps to 5).
    Custom(u16),
}

impl Level {
    /// The six named levels in ascending severity.
    pub const NAMED: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Success,
        Level::Warning,
        Level::Error,
        Level::Critical,
    ];

    /// Numeric severity used for filtering.
    pub fn severity(self) -> u16 {
        match self {
            Level::Debug => 10,
            Level::Info => 20,
            Level::Success => 25,
            Level::Warning => 30,
            Level::Error => 40,
            Level::Critical => 50,
            Level::Custom(n) => n,
        }
    }

    /// Upper-case display name. Custom levels render as `LEVEL n`.
    pub fn name(self) -> String {
        match self {
            Level::Custom(n) => format!("LEVEL {n}"),
            named => named.as_str().to_string(),
        }
    }

    /// Static name for the named levels; `"LEVEL"` for custom ones.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Success => "SUCCESS",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Custom(_) => "LEVEL",
        }
    }

    /// Whether a record at this level passes a `minimum` threshold.
    pub fn passes(self, minimum: Level) -> bool {
        self.severity() >= minimum.severity()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Custom(n) => write!(f, "LEVEL {n}"),
            named => f.pad(named.as_str()),
        }
    }
}

/// Error returned when a level name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}'")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "SUCCESS" => Ok(Level::Success),
            "WARNING" | "WARN" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" | "FATAL" => Ok(Level::Critical),
            "TRACE" => Ok(Level::Custom(5)),
            other => other
                .parse::<u16>()
                .map(Level::from_severity)
                .map_err(|_| ParseLevelError(s.to_string())),
        }
    }
}

impl Level {
    /// Map a numeric severity to a named level when one matches exactly.
    pub fn from_severity(severity: u16) -> Self {
        Level::NAMED
            .into_iter()
            .find(|l| l.severity() == severity)
            .unwrap_or(Level::Custom(severity))
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug => Level::Debug,
            log::Level::Trace => Level::Custom(5),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warning,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::TRACE => Level::Custom(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_ranks_between_info_and_warning() {
        assert!(Level::Success.severity() > Level::Info.severity());
        assert!(Level::Success.severity() < Level::Warning.severity());
    }

    #[test]
    fn test_passes_threshold() {
        assert!(Level::Success.passes(Level::Info));
        assert!(!Level::Info.passes(Level::Success));
        assert!(Level::Critical.passes(Level::Debug));
        assert!(!Level::Custom(5).passes(Level::Debug));
    }

    #[test]
    fn test_parse_names_case_insensitive() {
        assert_eq!("debug".parse::<Level>(), Ok(Level::Debug));
        assert_eq!("Warn".parse::<Level>(), Ok(Level::Warning));
        assert_eq!(" SUCCESS ".parse::<Level>(), Ok(Level::Success));
        assert_eq!("trace".parse::<Level>(), Ok(Level::Custom(5)));
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!("25".parse::<Level>(), Ok(Level::Success));
        assert_eq!("15".parse::<Level>(), Ok(Level::Custom(15)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_display_pads_named_levels() {
        assert_eq!(format!("{:<8}|", Level::Info), "INFO    |");
        assert_eq!(Level::Custom(7).to_string(), "LEVEL 7");
    }

    #[test]
    fn test_from_log_and_tracing() {
        assert_eq!(Level::from(log::Level::Warn), Level::Warning);
        assert_eq!(Level::from(tracing::Level::TRACE), Level::Custom(5));
    }
}
