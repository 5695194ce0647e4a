use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^.*\]:\s\[(?P<target>.*)\]\s(?P<level>DEBUG|INFO|WARN|ERROR|FATAL|TRACE)\s(?P<date>\d{4}/\d{2}/\d{2}\s\d{2}:\d{2}:\d{2})\s(?P<message>.*)",
    )
    .expect("line pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Levels that are recognised by the grammar but never feed sessions or samples.
    pub fn is_suppressed(self) -> bool {
        matches!(self, Level::Warn | Level::Fatal | Level::Trace | Level::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownLevel;

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "TRACE" => Ok(Level::Trace),
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            "FATAL" => Ok(Level::Fatal),
            _ => Err(UnknownLevel),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub target: String,
    pub level: Level,
    pub timestamp: NaiveDateTime,
    pub message: String,
}

/// Matches one raw line against the controller log grammar
/// `<prefix>]: [<target>] <LEVEL> <YYYY/MM/DD HH:MM:SS> <message>`.
///
/// Lines that do not fit, including ones whose date does not exist on the
/// calendar, yield `None`.
pub fn classify_line(line: &str) -> Option<LogRecord> {
    let captures = LINE_PATTERN.captures(line)?;

    let level = captures.name("level")?.as_str().parse::<Level>().ok()?;
    let timestamp =
        NaiveDateTime::parse_from_str(captures.name("date")?.as_str(), TIMESTAMP_FORMAT).ok()?;

    Some(LogRecord {
        target: captures.name("target")?.as_str().trim().to_string(),
        level,
        timestamp,
        message: captures.name("message")?.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Level, LogRecord, classify_line};

    #[test]
    fn classifies_info_line() {
        let record = classify_line("X]: [lp-1] INFO 2023/05/31 08:00:00 start charging ->")
            .expect("line should match");

        assert_eq!(
            record,
            LogRecord {
                target: "lp-1".to_string(),
                level: Level::Info,
                timestamp: NaiveDate::from_ymd_opt(2023, 5, 31)
                    .and_then(|date| date.and_hms_opt(8, 0, 0))
                    .expect("valid timestamp"),
                message: "start charging ->".to_string(),
            }
        );
    }

    #[test]
    fn trims_padded_target() {
        let record =
            classify_line("[main] 2023/05/31 08:00:00 evcc]: [  site   ] DEBUG 2023/05/31 08:00:05 grid power: -1200W")
                .expect("line should match");

        assert_eq!(record.target, "site");
        assert_eq!(record.level, Level::Debug);
        assert_eq!(record.message, "grid power: -1200W");
    }

    #[test]
    fn recognises_suppressed_levels() {
        for level in ["WARN", "ERROR", "FATAL", "TRACE"] {
            let line = format!("X]: [lp-1] {level} 2023/05/31 08:00:00 stop charging <-");
            let record = classify_line(&line).expect("line should match");
            assert!(record.level.is_suppressed(), "{level} should be suppressed");
        }

        assert!(!Level::Debug.is_suppressed());
        assert!(!Level::Info.is_suppressed());
    }

    #[test]
    fn rejects_missing_bracket_structure() {
        assert_eq!(
            classify_line("lp-1 INFO 2023/05/31 08:00:00 start charging ->"),
            None
        );
        assert_eq!(
            classify_line("X]: lp-1 INFO 2023/05/31 08:00:00 start charging ->"),
            None
        );
    }

    #[test]
    fn rejects_unknown_level_and_wrong_date_shape() {
        assert_eq!(
            classify_line("X]: [lp-1] NOTICE 2023/05/31 08:00:00 start charging ->"),
            None
        );
        assert_eq!(
            classify_line("X]: [lp-1] INFO 2023-05-31 08:00:00 start charging ->"),
            None
        );
    }

    #[test]
    fn rejects_impossible_calendar_date() {
        assert_eq!(
            classify_line("X]: [lp-1] INFO 2023/13/31 08:00:00 start charging ->"),
            None
        );
        assert_eq!(
            classify_line("X]: [lp-1] INFO 2023/02/30 08:00:00 start charging ->"),
            None
        );
    }

    #[test]
    fn keeps_message_verbatim() {
        let record = classify_line("X]: [lp-1] INFO 2023/05/31 08:00:00 stop charging <-  ")
            .expect("line should match");

        assert_eq!(record.message, "stop charging <-  ");
    }
}
