use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::domain::log_line::LogRecord;

pub const START_CHARGING: &str = "start charging ->";
pub const STOP_CHARGING: &str = "stop charging <-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargingPeriod {
    pub target: String,
    pub start: NaiveDateTime,
    pub stop: Option<NaiveDateTime>,
}

impl ChargingPeriod {
    pub fn is_open(&self) -> bool {
        self.stop.is_none()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.stop.map(|stop| stop - self.start)
    }
}

/// Periods per target, each sequence in log encounter order.
pub type SessionCollection = BTreeMap<String, Vec<ChargingPeriod>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTransition {
    Started { index: usize },
    Stopped { index: usize },
    UnmatchedStop,
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    periods: SessionCollection,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one INFO record. Only the two charging sentinels have an effect.
    pub fn observe(&mut self, record: &LogRecord) -> SessionTransition {
        match record.message.as_str() {
            START_CHARGING => self.start(&record.target, record.timestamp),
            STOP_CHARGING => self.stop(&record.target, record.timestamp),
            _ => SessionTransition::Ignored,
        }
    }

    pub fn into_periods(self) -> SessionCollection {
        self.periods
    }

    fn start(&mut self, target: &str, timestamp: NaiveDateTime) -> SessionTransition {
        let periods = self.periods.entry(target.to_string()).or_default();
        periods.push(ChargingPeriod {
            target: target.to_string(),
            start: timestamp,
            stop: None,
        });

        SessionTransition::Started {
            index: periods.len() - 1,
        }
    }

    // The earliest open period wins, even when later ones are open too.
    fn stop(&mut self, target: &str, timestamp: NaiveDateTime) -> SessionTransition {
        let Some(periods) = self.periods.get_mut(target) else {
            return SessionTransition::UnmatchedStop;
        };

        for (index, period) in periods.iter_mut().enumerate() {
            if period.stop.is_none() {
                period.stop = Some(timestamp);
                return SessionTransition::Stopped { index };
            }
        }

        SessionTransition::UnmatchedStop
    }
}
