use tracing_subscriber::{EnvFilter, fmt};

use crate::app::AppError;
use crate::domain::pipeline::{ParseEvent, ParseObserver};

pub fn init() -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(AppError::logging_init)
}

/// Forwards skipped-line notifications from the parser to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn observe(&self, event: ParseEvent<'_>) {
        match event {
            ParseEvent::Unmatched { line_number } => {
                tracing::trace!(line_number, "line does not match log grammar");
            }
            ParseEvent::Suppressed { line_number, level } => {
                tracing::trace!(line_number, level = %level, "suppressed level");
            }
            ParseEvent::Ignored {
                line_number,
                message,
            } => {
                tracing::debug!(line_number, log_message = message, "doing nothing");
            }
            ParseEvent::UnmatchedStop {
                line_number,
                target,
                timestamp,
            } => {
                tracing::debug!(
                    line_number,
                    charge_point = target,
                    timestamp = %timestamp,
                    "stop charging without open period"
                );
            }
            ParseEvent::MalformedPayload {
                line_number,
                message,
            } => {
                tracing::debug!(line_number, log_message = message, "doing nothing");
            }
        }
    }
}
