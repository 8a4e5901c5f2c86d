//! Human-readable descriptions of cron expressions.
//!
//! Only formatting lives here; nothing in this module computes fire times.
//! The wording comes from `cron-descriptor`. [`format_cron`] reports what it
//! rejects as a [`CronError`] and [`get_cron_text`] folds every error into the
//! `"Invalid"` sentinel that the group list displays.

use cron_descriptor::cronparser::cron_expression_descriptor::{ParseException, get_description_cron};
use thiserror::Error;

/// Text shown in place of a description when an expression can't be parsed
pub const INVALID_CRON_TEXT: &str = "Invalid";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CronError {
    #[error("Malformed cron expression '{expression}' (at field {offset})")]
    Malformed { expression: String, offset: u8 },
}

impl From<ParseException> for CronError {
    fn from(e: ParseException) -> Self {
        CronError::Malformed {
            expression: e.s,
            offset: e.error_offset,
        }
    }
}

/// Describe a cron expression, never failing. Malformed expressions yield
/// [`INVALID_CRON_TEXT`].
pub fn get_cron_text(expression: &str) -> String {
    match format_cron(expression) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(expression, error = %e, "could not describe cron expression");
            INVALID_CRON_TEXT.to_string()
        }
    }
}

/// Describe a cron expression in English.
///
/// Accepts five fields (minute hour day-of-month month day-of-week), six
/// (leading seconds) or seven (trailing year), plus the `@daily` style
/// shorthands the backend scheduler understands.
pub fn format_cron(expression: &str) -> Result<String, CronError> {
    let expression = expand_shorthand(expression.trim());
    Ok(get_description_cron(expression)?)
}

fn expand_shorthand(expression: &str) -> &str {
    match expression {
        "@yearly" | "@annually" => "0 0 1 1 *",
        "@monthly" => "0 0 1 * *",
        "@weekly" => "0 0 * * 0",
        "@daily" | "@midnight" => "0 0 * * *",
        "@hourly" => "0 * * * *",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(get_cron_text("invalid garbage"), "Invalid");
        assert_eq!(get_cron_text(""), "Invalid");
        assert_eq!(get_cron_text("* * * * * * * *"), "Invalid");
    }

    #[test]
    fn midnight_every_day() {
        assert_eq!(get_cron_text("0 0 * * *"), "At 12:00 AM");
        assert_eq!(get_cron_text("@daily"), "At 12:00 AM");
        assert_eq!(get_cron_text("  0 0 * * *  "), "At 12:00 AM");
    }

    #[test]
    fn simple_cadences() {
        assert_eq!(format_cron("*/5 * * * *").unwrap(), "Every 5 minutes");
        assert_eq!(format_cron("30 11 * * *").unwrap(), "At 11:30 AM");
    }

    #[test]
    fn nth_and_last_weekdays_are_described() {
        assert_eq!(
            format_cron("0 0 * * 1#2").unwrap(),
            "At 12:00 AM, on the second Monday of the month"
        );
        assert_eq!(
            format_cron("0 0 * * 5L").unwrap(),
            "At 12:00 AM, on the last Friday of the month"
        );
        assert_eq!(
            format_cron("0 0 LW * *").unwrap(),
            "At 12:00 AM, on the last weekday of the month"
        );

        let nearest = get_cron_text("0 0 15W * *");
        assert_ne!(nearest, INVALID_CRON_TEXT);
        assert!(nearest.contains("weekday nearest day"), "{}", nearest);
    }

    #[test]
    fn reports_the_rejected_expression() {
        assert_eq!(
            format_cron("invalid garbage"),
            Err(CronError::Malformed {
                expression: "invalid garbage".to_string(),
                offset: 0,
            })
        );
        assert_eq!(
            format_cron("* * * * * * * *"),
            Err(CronError::Malformed {
                expression: "* * * * * * * *".to_string(),
                offset: 7,
            })
        );
    }
}
