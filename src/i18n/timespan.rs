//! Duration unit selection and rounding for `FormatTimespan`.
//!
//! This module decides *which* message to show and *what number* goes
//! into it; the wording itself comes from the string tables.
//!
//! ```text
//! |secs| <  60        → seconds
//! |secs| <  3600      → minutes
//! |secs| <  86400     → hours
//! |secs| <  30.417 d  → days
//! |secs| <  365 d     → months
//! otherwise           → years
//! ```

use log::warn;

use crate::rpc::messages::TimespanContext;

const SECOND: f32 = 1.0;
const MINUTE: f32 = 60.0 * SECOND;
const HOUR: f32 = 60.0 * MINUTE;
const DAY: f32 = 24.0 * HOUR;
const MONTH: f32 = 30.417 * DAY;
const YEAR: f32 = 365.0 * DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimespanUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl TimespanUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

/// A duration expressed in its natural display unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timespan {
    secs: f32,
    unit: TimespanUnit,
}

impl Timespan {
    /// Pick the natural unit for `secs`.
    pub fn natural(secs: f32) -> Self {
        let abs = secs.abs();
        let unit = if abs < MINUTE {
            TimespanUnit::Seconds
        } else if abs < HOUR {
            TimespanUnit::Minutes
        } else if abs < DAY {
            TimespanUnit::Hours
        } else if abs < MONTH {
            TimespanUnit::Days
        } else if abs < YEAR {
            TimespanUnit::Months
        } else {
            TimespanUnit::Years
        };
        Self { secs, unit }
    }

    pub fn unit(&self) -> TimespanUnit {
        self.unit
    }

    /// The duration in its unit, unrounded.
    pub fn as_unit(&self) -> f32 {
        let divisor = match self.unit {
            TimespanUnit::Seconds => SECOND,
            TimespanUnit::Minutes => MINUTE,
            TimespanUnit::Hours => HOUR,
            TimespanUnit::Days => DAY,
            TimespanUnit::Months => MONTH,
            TimespanUnit::Years => YEAR,
        };
        self.secs / divisor
    }

    /// Seconds and days as integers, other units to one decimal place.
    pub fn as_rounded_unit(&self) -> f32 {
        match self.unit {
            TimespanUnit::Seconds | TimespanUnit::Days => self.as_unit().round(),
            _ => round_tenths(self.as_unit()),
        }
    }

    /// Months and years to one decimal place, everything else as integers.
    pub fn as_answer_button_unit(&self) -> f32 {
        match self.unit {
            TimespanUnit::Months | TimespanUnit::Years => round_tenths(self.as_unit()),
            _ => self.as_unit().round(),
        }
    }
}

fn round_tenths(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

/// Message key and `amount` argument for a duration in a display context.
#[derive(Debug, Clone, PartialEq)]
pub struct TimespanMessage {
    pub key: String,
    pub amount: f64,
    pub unit: TimespanUnit,
}

/// Choose the message for `seconds` in `context`.
///
/// Non-finite input is shown as zero seconds.
pub fn timespan_message(seconds: f32, context: TimespanContext) -> TimespanMessage {
    let seconds = if seconds.is_finite() {
        seconds
    } else {
        warn!("format_timespan: non-finite input {}, showing 0", seconds);
        0.0
    };
    let span = Timespan::natural(seconds);
    let (prefix, amount) = match context {
        TimespanContext::Precise => ("scheduling-time-span", span.as_rounded_unit()),
        TimespanContext::Intervals => ("scheduling-answer-button-time", span.as_rounded_unit()),
        TimespanContext::AnswerButtons => {
            ("scheduling-answer-button-time", span.as_answer_button_unit())
        }
    };
    // Normalise -0.0 so it renders as "0".
    let amount = if amount == 0.0 { 0.0 } else { f64::from(amount) };
    TimespanMessage {
        key: format!("{}-{}", prefix, span.unit.suffix()),
        amount: round_f64_tenths(amount),
        unit: span.unit,
    }
}

/// f32 → f64 widening exposes binary noise (0.1f32 = 0.10000000149);
/// re-round so the string tables see the intended value.
fn round_f64_tenths(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_boundaries() {
        assert_eq!(Timespan::natural(0.0).unit(), TimespanUnit::Seconds);
        assert_eq!(Timespan::natural(59.0).unit(), TimespanUnit::Seconds);
        assert_eq!(Timespan::natural(60.0).unit(), TimespanUnit::Minutes);
        assert_eq!(Timespan::natural(3600.0).unit(), TimespanUnit::Hours);
        assert_eq!(Timespan::natural(86_400.0).unit(), TimespanUnit::Days);
        assert_eq!(Timespan::natural(40.0 * DAY).unit(), TimespanUnit::Months);
        assert_eq!(Timespan::natural(400.0 * DAY).unit(), TimespanUnit::Years);
        assert_eq!(Timespan::natural(-120.0).unit(), TimespanUnit::Minutes);
    }

    #[test]
    fn precise_rounding() {
        let m = timespan_message(90.0, TimespanContext::Precise);
        assert_eq!(m.key, "scheduling-time-span-minutes");
        assert!((m.amount - 1.5).abs() < f64::EPSILON);

        let d = timespan_message(1.6 * DAY, TimespanContext::Precise);
        assert_eq!(d.key, "scheduling-time-span-days");
        assert!((d.amount - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn answer_buttons_round_to_integers_below_months() {
        let m = timespan_message(90.0, TimespanContext::AnswerButtons);
        assert_eq!(m.key, "scheduling-answer-button-time-minutes");
        assert!((m.amount - 2.0).abs() < f64::EPSILON);

        let mo = timespan_message(45.0 * DAY, TimespanContext::AnswerButtons);
        assert_eq!(mo.key, "scheduling-answer-button-time-months");
        assert!((mo.amount - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_and_non_finite() {
        let z = timespan_message(0.0, TimespanContext::Precise);
        assert_eq!(z.key, "scheduling-time-span-seconds");
        assert!(z.amount.abs() < f64::EPSILON);

        let n = timespan_message(f32::NAN, TimespanContext::Intervals);
        assert_eq!(n.key, "scheduling-answer-button-time-seconds");
        assert!(n.amount.abs() < f64::EPSILON);
    }
}
