//! FILENAME: engine/src/scalar.rs
//! PURPOSE: Defines the closed set of leaf values a cell can hold.
//! CONTEXT: Every column produced by the flatten engine bottoms out in one
//! of these kinds. Anything outside this set is never a leaf; it is either
//! a sequence, a nested record, or dropped.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind tag for a [`Scalar`], used in schema declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    Text,
    Int,
    Float,
    Bool,
    Rich,
    /// An absolute instant (UTC).
    Timestamp,
    /// A calendar date with no time component.
    Date,
    /// A date and time with no offset.
    DateTime,
    /// A civil instant carrying its UTC offset.
    Zoned,
}

/// A single run of styled text inside a [`RichText`] value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl RichRun {
    pub fn plain(text: impl Into<String>) -> Self {
        RichRun {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        RichRun {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        RichRun {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

/// Formatted text composed of styled runs. The engine treats it as opaque;
/// only the sink interprets the styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    pub runs: Vec<RichRun>,
}

impl RichText {
    pub fn new(runs: Vec<RichRun>) -> Self {
        RichText { runs }
    }

    /// The unstyled concatenation of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// A leaf cell value. This is the full set of supported kinds; fields of
/// any other shape never reach a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Rich(RichText),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Text(_) => ScalarKind::Text,
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::Rich(_) => ScalarKind::Rich,
            Scalar::Timestamp(_) => ScalarKind::Timestamp,
            Scalar::Date(_) => ScalarKind::Date,
            Scalar::DateTime(_) => ScalarKind::DateTime,
            Scalar::Zoned(_) => ScalarKind::Zoned,
        }
    }

    /// Returns the display value of the scalar as a String.
    /// Number formatting beyond this is the sink's concern.
    pub fn display_value(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Scalar::Bool(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
            Scalar::Rich(rich) => rich.plain_text(),
            Scalar::Timestamp(ts) => ts.to_rfc3339(),
            Scalar::Date(d) => d.to_string(),
            Scalar::DateTime(dt) => dt.to_string(),
            Scalar::Zoned(z) => z.to_rfc3339(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<RichText> for Scalar {
    fn from(value: RichText) -> Self {
        Scalar::Rich(value)
    }
}

impl From<DateTime<Utc>> for Scalar {
    fn from(value: DateTime<Utc>) -> Self {
        Scalar::Timestamp(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Scalar::Date(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Scalar::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for Scalar {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Scalar::Zoned(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(Scalar::from("hi").kind(), ScalarKind::Text);
        assert_eq!(Scalar::from(3).kind(), ScalarKind::Int);
        assert_eq!(Scalar::from(3.5).kind(), ScalarKind::Float);
        assert_eq!(Scalar::from(true).kind(), ScalarKind::Bool);
    }

    #[test]
    fn test_display_value_formats_whole_floats_without_decimals() {
        assert_eq!(Scalar::Float(42.0).display_value(), "42");
        assert_eq!(Scalar::Float(42.5).display_value(), "42.5");
    }

    #[test]
    fn test_rich_text_plain_text_concatenates_runs() {
        let rich = RichText::new(vec![RichRun::bold("Hello "), RichRun::plain("world")]);
        assert_eq!(rich.plain_text(), "Hello world");
        assert_eq!(Scalar::Rich(rich).kind(), ScalarKind::Rich);
    }

    #[test]
    fn test_date_display_value() {
        let date = NaiveDate::from_ymd_opt(1937, 9, 21).unwrap();
        assert_eq!(Scalar::Date(date).display_value(), "1937-09-21");
    }
}
