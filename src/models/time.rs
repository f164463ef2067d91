//! Timestamp and date codecs for the non-ISO formats emitted by the Tempo worklog API.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use thiserror::Error;

/// Literal token Tempo sends in place of a missing timestamp.
pub const NULL_SENTINEL: &str = "null";

/// chrono format used to render worklog timestamps, e.g. `2021-03-15T09:30:00.000`.
pub const WORKLOG_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// chrono format used to render worklog dates, e.g. `2021-03-15`.
pub const WORKLOG_DATE_FORMAT: &str = "%Y-%m-%d";

const TIME_LAYOUT: &str = "YYYY-MM-DDTHH:MM:SS.mmm";
const DATE_LAYOUT: &str = "YYYY-MM-DD";

// `%.f` accepts any fraction width; the layout check pins it to three digits.
const TIME_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Raised when a temporal field does not hold a value in its wire layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{input:?} does not match layout {layout}")]
    Layout { input: String, layout: &'static str },
    #[error("{input:?} is not a valid {layout} value: {source}")]
    OutOfRange {
        input: String,
        layout: &'static str,
        #[source]
        source: chrono::ParseError,
    },
    #[error("{input:?} has a seconds field outside 00-59")]
    LeapSecond { input: String, layout: &'static str },
}

impl DecodeError {
    /// Returns the text that failed to decode.
    pub fn input(&self) -> &str {
        match self {
            DecodeError::Layout { input, .. }
            | DecodeError::OutOfRange { input, .. }
            | DecodeError::LeapSecond { input, .. } => input,
        }
    }

    /// Returns the layout the text was expected to follow.
    pub fn layout(&self) -> &'static str {
        match self {
            DecodeError::Layout { layout, .. }
            | DecodeError::OutOfRange { layout, .. }
            | DecodeError::LeapSecond { layout, .. } => layout,
        }
    }
}

/// Moment with millisecond precision as sent in `dateCreated`, `dateUpdated` and `dateStarted`.
///
/// The zero value holds no instant at all. It is distinct from every real
/// timestamp, the Unix epoch included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorklogTime(Option<NaiveDateTime>);

impl WorklogTime {
    pub const ZERO: WorklogTime = WorklogTime(None);

    pub fn new(value: NaiveDateTime) -> Self {
        Self(Some(value))
    }

    /// Decodes `YYYY-MM-DDTHH:MM:SS.mmm`, or the `null` sentinel into [`WorklogTime::ZERO`].
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        if text == NULL_SENTINEL {
            return Ok(Self::ZERO);
        }
        if !matches_layout(text, TIME_LAYOUT) {
            return Err(DecodeError::Layout {
                input: text.to_string(),
                layout: TIME_LAYOUT,
            });
        }
        let value = NaiveDateTime::parse_from_str(text, TIME_PARSE_FORMAT).map_err(|source| {
            DecodeError::OutOfRange {
                input: text.to_string(),
                layout: TIME_LAYOUT,
                source,
            }
        })?;
        // chrono stores `:60` as a leap second; the wire format never carries one.
        if value.nanosecond() >= 1_000_000_000 {
            return Err(DecodeError::LeapSecond {
                input: text.to_string(),
                layout: TIME_LAYOUT,
            });
        }
        Ok(Self::new(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<NaiveDateTime> {
        self.0
    }
}

impl From<NaiveDateTime> for WorklogTime {
    fn from(value: NaiveDateTime) -> Self {
        Self::new(value)
    }
}

impl FromStr for WorklogTime {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WorklogTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value.format(WORKLOG_TIME_FORMAT)),
            None => f.write_str(NULL_SENTINEL),
        }
    }
}

/// Calendar date as sent by Tempo and accepted by the `dateFrom`/`dateTo` filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorklogDate(Option<NaiveDate>);

impl WorklogDate {
    pub const ZERO: WorklogDate = WorklogDate(None);

    pub fn new(value: NaiveDate) -> Self {
        Self(Some(value))
    }

    /// Decodes `YYYY-MM-DD`, or the `null` sentinel into [`WorklogDate::ZERO`].
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        if text == NULL_SENTINEL {
            return Ok(Self::ZERO);
        }
        if !matches_layout(text, DATE_LAYOUT) {
            return Err(DecodeError::Layout {
                input: text.to_string(),
                layout: DATE_LAYOUT,
            });
        }
        NaiveDate::parse_from_str(text, WORKLOG_DATE_FORMAT)
            .map(Self::new)
            .map_err(|source| DecodeError::OutOfRange {
                input: text.to_string(),
                layout: DATE_LAYOUT,
                source,
            })
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<NaiveDate> {
        self.0
    }
}

impl From<NaiveDate> for WorklogDate {
    fn from(value: NaiveDate) -> Self {
        Self::new(value)
    }
}

impl FromStr for WorklogDate {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WorklogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value.format(WORKLOG_DATE_FORMAT)),
            None => f.write_str(NULL_SENTINEL),
        }
    }
}

/// Hooks a wrapper's text decoder into serde.
trait WireCodec: Sized {
    const LAYOUT: &'static str;
    const ZERO: Self;

    fn decode(text: &str) -> Result<Self, DecodeError>;
}

impl WireCodec for WorklogTime {
    const LAYOUT: &'static str = TIME_LAYOUT;
    const ZERO: Self = WorklogTime::ZERO;

    fn decode(text: &str) -> Result<Self, DecodeError> {
        WorklogTime::parse(text)
    }
}

impl WireCodec for WorklogDate {
    const LAYOUT: &'static str = DATE_LAYOUT;
    const ZERO: Self = WorklogDate::ZERO;

    fn decode(text: &str) -> Result<Self, DecodeError> {
        WorklogDate::parse(text)
    }
}

struct WireVisitor<T>(PhantomData<T>);

impl<'de, T: WireCodec> Visitor<'de> for WireVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a string formatted as {} or \"null\"", T::LAYOUT)
    }

    fn visit_str<E>(self, value: &str) -> Result<T, E>
    where
        E: de::Error,
    {
        T::decode(value).map_err(E::custom)
    }

    // A bare JSON null reaching a non-optional wrapper decodes like the sentinel.
    fn visit_unit<E>(self) -> Result<T, E>
    where
        E: de::Error,
    {
        Ok(T::ZERO)
    }

    fn visit_none<E>(self) -> Result<T, E>
    where
        E: de::Error,
    {
        Ok(T::ZERO)
    }
}

impl<'de> Deserialize<'de> for WorklogTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WireVisitor(PhantomData))
    }
}

impl<'de> Deserialize<'de> for WorklogDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WireVisitor(PhantomData))
    }
}

/// Checks `text` against a layout where the letters `YMDHSm` stand for one ASCII digit.
fn matches_layout(text: &str, layout: &str) -> bool {
    text.len() == layout.len()
        && text.bytes().zip(layout.bytes()).all(|(actual, expected)| match expected {
            b'Y' | b'M' | b'D' | b'H' | b'S' | b'm' => actual.is_ascii_digit(),
            literal => actual == literal,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moment(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_milli_opt(h, mi, s, ms))
            .unwrap()
    }

    #[test]
    fn parses_timestamp_with_milliseconds() {
        let parsed = WorklogTime::parse("2021-03-15T09:30:00.123").unwrap();
        assert_eq!(parsed.get(), Some(moment(2021, 3, 15, 9, 30, 0, 123)));
    }

    #[test]
    fn timestamp_display_round_trips_to_same_instant() {
        for text in [
            "2021-03-15T09:30:00.000",
            "1999-12-31T23:59:59.999",
            "2024-02-29T00:00:00.001",
        ] {
            let parsed = WorklogTime::parse(text).unwrap();
            let again = WorklogTime::parse(&parsed.to_string()).unwrap();
            assert_eq!(parsed, again);
            assert_eq!(parsed.to_string(), text);
        }
    }

    #[test]
    fn sentinel_decodes_to_zero() {
        assert!(WorklogTime::parse("null").unwrap().is_zero());
        assert!(WorklogDate::parse("null").unwrap().is_zero());
        assert_eq!(WorklogTime::ZERO.to_string(), "null");
    }

    #[test]
    fn sentinel_is_case_sensitive() {
        for text in ["Null", "NULL", " null", "null "] {
            assert!(matches!(
                WorklogTime::parse(text),
                Err(DecodeError::Layout { .. })
            ));
            assert!(WorklogDate::parse(text).is_err());
        }
    }

    #[test]
    fn zero_is_not_the_epoch() {
        let epoch = WorklogTime::parse("1970-01-01T00:00:00.000").unwrap();
        assert!(!epoch.is_zero());
        assert_ne!(epoch, WorklogTime::ZERO);
        assert_eq!(WorklogTime::default(), WorklogTime::ZERO);

        let epoch_day = WorklogDate::parse("1970-01-01").unwrap();
        assert_ne!(epoch_day, WorklogDate::default());
    }

    #[test]
    fn rejects_timestamps_outside_layout() {
        for text in [
            "",
            "2021-03-15",
            "2021-03-15T09:30:00",
            "2021-03-15T09:30:00.1",
            "2021-03-15T09:30:00.1234",
            "2021-03-15 09:30:00.000",
            "2021/03/15T09:30:00.000",
            "2021-03-15T09:30:00.000Z",
            "2021-03-15T09:30:00.000+01:00",
            "2021-3-15T09:30:00.000",
        ] {
            let err = WorklogTime::parse(text).unwrap_err();
            assert_eq!(err.input(), text);
            assert_eq!(err.layout(), "YYYY-MM-DDTHH:MM:SS.mmm");
        }
    }

    #[test]
    fn rejects_impossible_calendar_values() {
        let err = WorklogTime::parse("2021-13-15T09:30:00.000").unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { .. }));

        for text in [
            "2021-03-15T09:30:60.000",
            "2021-03-15T09:30:60.500",
            "2021-03-15T23:59:60.000",
            "2021-03-15T09:30:61.000",
            "2021-03-15T24:00:00.000",
        ] {
            let err = WorklogTime::parse(text).unwrap_err();
            assert_eq!(err.input(), text);
            assert!(matches!(
                err,
                DecodeError::OutOfRange { .. } | DecodeError::LeapSecond { .. }
            ));
        }
        assert!(matches!(
            WorklogTime::parse("2021-03-15T23:59:60.000"),
            Err(DecodeError::LeapSecond { .. })
        ));

        let err = WorklogDate::parse("2021-02-30").unwrap_err();
        assert!(matches!(err, DecodeError::OutOfRange { .. }));
        assert!(err.to_string().contains("2021-02-30"));
    }

    #[test]
    fn parses_and_formats_dates() {
        let parsed: WorklogDate = "2021-01-31".parse().unwrap();
        assert_eq!(parsed.get(), NaiveDate::from_ymd_opt(2021, 1, 31));
        assert_eq!(parsed.to_string(), "2021-01-31");

        for text in ["2021-1-31", "2021-01-31T00:00:00.000", "20210131", "2021-01-31 "] {
            assert!(matches!(
                WorklogDate::parse(text),
                Err(DecodeError::Layout { .. })
            ));
        }
    }

    #[test]
    fn deserializes_from_json_strings() {
        let parsed: WorklogTime = serde_json::from_str("\"2021-03-15T09:30:00.000\"").unwrap();
        assert_eq!(parsed.get(), Some(moment(2021, 3, 15, 9, 30, 0, 0)));

        let sentinel: WorklogTime = serde_json::from_str("\"null\"").unwrap();
        assert!(sentinel.is_zero());

        let date: WorklogDate = serde_json::from_str("\"2021-03-15\"").unwrap();
        assert_eq!(date.get(), NaiveDate::from_ymd_opt(2021, 3, 15));
    }

    #[test]
    fn bare_json_null_is_zero_but_optional_null_is_absent() {
        let bare: WorklogTime = serde_json::from_str("null").unwrap();
        assert!(bare.is_zero());

        let optional: Option<WorklogTime> = serde_json::from_str("null").unwrap();
        assert!(optional.is_none());

        let quoted: Option<WorklogTime> = serde_json::from_str("\"null\"").unwrap();
        assert_eq!(quoted, Some(WorklogTime::ZERO));
    }

    #[test]
    fn json_decode_failures_surface_the_input() {
        let err = serde_json::from_str::<WorklogTime>("\"15/03/2021\"").unwrap_err();
        assert!(err.to_string().contains("15/03/2021"));

        let err = serde_json::from_str::<WorklogDate>("20210315").unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
