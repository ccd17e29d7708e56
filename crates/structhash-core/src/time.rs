//! Canonical binary encoding for time values.
//!
//! Layout (15 bytes, big-endian fields):
//!
//! | offset | size | field                                          |
//! |--------|------|------------------------------------------------|
//! | 0      | 1    | version, always `1`                            |
//! | 1      | 8    | seconds since 0001-01-01T00:00:00Z (`i64`)     |
//! | 9      | 4    | nanoseconds within the second (`i32`)          |
//! | 13     | 2    | zone offset in minutes (`i16`), `-1` means UTC |
//!
//! Offsets must be whole minutes. An offset of exactly minus one minute is
//! rejected because it would be indistinguishable from UTC.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::TimeEncodingError;
use crate::kind::Kind;
use crate::structural::Structural;

/// Seconds from 0001-01-01 to 1970-01-01.
pub const UNIX_TO_INTERNAL: i64 = 62_135_596_800;

/// Encoding version byte.
pub const TIME_BINARY_VERSION: u8 = 1;

/// Length of the canonical encoding.
pub const TIME_BINARY_LEN: usize = 15;

/// An instant split into the pieces the encoding needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    /// Seconds since 0001-01-01T00:00:00Z.
    pub seconds: i64,
    /// Nanoseconds within the second.
    pub nanos: u32,
    /// Zone offset east of UTC in seconds; `None` for UTC itself.
    pub offset: Option<i32>,
}

impl TimeParts {
    /// Encode to the canonical 15-byte form.
    pub fn marshal_binary(&self) -> Result<[u8; TIME_BINARY_LEN], TimeEncodingError> {
        let offset_min: i16 = match self.offset {
            None => -1,
            Some(secs) => {
                if secs % 60 != 0 {
                    return Err(TimeEncodingError::FractionalMinuteOffset(secs));
                }
                let min = secs / 60;
                if min == -1 {
                    return Err(TimeEncodingError::UnexpectedOffset(min));
                }
                i16::try_from(min).map_err(|_| TimeEncodingError::UnexpectedOffset(min))?
            }
        };
        let nanos = i32::try_from(self.nanos).map_err(|_| TimeEncodingError::OutOfRange)?;

        let mut out = [0u8; TIME_BINARY_LEN];
        out[0] = TIME_BINARY_VERSION;
        out[1..9].copy_from_slice(&self.seconds.to_be_bytes());
        out[9..13].copy_from_slice(&nanos.to_be_bytes());
        out[13..15].copy_from_slice(&offset_min.to_be_bytes());
        Ok(out)
    }
}

/// A time-like value with a canonical binary serialization.
pub trait CanonicalTime {
    fn time_parts(&self) -> Result<TimeParts, TimeEncodingError>;

    fn marshal_binary(&self) -> Result<[u8; TIME_BINARY_LEN], TimeEncodingError> {
        self.time_parts()?.marshal_binary()
    }

    /// True for the zero instant, 0001-01-01T00:00:00Z.
    fn is_zero(&self) -> bool {
        matches!(self.time_parts(), Ok(p) if p.seconds == 0 && p.nanos == 0)
    }
}

fn from_unix(secs: i64, nanos: u32, offset: Option<i32>) -> Result<TimeParts, TimeEncodingError> {
    let seconds = secs
        .checked_add(UNIX_TO_INTERNAL)
        .ok_or(TimeEncodingError::OutOfRange)?;
    Ok(TimeParts {
        seconds,
        nanos,
        offset,
    })
}

impl CanonicalTime for SystemTime {
    fn time_parts(&self) -> Result<TimeParts, TimeEncodingError> {
        match self.duration_since(UNIX_EPOCH) {
            Ok(d) => {
                let secs = i64::try_from(d.as_secs()).map_err(|_| TimeEncodingError::OutOfRange)?;
                from_unix(secs, d.subsec_nanos(), None)
            }
            Err(before) => {
                // Before the epoch: borrow a second so nanos stay positive.
                let d = before.duration();
                let mut secs =
                    -i64::try_from(d.as_secs()).map_err(|_| TimeEncodingError::OutOfRange)?;
                let mut nanos = d.subsec_nanos();
                if nanos > 0 {
                    secs -= 1;
                    nanos = 1_000_000_000 - nanos;
                }
                from_unix(secs, nanos, None)
            }
        }
    }
}

impl CanonicalTime for DateTime<Utc> {
    fn time_parts(&self) -> Result<TimeParts, TimeEncodingError> {
        from_unix(self.timestamp(), self.timestamp_subsec_nanos(), None)
    }
}

impl CanonicalTime for DateTime<FixedOffset> {
    fn time_parts(&self) -> Result<TimeParts, TimeEncodingError> {
        from_unix(
            self.timestamp(),
            self.timestamp_subsec_nanos(),
            Some(self.offset().local_minus_utc()),
        )
    }
}

/// The zero instant, used when an absent time is hashed as a zero value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroTime;

impl CanonicalTime for ZeroTime {
    fn time_parts(&self) -> Result<TimeParts, TimeEncodingError> {
        Ok(TimeParts {
            seconds: 0,
            nanos: 0,
            offset: None,
        })
    }
}

macro_rules! time_structural {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Structural for $ty {
                fn kind(&self) -> Kind<'_> {
                    Kind::Time(self)
                }

                fn zero_value() -> Option<Box<dyn Structural>> {
                    Some(Box::new(ZeroTime))
                }
            }
        )*
    };
}

time_structural!(SystemTime, DateTime<Utc>, DateTime<FixedOffset>, ZeroTime);
