//! Local civil time → UTC resolution through the IANA tz database.
//!
//! A wall-clock time can map to one instant, two instants (the repeated
//! hour when clocks fall back) or none (the skipped hour when clocks spring
//! forward). Ambiguity is only resolved by an explicit fold; it is never
//! guessed.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use serde::Serialize;

use crate::error::{FoldCandidate, TimeError};

/// A local civil time pinned to exactly one UTC instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedInstant {
    pub utc: DateTime<Utc>,
    pub local: NaiveDateTime,
    pub zone: String,
    pub utc_offset_minutes: i32,
    pub dst: bool,
    /// The fold actually applied (only set when the local time was ambiguous).
    pub fold: Option<u8>,
}

/// Parse an IANA zone identifier.
pub fn parse_zone(zone: &str) -> Result<Tz, TimeError> {
    zone.parse::<Tz>()
        .map_err(|_| TimeError::UnknownTimeZone(zone.to_string()))
}

fn offset_minutes(dt: &DateTime<Tz>) -> i32 {
    dt.offset().fix().local_minus_utc() / 60
}

fn is_dst(dt: &DateTime<Tz>) -> bool {
    !dt.offset().dst_offset().is_zero()
}

fn resolved(
    dt: DateTime<Tz>,
    local: NaiveDateTime,
    zone: &str,
    fold: Option<u8>,
) -> ResolvedInstant {
    ResolvedInstant {
        utc: dt.with_timezone(&Utc),
        local,
        zone: zone.to_string(),
        utc_offset_minutes: offset_minutes(&dt),
        dst: is_dst(&dt),
        fold,
    }
}

/// Resolve a local date and time in `zone` to a UTC instant.
///
/// `fold` selects the occurrence of a repeated wall-clock time: 0 is the
/// earlier instant, 1 the later. It is ignored when the time is unique.
pub fn resolve_local_time(
    date: NaiveDate,
    time: NaiveTime,
    zone: &str,
    fold: Option<u8>,
) -> Result<ResolvedInstant, TimeError> {
    if let Some(f) = fold {
        if f > 1 {
            return Err(TimeError::InvalidFold(f));
        }
    }
    let tz = parse_zone(zone)?;
    let local = date.and_time(time);

    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(resolved(dt, local, zone, None)),
        LocalResult::Ambiguous(a, b) => {
            let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
            match fold {
                Some(0) => Ok(resolved(earlier, local, zone, Some(0))),
                Some(_) => Ok(resolved(later, local, zone, Some(1))),
                None => Err(TimeError::AmbiguousLocalTime {
                    local,
                    zone: zone.to_string(),
                    candidates: [
                        FoldCandidate {
                            fold: 0,
                            utc: earlier.with_timezone(&Utc),
                            utc_offset_minutes: offset_minutes(&earlier),
                        },
                        FoldCandidate {
                            fold: 1,
                            utc: later.with_timezone(&Utc),
                            utc_offset_minutes: offset_minutes(&later),
                        },
                    ],
                }),
            }
        }
        LocalResult::None => Err(TimeError::NonexistentLocalTime {
            local,
            zone: zone.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn unknown_zone() {
        let err = resolve_local_time(d(2020, 1, 1), t(0, 0), "Mars/Olympus", None).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_TIME_ZONE");
    }

    #[test]
    fn invalid_fold() {
        let err = resolve_local_time(d(2020, 1, 1), t(0, 0), "UTC", Some(2)).unwrap_err();
        assert_eq!(err, TimeError::InvalidFold(2));
    }

    #[test]
    fn winter_berlin_is_plus_one() {
        let r = resolve_local_time(d(2020, 1, 15), t(10, 0), "Europe/Berlin", None).unwrap();
        assert_eq!(r.utc_offset_minutes, 60);
        assert!(!r.dst);
        assert_eq!(r.fold, None);
    }

    #[test]
    fn fold_ignored_when_unique() {
        let a = resolve_local_time(d(2020, 7, 1), t(10, 0), "Europe/Berlin", Some(1)).unwrap();
        let b = resolve_local_time(d(2020, 7, 1), t(10, 0), "Europe/Berlin", None).unwrap();
        assert_eq!(a.utc, b.utc);
        assert!(a.dst);
    }
}
