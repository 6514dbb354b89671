mod versioned_schema;

pub use versioned_schema::{
    open_versioned_db, Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
    BASE_DB_VERSION, DEFAULT_TIMESTAMP,
};

use chrono::{DateTime, TimeZone, Utc};

/// Timestamps are stored as INTEGER unix seconds.
pub fn to_db_timestamp(value: &DateTime<Utc>) -> i64 {
    value.timestamp()
}

pub fn from_db_timestamp(value: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(value, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Stored rounded up to the next whole second, so an eligibility time read back
/// is never earlier than the one computed.
pub fn to_db_timestamp_ceil(value: &DateTime<Utc>) -> i64 {
    if value.timestamp_subsec_nanos() > 0 {
        value.timestamp() + 1
    } else {
        value.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_round_trip_at_second_precision() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(from_db_timestamp(to_db_timestamp(&now)), now);
    }

    #[test]
    fn ceil_timestamp_rounds_fractional_seconds_up() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        let fractional = base + chrono::Duration::milliseconds(10);
        assert_eq!(to_db_timestamp_ceil(&fractional), base.timestamp() + 1);
        assert_eq!(to_db_timestamp_ceil(&base), base.timestamp());
    }
}
