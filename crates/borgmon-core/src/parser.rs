//! Parser for lines of a BorgBackup `transactions` log.
//!
//! A line looks like:
//!
//! ```text
//! transaction 6374, UTC time 2024-11-30T11:45:36.870201
//! ```

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::types::TransactionRecord;

const NUMBER_PREFIX: &str = "transaction ";
const TIME_MARKER: &str = "UTC time";

/// Fixed timestamp layout, always six fractional digits.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Reasons a transaction line could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid line format: {line:?}")]
    Malformed { line: String },

    #[error("failed to parse transaction number from {field:?}")]
    BadNumber { field: String },

    #[error("failed to parse UTC time from {field:?}")]
    BadTimestamp { field: String },
}

/// Parse a single log line into a [`TransactionRecord`].
///
/// Only the first two comma-separated fields are inspected. Sub-second
/// precision of the timestamp is discarded.
pub fn parse_transaction_line(line: &str) -> Result<TransactionRecord, ParseError> {
    let mut fields = line.split(',');
    let (Some(number_field), Some(time_field)) = (fields.next(), fields.next()) else {
        return Err(ParseError::Malformed {
            line: line.to_string(),
        });
    };

    let number = number_field
        .strip_prefix(NUMBER_PREFIX)
        .unwrap_or(number_field)
        .trim();
    let sequence_number = number.parse::<u64>().map_err(|_| ParseError::BadNumber {
        field: number_field.to_string(),
    })?;

    let bad_timestamp = || ParseError::BadTimestamp {
        field: time_field.to_string(),
    };
    let time = time_field.replace(TIME_MARKER, "");
    let time = time.trim();
    if !has_six_digit_fraction(time) {
        return Err(bad_timestamp());
    }
    let timestamp = NaiveDateTime::parse_from_str(time, TIMESTAMP_FORMAT)
        .map_err(|_| bad_timestamp())?
        .and_utc()
        .timestamp();

    Ok(TransactionRecord {
        sequence_number,
        timestamp,
    })
}

/// chrono treats the fraction of `%.6f` as optional when parsing, so the
/// digit count is checked separately.
fn has_six_digit_fraction(time: &str) -> bool {
    time.rsplit_once('.')
        .is_some_and(|(_, frac)| frac.len() == 6 && frac.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_borg_line() {
        let record =
            parse_transaction_line("transaction 6374, UTC time 2024-11-30T11:45:36.870201")
                .unwrap();
        assert_eq!(record.sequence_number, 6374);
        // 2024-11-30T11:45:36Z, fraction truncated.
        assert_eq!(record.timestamp, 1_732_967_136);
    }

    #[test]
    fn fraction_is_truncated_not_rounded() {
        let record =
            parse_transaction_line("transaction 1, UTC time 2024-01-01T00:00:00.999999").unwrap();
        assert_eq!(record.timestamp, 1_704_067_200);
    }

    #[test]
    fn tolerates_extra_whitespace_and_fields() {
        let record = parse_transaction_line(
            "transaction  42 ,   UTC time   2024-01-01T00:00:00.000000, trailing",
        )
        .unwrap();
        assert_eq!(record.sequence_number, 42);
        assert_eq!(record.timestamp, 1_704_067_200);
    }

    #[test]
    fn empty_line_is_malformed() {
        assert!(matches!(
            parse_transaction_line(""),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = parse_transaction_line("garbage").unwrap_err();
        assert_eq!(
            err,
            ParseError::Malformed {
                line: "garbage".to_string()
            }
        );
    }

    #[test]
    fn non_numeric_transaction_is_bad_number() {
        assert!(matches!(
            parse_transaction_line("transaction abc, UTC time 2024-11-30T11:45:36.870201"),
            Err(ParseError::BadNumber { .. })
        ));
    }

    #[test]
    fn negative_transaction_is_bad_number() {
        assert!(matches!(
            parse_transaction_line("transaction -3, UTC time 2024-11-30T11:45:36.870201"),
            Err(ParseError::BadNumber { .. })
        ));
    }

    #[test]
    fn unparseable_time_is_bad_timestamp() {
        assert!(matches!(
            parse_transaction_line("transaction 1, UTC time not-a-time"),
            Err(ParseError::BadTimestamp { .. })
        ));
    }

    #[test]
    fn missing_fraction_is_bad_timestamp() {
        assert!(matches!(
            parse_transaction_line("transaction 1, UTC time 2024-11-30T11:45:36"),
            Err(ParseError::BadTimestamp { .. })
        ));
    }

    #[test]
    fn wrong_fraction_width_is_bad_timestamp() {
        for time in ["2024-11-30T11:45:36.87", "2024-11-30T11:45:36.870201123"] {
            let line = format!("transaction 1, UTC time {time}");
            assert!(
                matches!(
                    parse_transaction_line(&line),
                    Err(ParseError::BadTimestamp { .. })
                ),
                "accepted {time}"
            );
        }
    }

    #[test]
    fn other_time_layout_is_bad_timestamp() {
        assert!(matches!(
            parse_transaction_line("transaction 1, UTC time 30/11/2024 11:45:36"),
            Err(ParseError::BadTimestamp { .. })
        ));
    }

    #[test]
    fn truncated_write_fails_to_parse() {
        // Snapshot taken while borg was still appending the line.
        assert!(parse_transaction_line("transaction 6375, UTC ti").is_err());
        assert!(parse_transaction_line("transaction 6375").is_err());
    }

    #[test]
    fn error_message_carries_input() {
        let err = parse_transaction_line("transaction x, UTC time 2024-11-30T11:45:36.870201")
            .unwrap_err();
        assert!(err.to_string().contains("transaction x"));
    }
}
