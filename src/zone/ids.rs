//! Zero-padded room and zone identifiers.

use thiserror::Error;

/// Width of each segment of a composite key.
pub const ID_WIDTH: usize = 3;

/// Smallest identifier an author may enter.
pub const MIN_ID: i32 = -999;

/// Largest identifier an author may enter.
pub const MAX_ID: i32 = 999;

/// Rejected identifier input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
    #[error("{0} is outside the range {MIN_ID}..={MAX_ID}")]
    OutOfRange(i64),
}

/// Format `|value|` left-padded with zeros to `width`, prefixed with `-` when negative.
///
/// ```
/// use zonemap::zone::zero_pad;
///
/// assert_eq!(zero_pad(-7, 3), "-007");
/// assert_eq!(zero_pad(42, 3), "042");
/// assert_eq!(zero_pad(12345, 3), "12345");
/// ```
pub fn zero_pad(value: i32, width: usize) -> String {
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{:0>width$}", value.unsigned_abs())
}

/// Parse an author-entered identifier.
///
/// Surrounding whitespace and an explicit sign are accepted; anything else
/// that is not a base-10 integer in `MIN_ID..=MAX_ID` is rejected.
pub fn parse_identifier(text: &str) -> Result<i32, IdError> {
    let trimmed = text.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| IdError::NotANumber(trimmed.to_string()))?;
    if !(i64::from(MIN_ID)..=i64::from(MAX_ID)).contains(&value) {
        return Err(IdError::OutOfRange(value));
    }
    i32::try_from(value).map_err(|_| IdError::OutOfRange(value))
}

/// Build the `zone:room` key that identifies a room across zones.
pub fn composite_key(zone_id: i32, room_id: i32) -> String {
    format!(
        "{}:{}",
        zero_pad(zone_id, ID_WIDTH),
        zero_pad(room_id, ID_WIDTH)
    )
}

/// Split a composite key into its zone and room segments.
///
/// Returns `None` unless the key has exactly one `:` with text on both sides.
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    let (zone, room) = key.split_once(':')?;
    if zone.is_empty() || room.is_empty() || room.contains(':') {
        return None;
    }
    Some((zone, room))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_pad_positive_and_negative() {
        assert_eq!(zero_pad(0, 3), "000");
        assert_eq!(zero_pad(42, 3), "042");
        assert_eq!(zero_pad(-7, 3), "-007");
        assert_eq!(zero_pad(-999, 3), "-999");
    }

    #[test]
    fn test_zero_pad_wider_values_exceed_width() {
        assert_eq!(zero_pad(1000, 3), "1000");
        assert_eq!(zero_pad(-1000, 3), "-1000");
    }

    #[test]
    fn test_parse_identifier_accepts_padded_and_signed() {
        assert_eq!(parse_identifier("007"), Ok(7));
        assert_eq!(parse_identifier("-007"), Ok(-7));
        assert_eq!(parse_identifier(" +12 "), Ok(12));
    }

    #[test]
    fn test_parse_identifier_rejects_garbage() {
        assert_eq!(
            parse_identifier("abc"),
            Err(IdError::NotANumber("abc".to_string()))
        );
        assert!(matches!(parse_identifier(""), Err(IdError::NotANumber(_))));
        assert!(matches!(parse_identifier("12abc"), Err(IdError::NotANumber(_))));
    }

    #[test]
    fn test_parse_identifier_rejects_out_of_range() {
        assert_eq!(parse_identifier("1000"), Err(IdError::OutOfRange(1000)));
        assert_eq!(parse_identifier("-1000"), Err(IdError::OutOfRange(-1000)));
        assert_eq!(parse_identifier("999"), Ok(999));
        assert_eq!(parse_identifier("-999"), Ok(-999));
    }

    #[test]
    fn test_composite_key_pads_both_segments() {
        assert_eq!(composite_key(1, 2), "001:002");
        assert_eq!(composite_key(-3, 45), "-003:045");
    }

    #[test]
    fn test_split_key_shapes() {
        assert_eq!(split_key("001:002"), Some(("001", "002")));
        assert_eq!(split_key("-003:045"), Some(("-003", "045")));
        assert_eq!(split_key("nowhere"), None);
        assert_eq!(split_key(":002"), None);
        assert_eq!(split_key("001:"), None);
        assert_eq!(split_key("001:002:003"), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn zero_pad_width_matches_sign(value in MIN_ID..=MAX_ID) {
                let padded = zero_pad(value, ID_WIDTH);
                if value < 0 {
                    prop_assert_eq!(padded.len(), ID_WIDTH + 1);
                } else {
                    prop_assert_eq!(padded.len(), ID_WIDTH);
                }
            }

            #[test]
            fn parse_reads_back_padded_value(value in MIN_ID..=MAX_ID) {
                prop_assert_eq!(parse_identifier(&zero_pad(value, ID_WIDTH)), Ok(value));
            }

            #[test]
            fn composite_key_always_splits(zone in MIN_ID..=MAX_ID, room in MIN_ID..=MAX_ID) {
                let key = composite_key(zone, room);
                let (zone_seg, room_seg) = split_key(&key).unwrap();
                prop_assert_eq!(parse_identifier(zone_seg), Ok(zone));
                prop_assert_eq!(parse_identifier(room_seg), Ok(room));
            }
        }
    }
}
