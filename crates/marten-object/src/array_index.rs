//! Array index codec.
//!
//! A property key is an array index iff it is the canonical decimal text of
//! an integer in `[0, 2^32 - 2]`. `2^32 - 1` doubles as the "not an index"
//! sentinel and is therefore never an index itself.

/// Sentinel returned by [`parse_array_index`] for non-index keys
pub const NOT_AN_INDEX: u32 = u32::MAX;

/// Largest valid array index
pub const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

/// Parse a key as an array index, returning [`NOT_AN_INDEX`] when it is not
/// the canonical rendering of one.
#[inline]
pub fn parse_array_index(key: &str) -> u32 {
    let bytes = key.as_bytes();
    let Some((&first, rest)) = bytes.split_first() else {
        return NOT_AN_INDEX;
    };

    if !first.is_ascii_digit() {
        return NOT_AN_INDEX;
    }
    // "01" does not round-trip through ToString(ToUint32(..))
    if first == b'0' && !rest.is_empty() {
        return NOT_AN_INDEX;
    }

    let mut result = (first - b'0') as u64;
    for &b in rest {
        if !b.is_ascii_digit() {
            return NOT_AN_INDEX;
        }
        result = result * 10 + (b - b'0') as u64;
        if result >= NOT_AN_INDEX as u64 {
            return NOT_AN_INDEX;
        }
    }

    result as u32
}

/// Classify a key, `None` when it is not an array index
#[inline]
pub fn array_index(key: &str) -> Option<u32> {
    match parse_array_index(key) {
        NOT_AN_INDEX => None,
        index => Some(index),
    }
}

/// Canonical decimal text of an index
pub fn index_to_string(index: u32) -> String {
    itoa::Buffer::new().format(index).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_indices() {
        assert_eq!(array_index("0"), Some(0));
        assert_eq!(array_index("7"), Some(7));
        assert_eq!(array_index("10240"), Some(10240));
        assert_eq!(array_index("4294967294"), Some(MAX_ARRAY_INDEX));
    }

    #[test]
    fn test_non_canonical_keys() {
        assert_eq!(array_index(""), None);
        assert_eq!(array_index("01"), None);
        assert_eq!(array_index("00"), None);
        assert_eq!(array_index("-1"), None);
        assert_eq!(array_index("+1"), None);
        assert_eq!(array_index("1.0"), None);
        assert_eq!(array_index(" 1"), None);
        assert_eq!(array_index("1e3"), None);
        assert_eq!(array_index("length"), None);
    }

    #[test]
    fn test_reserved_and_overflow() {
        assert_eq!(parse_array_index("4294967295"), NOT_AN_INDEX);
        assert_eq!(array_index("4294967295"), None);
        assert_eq!(array_index("4294967296"), None);
        assert_eq!(array_index("99999999999999999999999"), None);
    }

    #[test]
    fn test_index_to_string() {
        assert_eq!(index_to_string(0), "0");
        assert_eq!(index_to_string(1_000_000), "1000000");
        assert_eq!(array_index(&index_to_string(MAX_ARRAY_INDEX)), Some(MAX_ARRAY_INDEX));
    }
}
