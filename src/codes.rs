//! Human-facing codes

use jiff::{Timestamp, civil::Date};

/// Characters used in random code suffixes. Ambiguous glyphs (`0`/`O`, `1`/`I`) are left out.
pub const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of the random order code suffix.
pub const SUFFIX_LEN: usize = 8;

/// `GRS-YYYYMMDD-<suffix>`
pub fn order_code(day: Date, suffix: &str) -> String {
    format!("GRS-{}-{suffix}", day.strftime("%Y%m%d"))
}

/// Correlation id for the `index`th payment of an order (1-based).
pub fn payment_reference(order_code: &str, index: usize) -> String {
    format!("{order_code}-P{index}")
}

/// Code a soft-deleted row is renamed to, freeing the original for reuse.
pub fn tombstone(code: &str, deleted_at: Timestamp) -> String {
    format!("{code}~deleted~{}", deleted_at.as_millisecond())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn order_code_embeds_date() {
        assert_eq!(
            order_code(date(2026, 10, 16), "ABCD2345"),
            "GRS-20261016-ABCD2345"
        );
    }

    #[test]
    fn payment_reference_is_numbered() {
        assert_eq!(
            payment_reference("GRS-20261016-ABCD2345", 2),
            "GRS-20261016-ABCD2345-P2"
        );
    }

    #[test]
    fn tombstones_differ_per_deletion() -> TestResult {
        let first = tombstone("SAVE10", "2026-10-16T08:00:00Z".parse()?);
        let second = tombstone("SAVE10", "2026-10-16T08:00:01Z".parse()?);

        assert_ne!(first, second);
        assert!(first.starts_with("SAVE10~deleted~"), "unexpected {first}");

        Ok(())
    }
}
