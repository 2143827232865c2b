//! Journal entry numbering (`JE-NNNNNN`), scoped per tenant and fiscal year.

/// Prefix of every entry number.
pub const ENTRY_NUMBER_PREFIX: &str = "JE-";

/// Minimum digit count; larger sequences simply grow wider.
pub const ENTRY_NUMBER_WIDTH: usize = 6;

/// Formats a sequence value as an entry number.
///
/// ```
/// use daftar_core::ledger::numbering::format_entry_number;
/// assert_eq!(format_entry_number(42), "JE-000042");
/// ```
#[must_use]
pub fn format_entry_number(sequence: u64) -> String {
    format!("{ENTRY_NUMBER_PREFIX}{sequence:0width$}", width = ENTRY_NUMBER_WIDTH)
}

/// Parses the numeric suffix of an entry number.
///
/// Returns `None` for anything that does not match `JE-<digits>`.
#[must_use]
pub fn parse_entry_number(entry_number: &str) -> Option<u64> {
    let digits = entry_number.strip_prefix(ENTRY_NUMBER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Highest parsable sequence value among existing entry numbers.
fn highest_entry_number<'a, I>(existing: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    existing.into_iter().filter_map(parse_entry_number).max()
}

/// Next sequence value after the existing entry numbers.
///
/// Starts at 1 for an empty scope. Numbers that don't match the pattern are
/// ignored rather than resetting the sequence.
pub fn next_sequence<'a, I>(existing: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    highest_entry_number(existing).map_or(1, |n| n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "JE-000001")]
    #[case(999_999, "JE-999999")]
    #[case(1_000_000, "JE-1000000")]
    fn test_format(#[case] sequence: u64, #[case] expected: &str) {
        assert_eq!(format_entry_number(sequence), expected);
    }

    #[rstest]
    #[case("JE-000001", Some(1))]
    #[case("JE-000120", Some(120))]
    #[case("JE-", None)]
    #[case("JE-12a", None)]
    #[case("JV-000001", None)]
    #[case("JE--00001", None)]
    #[case("", None)]
    fn test_parse(#[case] input: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_entry_number(input), expected);
    }

    #[test]
    fn test_empty_scope_starts_at_one() {
        assert_eq!(next_sequence(Vec::<&str>::new()), 1);
    }

    #[test]
    fn test_next_after_highest() {
        let existing = ["JE-000002", "JE-000010", "JE-000003"];
        assert_eq!(format_entry_number(next_sequence(existing)), "JE-000011");
    }

    #[test]
    fn test_unparsable_numbers_ignored() {
        assert_eq!(next_sequence(["legacy-7", "JE-000004"]), 5);
        assert_eq!(next_sequence(["legacy-7"]), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_format_then_parse(n in 1u64..10_000_000u64) {
            prop_assert_eq!(parse_entry_number(&format_entry_number(n)), Some(n));
        }

        #[test]
        fn prop_next_exceeds_all(existing in prop::collection::vec(1u64..1_000_000u64, 0..20)) {
            let numbers: Vec<String> = existing.iter().map(|n| format_entry_number(*n)).collect();
            let next = next_sequence(numbers.iter().map(String::as_str));
            prop_assert!(existing.iter().all(|n| *n < next));
        }
    }
}
