//! The `simple` version schema.
//!
//! A simple version is a dotted list of unsigned integers (the core),
//! optionally followed by a single `+` or `-` and a second dotted list of
//! unsigned integers (the suffix). Cores of different length are compared as
//! if the shorter one were padded with zeros, so `1`, `1.0` and `001.0.0` are
//! all equal. When the cores are equal the suffixes decide: two suffixes are
//! compared like cores, and a version with a suffix orders after one without.

use super::Operator;
use crate::core::{CpsError, Result};
use std::cmp::Ordering;

/// A parsed simple version.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SimpleVersion {
    core: Vec<u64>,
    suffix: Option<Vec<u64>>,
}

/// Outcome of comparing one pair of values under an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    True,
    False,
    StillEqual,
}

impl Decision {
    fn of<T: Ord>(left: &T, op: Operator, right: &T) -> Self {
        match left.cmp(right) {
            Ordering::Equal => Self::StillEqual,
            ordering if op.accepts(ordering) => Self::True,
            _ => Self::False,
        }
    }
}

fn invalid(version: &str, reason: impl Into<String>) -> CpsError {
    CpsError::InvalidVersion {
        version: version.to_string(),
        reason: reason.into(),
    }
}

fn as_numbers(version: &str, part: &str) -> Result<Vec<u64>> {
    part.split('.')
        .map(|segment| {
            segment.parse::<u64>().map_err(|e| match e.kind() {
                std::num::IntErrorKind::PosOverflow => invalid(
                    version,
                    format!("'{segment}' is too large to be represented by a 64-bit integer"),
                ),
                _ => invalid(version, format!("'{segment}' is not a valid number")),
            })
        })
        .collect()
}

fn parse(version: &str) -> Result<SimpleVersion> {
    let has_plus = version.contains('+');
    let has_minus = version.contains('-');
    if has_plus && has_minus {
        return Err(invalid(version, "a version may contain either '+' or '-', not both"));
    }

    let mut pieces = version.splitn(2, ['+', '-']);
    let core = pieces.next().unwrap_or_default();
    let suffix = pieces.next();
    if suffix.is_some_and(|s| s.contains(['+', '-'])) {
        return Err(invalid(version, "only one '+' or '-' separator is allowed"));
    }

    Ok(SimpleVersion {
        core: as_numbers(version, core)?,
        suffix: suffix.map(|s| as_numbers(version, s)).transpose()?,
    })
}

fn equalize_length(left: &mut Vec<u64>, right: &mut Vec<u64>) {
    let len = left.len().max(right.len());
    left.resize(len, 0);
    right.resize(len, 0);
}

fn compare_segments(mut left: Vec<u64>, op: Operator, mut right: Vec<u64>) -> Decision {
    equalize_length(&mut left, &mut right);
    left.iter()
        .zip(&right)
        .map(|(l, r)| Decision::of(l, op, r))
        .find(|decision| *decision != Decision::StillEqual)
        .unwrap_or(Decision::StillEqual)
}

/// Compare two simple versions.
pub(super) fn simple_compare(left: &str, op: Operator, right: &str) -> Result<bool> {
    let left = parse(left)?;
    let right = parse(right)?;

    let decision = match compare_segments(left.core, op, right.core) {
        Decision::StillEqual => match (left.suffix, right.suffix) {
            (Some(l), Some(r)) => compare_segments(l, op, r),
            (l, r) => Decision::of(&l.is_some(), op, &r.is_some()),
        },
        decided => decided,
    };

    Ok(match decision {
        Decision::True => true,
        Decision::False => false,
        Decision::StillEqual => op.accepts(Ordering::Equal),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(left: &str, op: &str, right: &str, expected: bool) {
        let op: Operator = op.parse().unwrap();
        let result = simple_compare(left, op, right)
            .unwrap_or_else(|e| panic!("unexpected error for {left} {op} {right}: {e}"));
        assert_eq!(result, expected, "Case: {left} {op} {right}");
    }

    #[test]
    fn test_core_comparisons() {
        let cases = [
            ("0", "=", "0000000", true),
            ("0.0", "=", "0", true),
            ("0.0.0", "=", "0", true),
            ("0.0.0", "=", "0.0", true),
            ("0.0.0", "=", "1.0", false),
            ("0.0.0", "=", "0.1.0", false),
            ("0.0.0", ">=", "0.0", true),
            ("0.4.0", ">=", "0.0", true),
            ("0.4.0", ">=", "3.0", false),
            ("0.4.0", ">", "0.0", true),
            ("0.0.0", ">", "3.0", false),
            ("0.0.0", "<=", "0.0", true),
            ("0.0.0", "<=", "3.0", true),
            ("6.0.0", "<=", "3.0", false),
            ("0.0.0", "<", "3.0", true),
            ("0.4.0", "<", "0.0", false),
            ("001.0.0", "=", "1", true),
            ("0.0.0", "!=", "10.0", true),
            ("0.0.0", "!=", "0", false),
        ];
        for (left, op, right, expected) in cases {
            check(left, op, right, expected);
        }
    }

    #[test]
    fn test_first_difference_decides() {
        // A later segment must not overturn an earlier decision.
        check("2.0", "<", "1.5", false);
        check("1.5", ">", "2.0", false);
        check("1.10", ">", "1.9", true);
        check("1.2.3", "<", "1.3", true);
    }

    #[test]
    fn test_suffix_comparisons() {
        let cases = [
            ("001.0.0+5", "=", "1", false),
            ("001.0.0-1", "=", "1-1", true),
            ("1+1", ">", "1", true),
            ("1-1", ">", "1", true),
            ("1+1", "=", "1-1", true),
            ("1+1", ">=", "1-1", true),
            ("1+1", "<=", "1-1", true),
            ("1+1", "!=", "1-1", false),
            ("1+1", "<", "1-1", false),
            ("1+1", ">", "1-1", false),
            ("001.0.0-1", "=", "1+001", true),
            ("1-2", ">", "1-1.9", true),
            ("1", "<", "1+0", true),
            ("2", ">", "1+9", true),
        ];
        for (left, op, right, expected) in cases {
            check(left, op, right, expected);
        }
    }

    #[test]
    fn test_reflexive_and_antisymmetric() {
        for v in ["0", "1.2.3", "10.0.1+4", "7-1.1"] {
            check(v, "=", v, true);
            check(v, "<=", v, true);
            check(v, "<", v, false);
        }
        for (a, b) in [("1", "2"), ("1.9", "1.10"), ("0.0.1", "0.1"), ("3", "3.0.0.1")] {
            check(a, "<", b, true);
            check(b, "<", a, false);
        }
    }

    #[test]
    fn test_malformed_versions() {
        for bad in ["1+2-3", "1-2-3", "1.a", "", "1..2", "1-", "18446744073709551616", "v1.0"] {
            let err = simple_compare(bad, Operator::Eq, "1").unwrap_err();
            assert!(matches!(err, CpsError::InvalidVersion { .. }), "{bad} should be rejected");
        }

        let err = simple_compare("99999999999999999999", Operator::Eq, "1").unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
