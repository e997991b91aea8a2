//! Singular/plural wording for count headers.
//!
//! Operators and reviews take `""`/`"s"` (`operator`, `operators`); activities
//! take `"y"`/`"ies"` because the noun stem in messages is `activit`.

use serde::Serialize;

use crate::error::Noun;

/// The `(verb, count, suffix)` triple of a header such as
/// "There are 3 matching operators found:".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub verb: &'static str,
    pub count: usize,
    pub suffix: &'static str,
}

impl Tally {
    pub fn of(noun: Noun, count: usize) -> Self {
        let (singular, plural) = match noun {
            Noun::Operator | Noun::Review => ("", "s"),
            Noun::Activity => ("y", "ies"),
        };
        if count == 1 {
            Tally { verb: "is", count, suffix: singular }
        } else {
            Tally { verb: "are", count, suffix: plural }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_operator_is_singular() {
        assert_eq!(Tally::of(Noun::Operator, 1), Tally { verb: "is", count: 1, suffix: "" });
    }

    #[test]
    fn activities_use_ies() {
        assert_eq!(Tally::of(Noun::Activity, 3), Tally { verb: "are", count: 3, suffix: "ies" });
        assert_eq!(Tally::of(Noun::Activity, 1).suffix, "y");
    }

    #[test]
    fn zero_reads_as_plural() {
        assert_eq!(Tally::of(Noun::Review, 0).verb, "are");
        assert_eq!(Tally::of(Noun::Review, 0).suffix, "s");
    }
}
