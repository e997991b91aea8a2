//! Positional option lists for the three review submissions.
//!
//! Each submission arrives as a list of raw fields. Wrong arity and
//! non-integer ratings are both [`RegistryError::MalformedOptions`] for every
//! review kind; ratings out of range are clamped.

use crate::error::RegistryError;
use crate::types::{Rating, ReviewKind};

/// `[author, anonymous, rating, text]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicReviewOptions {
    pub author: String,
    pub anonymous: bool,
    pub rating: Rating,
    pub text: String,
}

/// `[author, contact, rating, text, follow_up]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateReviewOptions {
    pub author: String,
    pub contact: String,
    pub rating: Rating,
    pub text: String,
    pub follow_up: bool,
}

/// `[author, rating, text, recommended]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpertReviewOptions {
    pub author: String,
    pub rating: Rating,
    pub text: String,
    pub recommended: bool,
}

impl TryFrom<&[String]> for PublicReviewOptions {
    type Error = RegistryError;

    fn try_from(fields: &[String]) -> Result<Self, Self::Error> {
        let [author, anonymous, rating, text] = fields else {
            return Err(arity(ReviewKind::Public, 4, fields.len()));
        };
        Ok(Self {
            author: author.trim().to_owned(),
            anonymous: is_yes(anonymous),
            rating: rating_field(ReviewKind::Public, rating)?,
            text: text.trim().to_owned(),
        })
    }
}

impl TryFrom<&[String]> for PrivateReviewOptions {
    type Error = RegistryError;

    fn try_from(fields: &[String]) -> Result<Self, Self::Error> {
        let [author, contact, rating, text, follow_up] = fields else {
            return Err(arity(ReviewKind::Private, 5, fields.len()));
        };
        Ok(Self {
            author: author.trim().to_owned(),
            contact: contact.trim().to_owned(),
            rating: rating_field(ReviewKind::Private, rating)?,
            text: text.trim().to_owned(),
            follow_up: is_yes(follow_up),
        })
    }
}

impl TryFrom<&[String]> for ExpertReviewOptions {
    type Error = RegistryError;

    fn try_from(fields: &[String]) -> Result<Self, Self::Error> {
        let [author, rating, text, recommended] = fields else {
            return Err(arity(ReviewKind::Expert, 4, fields.len()));
        };
        Ok(Self {
            author: author.trim().to_owned(),
            rating: rating_field(ReviewKind::Expert, rating)?,
            text: text.trim().to_owned(),
            recommended: is_yes(recommended),
        })
    }
}

/// `"y"` or `"yes"`, any case. Anything else is no.
pub fn is_yes(flag: &str) -> bool {
    matches!(flag.trim().to_lowercase().as_str(), "y" | "yes")
}

fn arity(kind: ReviewKind, expected: usize, found: usize) -> RegistryError {
    RegistryError::MalformedOptions {
        kind,
        reason: format!("expected {expected} options, found {found}"),
    }
}

fn rating_field(kind: ReviewKind, text: &str) -> Result<Rating, RegistryError> {
    Rating::parse(text).ok_or_else(|| RegistryError::MalformedOptions {
        kind,
        reason: format!("'{}' is not a whole-number rating", text.trim()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn public_options_parse_and_clamp() {
        let opts = PublicReviewOptions::try_from(fields(&[" Ana ", "YES", "9", " Great "]).as_slice())
            .expect("valid options");
        assert_eq!(opts.author, "Ana");
        assert!(opts.anonymous);
        assert_eq!(opts.rating.value(), 5);
        assert_eq!(opts.text, "Great");
    }

    #[test]
    fn wrong_arity_is_malformed_for_every_kind() {
        let three = fields(&["a", "b", "c"]);
        for err in [
            PublicReviewOptions::try_from(three.as_slice()).unwrap_err(),
            PrivateReviewOptions::try_from(three.as_slice()).unwrap_err(),
            ExpertReviewOptions::try_from(three.as_slice()).unwrap_err(),
        ] {
            assert!(matches!(err, RegistryError::MalformedOptions { .. }), "got: {err}");
        }
    }

    #[test]
    fn non_numeric_rating_is_malformed() {
        let err = ExpertReviewOptions::try_from(fields(&["Kim", "great", "text", "y"]).as_slice())
            .unwrap_err();
        match err {
            RegistryError::MalformedOptions { kind, reason } => {
                assert_eq!(kind, ReviewKind::Expert);
                assert!(reason.contains("'great'"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn private_follow_up_flag() {
        let opts = PrivateReviewOptions::try_from(
            fields(&["Lee", "lee@example.com", "0", "Too cold", "n"]).as_slice(),
        )
        .expect("valid options");
        assert!(!opts.follow_up);
        assert_eq!(opts.rating.value(), 1);
        assert_eq!(opts.contact, "lee@example.com");
    }

    #[test]
    fn yes_flags() {
        assert!(is_yes("y"));
        assert!(is_yes(" Yes "));
        assert!(!is_yes("yeah"));
        assert!(!is_yes(""));
    }
}
