//! Domain types for the excursion registry.
//!
//! Ownership is strictly nested: the [`Registry`](crate::registry::Registry)
//! owns operators, an [`Operator`] owns its activities, an [`Activity`] owns
//! its reviews. Every ID is generated once at creation and never changes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum length (in characters, after trimming) of operator and activity names.
pub const MIN_NAME_LEN: usize = 3;

/// Author recorded for reviews submitted anonymously.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Display sentinel for a resolution with no text.
pub const RESOLUTION_PLACEHOLDER: &str = "-";

/// Case-insensitive equality used for names and user-supplied IDs.
pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Case-insensitive match against user-supplied text.
            pub fn matches(&self, candidate: &str) -> bool {
                eq_ignore_case(&self.0, candidate.trim())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

id_newtype! {
    /// `<INITIALS>-<LOCATION ABBREVIATION>-<NNN>`, e.g. `AT-AKL-001`.
    OperatorId
}

id_newtype! {
    /// `<operator id>-<NNN>`, e.g. `AT-AKL-001-002`.
    ActivityId
}

id_newtype! {
    /// `<activity id>-R<n>`, e.g. `AT-AKL-001-002-R3`.
    ReviewId
}

impl OperatorId {
    /// Initials of each whitespace-separated word, uppercased, followed by the
    /// location abbreviation and a zero-padded per-location sequence number.
    pub fn generate(name: &str, location: Location, sequence: usize) -> Self {
        let initials: String = name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        Self(format!("{initials}-{}-{sequence:03}", location.abbreviation()))
    }
}

/// A review score in `[1, 5]`. Out-of-range input is clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn clamped(raw: i64) -> Self {
        Self(raw.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    /// Parses a signed integer (surrounding whitespace ignored) and clamps it.
    /// Returns `None` for text that is not an integer.
    pub fn parse(text: &str) -> Option<Self> {
        text.trim().parse::<i64>().ok().map(Self::clamped)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// The fixed set of locations operators can be based in.
///
/// Declaration order is the order used when reporting per-location results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Auckland,
    Hamilton,
    Tauranga,
    Taupo,
    Wellington,
    Nelson,
    Christchurch,
    Dunedin,
}

impl Location {
    /// All locations in a stable order.
    pub fn all() -> &'static [Location] {
        &[
            Location::Auckland,
            Location::Hamilton,
            Location::Tauranga,
            Location::Taupo,
            Location::Wellington,
            Location::Nelson,
            Location::Christchurch,
            Location::Dunedin,
        ]
    }

    pub fn te_reo_name(self) -> &'static str {
        match self {
            Location::Auckland     => "Tāmaki Makaurau",
            Location::Hamilton     => "Kirikiriroa",
            Location::Tauranga     => "Tauranga",
            Location::Taupo        => "Taupō",
            Location::Wellington   => "Te Whanganui-a-Tara",
            Location::Nelson       => "Whakatu",
            Location::Christchurch => "Ōtautahi",
            Location::Dunedin      => "Ōtepoti",
        }
    }

    pub fn english_name(self) -> &'static str {
        match self {
            Location::Auckland     => "Auckland",
            Location::Hamilton     => "Hamilton",
            Location::Tauranga     => "Tauranga",
            Location::Taupo        => "Taupo",
            Location::Wellington   => "Wellington",
            Location::Nelson       => "Nelson",
            Location::Christchurch => "Christchurch",
            Location::Dunedin      => "Dunedin",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Location::Auckland     => "AKL",
            Location::Hamilton     => "HLZ",
            Location::Tauranga     => "TRG",
            Location::Taupo        => "TUO",
            Location::Wellington   => "WLG",
            Location::Nelson       => "NSN",
            Location::Christchurch => "CHC",
            Location::Dunedin      => "DUD",
        }
    }

    /// `"<te reo name> | <english name>"`.
    pub fn full_name(self) -> String {
        format!("{} | {}", self.te_reo_name(), self.english_name())
    }

    /// Case-insensitive match against the te reo name, English name, or
    /// abbreviation. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Option<Location> {
        let input = input.trim();
        Self::all().iter().copied().find(|loc| {
            [loc.te_reo_name(), loc.english_name(), loc.abbreviation()]
                .iter()
                .any(|candidate| eq_ignore_case(candidate, input))
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.te_reo_name(), self.english_name())
    }
}

/// The category of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Adventure,
    Culture,
    Food,
    Scenic,
    Wildlife,
    #[default]
    Other,
}

impl ActivityType {
    pub fn all() -> &'static [ActivityType] {
        &[
            ActivityType::Adventure,
            ActivityType::Culture,
            ActivityType::Food,
            ActivityType::Scenic,
            ActivityType::Wildlife,
            ActivityType::Other,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityType::Adventure => "Adventure",
            ActivityType::Culture => "Culture",
            ActivityType::Food => "Food",
            ActivityType::Scenic => "Scenic",
            ActivityType::Wildlife => "Wildlife",
            ActivityType::Other => "Other",
        }
    }

    /// Case-insensitive parse. Unrecognised input is [`ActivityType::Other`].
    pub fn parse(input: &str) -> ActivityType {
        let input = input.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| eq_ignore_case(t.label(), input))
            .unwrap_or_default()
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three review variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewKind {
    Public,
    Private,
    Expert,
}

impl fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewKind::Public => write!(f, "Public"),
            ReviewKind::Private => write!(f, "Private"),
            ReviewKind::Expert => write!(f, "Expert"),
        }
    }
}

/// Admin response state of a private review.
///
/// `Resolved("")` is a real state: the review was answered with no text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum Resolution {
    #[default]
    Unresolved,
    Resolved(String),
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Stored text, or [`RESOLUTION_PLACEHOLDER`] when absent or blank.
    pub fn display(&self) -> &str {
        match self {
            Resolution::Resolved(text) if !text.trim().is_empty() => text,
            _ => RESOLUTION_PLACEHOLDER,
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Variant-specific review state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReviewDetail {
    Public {
        endorsed: bool,
    },
    Private {
        contact: String,
        follow_up: bool,
        resolution: Resolution,
    },
    Expert {
        recommended: bool,
        images: Vec<String>,
    },
}

/// What a private review shows beneath its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateStatus<'a> {
    /// Resolution text, or the placeholder when nothing more specific applies.
    Resolution(&'a str),
    /// Unresolved and the reviewer asked to be contacted.
    FollowUp { contact: &'a str },
}

/// Feedback attached to an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub rating: Rating,
    pub author: String,
    pub content: String,
    pub detail: ReviewDetail,
}

impl Review {
    pub fn kind(&self) -> ReviewKind {
        match self.detail {
            ReviewDetail::Public { .. } => ReviewKind::Public,
            ReviewDetail::Private { .. } => ReviewKind::Private,
            ReviewDetail::Expert { .. } => ReviewKind::Expert,
        }
    }

    /// `None` for public and expert reviews.
    pub fn private_status(&self) -> Option<PrivateStatus<'_>> {
        match &self.detail {
            ReviewDetail::Private {
                resolution: Resolution::Unresolved,
                follow_up: true,
                contact,
            } => Some(PrivateStatus::FollowUp { contact }),
            ReviewDetail::Private { resolution, .. } => {
                Some(PrivateStatus::Resolution(resolution.display()))
            }
            _ => None,
        }
    }
}

/// A bookable offering owned by exactly one operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub activity_type: ActivityType,
    pub reviews: Vec<Review>,
}

impl Activity {
    pub(crate) fn new(id: ActivityId, name: &str, activity_type: ActivityType) -> Self {
        Self {
            id,
            name: name.to_owned(),
            activity_type,
            reviews: Vec::new(),
        }
    }

    /// Mean of all review ratings, or `0.0` with no reviews. Never cached.
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating.value())).sum();
        f64::from(total) / self.reviews.len() as f64
    }

    /// True when at least one public or expert review exists.
    pub fn has_public_feedback(&self) -> bool {
        self.reviews.iter().any(|r| r.kind() != ReviewKind::Private)
    }

    pub(crate) fn next_review_id(&self) -> ReviewId {
        ReviewId(format!("{}-R{}", self.id, self.reviews.len() + 1))
    }
}

/// A named, located business offering activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operator {
    pub id: OperatorId,
    pub name: String,
    pub location: Location,
    pub activities: Vec<Activity>,
}

impl Operator {
    pub(crate) fn new(id: OperatorId, name: &str, location: Location) -> Self {
        Self {
            id,
            name: name.to_owned(),
            location,
            activities: Vec::new(),
        }
    }

    pub(crate) fn next_activity_id(&self) -> ActivityId {
        ActivityId(format!("{}-{:03}", self.id, self.activities.len() + 1))
    }

    /// True when `location` (the operator's, shared by its activities) contains
    /// the already-lowercased `keyword` in its full name or abbreviation.
    pub(crate) fn location_contains(&self, keyword: &str) -> bool {
        self.location.full_name().to_lowercase().contains(keyword)
            || self.location.abbreviation().to_lowercase().contains(keyword)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, rating: i64, detail: ReviewDetail) -> Review {
        Review {
            id: ReviewId::from(id),
            rating: Rating::clamped(rating),
            author: "Sam".to_string(),
            content: "Lovely".to_string(),
            detail,
        }
    }

    #[test]
    fn newtype_display_and_matching() {
        let id = OperatorId::from("AT-AKL-001");
        assert_eq!(id.to_string(), "AT-AKL-001");
        assert!(id.matches("at-akl-001"));
        assert!(id.matches(" AT-AKL-001 "));
        assert!(!id.matches("AT-AKL-002"));
    }

    #[test]
    fn operator_id_uses_initials_location_and_sequence() {
        let id = OperatorId::generate("Adventure Tours", Location::Auckland, 1);
        assert_eq!(id.as_str(), "AT-AKL-001");
        let id = OperatorId::generate("  west   coast kayaks ", Location::Nelson, 12);
        assert_eq!(id.as_str(), "WCK-NSN-012");
    }

    #[test]
    fn location_full_name_joins_both_names() {
        assert_eq!(Location::Auckland.full_name(), "Tāmaki Makaurau | Auckland");
        assert_eq!(Location::Dunedin.to_string(), "Ōtepoti | Dunedin");
    }

    #[test]
    fn activity_type_falls_back_to_other() {
        assert_eq!(ActivityType::parse("scenic"), ActivityType::Scenic);
        assert_eq!(ActivityType::parse("Skydiving"), ActivityType::Other);
        assert_eq!(ActivityType::parse(""), ActivityType::Other);
    }

    #[test]
    fn rating_parse_rejects_non_numeric() {
        assert_eq!(Rating::parse(" 4 ").map(Rating::value), Some(4));
        assert_eq!(Rating::parse("-3").map(Rating::value), Some(1));
        assert!(Rating::parse("four").is_none());
        assert!(Rating::parse("").is_none());
    }

    #[test]
    fn resolution_display_uses_placeholder() {
        assert_eq!(Resolution::Unresolved.display(), "-");
        assert_eq!(Resolution::Resolved("  ".into()).display(), "-");
        assert_eq!(Resolution::Resolved("Refunded".into()).display(), "Refunded");
        assert!(Resolution::Resolved(String::new()).is_resolved());
        assert!(!Resolution::Unresolved.is_resolved());
    }

    #[test]
    fn private_status_prefers_resolution_then_follow_up() {
        let unresolved_follow = review(
            "X-R1",
            3,
            ReviewDetail::Private {
                contact: "sam@example.com".into(),
                follow_up: true,
                resolution: Resolution::Unresolved,
            },
        );
        assert_eq!(
            unresolved_follow.private_status(),
            Some(PrivateStatus::FollowUp { contact: "sam@example.com" })
        );

        let unresolved_quiet = review(
            "X-R2",
            3,
            ReviewDetail::Private {
                contact: "sam@example.com".into(),
                follow_up: false,
                resolution: Resolution::Unresolved,
            },
        );
        assert_eq!(unresolved_quiet.private_status(), Some(PrivateStatus::Resolution("-")));

        let resolved = review(
            "X-R3",
            3,
            ReviewDetail::Private {
                contact: "sam@example.com".into(),
                follow_up: true,
                resolution: Resolution::Resolved("Called back".into()),
            },
        );
        assert_eq!(resolved.private_status(), Some(PrivateStatus::Resolution("Called back")));

        let public = review("X-R4", 3, ReviewDetail::Public { endorsed: false });
        assert!(public.private_status().is_none());
    }

    #[test]
    fn average_rating_is_mean_or_zero() {
        let mut activity = Activity::new(ActivityId::from("A-001"), "Kayak", ActivityType::Adventure);
        assert_eq!(activity.average_rating(), 0.0);
        for (n, rating) in [3, 4, 5].into_iter().enumerate() {
            activity.reviews.push(review(
                &format!("A-001-R{}", n + 1),
                rating,
                ReviewDetail::Public { endorsed: false },
            ));
        }
        assert_eq!(activity.average_rating(), 4.0);
    }

    #[test]
    fn private_only_feedback_is_not_public() {
        let mut activity = Activity::new(ActivityId::from("A-001"), "Kayak", ActivityType::Adventure);
        activity.reviews.push(review(
            "A-001-R1",
            5,
            ReviewDetail::Private {
                contact: "a@b.c".into(),
                follow_up: false,
                resolution: Resolution::Unresolved,
            },
        ));
        assert!(!activity.has_public_feedback());
        activity.reviews.push(review(
            "A-001-R2",
            2,
            ReviewDetail::Expert { recommended: false, images: vec![] },
        ));
        assert!(activity.has_public_feedback());
    }
}
