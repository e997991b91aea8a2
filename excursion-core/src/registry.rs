//! In-memory registry of operators, activities, and reviews.
//!
//! # Ownership
//!
//! ```text
//! Registry
//!   operators: Vec<Operator>          (insertion order)
//!     activities: Vec<Activity>       (insertion order)
//!       reviews: Vec<Review>          (insertion order)
//! ```
//!
//! Lookups are linear scans in insertion order; that order is also the
//! tie-break order for [`Registry::top_activities`].
//!
//! Every operation takes raw front-end strings and returns either borrowed
//! views into the registry or a [`RegistryError`]. Nothing here prints.
//! The registry is single-writer: callers that share it across threads must
//! serialise mutations themselves.

use crate::error::{Noun, RegistryError};
use crate::options::{ExpertReviewOptions, PrivateReviewOptions, PublicReviewOptions};
use crate::types::{
    eq_ignore_case, Activity, ActivityType, Location, Operator, OperatorId, Rating,
    Resolution, Review, ReviewDetail, ReviewId, ReviewKind, ANONYMOUS_AUTHOR, MIN_NAME_LEN,
};

/// Search keyword that matches everything.
pub const WILDCARD: &str = "*";

/// Operator-search keyword that never matches. Every location full name
/// contains `" | "`, so a literal pipe would otherwise select all operators.
pub const PIPE: &str = "|";

// ---------------------------------------------------------------------------
// Outcome views
// ---------------------------------------------------------------------------

/// An activity together with the operator that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ActivityMatch<'a> {
    pub operator: &'a Operator,
    pub activity: &'a Activity,
}

/// Confirmation of a newly attached review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReceipt {
    pub kind: ReviewKind,
    pub review_id: ReviewId,
    pub activity_name: String,
}

/// Confirmation of a resolved private review; `response` is the display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionReceipt {
    pub review_id: ReviewId,
    pub response: String,
}

/// Best-rated activity of one location.
#[derive(Debug, Clone, Copy)]
pub enum LocationHighlight<'a> {
    /// No activity at this location has a public or expert review.
    NoReviewedActivities { location: Location },
    Top {
        location: Location,
        activity: &'a Activity,
        average: f64,
    },
}

impl LocationHighlight<'_> {
    pub fn location(&self) -> Location {
        match self {
            LocationHighlight::NoReviewedActivities { location }
            | LocationHighlight::Top { location, .. } => *location,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Owns every operator. Constructed empty once per process and passed by
/// reference to command handlers.
#[derive(Debug, Default)]
pub struct Registry {
    operators: Vec<Operator>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    // -----------------------------------------------------------------------
    // 1. Operators
    // -----------------------------------------------------------------------

    /// Registers an operator at `location`.
    ///
    /// The ID sequence counts operators already at the same location, so the
    /// Nth operator in a location gets `-00N` regardless of other locations.
    pub fn create_operator(&mut self, name: &str, location: &str) -> Result<&Operator, RegistryError> {
        let name = validate_name(Noun::Operator, name)?;
        let location = Location::parse(location).ok_or_else(|| RegistryError::InvalidLocation {
            input: location.to_owned(),
        })?;

        if self
            .operators
            .iter()
            .any(|op| op.location == location && eq_ignore_case(&op.name, name))
        {
            return Err(RegistryError::DuplicateOperator {
                name: name.to_owned(),
                location,
            });
        }

        let sequence = self.operators.iter().filter(|op| op.location == location).count() + 1;
        let id = OperatorId::generate(name, location, sequence);
        tracing::debug!(operator_id = %id, location = location.abbreviation(), "operator created");

        let index = self.operators.len();
        self.operators.push(Operator::new(id, name, location));
        Ok(&self.operators[index])
    }

    /// Case-insensitive substring search over operator name, location full
    /// name, and location abbreviation. `*` lists everything; a blank keyword
    /// or a literal `|` matches nothing.
    pub fn search_operators(&self, keyword: &str) -> Result<Vec<&Operator>, RegistryError> {
        let keyword = keyword.trim().to_lowercase();
        let matches: Vec<&Operator> = match keyword.as_str() {
            "" | PIPE => Vec::new(),
            WILDCARD => self.operators.iter().collect(),
            _ => self
                .operators
                .iter()
                .filter(|op| op.name.to_lowercase().contains(&keyword) || op.location_contains(&keyword))
                .collect(),
        };
        non_empty(Noun::Operator, matches)
    }

    pub fn find_operator(&self, operator_id: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.id.matches(operator_id))
    }

    // -----------------------------------------------------------------------
    // 2. Activities
    // -----------------------------------------------------------------------

    /// Adds an activity to the operator with `operator_id`.
    ///
    /// An unrecognised `activity_type` becomes [`ActivityType::Other`].
    pub fn create_activity(
        &mut self,
        name: &str,
        activity_type: &str,
        operator_id: &str,
    ) -> Result<ActivityMatch<'_>, RegistryError> {
        let name = validate_name(Noun::Activity, name)?;
        let activity_type = ActivityType::parse(activity_type);
        let index = self
            .operators
            .iter()
            .position(|op| op.id.matches(operator_id))
            .ok_or_else(|| RegistryError::OperatorNotFound { id: operator_id.to_owned() })?;

        let operator = &mut self.operators[index];
        let id = operator.next_activity_id();
        tracing::debug!(activity_id = %id, %activity_type, operator_id = %operator.id, "activity created");
        operator.activities.push(Activity::new(id, name, activity_type));

        let operator = &self.operators[index];
        Ok(ActivityMatch {
            operator,
            activity: &operator.activities[operator.activities.len() - 1],
        })
    }

    /// Every activity of one operator, in creation order.
    pub fn view_activities(&self, operator_id: &str) -> Result<Vec<ActivityMatch<'_>>, RegistryError> {
        let operator = self
            .find_operator(operator_id)
            .ok_or_else(|| RegistryError::OperatorNotFound { id: operator_id.to_owned() })?;
        let matches = operator
            .activities
            .iter()
            .map(|activity| ActivityMatch { operator, activity })
            .collect();
        non_empty(Noun::Activity, matches)
    }

    /// Case-insensitive substring search over activity name, type, and the
    /// owning operator's location. A blank keyword is an ordinary substring
    /// and therefore matches every activity, as does `*`.
    pub fn search_activities(&self, keyword: &str) -> Result<Vec<ActivityMatch<'_>>, RegistryError> {
        let keyword = keyword.trim().to_lowercase();
        let matches = self
            .activities()
            .filter(|m| {
                keyword == WILDCARD
                    || m.activity.name.to_lowercase().contains(&keyword)
                    || m.activity.activity_type.label().to_lowercase().contains(&keyword)
                    || m.operator.location_contains(&keyword)
            })
            .collect();
        non_empty(Noun::Activity, matches)
    }

    /// All activities across all operators, operators first, then activities.
    pub fn activities(&self) -> impl Iterator<Item = ActivityMatch<'_>> {
        self.operators.iter().flat_map(|operator| {
            operator
                .activities
                .iter()
                .map(move |activity| ActivityMatch { operator, activity })
        })
    }

    pub fn find_activity(&self, activity_id: &str) -> Option<ActivityMatch<'_>> {
        self.activities().find(|m| m.activity.id.matches(activity_id))
    }

    fn find_activity_mut(&mut self, activity_id: &str) -> Option<&mut Activity> {
        self.operators
            .iter_mut()
            .flat_map(|op| op.activities.iter_mut())
            .find(|activity| activity.id.matches(activity_id))
    }

    // -----------------------------------------------------------------------
    // 3. Reviews
    // -----------------------------------------------------------------------

    /// Options: `[author, anonymous, rating, text]`. A yes `anonymous` flag
    /// records the author as [`ANONYMOUS_AUTHOR`].
    pub fn add_public_review(
        &mut self,
        activity_id: &str,
        options: &[String],
    ) -> Result<ReviewReceipt, RegistryError> {
        let opts = PublicReviewOptions::try_from(options)?;
        let author = if opts.anonymous { ANONYMOUS_AUTHOR.to_owned() } else { opts.author };
        self.attach_review(
            activity_id,
            opts.rating,
            author,
            opts.text,
            ReviewDetail::Public { endorsed: false },
        )
    }

    /// Options: `[author, contact, rating, text, follow_up]`.
    pub fn add_private_review(
        &mut self,
        activity_id: &str,
        options: &[String],
    ) -> Result<ReviewReceipt, RegistryError> {
        let opts = PrivateReviewOptions::try_from(options)?;
        self.attach_review(
            activity_id,
            opts.rating,
            opts.author,
            opts.text,
            ReviewDetail::Private {
                contact: opts.contact,
                follow_up: opts.follow_up,
                resolution: Resolution::Unresolved,
            },
        )
    }

    /// Options: `[author, rating, text, recommended]`.
    pub fn add_expert_review(
        &mut self,
        activity_id: &str,
        options: &[String],
    ) -> Result<ReviewReceipt, RegistryError> {
        let opts = ExpertReviewOptions::try_from(options)?;
        self.attach_review(
            activity_id,
            opts.rating,
            opts.author,
            opts.text,
            ReviewDetail::Expert {
                recommended: opts.recommended,
                images: Vec::new(),
            },
        )
    }

    /// All review kinds share one `-R<n>` counter per activity.
    fn attach_review(
        &mut self,
        activity_id: &str,
        rating: Rating,
        author: String,
        content: String,
        detail: ReviewDetail,
    ) -> Result<ReviewReceipt, RegistryError> {
        let activity = self
            .find_activity_mut(activity_id)
            .ok_or_else(|| RegistryError::ActivityNotFound { id: activity_id.to_owned() })?;

        let review = Review {
            id: activity.next_review_id(),
            rating,
            author,
            content,
            detail,
        };
        let receipt = ReviewReceipt {
            kind: review.kind(),
            review_id: review.id.clone(),
            activity_name: activity.name.clone(),
        };
        tracing::debug!(review_id = %receipt.review_id, kind = %receipt.kind, rating = %rating, "review added");
        activity.reviews.push(review);
        Ok(receipt)
    }

    /// The activity whose reviews should be shown. An activity with no
    /// reviews is still `Ok`; the caller reports it separately.
    pub fn display_reviews(&self, activity_id: &str) -> Result<&Activity, RegistryError> {
        self.find_activity(activity_id)
            .map(|m| m.activity)
            .ok_or_else(|| RegistryError::ActivityNotFound { id: activity_id.to_owned() })
    }

    pub fn find_review(&self, review_id: &str) -> Option<&Review> {
        self.operators
            .iter()
            .flat_map(|op| op.activities.iter())
            .flat_map(|activity| activity.reviews.iter())
            .find(|review| review.id.matches(review_id))
    }

    fn find_review_mut(&mut self, review_id: &str) -> Result<&mut Review, RegistryError> {
        self.operators
            .iter_mut()
            .flat_map(|op| op.activities.iter_mut())
            .flat_map(|activity| activity.reviews.iter_mut())
            .find(|review| review.id.matches(review_id))
            .ok_or_else(|| RegistryError::ReviewNotFound { id: review_id.to_owned() })
    }

    /// Marks a public review endorsed. Endorsing twice is harmless.
    pub fn endorse_review(&mut self, review_id: &str) -> Result<ReviewId, RegistryError> {
        let review = self.find_review_mut(review_id)?;
        match &mut review.detail {
            ReviewDetail::Public { endorsed } => {
                *endorsed = true;
                tracing::debug!(review_id = %review.id, "review endorsed");
                Ok(review.id.clone())
            }
            _ => Err(wrong_type(review, ReviewKind::Public)),
        }
    }

    /// Stores `response` on a private review. A blank response still resolves
    /// the review; it reads back as the `-` placeholder.
    pub fn resolve_review(
        &mut self,
        review_id: &str,
        response: &str,
    ) -> Result<ResolutionReceipt, RegistryError> {
        let review = self.find_review_mut(review_id)?;
        match &mut review.detail {
            ReviewDetail::Private { resolution, .. } => {
                *resolution = Resolution::Resolved(response.trim().to_owned());
                tracing::debug!(review_id = %review.id, "review resolved");
                Ok(ResolutionReceipt {
                    review_id: review.id.clone(),
                    response: resolution.display().to_owned(),
                })
            }
            _ => Err(wrong_type(review, ReviewKind::Private)),
        }
    }

    /// Appends `image` to an expert review. No deduplication.
    pub fn upload_review_image(&mut self, review_id: &str, image: &str) -> Result<ReviewId, RegistryError> {
        let review = self.find_review_mut(review_id)?;
        match &mut review.detail {
            ReviewDetail::Expert { images, .. } => {
                images.push(image.to_owned());
                tracing::debug!(review_id = %review.id, image, "review image uploaded");
                Ok(review.id.clone())
            }
            _ => Err(wrong_type(review, ReviewKind::Expert)),
        }
    }

    // -----------------------------------------------------------------------
    // 4. Aggregation
    // -----------------------------------------------------------------------

    /// One entry per location, in [`Location::all`] order.
    ///
    /// Only activities with at least one public or expert review compete; the
    /// highest average wins and ties keep the first activity encountered.
    pub fn top_activities(&self) -> Vec<LocationHighlight<'_>> {
        Location::all()
            .iter()
            .map(|&location| {
                let mut best: Option<(&Activity, f64)> = None;
                let candidates = self
                    .activities()
                    .filter(|m| m.operator.location == location)
                    .map(|m| m.activity)
                    .filter(|activity| activity.has_public_feedback());
                for activity in candidates {
                    let average = activity.average_rating();
                    if best.map_or(true, |(_, top)| average > top) {
                        best = Some((activity, average));
                    }
                }
                match best {
                    Some((activity, average)) => LocationHighlight::Top {
                        location,
                        activity,
                        average,
                    },
                    None => LocationHighlight::NoReviewedActivities { location },
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn validate_name(noun: Noun, name: &str) -> Result<&str, RegistryError> {
    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(RegistryError::InvalidName {
            noun,
            name: name.to_owned(),
        });
    }
    Ok(name)
}

fn non_empty<T>(noun: Noun, matches: Vec<T>) -> Result<Vec<T>, RegistryError> {
    if matches.is_empty() {
        Err(RegistryError::NoMatches { noun })
    } else {
        Ok(matches)
    }
}

fn wrong_type(review: &Review, expected: ReviewKind) -> RegistryError {
    tracing::debug!(review_id = %review.id, found = %review.kind(), %expected, "review type mismatch");
    RegistryError::WrongReviewType {
        id: review.id.to_string(),
        expected,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn seeded() -> Registry {
        let mut registry = Registry::new();
        registry.create_operator("Adventure Tours", "AKL").expect("operator");
        registry
            .create_activity("Bungee Jump", "Adventure", "AT-AKL-001")
            .expect("activity");
        registry
    }

    #[test]
    fn operator_id_from_initials() {
        let registry = seeded();
        assert_eq!(registry.operators()[0].id.as_str(), "AT-AKL-001");
    }

    #[test]
    fn short_name_rejected_after_trim() {
        let mut registry = Registry::new();
        let err = registry.create_operator("  ab  ", "AKL").unwrap_err();
        assert_eq!(err, RegistryError::InvalidName { noun: Noun::Operator, name: "ab".into() });
    }

    #[test]
    fn unknown_location_rejected() {
        let mut registry = Registry::new();
        let err = registry.create_operator("Kayak Co", "Mars").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidLocation { .. }));
        assert!(registry.operators().is_empty());
    }

    #[test]
    fn activity_id_extends_canonical_operator_id() {
        let mut registry = seeded();
        let created = registry
            .create_activity("Sky Walk", "adventure", "at-akl-001")
            .expect("activity");
        assert_eq!(created.activity.id.as_str(), "AT-AKL-001-002");
        assert_eq!(created.operator.name, "Adventure Tours");
    }

    #[test]
    fn review_ids_share_one_counter() {
        let mut registry = seeded();
        let a = registry
            .add_public_review("AT-AKL-001-001", &opts(&["Ana", "n", "4", "Fun"]))
            .expect("public");
        let b = registry
            .add_private_review("AT-AKL-001-001", &opts(&["Ben", "ben@x.nz", "2", "Cold", "y"]))
            .expect("private");
        let c = registry
            .add_expert_review("AT-AKL-001-001", &opts(&["Cai", "5", "Superb", "yes"]))
            .expect("expert");
        assert_eq!(a.review_id.as_str(), "AT-AKL-001-001-R1");
        assert_eq!(b.review_id.as_str(), "AT-AKL-001-001-R2");
        assert_eq!(c.review_id.as_str(), "AT-AKL-001-001-R3");
        assert_eq!(c.kind, ReviewKind::Expert);
        assert_eq!(c.activity_name, "Bungee Jump");
    }

    #[test]
    fn anonymous_public_review_hides_author() {
        let mut registry = seeded();
        registry
            .add_public_review("AT-AKL-001-001", &opts(&["Ana", "Y", "3", "Ok"]))
            .expect("public");
        let review = registry.find_review("AT-AKL-001-001-R1").expect("review");
        assert_eq!(review.author, ANONYMOUS_AUTHOR);
    }

    #[test]
    fn malformed_options_leave_activity_untouched() {
        let mut registry = seeded();
        let err = registry
            .add_public_review("AT-AKL-001-001", &opts(&["Ana", "n", "four", "Fun"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::MalformedOptions { kind: ReviewKind::Public, .. }));
        let err = registry
            .add_expert_review("AT-AKL-001-001", &opts(&["Ana", "4"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::MalformedOptions { kind: ReviewKind::Expert, .. }));
        assert!(registry.display_reviews("AT-AKL-001-001").expect("activity").reviews.is_empty());
    }

    #[test]
    fn options_are_checked_before_activity_lookup() {
        let mut registry = seeded();
        let err = registry.add_private_review("NOPE", &opts(&["only one"])).unwrap_err();
        assert!(matches!(err, RegistryError::MalformedOptions { .. }));
        let err = registry
            .add_private_review("NOPE", &opts(&["A", "a@b", "3", "t", "n"]))
            .unwrap_err();
        assert_eq!(err, RegistryError::ActivityNotFound { id: "NOPE".into() });
    }

    #[test]
    fn endorse_requires_public_review() {
        let mut registry = seeded();
        registry
            .add_expert_review("AT-AKL-001-001", &opts(&["Cai", "5", "Superb", "y"]))
            .expect("expert");
        let err = registry.endorse_review("AT-AKL-001-001-R1").unwrap_err();
        assert_eq!(
            err,
            RegistryError::WrongReviewType { id: "AT-AKL-001-001-R1".into(), expected: ReviewKind::Public }
        );
        let err = registry.endorse_review("AT-AKL-001-001-R9").unwrap_err();
        assert!(matches!(err, RegistryError::ReviewNotFound { .. }));
    }

    #[test]
    fn blank_resolution_is_resolved_with_placeholder() {
        let mut registry = seeded();
        registry
            .add_private_review("AT-AKL-001-001", &opts(&["Ben", "ben@x.nz", "2", "Cold", "y"]))
            .expect("private");
        let receipt = registry.resolve_review("at-akl-001-001-r1", "   ").expect("resolve");
        assert_eq!(receipt.response, "-");
        assert_eq!(receipt.review_id.as_str(), "AT-AKL-001-001-R1");
        let review = registry.find_review("AT-AKL-001-001-R1").expect("review");
        match &review.detail {
            ReviewDetail::Private { resolution, .. } => assert!(resolution.is_resolved()),
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn images_append_without_dedup() {
        let mut registry = seeded();
        registry
            .add_expert_review("AT-AKL-001-001", &opts(&["Cai", "5", "Superb", "y"]))
            .expect("expert");
        registry.upload_review_image("AT-AKL-001-001-R1", "jump.png").expect("upload");
        registry.upload_review_image("AT-AKL-001-001-R1", "jump.png").expect("upload");
        let review = registry.find_review("AT-AKL-001-001-R1").expect("review");
        assert_eq!(
            review.detail,
            ReviewDetail::Expert { recommended: true, images: vec!["jump.png".into(), "jump.png".into()] }
        );
    }

    #[test]
    fn top_activities_cover_every_location() {
        let registry = seeded();
        let highlights = registry.top_activities();
        assert_eq!(highlights.len(), Location::all().len());
        assert!(highlights
            .iter()
            .all(|h| matches!(h, LocationHighlight::NoReviewedActivities { .. })));
    }
}
