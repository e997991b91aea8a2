//! Template contexts — serializable payloads built from registry views.

use serde::Serialize;

use excursion_core::{
    types::RESOLUTION_PLACEHOLDER, ActivityMatch, LocationHighlight, Operator, PrivateStatus,
    Rating, RegistryError, Review, ReviewDetail,
};

use crate::error::RenderError;

/// One operator line.
#[derive(Debug, Clone, Serialize)]
pub struct OperatorCtx {
    pub name: String,
    pub id: String,
    pub location: String,
}

impl From<&Operator> for OperatorCtx {
    fn from(op: &Operator) -> Self {
        OperatorCtx {
            name: op.name.clone(),
            id: op.id.to_string(),
            location: op.location.full_name(),
        }
    }
}

/// One activity line, including the owning operator's name.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityCtx {
    pub name: String,
    pub id: String,
    pub activity_type: String,
    pub operator_name: String,
}

impl From<ActivityMatch<'_>> for ActivityCtx {
    fn from(m: ActivityMatch<'_>) -> Self {
        ActivityCtx {
            name: m.activity.name.clone(),
            id: m.activity.id.to_string(),
            activity_type: m.activity.activity_type.to_string(),
            operator_name: m.operator.name.clone(),
        }
    }
}

/// One review block. Trailer fields are `None`/`false` when the line is not
/// shown for this review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCtx {
    pub id: String,
    pub kind: String,
    pub rating: u8,
    pub max_rating: u8,
    pub author: String,
    pub content: String,
    pub endorsed: bool,
    pub resolution: Option<String>,
    pub follow_up_contact: Option<String>,
    pub recommended: bool,
    /// Comma-joined image names; `None` when there are no images.
    pub images: Option<String>,
}

impl From<&Review> for ReviewCtx {
    fn from(review: &Review) -> Self {
        let mut ctx = ReviewCtx {
            id: review.id.to_string(),
            kind: review.kind().to_string(),
            rating: review.rating.value(),
            max_rating: Rating::MAX,
            author: review.author.clone(),
            content: review.content.clone(),
            endorsed: false,
            resolution: None,
            follow_up_contact: None,
            recommended: false,
            images: None,
        };
        match &review.detail {
            ReviewDetail::Public { endorsed } => ctx.endorsed = *endorsed,
            ReviewDetail::Private { .. } => match review.private_status() {
                Some(PrivateStatus::FollowUp { contact }) => {
                    ctx.follow_up_contact = Some(contact.to_owned());
                }
                Some(PrivateStatus::Resolution(text)) => ctx.resolution = Some(text.to_owned()),
                None => ctx.resolution = Some(RESOLUTION_PLACEHOLDER.to_owned()),
            },
            ReviewDetail::Expert { recommended, images } => {
                ctx.recommended = *recommended;
                if !images.is_empty() {
                    ctx.images = Some(images.join(","));
                }
            }
        }
        ctx
    }
}

/// Per-location top-activity line.
#[derive(Debug, Clone, Serialize)]
pub struct HighlightCtx {
    pub location: String,
    pub activity_name: Option<String>,
    /// Average rating with two decimals.
    pub average: Option<String>,
}

impl From<&LocationHighlight<'_>> for HighlightCtx {
    fn from(highlight: &LocationHighlight<'_>) -> Self {
        match highlight {
            LocationHighlight::NoReviewedActivities { location } => HighlightCtx {
                location: location.full_name(),
                activity_name: None,
                average: None,
            },
            LocationHighlight::Top { location, activity, average } => HighlightCtx {
                location: location.full_name(),
                activity_name: Some(activity.name.clone()),
                average: Some(format!("{average:.2}")),
            },
        }
    }
}

/// Payload for every failure message. `input` is the offending name, ID, or
/// location text; the remaining fields are filled where the error has them.
#[derive(Debug, Clone, Serialize)]
pub struct FailureCtx {
    pub input: String,
    pub location: Option<String>,
    pub kind: Option<String>,
    pub reason: Option<String>,
}

impl From<&RegistryError> for FailureCtx {
    fn from(err: &RegistryError) -> Self {
        let mut ctx = FailureCtx {
            input: String::new(),
            location: None,
            kind: None,
            reason: None,
        };
        match err {
            RegistryError::InvalidName { name, .. } => ctx.input = name.clone(),
            RegistryError::InvalidLocation { input } => ctx.input = input.clone(),
            RegistryError::DuplicateOperator { name, location } => {
                ctx.input = name.clone();
                ctx.location = Some(location.full_name());
            }
            RegistryError::OperatorNotFound { id }
            | RegistryError::ActivityNotFound { id }
            | RegistryError::ReviewNotFound { id } => ctx.input = id.clone(),
            RegistryError::WrongReviewType { id, expected } => {
                ctx.input = id.clone();
                ctx.kind = Some(expected.to_string());
            }
            RegistryError::NoMatches { .. } => {}
            RegistryError::MalformedOptions { kind, reason } => {
                ctx.kind = Some(kind.to_string());
                ctx.reason = Some(reason.clone());
            }
        }
        ctx
    }
}

/// Convert any serializable context into a [`tera::Context`].
pub fn to_tera_context(value: &impl Serialize) -> Result<tera::Context, RenderError> {
    tera::Context::from_serialize(value).map_err(RenderError::from)
}
