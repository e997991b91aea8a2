//! Tera message engine — [`MessageKey`], [`Operation`], and [`Renderer`].
//!
//! Every line the front end prints comes from one template. Templates are
//! embedded at compile time; a user template directory may override any of
//! them by relative name (e.g. `operator/created.tera`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use excursion_core::{
    Activity, ActivityMatch, LocationHighlight, Noun, Operator, RegistryError,
    ResolutionReceipt, ReviewId, ReviewKind, ReviewReceipt, Tally,
};

use crate::context::{
    to_tera_context, ActivityCtx, FailureCtx, HighlightCtx, OperatorCtx, ReviewCtx,
};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("operator/created.tera", include_str!("templates/operator/created.tera")),
    ("operator/entry.tera", include_str!("templates/operator/entry.tera")),
    ("operator/found.tera", include_str!("templates/operator/found.tera")),
    ("operator/no_matches.tera", include_str!("templates/operator/no_matches.tera")),
    ("operator/invalid_name.tera", include_str!("templates/operator/invalid_name.tera")),
    (
        "operator/invalid_location.tera",
        include_str!("templates/operator/invalid_location.tera"),
    ),
    ("operator/duplicate.tera", include_str!("templates/operator/duplicate.tera")),
    ("operator/not_found.tera", include_str!("templates/operator/not_found.tera")),
    ("activity/created.tera", include_str!("templates/activity/created.tera")),
    ("activity/entry.tera", include_str!("templates/activity/entry.tera")),
    ("activity/found.tera", include_str!("templates/activity/found.tera")),
    ("activity/no_matches.tera", include_str!("templates/activity/no_matches.tera")),
    ("activity/invalid_name.tera", include_str!("templates/activity/invalid_name.tera")),
    (
        "activity/invalid_operator.tera",
        include_str!("templates/activity/invalid_operator.tera"),
    ),
    ("activity/not_found.tera", include_str!("templates/activity/not_found.tera")),
    ("review/added.tera", include_str!("templates/review/added.tera")),
    (
        "review/invalid_activity.tera",
        include_str!("templates/review/invalid_activity.tera"),
    ),
    (
        "review/malformed_options.tera",
        include_str!("templates/review/malformed_options.tera"),
    ),
    ("review/found.tera", include_str!("templates/review/found.tera")),
    ("review/none.tera", include_str!("templates/review/none.tera")),
    ("review/entry.tera", include_str!("templates/review/entry.tera")),
    ("review/not_found.tera", include_str!("templates/review/not_found.tera")),
    ("review/endorsed.tera", include_str!("templates/review/endorsed.tera")),
    ("review/not_endorsed.tera", include_str!("templates/review/not_endorsed.tera")),
    ("review/resolved.tera", include_str!("templates/review/resolved.tera")),
    ("review/not_resolved.tera", include_str!("templates/review/not_resolved.tera")),
    ("review/image_added.tera", include_str!("templates/review/image_added.tera")),
    (
        "review/image_not_added.tera",
        include_str!("templates/review/image_not_added.tera"),
    ),
    ("top/none.tera", include_str!("templates/top/none.tera")),
    ("top/entry.tera", include_str!("templates/top/entry.tera")),
];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy()
        .replace('\\', "/")
        .to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((normalize_template_name(rel), contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(normalize_template_name(Path::new(name)), (*content).to_string());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            tracing::debug!(template = %name, "user template override");
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_templates(templates.into_iter().collect::<Vec<_>>())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// MessageKey
// ---------------------------------------------------------------------------

/// Every message the front end can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    OperatorCreated,
    OperatorEntry,
    OperatorsFound,
    OperatorNoMatches,
    OperatorInvalidName,
    OperatorInvalidLocation,
    OperatorDuplicate,
    OperatorNotFound,
    ActivityCreated,
    ActivityEntry,
    ActivitiesFound,
    ActivityNoMatches,
    ActivityInvalidName,
    ActivityInvalidOperator,
    ActivityNotFound,
    ReviewAdded,
    ReviewInvalidActivity,
    ReviewMalformedOptions,
    ReviewsFound,
    ReviewsNone,
    ReviewEntry,
    ReviewNotFound,
    ReviewEndorsed,
    ReviewNotEndorsed,
    ReviewResolved,
    ReviewNotResolved,
    ReviewImageAdded,
    ReviewImageNotAdded,
    TopNone,
    TopEntry,
}

impl MessageKey {
    /// All keys in a stable order.
    pub fn all() -> &'static [MessageKey] {
        use MessageKey::*;
        &[
            OperatorCreated, OperatorEntry, OperatorsFound, OperatorNoMatches,
            OperatorInvalidName, OperatorInvalidLocation, OperatorDuplicate, OperatorNotFound,
            ActivityCreated, ActivityEntry, ActivitiesFound, ActivityNoMatches,
            ActivityInvalidName, ActivityInvalidOperator, ActivityNotFound,
            ReviewAdded, ReviewInvalidActivity, ReviewMalformedOptions, ReviewsFound,
            ReviewsNone, ReviewEntry, ReviewNotFound, ReviewEndorsed, ReviewNotEndorsed,
            ReviewResolved, ReviewNotResolved, ReviewImageAdded, ReviewImageNotAdded,
            TopNone, TopEntry,
        ]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            MessageKey::OperatorCreated         => "operator/created.tera",
            MessageKey::OperatorEntry           => "operator/entry.tera",
            MessageKey::OperatorsFound          => "operator/found.tera",
            MessageKey::OperatorNoMatches       => "operator/no_matches.tera",
            MessageKey::OperatorInvalidName     => "operator/invalid_name.tera",
            MessageKey::OperatorInvalidLocation => "operator/invalid_location.tera",
            MessageKey::OperatorDuplicate       => "operator/duplicate.tera",
            MessageKey::OperatorNotFound        => "operator/not_found.tera",
            MessageKey::ActivityCreated         => "activity/created.tera",
            MessageKey::ActivityEntry           => "activity/entry.tera",
            MessageKey::ActivitiesFound         => "activity/found.tera",
            MessageKey::ActivityNoMatches       => "activity/no_matches.tera",
            MessageKey::ActivityInvalidName     => "activity/invalid_name.tera",
            MessageKey::ActivityInvalidOperator => "activity/invalid_operator.tera",
            MessageKey::ActivityNotFound        => "activity/not_found.tera",
            MessageKey::ReviewAdded             => "review/added.tera",
            MessageKey::ReviewInvalidActivity   => "review/invalid_activity.tera",
            MessageKey::ReviewMalformedOptions  => "review/malformed_options.tera",
            MessageKey::ReviewsFound            => "review/found.tera",
            MessageKey::ReviewsNone             => "review/none.tera",
            MessageKey::ReviewEntry             => "review/entry.tera",
            MessageKey::ReviewNotFound          => "review/not_found.tera",
            MessageKey::ReviewEndorsed          => "review/endorsed.tera",
            MessageKey::ReviewNotEndorsed       => "review/not_endorsed.tera",
            MessageKey::ReviewResolved          => "review/resolved.tera",
            MessageKey::ReviewNotResolved       => "review/not_resolved.tera",
            MessageKey::ReviewImageAdded        => "review/image_added.tera",
            MessageKey::ReviewImageNotAdded     => "review/image_not_added.tera",
            MessageKey::TopNone                 => "top/none.tera",
            MessageKey::TopEntry                => "top/entry.tera",
        }
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The command a failure came from. The same error reads differently per
/// command: an unknown operator ID is "not found" when listing activities but
/// "activity not created" when creating one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateOperator,
    SearchOperators,
    CreateActivity,
    ViewActivities,
    SearchActivities,
    AddReview,
    DisplayReviews,
    EndorseReview,
    ResolveReview,
    UploadReviewImage,
}

impl Operation {
    /// Template used to report `err` raised by this operation.
    pub fn failure_key(self, err: &RegistryError) -> MessageKey {
        match err {
            RegistryError::InvalidName { noun: Noun::Operator, .. } => MessageKey::OperatorInvalidName,
            RegistryError::InvalidName { .. } => MessageKey::ActivityInvalidName,
            RegistryError::InvalidLocation { .. } => MessageKey::OperatorInvalidLocation,
            RegistryError::DuplicateOperator { .. } => MessageKey::OperatorDuplicate,
            RegistryError::OperatorNotFound { .. } if self == Operation::CreateActivity => {
                MessageKey::ActivityInvalidOperator
            }
            RegistryError::OperatorNotFound { .. } => MessageKey::OperatorNotFound,
            RegistryError::ActivityNotFound { .. } if self == Operation::AddReview => {
                MessageKey::ReviewInvalidActivity
            }
            RegistryError::ActivityNotFound { .. } => MessageKey::ActivityNotFound,
            RegistryError::ReviewNotFound { .. } => MessageKey::ReviewNotFound,
            RegistryError::WrongReviewType { expected, .. } => match expected {
                ReviewKind::Public => MessageKey::ReviewNotEndorsed,
                ReviewKind::Private => MessageKey::ReviewNotResolved,
                ReviewKind::Expert => MessageKey::ReviewImageNotAdded,
            },
            RegistryError::NoMatches { noun: Noun::Operator } => MessageKey::OperatorNoMatches,
            RegistryError::NoMatches { .. } => MessageKey::ActivityNoMatches,
            RegistryError::MalformedOptions { .. } => MessageKey::ReviewMalformedOptions,
        }
    }
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering message templates with optional user overrides.
///
/// `user_template_dir` may contain `.tera` files that override embedded defaults.
/// Template names are normalised to lowercase relative paths.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    /// Render one message. Trailing newlines from template files are dropped.
    pub fn render(&self, key: MessageKey, ctx: &tera::Context) -> Result<String, RenderError> {
        let rendered = self.tera.render(key.template_name(), ctx)?;
        Ok(rendered.trim_end_matches(['\n', '\r']).to_string())
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// One method per registry outcome. Multi-line outcomes are joined with `\n`.
///
/// Create once with [`Renderer::new`] and reuse.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_overrides(None)
    }

    /// Embedded templates plus any overrides found in `user_template_dir`.
    pub fn with_overrides(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Renderer { engine: TemplateEngine::new(user_template_dir)? })
    }

    fn render(&self, key: MessageKey, ctx: &impl serde::Serialize) -> Result<String, RenderError> {
        self.engine.render(key, &to_tera_context(ctx)?)
    }

    fn render_list<T: serde::Serialize>(
        &self,
        header: MessageKey,
        header_ctx: &impl serde::Serialize,
        entry: MessageKey,
        entries: &[T],
    ) -> Result<String, RenderError> {
        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push(self.render(header, header_ctx)?);
        for item in entries {
            lines.push(self.render(entry, item)?);
        }
        Ok(lines.join("\n"))
    }

    pub fn failure(&self, operation: Operation, err: &RegistryError) -> Result<String, RenderError> {
        self.render(operation.failure_key(err), &FailureCtx::from(err))
    }

    pub fn operator_created(&self, operator: &Operator) -> Result<String, RenderError> {
        self.render(MessageKey::OperatorCreated, &OperatorCtx::from(operator))
    }

    /// Count header followed by one line per operator.
    pub fn operators(&self, operators: &[&Operator]) -> Result<String, RenderError> {
        let entries: Vec<OperatorCtx> = operators.iter().map(|op| OperatorCtx::from(*op)).collect();
        self.render_list(
            MessageKey::OperatorsFound,
            &Tally::of(Noun::Operator, entries.len()),
            MessageKey::OperatorEntry,
            &entries,
        )
    }

    pub fn activity_created(&self, created: ActivityMatch<'_>) -> Result<String, RenderError> {
        self.render(MessageKey::ActivityCreated, &ActivityCtx::from(created))
    }

    /// Count header followed by one line per activity.
    pub fn activities(&self, activities: &[ActivityMatch<'_>]) -> Result<String, RenderError> {
        let entries: Vec<ActivityCtx> = activities.iter().map(|m| ActivityCtx::from(*m)).collect();
        self.render_list(
            MessageKey::ActivitiesFound,
            &Tally::of(Noun::Activity, entries.len()),
            MessageKey::ActivityEntry,
            &entries,
        )
    }

    pub fn review_added(&self, receipt: &ReviewReceipt) -> Result<String, RenderError> {
        let mut ctx = tera::Context::new();
        ctx.insert("kind", &receipt.kind.to_string());
        ctx.insert("id", receipt.review_id.as_str());
        ctx.insert("activity_name", &receipt.activity_name);
        self.engine.render(MessageKey::ReviewAdded, &ctx)
    }

    /// All reviews of `activity`, or the "no reviews" line when it has none.
    pub fn reviews(&self, activity: &Activity) -> Result<String, RenderError> {
        if activity.reviews.is_empty() {
            let mut ctx = tera::Context::new();
            ctx.insert("activity_name", &activity.name);
            return self.engine.render(MessageKey::ReviewsNone, &ctx);
        }

        let tally = Tally::of(Noun::Review, activity.reviews.len());
        let mut header = to_tera_context(&tally)?;
        header.insert("activity_name", &activity.name);

        let mut lines = vec![self.engine.render(MessageKey::ReviewsFound, &header)?];
        for review in &activity.reviews {
            lines.push(self.render(MessageKey::ReviewEntry, &ReviewCtx::from(review))?);
        }
        Ok(lines.join("\n"))
    }

    pub fn review_endorsed(&self, review_id: &ReviewId) -> Result<String, RenderError> {
        let mut ctx = tera::Context::new();
        ctx.insert("id", review_id.as_str());
        self.engine.render(MessageKey::ReviewEndorsed, &ctx)
    }

    pub fn review_resolved(&self, receipt: &ResolutionReceipt) -> Result<String, RenderError> {
        let mut ctx = tera::Context::new();
        ctx.insert("id", receipt.review_id.as_str());
        ctx.insert("response", &receipt.response);
        self.engine.render(MessageKey::ReviewResolved, &ctx)
    }

    pub fn image_uploaded(&self, review_id: &ReviewId, image: &str) -> Result<String, RenderError> {
        let mut ctx = tera::Context::new();
        ctx.insert("id", review_id.as_str());
        ctx.insert("image", image);
        self.engine.render(MessageKey::ReviewImageAdded, &ctx)
    }

    /// One line per location.
    pub fn top_activities(&self, highlights: &[LocationHighlight<'_>]) -> Result<String, RenderError> {
        let mut lines = Vec::with_capacity(highlights.len());
        for highlight in highlights {
            let key = match highlight {
                LocationHighlight::NoReviewedActivities { .. } => MessageKey::TopNone,
                LocationHighlight::Top { .. } => MessageKey::TopEntry,
            };
            lines.push(self.render(key, &HighlightCtx::from(highlight))?);
        }
        Ok(lines.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use excursion_core::Registry;

    fn opts(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn renderer_new_succeeds() {
        Renderer::new().expect("Renderer::new should succeed with embedded templates");
    }

    #[test]
    fn every_key_has_an_embedded_template() {
        let names: Vec<&str> = TPLS.iter().map(|(name, _)| *name).collect();
        for key in MessageKey::all() {
            assert!(names.contains(&key.template_name()), "no template for {key:?}");
        }
        assert_eq!(names.len(), MessageKey::all().len());
    }

    #[test]
    fn unknown_operator_reads_differently_per_operation() {
        let renderer = Renderer::new().unwrap();
        let err = RegistryError::OperatorNotFound { id: "ZZ-AKL-001".into() };
        let create = renderer.failure(Operation::CreateActivity, &err).unwrap();
        let view = renderer.failure(Operation::ViewActivities, &err).unwrap();
        assert_eq!(create, "Activity not created: 'ZZ-AKL-001' is an invalid operator ID.");
        assert_eq!(view, "Operator not found: 'ZZ-AKL-001' is an invalid operator ID.");
    }

    #[test]
    fn wrong_review_type_has_three_messages() {
        let renderer = Renderer::new().unwrap();
        let lines: Vec<String> = [ReviewKind::Public, ReviewKind::Private, ReviewKind::Expert]
            .into_iter()
            .map(|expected| {
                let err = RegistryError::WrongReviewType { id: "X-R1".into(), expected };
                renderer.failure(Operation::EndorseReview, &err).unwrap()
            })
            .collect();
        assert!(lines[0].starts_with("Review not endorsed"));
        assert!(lines[1].starts_with("Review not resolved"));
        assert!(lines[2].starts_with("Image not uploaded"));
    }

    #[test]
    fn singular_operator_header() {
        let renderer = Renderer::new().unwrap();
        let mut registry = Registry::new();
        registry.create_operator("Adventure Tours", "AKL").unwrap();
        let found = registry.search_operators("*").unwrap();
        let text = renderer.operators(&found).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("There is 1 matching operator found:"));
        assert_eq!(
            lines.next(),
            Some("* Adventure Tours ('AT-AKL-001' located in 'Tāmaki Makaurau | Auckland')")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn review_block_for_endorsed_public_review() {
        let renderer = Renderer::new().unwrap();
        let mut registry = Registry::new();
        registry.create_operator("Adventure Tours", "AKL").unwrap();
        registry.create_activity("Bungee Jump", "Adventure", "AT-AKL-001").unwrap();
        registry
            .add_public_review("AT-AKL-001-001", &opts(&["Ana", "n", "6", "Wild ride"]))
            .unwrap();
        registry.endorse_review("AT-AKL-001-001-R1").unwrap();

        let text = renderer.reviews(registry.display_reviews("AT-AKL-001-001").unwrap()).unwrap();
        assert_eq!(
            text,
            "There is 1 review for activity 'Bungee Jump'.\n\
             \x20 * [5/5] Public review (AT-AKL-001-001-R1) by 'Ana'\n\
             \x20   \"Wild ride\"\n\
             \x20   Endorsed by admin."
        );
    }

    #[test]
    fn no_crlf_in_any_rendered_output() {
        let renderer = Renderer::new().unwrap();
        let registry = Registry::new();
        let text = renderer.top_activities(&registry.top_activities()).unwrap();
        assert!(!text.contains('\r'));
        assert_eq!(text.lines().count(), 8);
    }
}
