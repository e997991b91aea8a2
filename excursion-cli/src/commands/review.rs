//! Review submission and lifecycle commands.

use std::io::Write;

use anyhow::Result;

use excursion_renderer::Operation;

use super::{report, ReviewArgs, Session};

/// Which `add-*-review` command was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Public,
    Private,
    Expert,
}

pub fn add(session: &mut Session, submission: Submission, args: &ReviewArgs, out: &mut dyn Write) -> Result<()> {
    let registry = &mut session.registry;
    let outcome = match submission {
        Submission::Public => registry.add_public_review(&args.activity_id, &args.options),
        Submission::Private => registry.add_private_review(&args.activity_id, &args.options),
        Submission::Expert => registry.add_expert_review(&args.activity_id, &args.options),
    };
    let renderer = &session.renderer;
    report(renderer, Operation::AddReview, outcome, |receipt| renderer.review_added(&receipt), out)
}

pub fn display(session: &Session, activity_id: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.display_reviews(activity_id);
    report(renderer, Operation::DisplayReviews, outcome, |activity| renderer.reviews(activity), out)
}

pub fn endorse(session: &mut Session, review_id: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.endorse_review(review_id);
    report(renderer, Operation::EndorseReview, outcome, |id| renderer.review_endorsed(&id), out)
}

pub fn resolve(session: &mut Session, review_id: &str, response: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.resolve_review(review_id, response);
    report(
        renderer,
        Operation::ResolveReview,
        outcome,
        |receipt| renderer.review_resolved(&receipt),
        out,
    )
}

pub fn upload_image(session: &mut Session, review_id: &str, image: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.upload_review_image(review_id, image);
    report(
        renderer,
        Operation::UploadReviewImage,
        outcome,
        |id| renderer.image_uploaded(&id, image),
        out,
    )
}
