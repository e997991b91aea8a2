//! `create-activity`, `view-activities`, `search-activities`,
//! `display-top-activities`.

use std::io::Write;

use anyhow::Result;

use excursion_renderer::Operation;

use super::{report, Session};

pub fn create(
    session: &mut Session,
    name: &str,
    activity_type: &str,
    operator_id: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.create_activity(name, activity_type, operator_id);
    report(
        renderer,
        Operation::CreateActivity,
        outcome,
        |created| renderer.activity_created(created),
        out,
    )
}

pub fn view(session: &Session, operator_id: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.view_activities(operator_id);
    report(renderer, Operation::ViewActivities, outcome, |found| renderer.activities(&found), out)
}

pub fn search(session: &Session, keyword: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.search_activities(keyword);
    report(renderer, Operation::SearchActivities, outcome, |found| renderer.activities(&found), out)
}

/// Never fails: every location gets a line.
pub fn top(session: &Session, out: &mut dyn Write) -> Result<()> {
    let highlights = session.registry.top_activities();
    writeln!(out, "{}", session.renderer.top_activities(&highlights)?)?;
    Ok(())
}
