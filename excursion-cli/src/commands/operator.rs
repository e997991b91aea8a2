//! `create-operator`, `search-operators`.

use std::io::Write;

use anyhow::Result;

use excursion_renderer::Operation;

use super::{report, Session};

pub fn create(session: &mut Session, name: &str, location: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.create_operator(name, location);
    report(renderer, Operation::CreateOperator, outcome, |op| renderer.operator_created(op), out)
}

pub fn search(session: &Session, keyword: &str, out: &mut dyn Write) -> Result<()> {
    let renderer = &session.renderer;
    let outcome = session.registry.search_operators(keyword);
    report(renderer, Operation::SearchOperators, outcome, |found| renderer.operators(&found), out)
}
