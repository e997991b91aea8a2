//! `help` — command table built from the command grammar itself.

use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;
use tabled::{settings::Style, Table, Tabled};

use super::ReplLine;

#[derive(Tabled)]
struct HelpRow {
    #[tabled(rename = "command")]
    command: String,
    #[tabled(rename = "arguments")]
    arguments: String,
    #[tabled(rename = "description")]
    description: String,
}

fn rows() -> Vec<HelpRow> {
    ReplLine::command()
        .get_subcommands()
        .map(|sub| {
            let arguments = sub
                .get_positionals()
                .map(|arg| {
                    let name = arg.get_id().as_str().to_uppercase();
                    if arg.is_required_set() {
                        format!("<{name}>")
                    } else {
                        format!("[{name}...]")
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            HelpRow {
                command: sub.get_name().to_string(),
                arguments,
                description: sub.get_about().map(|about| about.to_string()).unwrap_or_default(),
            }
        })
        .collect()
}

pub fn print(out: &mut dyn Write) -> Result<()> {
    let mut table = Table::new(rows());
    table.with(Style::rounded());
    writeln!(out, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_has_a_row() {
        let rows = rows();
        assert_eq!(rows.len(), 15);
        let create = rows.iter().find(|r| r.command == "create-operator").unwrap();
        assert_eq!(create.arguments, "<NAME> <LOCATION>");
        let review = rows.iter().find(|r| r.command == "add-private-review").unwrap();
        assert_eq!(review.arguments, "<ACTIVITY_ID> [OPTIONS...]");
        assert!(review.description.contains("FOLLOW_UP"));
    }

    #[test]
    fn table_mentions_exit() {
        let mut out = Vec::new();
        print(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("display-top-activities"));
        assert!(text.contains("exit"));
    }
}
