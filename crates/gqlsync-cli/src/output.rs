use anyhow::Result;
use colored::Colorize;
use gqlsync_core::DesiredState;
use gqlsync_reconcile::{ReconcilePlan, ReconcileReport};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolverRow<'a> {
    type_name: &'a str,
    field_name: &'a str,
    data_source: String,
    kind: &'static str,
}

pub fn print_desired(desired: &DesiredState, format: OutputFormat) -> Result<()> {
    let rows: Vec<ResolverRow<'_>> = desired
        .iter()
        .map(|spec| ResolverRow {
            type_name: &spec.type_name,
            field_name: &spec.field_name,
            data_source: spec.data_source_name(),
            kind: spec.data_source.kind().as_str(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&rows)?,
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No resolvers defined.");
                return Ok(());
            }
            let mut builder = Builder::default();
            builder.push_record(["Type", "Field", "DataSource", "Kind"]);
            for row in &rows {
                builder.push_record([
                    row.type_name,
                    row.field_name,
                    row.data_source.as_str(),
                    row.kind,
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            println!("Resolvers: {}", rows.len());
        }
    }
    Ok(())
}

pub fn print_plan(plan: &ReconcilePlan, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(plan)?,
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Action", "Object", "Target"]);
            for spec in &plan.upserts {
                builder.push_record([
                    "upsert".green().to_string(),
                    "resolver".to_string(),
                    format!("{}.{} -> {}", spec.type_name, spec.field_name, spec.data_source_name()),
                ]);
            }
            for target in &plan.resolver_deletes {
                builder.push_record([
                    "delete".red().to_string(),
                    "resolver".to_string(),
                    target.to_string(),
                ]);
            }
            for name in &plan.data_source_deletes {
                builder.push_record([
                    "delete".red().to_string(),
                    "data source".to_string(),
                    name.clone(),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            println!(
                "{} to upsert, {} resolvers and {} data sources to delete",
                plan.upserts.len(),
                plan.resolver_deletes.len(),
                plan.data_source_deletes.len()
            );
        }
    }
    Ok(())
}

pub fn print_report(report: &ReconcileReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["Change", "Count", "Objects"]);
            let sections = [
                ("resolvers upserted", &report.resolvers_upserted),
                ("data sources provisioned", &report.data_sources_provisioned),
                ("resolvers deleted", &report.resolvers_deleted),
                ("data sources deleted", &report.data_sources_deleted),
            ];
            for (label, items) in sections {
                builder.push_record([
                    label.to_string(),
                    items.len().to_string(),
                    items.join(", "),
                ]);
            }
            println!("{}", builder.build().with(Style::rounded()));
            print_success(&format!(
                "Reconciled in {} attempt{}",
                report.attempts,
                if report.attempts == 1 { "" } else { "s" }
            ));
        }
    }
    Ok(())
}
