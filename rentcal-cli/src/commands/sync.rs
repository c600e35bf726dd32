use anyhow::Result;
use owo_colors::OwoColorize;
use rentcal_core::{SqliteStore, SyncReport, Syncer};

use crate::render::{Render, pluralize};
use crate::utils::tui;

pub async fn run(syncer: &Syncer<SqliteStore>, property_id: &str, json: bool) -> Result<()> {
    let spinner = tui::create_spinner(format!("Syncing {property_id}"));
    let result = syncer.sync_by_id(property_id).await;
    spinner.finish_and_clear();
    let report = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    print_summary(std::slice::from_ref(&report));
    Ok(())
}

pub async fn run_all(syncer: &Syncer<SqliteStore>, json: bool) -> Result<()> {
    let spinner = tui::create_spinner("Syncing all properties".into());
    let result = syncer.sync_all().await;
    spinner.finish_and_clear();
    let reports = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        println!("{}", "No properties with feeds to sync.".dimmed());
        return Ok(());
    }

    for (i, report) in reports.iter().enumerate() {
        print_report(report);
        if i < reports.len() - 1 {
            println!();
        }
    }
    print_summary(&reports);
    Ok(())
}

fn print_report(report: &SyncReport) {
    println!("🏠 {}", report.property_id);
    println!("{}", report.render());
}

fn print_summary(reports: &[SyncReport]) {
    let imported: usize = reports.iter().map(|r| r.imported).sum();
    let failed = reports
        .iter()
        .flat_map(|r| &r.sources)
        .filter(|s| s.is_failed())
        .count();

    println!(
        "\nImported {} {}",
        imported,
        pluralize("booking", imported)
    );
    if failed > 0 {
        println!(
            "{}",
            format!("{} {} failed", failed, pluralize("feed", failed)).red()
        );
    }
}
