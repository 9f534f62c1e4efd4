use crate::output::{print_json, print_table, render_bar};
use anyhow::Context;
use playbook_core::{
    exercise::Exercise,
    modality::ModalityKind,
    presentation::{badge, percentage_color},
    progress::{ProgressReport, ProgressState},
    response::Response,
};
use std::path::Path;
use std::str::FromStr;

pub fn run(root: &Path, slug: Option<&str>, queued: &[String], json: bool) -> anyhow::Result<()> {
    playbook_core::paths::ensure_initialized(root)?;
    match slug {
        Some(slug) => one(root, slug, queued, json),
        None => all(root, json),
    }
}

/// Full report for a single exercise. `queued` lets a caller overlay
/// modalities whose upload is still in flight, the way the live response
/// form does.
fn one(root: &Path, slug: &str, queued: &[String], json: bool) -> anyhow::Result<()> {
    let exercise = Exercise::load(root, slug)?;
    let response = Response::load_or_new(root, slug)?;

    let mut snapshot = response.snapshot();
    for modality in queued {
        snapshot.record_queued(ModalityKind::from_str(modality)?);
    }
    let report =
        ProgressReport::compute(&exercise.requirement_set(), &snapshot, Some(response.status));

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "progress": report,
            "badge": badge(report.state),
            "bar_color": percentage_color(report.percentage_complete),
        }))?;
        return Ok(());
    }

    let b = badge(report.state);
    println!("{} — {}", exercise.slug, exercise.title);
    println!("{} {}", b.icon, b.label);
    println!(
        "{}  ({} of {} requirements)",
        render_bar(report.percentage_complete),
        report.completed_requirements,
        report.total_requirements
    );
    if !report.completed_labels.is_empty() {
        println!("  done:    {}", report.completed_labels.join(", "));
    }
    if !report.missing_labels.is_empty() {
        println!("  missing: {}", report.missing_labels.join(", "));
    }
    if report.can_complete && report.state != ProgressState::Completed {
        println!("\nReady: playbook complete {slug}");
    }
    Ok(())
}

fn all(root: &Path, json: bool) -> anyhow::Result<()> {
    let exercises = Exercise::list(root).context("failed to list exercises")?;

    let mut rows = Vec::new();
    let mut entries = Vec::new();
    for exercise in exercises.iter().filter(|e| !e.archived) {
        let response = Response::load_or_new(root, &exercise.slug)?;
        let report = response.progress(&exercise.requirement_set());
        let b = badge(report.state);
        rows.push(vec![
            exercise.slug.clone(),
            format!("{} {}", b.icon, b.label),
            render_bar(report.percentage_complete),
            report.missing_labels.join(", "),
        ]);
        entries.push(serde_json::json!({
            "slug": exercise.slug,
            "progress": report,
        }));
    }

    if json {
        print_json(&entries)?;
    } else {
        print_table(&["SLUG", "STATE", "PROGRESS", "MISSING"], rows);
    }
    Ok(())
}

pub fn complete(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    playbook_core::paths::ensure_initialized(root)?;
    let exercise = Exercise::load(root, slug)?;
    let mut response = Response::load_or_new(root, slug)?;
    response.complete(&exercise.requirement_set())?;
    response.save(root).context("failed to save response")?;

    if json {
        print_json(&response)?;
    } else {
        println!("✅ Completed: {slug}");
    }
    Ok(())
}

pub fn reopen(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    playbook_core::paths::ensure_initialized(root)?;
    Exercise::load(root, slug)?;
    let mut response = Response::load(root, slug)?;
    response.reopen();
    response.save(root).context("failed to save response")?;

    if json {
        print_json(&response)?;
    } else {
        println!("Reopened for editing: {slug}");
    }
    Ok(())
}
