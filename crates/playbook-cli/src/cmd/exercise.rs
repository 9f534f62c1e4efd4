use crate::output::{print_json, print_table};
use anyhow::{anyhow, Context};
use clap::Subcommand;
use playbook_core::{
    exercise::Exercise,
    modality::ModalityKind,
    presentation::badge,
    requirement::{RawPolicy, RawRequirements, RequirementPolicy},
    response::Response,
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum ExerciseSubcommand {
    /// Create a new exercise template
    Create {
        slug: String,
        #[arg(long)]
        title: Option<String>,
        /// Prompt shown to the user when responding
        #[arg(long)]
        prompt: Option<String>,
        /// Requirement as modality=policy, e.g. text=required or image=or
        /// (repeatable)
        #[arg(long = "require", value_name = "MODALITY=POLICY")]
        require: Vec<String>,
        /// Soft character limit for the text response (advisory)
        #[arg(long)]
        text_limit: Option<usize>,
    },
    /// List all exercises with their progress
    List,
    /// Show one exercise: prompt, policies, and progress
    Show { slug: String },
    /// Change one modality's requirement policy
    Require {
        slug: String,
        modality: String,
        /// required, not-required, or, or the legacy true/false
        policy: String,
    },
    /// Archive an exercise
    Archive { slug: String },
}

pub fn run(root: &Path, subcmd: ExerciseSubcommand, json: bool) -> anyhow::Result<()> {
    playbook_core::paths::ensure_initialized(root)?;
    match subcmd {
        ExerciseSubcommand::Create {
            slug,
            title,
            prompt,
            require,
            text_limit,
        } => create(root, &slug, title, prompt, &require, text_limit, json),
        ExerciseSubcommand::List => list(root, json),
        ExerciseSubcommand::Show { slug } => show(root, &slug, json),
        ExerciseSubcommand::Require {
            slug,
            modality,
            policy,
        } => require(root, &slug, &modality, &policy, json),
        ExerciseSubcommand::Archive { slug } => archive(root, &slug, json),
    }
}

fn parse_requirements(pairs: &[String]) -> anyhow::Result<RawRequirements> {
    let mut raw = RawRequirements::default();
    for pair in pairs {
        let (modality, policy) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("expected MODALITY=POLICY, got '{pair}'"))?;
        let kind = ModalityKind::from_str(modality.trim())?;
        let policy = RequirementPolicy::from_str(policy.trim())?;
        raw.set(kind, RawPolicy::Policy(policy));
    }
    Ok(raw)
}

fn create(
    root: &Path,
    slug: &str,
    title: Option<String>,
    prompt: Option<String>,
    require: &[String],
    text_limit: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let title = title.unwrap_or_else(|| slug.replace('-', " "));
    let requirements = parse_requirements(require)?;

    let mut exercise = Exercise::create(root, slug, &title, prompt, requirements)
        .with_context(|| format!("failed to create exercise '{slug}'"))?;
    if text_limit.is_some() {
        exercise.text_char_limit = text_limit;
        exercise.save(root).context("failed to save exercise")?;
    }

    if json {
        print_json(&exercise)?;
    } else {
        println!("Created exercise: {slug} — {title}");
        println!("Next: playbook respond text {slug} \"...\"");
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let exercises = Exercise::list(root).context("failed to list exercises")?;

    if json {
        let summaries: Vec<_> = exercises
            .iter()
            .map(|e| {
                let report = progress_for(root, e)?;
                Ok(serde_json::json!({
                    "slug": e.slug,
                    "title": e.title,
                    "archived": e.archived,
                    "progress": report,
                }))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        print_json(&summaries)?;
        return Ok(());
    }

    // Archived exercises stay listed here (marked) even though the
    // progress overview hides them.
    let rows: Vec<Vec<String>> = exercises
        .iter()
        .map(|e| {
            let report = progress_for(root, e)?;
            let b = badge(report.state);
            Ok(vec![
                e.slug.clone(),
                e.title.clone(),
                format!("{} {}", b.icon, b.label),
                format!("{}%", report.percentage_complete),
                if e.archived { "yes" } else { "" }.to_string(),
            ])
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    print_table(&["SLUG", "TITLE", "STATE", "PROGRESS", "ARCHIVED"], rows);
    Ok(())
}

/// Every listing goes through the same engine entry point as the response
/// form, so the two can never disagree.
fn progress_for(
    root: &Path,
    exercise: &Exercise,
) -> anyhow::Result<playbook_core::progress::ProgressReport> {
    let response = Response::load_or_new(root, &exercise.slug)?;
    Ok(response.progress(&exercise.requirement_set()))
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let exercise = Exercise::load(root, slug)?;
    let report = progress_for(root, &exercise)?;

    if json {
        print_json(&serde_json::json!({
            "exercise": exercise,
            "progress": report,
        }))?;
        return Ok(());
    }

    println!("{} — {}", exercise.slug, exercise.title);
    if let Some(ref prompt) = exercise.prompt {
        println!("  {prompt}");
    }
    let set = exercise.requirement_set();
    println!("\nRequirements:");
    for kind in ModalityKind::all() {
        let policy = set.policy(*kind);
        if policy != RequirementPolicy::NotRequired {
            println!("  {:10} {}", kind.label(), policy);
        }
    }
    let b = badge(report.state);
    println!(
        "\nStatus: {} {} ({}/{}, {}%)",
        b.icon,
        b.label,
        report.completed_requirements,
        report.total_requirements,
        report.percentage_complete
    );
    Ok(())
}

fn require(root: &Path, slug: &str, modality: &str, policy: &str, json: bool) -> anyhow::Result<()> {
    let mut exercise = Exercise::load(root, slug)?;
    let kind = ModalityKind::from_str(modality)?;
    let policy = RequirementPolicy::from_str(policy)?;
    exercise.set_policy(kind, RawPolicy::Policy(policy));
    exercise.save(root).context("failed to save exercise")?;

    if json {
        print_json(&exercise)?;
    } else {
        println!("{slug}: {} is now {}", kind.label(), policy);
    }
    Ok(())
}

fn archive(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut exercise = Exercise::load(root, slug)?;
    exercise.archive();
    exercise.save(root).context("failed to save exercise")?;

    if json {
        print_json(&exercise)?;
    } else {
        println!("Archived exercise: {slug}");
    }
    Ok(())
}
