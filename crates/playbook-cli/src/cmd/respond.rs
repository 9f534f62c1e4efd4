use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use playbook_core::{
    evaluate::text_over_limit, exercise::Exercise, modality::ModalityKind, response::Response,
};
use std::path::Path;
use std::str::FromStr;

#[derive(Subcommand)]
pub enum RespondSubcommand {
    /// Set the text of the response
    Text { slug: String, text: String },
    /// Attach a committed upload's storage key to the response
    Attach {
        slug: String,
        /// image, audio, video, or document
        modality: String,
        /// Storage key reported by the upload collaborator
        key: String,
    },
    /// Show the stored response
    Show { slug: String },
}

pub fn run(root: &Path, subcmd: RespondSubcommand, json: bool) -> anyhow::Result<()> {
    playbook_core::paths::ensure_initialized(root)?;
    match subcmd {
        RespondSubcommand::Text { slug, text } => set_text(root, &slug, &text, json),
        RespondSubcommand::Attach {
            slug,
            modality,
            key,
        } => attach(root, &slug, &modality, &key, json),
        RespondSubcommand::Show { slug } => show(root, &slug, json),
    }
}

fn set_text(root: &Path, slug: &str, text: &str, json: bool) -> anyhow::Result<()> {
    let exercise = Exercise::load(root, slug)?;
    let mut response = Response::load_or_new(root, slug)?;
    response.set_text(text)?;
    response.save(root).context("failed to save response")?;

    // Advisory only: never blocks saving or completion.
    if text_over_limit(text, exercise.text_char_limit) {
        tracing::warn!(
            slug,
            limit = ?exercise.text_char_limit,
            "text exceeds the exercise's soft character limit"
        );
        if !json {
            println!(
                "note: text exceeds the soft limit of {} characters",
                exercise.text_char_limit.unwrap_or(0)
            );
        }
    }

    if json {
        print_json(&response)?;
    } else {
        println!("Saved text for: {slug}");
    }
    Ok(())
}

fn attach(root: &Path, slug: &str, modality: &str, key: &str, json: bool) -> anyhow::Result<()> {
    Exercise::load(root, slug)?;
    let kind = ModalityKind::from_str(modality)?;
    let mut response = Response::load_or_new(root, slug)?;
    response.attach(kind, key)?;
    response.save(root).context("failed to save response")?;

    if json {
        print_json(&response)?;
    } else {
        println!("Attached {} to {slug}: {key}", kind.label());
    }
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let response = Response::load(root, slug)?;

    if json {
        print_json(&response)?;
        return Ok(());
    }

    println!("Response for: {} ({})", response.exercise, response.status);
    if !response.text.trim().is_empty() {
        println!("  text: {}", response.text);
    }
    for kind in ModalityKind::all() {
        for key in response.keys(*kind) {
            println!("  {}: {key}", kind.as_str());
        }
    }
    Ok(())
}
