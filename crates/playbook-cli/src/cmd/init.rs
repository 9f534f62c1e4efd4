use anyhow::Context;
use playbook_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("Initializing playbook in: {}", root.display());

    let dirs = [
        paths::PLAYBOOK_DIR,
        paths::EXERCISES_DIR,
        paths::RESPONSES_DIR,
    ];
    for dir in dirs {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
        println!("  ready: {dir}");
    }

    let readme = paths::playbook_dir(root).join("README.md");
    let written = io::write_if_missing(
        &readme,
        b"Managed by the playbook CLI.\n\nExercise templates live under exercises/<slug>/manifest.yaml,\nresponses under responses/<slug>.yaml.\n",
    )
    .context("failed to write .playbook/README.md")?;
    println!(
        "  {} .playbook/README.md",
        if written { "created:" } else { "exists: " }
    );

    println!("\nNext: playbook exercise create <slug> --title \"...\"");
    Ok(())
}
