use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use pocket_classroom_core::{CapsuleDraft, QuizQuestion, known_cards_label, time_ago};

use super::CapsuleArgs;
use crate::Services;

pub(crate) fn run_list(services: &Services, json: bool) -> Result<()> {
    let cards = services.library.list();
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }
    if cards.is_empty() {
        println!("No capsules yet. Create one with `pocket-classroom new --title ...`.");
        return Ok(());
    }
    let now = Utc::now();
    for card in &cards {
        let entry = &card.entry;
        let subject = if entry.subject.is_empty() { "General" } else { entry.subject.as_str() };
        println!(
            "{}  {}  [{} | {}]  best {}%  {}  updated {}",
            entry.id,
            entry.title,
            subject,
            entry.level,
            card.best_score,
            known_cards_label(card.known_cards),
            time_ago(entry.updated_at, now),
        );
    }
    Ok(())
}

pub(crate) fn run_show(services: &Services, id: &str, json: bool) -> Result<()> {
    let capsule = services.library.get(id)?;
    if json {
        println!("{}", capsule.to_export_json()?);
        return Ok(());
    }

    let meta = &capsule.meta;
    println!("{} ({})", meta.title, capsule.id);
    println!("Subject: {}  Level: {}", meta.subject, meta.level);
    if !meta.desc.is_empty() {
        println!("{}", meta.desc);
    }

    if !capsule.notes.is_empty() {
        println!("\nNotes:");
        for note in &capsule.notes {
            println!("  - {note}");
        }
    }
    if !capsule.flashcards.is_empty() {
        println!("\nFlashcards:");
        for (i, card) in capsule.flashcards.iter().enumerate() {
            println!("  {}. {} :: {}", i + 1, card.front, card.back);
        }
    }
    if !capsule.quiz.is_empty() {
        println!("\nQuiz:");
        for (i, question) in capsule.quiz.iter().enumerate() {
            println!("  {}. {}", i + 1, question.q);
            for (c, choice) in question.choices.iter().enumerate() {
                let mark = if question.is_correct(c) { '*' } else { ' ' };
                println!("     {mark}{}) {choice}", QuizQuestion::choice_letter(c));
            }
        }
    }
    Ok(())
}

pub(crate) fn run_new(services: &Services, args: CapsuleArgs) -> Result<()> {
    let mut draft = CapsuleDraft::default();
    args.apply_to(&mut draft)?;
    let capsule = services.library.save_draft(None, draft)?;
    eprintln!("Saved \"{}\"", capsule.meta.title);
    println!("{}", capsule.id);
    Ok(())
}

pub(crate) fn run_edit(services: &Services, id: &str, args: CapsuleArgs) -> Result<()> {
    let existing = services.library.get(id)?;
    let mut draft = CapsuleDraft::from_capsule(&existing);
    args.apply_to(&mut draft)?;
    let capsule = services.library.save_draft(Some(id), draft)?;

    let dangling: Vec<String> = services
        .progress
        .progress(id)
        .dangling_known(capsule.flashcards.len())
        .map(|i| (i + 1).to_string())
        .collect();
    if !dangling.is_empty() {
        eprintln!(
            "Warning: known cards {} no longer exist; known cards follow card positions",
            dangling.join(", ")
        );
    }

    eprintln!("Updated \"{}\"", capsule.meta.title);
    println!("{}", capsule.id);
    Ok(())
}

pub(crate) fn run_import(services: &Services, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let capsule = services.library.import(&text)?;
    eprintln!("Imported \"{}\"", capsule.meta.title);
    println!("{}", capsule.id);
    Ok(())
}

pub(crate) fn run_export(services: &Services, id: &str, out_dir: &Path) -> Result<()> {
    let export = services.library.export(id)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&export.file_name);
    std::fs::write(&path, export.json)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

pub(crate) fn run_delete(services: &Services, id: &str) -> Result<()> {
    let entry = services.library.delete(id)?;
    println!("Deleted \"{}\"", entry.title);
    Ok(())
}

pub(crate) fn run_check(services: &Services) -> Result<()> {
    let report = services
        .library
        .consistency_report()
        .ok_or_else(|| anyhow!("could not list stored records"))?;
    if report.is_consistent() {
        println!("Library is consistent");
        return Ok(());
    }

    let sections = [
        ("Indexed but missing", &report.missing_capsules),
        ("Stored but not indexed", &report.unindexed_capsules),
        ("Progress without capsule", &report.orphaned_progress),
        ("Listed more than once", &report.duplicate_entries),
    ];
    for (label, ids) in sections {
        if !ids.is_empty() {
            println!("{label}: {}", ids.join(", "));
        }
    }
    bail!("library index and records are out of step")
}
