use anyhow::{Result, bail};
use pocket_classroom_core::known_cards_label;

use crate::Services;

pub(crate) fn run_progress(services: &Services, id: &str) -> Result<()> {
    let capsule = services.library.get(id)?;
    let progress = services.progress.progress(id);
    let deck_len = capsule.flashcards.len();

    println!("{}", capsule.meta.title);
    println!("Best score: {}%", progress.best_score);
    println!("{} of {deck_len}", known_cards_label(progress.known_count()));
    for index in &progress.known_flashcards {
        match capsule.flashcards.get(*index) {
            Some(card) => println!("  {}. {}", index + 1, card.front),
            None => println!("  {}. (card no longer exists)", index + 1),
        }
    }
    Ok(())
}

/// `card` is one-based, the way `show` numbers flashcards.
pub(crate) fn run_set_known(services: &Services, id: &str, card: usize, known: bool) -> Result<()> {
    let Some(index) = card.checked_sub(1) else {
        bail!("flashcard numbers start at 1");
    };
    let progress = services.progress.set_flashcard_known(id, index, known)?;
    let state = if known { "known" } else { "not known" };
    println!("Card {card} marked {state} ({})", known_cards_label(progress.known_count()));
    Ok(())
}
