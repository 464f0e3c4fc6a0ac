//! Poll Rendering
//!
//! Turns a votes map into per-choice counts and the result embed.
//! Everything here is a pure function of its inputs.

use super::config::PollSettings;
use crate::channels::{Embed, UserId};
use std::collections::HashMap;

/// Per-choice vote counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    /// Count per choice index
    pub counts: Vec<usize>,
    /// Number of voters
    pub total: usize,
}

impl Tally {
    /// Count votes for `choice_count` choices
    pub fn count(choice_count: usize, votes: &HashMap<UserId, usize>) -> Self {
        let mut counts = vec![0; choice_count];
        for index in votes.values() {
            if let Some(count) = counts.get_mut(*index) {
                *count += 1;
            }
        }
        Self {
            counts,
            total: votes.len(),
        }
    }

    /// Share of the votes for a choice in `[0, 1]`; 0 when nobody voted
    pub fn fraction(&self, index: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts.get(index).copied().unwrap_or(0) as f64 / self.total as f64
    }

    /// Rounded percentage for a choice, 0..=100
    pub fn percent(&self, index: usize) -> u32 {
        (self.fraction(index) * 100.0).round_ties_even() as u32
    }

    /// Number of bar glyphs for a choice, 0..=width
    pub fn bar_len(&self, index: usize, width: u32) -> usize {
        (self.fraction(index) * f64::from(width)).round_ties_even() as usize
    }
}

/// Field value for one choice: bar, bold percentage, raw count
pub fn field_value(tally: &Tally, index: usize, settings: &PollSettings) -> String {
    let bar = settings
        .bar_glyph
        .repeat(tally.bar_len(index, settings.bar_width));
    format!(
        "{} **{}%** ({})",
        bar,
        tally.percent(index),
        tally.counts.get(index).copied().unwrap_or(0)
    )
}

/// Render the poll embed: one non-inline field per choice, in choice order
pub fn render_embed(
    title: &str,
    choices: &[String],
    votes: &HashMap<UserId, usize>,
    settings: &PollSettings,
) -> Embed {
    let tally = Tally::count(choices.len(), votes);
    let mut embed = Embed::titled(title);
    for (index, choice) in choices.iter().enumerate() {
        embed.add_field(
            format!("{} {}", settings.marker(index), choice),
            field_value(&tally, index, settings),
            false,
        );
    }
    embed
}
