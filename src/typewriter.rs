use std::time::Duration;

use unicode_segmentation::UnicodeSegmentation;

const SEPARATOR: char = '•';
/// Extra ticks a fully typed phrase stays on screen.
const HOLD_TICKS: usize = 8;
const TYPE_DELAY: Duration = Duration::from_millis(80);
const DELETE_DELAY: Duration = Duration::from_millis(40);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Typing,
    Deleting,
}

/// Types out a list of phrases one grapheme at a time, holds each one for a
/// moment, deletes it and moves on to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    phrases: Vec<String>,
    index: usize,
    position: usize,
    direction: Direction,
}

impl Typewriter {
    /// Phrases are separated by `•`; surrounding whitespace and empty
    /// phrases are dropped.
    pub fn new(source: &str) -> Self {
        let phrases = source
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|phrase| !phrase.is_empty())
            .map(String::from)
            .collect();

        Self {
            phrases,
            index: 0,
            position: 0,
            direction: Direction::Typing,
        }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Phrase currently being typed or deleted.
    pub fn current(&self) -> &str {
        self.phrases.get(self.index).map_or("", String::as_str)
    }

    /// Visible part of the current phrase.
    pub fn text(&self) -> &str {
        let current = self.current();
        current
            .grapheme_indices(true)
            .nth(self.position)
            .map_or(current, |(end, _)| &current[..end])
    }

    /// Advances one step and returns how long to wait before the next one.
    pub fn tick(&mut self) -> Duration {
        if self.phrases.is_empty() {
            return TYPE_DELAY;
        }

        match self.direction {
            Direction::Typing => {
                self.position += 1;
                let len = self.current().graphemes(true).count();
                if self.position >= len + HOLD_TICKS {
                    self.direction = Direction::Deleting;
                }
            }
            Direction::Deleting => {
                self.position = self.position.saturating_sub(1);
                if self.position == 0 {
                    self.direction = Direction::Typing;
                    self.index = (self.index + 1) % self.phrases.len();
                }
            }
        }

        match self.direction {
            Direction::Typing => TYPE_DELAY,
            Direction::Deleting => DELETE_DELAY,
        }
    }
}
