//! Hero tagline typewriter: types a line one character at a time, holds it,
//! deletes it, then moves on to the next line.

use serde::Serialize;
use std::time::Duration;

pub const TYPE_DELAY: Duration = Duration::from_millis(90);
pub const DELETE_DELAY: Duration = Duration::from_millis(40);
pub const HOLD_DELAY: Duration = Duration::from_millis(1400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Typing,
    Deleting,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    words: Vec<Vec<char>>,
    word_index: usize,
    shown: usize,
    phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub text: String,
    pub delay_ms: u64,
}

impl Typewriter {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Self {
        Typewriter {
            words: words.iter().map(|w| w.as_ref().chars().collect()).collect(),
            word_index: 0,
            shown: 0,
            phase: Phase::Typing,
        }
    }

    pub fn text(&self) -> String {
        match self.words.get(self.word_index) {
            Some(word) => word[..self.shown].iter().collect(),
            None => String::new(),
        }
    }

    pub fn word_index(&self) -> usize {
        self.word_index
    }

    /// Advances one step and returns how long to wait before the next one.
    pub fn tick(&mut self) -> Duration {
        let Some(word) = self.words.get(self.word_index) else {
            return HOLD_DELAY;
        };

        match self.phase {
            Phase::Typing if self.shown < word.len() => {
                self.shown += 1;
                TYPE_DELAY
            }
            Phase::Typing => {
                self.phase = Phase::Deleting;
                HOLD_DELAY
            }
            Phase::Deleting if self.shown > 0 => {
                self.shown -= 1;
                DELETE_DELAY
            }
            Phase::Deleting => {
                self.phase = Phase::Typing;
                self.word_index = (self.word_index + 1) % self.words.len();
                TYPE_DELAY
            }
        }
    }

    /// The next `steps` frames: the text after each tick and the delay that follows it.
    pub fn frames(&mut self, steps: usize) -> Vec<Frame> {
        (0..steps)
            .map(|_| {
                let delay = self.tick();
                Frame {
                    text: self.text(),
                    delay_ms: delay.as_millis() as u64,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_holds_deletes_and_wraps() {
        let mut writer = Typewriter::new(&["ab", "c"]);

        assert_eq!(writer.tick(), TYPE_DELAY);
        assert_eq!(writer.text(), "a");
        assert_eq!(writer.tick(), TYPE_DELAY);
        assert_eq!(writer.text(), "ab");
        assert_eq!(writer.tick(), HOLD_DELAY);
        assert_eq!(writer.text(), "ab");
        assert_eq!(writer.tick(), DELETE_DELAY);
        assert_eq!(writer.text(), "a");
        assert_eq!(writer.tick(), DELETE_DELAY);
        assert_eq!(writer.text(), "");
        assert_eq!(writer.tick(), TYPE_DELAY);
        assert_eq!(writer.word_index(), 1);

        writer.tick();
        assert_eq!(writer.text(), "c");
        writer.tick();
        writer.tick();
        writer.tick();
        assert_eq!(writer.word_index(), 0);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let mut writer = Typewriter::new(&["né•"]);
        writer.tick();
        writer.tick();
        assert_eq!(writer.text(), "né");
        writer.tick();
        assert_eq!(writer.text(), "né•");
    }

    #[test]
    fn frames_report_text_and_delay() {
        let mut writer = Typewriter::new(&["hi"]);
        let frames = writer.frames(3);
        assert_eq!(
            frames,
            vec![
                Frame { text: "h".into(), delay_ms: 90 },
                Frame { text: "hi".into(), delay_ms: 90 },
                Frame { text: "hi".into(), delay_ms: 1400 },
            ]
        );
    }

    #[test]
    fn no_words_is_inert() {
        let mut writer = Typewriter::new::<&str>(&[]);
        assert_eq!(writer.tick(), HOLD_DELAY);
        assert_eq!(writer.text(), "");
    }
}
