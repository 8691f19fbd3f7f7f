//! Global-timeline chapter types.

use serde::{Deserialize, Serialize};

use crate::timecode::format_clock;

/// A surviving chapter on the global (concatenated-audio) timeline,
/// already renumbered and time-scaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Sequential chapter number, starting at 1.
    pub number: u32,
    /// Chapter display name.
    pub name: String,
    /// Start time in seconds on the output stream's timeline.
    pub start_secs: f64,
}

impl Chapter {
    /// The opusenc time comment, e.g. `CHAPTER01=00:13:20.000`.
    ///
    /// Numbers above 99 overflow the conventional two-digit key width;
    /// they are formatted anyway rather than rejected.
    pub fn time_comment(&self) -> String {
        format!("CHAPTER{:02}={}", self.number, format_clock(self.start_secs, 3))
    }

    /// The opusenc name comment, e.g. `CHAPTER01NAME=Chapter 1`.
    pub fn name_comment(&self) -> String {
        format!("CHAPTER{:02}NAME={}", self.number, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_share_the_sequence_number() {
        let chapter = Chapter {
            number: 7,
            name: "The Heist".to_string(),
            start_secs: 800.0,
        };
        assert_eq!(chapter.time_comment(), "CHAPTER07=00:13:20.000");
        assert_eq!(chapter.name_comment(), "CHAPTER07NAME=The Heist");
    }

    #[test]
    fn three_digit_numbers_widen_the_key() {
        let chapter = Chapter {
            number: 123,
            name: "x".to_string(),
            start_secs: 0.0,
        };
        assert_eq!(chapter.time_comment(), "CHAPTER123=00:00:00.000");
    }
}
