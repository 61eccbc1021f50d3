//! Verification pad - six single-character slots
//!
//! Mirrors one-time-code entry: typing into a slot keeps only the last
//! character and moves focus right, backspace on an empty slot moves focus
//! left. "Complete" only means every slot holds a visible character; the
//! code itself is never checked against anything.

/// Number of slots on the pad
pub const CODE_LENGTH: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationPad {
    slots: [Option<char>; CODE_LENGTH],
    focus: usize,
}

impl VerificationPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the focused slot
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn slot(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    /// Write `value` into slot `index`
    ///
    /// Only the last character of `value` is kept; an empty value clears the
    /// slot. A non-empty write advances focus unless `index` is the last
    /// slot. Out-of-range indexes are ignored.
    pub fn input(&mut self, index: usize, value: &str) {
        if index >= CODE_LENGTH {
            return;
        }
        let ch = value.chars().last();
        self.slots[index] = ch;
        self.focus = index;
        if ch.is_some() && index < CODE_LENGTH - 1 {
            self.focus = index + 1;
        }
    }

    /// Backspace pressed on slot `index`
    ///
    /// Clears a filled slot in place; on an already empty slot moves focus to
    /// the previous one (no-op on slot 0).
    pub fn backspace(&mut self, index: usize) {
        if index >= CODE_LENGTH {
            return;
        }
        if self.slots[index].is_some() {
            self.slots[index] = None;
            self.focus = index;
        } else if index > 0 {
            self.focus = index - 1;
        }
    }

    /// Type `code` from the first slot onward, one character per slot
    pub fn fill(&mut self, code: &str) {
        for (index, ch) in code.chars().take(CODE_LENGTH).enumerate() {
            self.input(index, &ch.to_string());
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Every slot holds a non-whitespace character
    pub fn is_complete(&self) -> bool {
        self.slots
            .iter()
            .all(|slot| matches!(slot, Some(ch) if !ch.is_whitespace()))
    }

    /// Slots joined, empty slots skipped
    pub fn code(&self) -> String {
        self.slots.iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_advances_focus() {
        let mut pad = VerificationPad::new();
        pad.input(0, "4");
        assert_eq!(pad.focus(), 1);
        pad.input(1, "72");
        assert_eq!(pad.slot(1), Some('2'));
        assert_eq!(pad.focus(), 2);

        // Last slot keeps focus
        pad.input(5, "9");
        assert_eq!(pad.focus(), 5);
    }

    #[test]
    fn test_empty_input_clears_without_advancing() {
        let mut pad = VerificationPad::new();
        pad.input(2, "1");
        pad.input(2, "");
        assert_eq!(pad.slot(2), None);
        assert_eq!(pad.focus(), 2);
    }

    #[test]
    fn test_backspace() {
        let mut pad = VerificationPad::new();
        pad.fill("12");
        assert_eq!(pad.focus(), 2);

        // Empty slot: move back
        pad.backspace(2);
        assert_eq!(pad.focus(), 1);
        // Filled slot: clear in place
        pad.backspace(1);
        assert_eq!(pad.slot(1), None);
        assert_eq!(pad.focus(), 1);
        pad.backspace(1);
        assert_eq!(pad.focus(), 0);

        pad.backspace(0);
        pad.backspace(0);
        assert_eq!(pad.focus(), 0);
        assert_eq!(pad.code(), "");
    }

    #[test]
    fn test_completeness() {
        let mut pad = VerificationPad::new();
        assert!(!pad.is_complete());

        pad.fill("12345");
        assert!(!pad.is_complete());

        pad.input(5, " ");
        assert!(!pad.is_complete());

        pad.input(5, "6");
        assert!(pad.is_complete());
        assert_eq!(pad.code(), "123456");

        pad.clear();
        assert!(!pad.is_complete());
        assert_eq!(pad.focus(), 0);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut pad = VerificationPad::new();
        pad.input(CODE_LENGTH, "1");
        pad.backspace(CODE_LENGTH + 3);
        assert_eq!(pad, VerificationPad::new());
    }
}
