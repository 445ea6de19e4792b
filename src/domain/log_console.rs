//! Append-only log console.

use std::collections::VecDeque;

/// Text log fed by `log` push events.
///
/// Every entry is stored as a line break followed by the text, so the
/// content always ends with `"\n" + last_text`. The text itself may carry
/// line breaks; entry boundaries are recorded on append, not searched for.
/// When a byte cap is set, whole leading entries are dropped until the
/// content fits and the newest entry is always kept.
#[derive(Debug, Clone, Default)]
pub struct LogConsole {
    content: String,
    entry_lens: VecDeque<usize>,
    max_bytes: Option<usize>,
}

impl LogConsole {
    /// Creates an empty console. `max_bytes` of `None` means unbounded.
    #[must_use]
    pub fn new(max_bytes: Option<usize>) -> Self {
        Self {
            content: String::new(),
            entry_lens: VecDeque::new(),
            max_bytes,
        }
    }

    /// Appends `"\n" + text`.
    pub fn append(&mut self, text: &str) {
        self.content.push('\n');
        self.content.push_str(text);
        if self.max_bytes.is_some() {
            self.entry_lens.push_back(text.len() + 1);
            self.trim();
        }
    }

    /// Returns the full console text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    fn trim(&mut self) {
        let Some(max) = self.max_bytes else {
            return;
        };
        let mut cut = 0;
        let mut len = self.content.len();
        while len > max && self.entry_lens.len() > 1 {
            let Some(oldest) = self.entry_lens.pop_front() else {
                break;
            };
            cut += oldest;
            len -= oldest;
        }
        if cut > 0 {
            self.content.replace_range(..cut, "");
        }
    }
}
