// ============================================================
// Layer 4 - Window Splitter and Max-Context Resolver
// ============================================================
// A sub-tokenised document is usually longer than what fits in
// one model input next to the question. We slide a fixed-size
// window over it with a stride, so every sub-token lands in at
// least one window and answers near a boundary are still seen
// whole by some window.
//
// Example with max_tokens_for_doc = 5, doc_stride = 2:
//   Document: A B C D E F G H
//   Window 0: A B C D E        (start 0, length 5)
//   Window 1:     C D E F G    (start 2, length 5)
//   Window 2:         E F G H  (start 4, length 4, ends at N)
//
// Because windows overlap, one sub-token may appear in several
// of them. The "max context" window of a token is the one where
// it has the most balanced surrounding context, i.e. the largest
// min(left, right), with a small bonus for longer windows.

use crate::domain::config::NUM_SPECIAL_TOKENS;
use crate::domain::error::{Result, SquadError};

/// A `(start, length)` slice of the flattened sub-token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocWindow {
    pub start:  usize,
    pub length: usize,
}

impl DocWindow {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Inclusive index of the last sub-token in the window
    pub fn end(&self) -> usize {
        self.start + self.length - 1
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && position <= self.end()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WindowSplitter {
    /// Sub-tokens of document per window
    max_tokens_for_doc: usize,
    /// Maximum step between window starts
    doc_stride: usize,
}

impl WindowSplitter {
    /// Create a splitter.
    ///
    /// # Errors
    /// `InvalidConfiguration` if either value is zero, which would
    /// produce empty windows or never advance.
    pub fn new(max_tokens_for_doc: usize, doc_stride: usize) -> Result<Self> {
        if max_tokens_for_doc == 0 {
            return Err(SquadError::InvalidConfiguration(
                "no room left for document tokens in a window".into(),
            ));
        }
        if doc_stride == 0 {
            return Err(SquadError::InvalidConfiguration(
                "doc_stride must be at least 1".into(),
            ));
        }
        Ok(Self { max_tokens_for_doc, doc_stride })
    }

    /// Size windows for a query of `query_len` sub-tokens, reserving
    /// room for [CLS] and the two [SEP] tokens.
    pub fn for_query(max_seq_length: usize, query_len: usize, doc_stride: usize) -> Result<Self> {
        let max_tokens_for_doc = max_seq_length
            .checked_sub(query_len + NUM_SPECIAL_TOKENS)
            .unwrap_or(0);
        if max_tokens_for_doc == 0 {
            return Err(SquadError::InvalidConfiguration(format!(
                "max_seq_length {max_seq_length} leaves no document tokens for a query of {query_len}"
            )));
        }
        Self::new(max_tokens_for_doc, doc_stride)
    }

    pub fn max_tokens_for_doc(&self) -> usize {
        self.max_tokens_for_doc
    }

    /// Windows covering `[0, num_tokens)`, in order. The last window
    /// always ends exactly at `num_tokens - 1`. Empty input yields no
    /// windows.
    pub fn split(&self, num_tokens: usize) -> Vec<DocWindow> {
        let mut windows = Vec::new();
        let mut start   = 0usize;

        while start < num_tokens {
            let length = (num_tokens - start).min(self.max_tokens_for_doc);
            windows.push(DocWindow::new(start, length));

            if start + length == num_tokens {
                break;
            }
            start += length.min(self.doc_stride);
        }

        windows
    }
}

/// Index of the window that owns `position` as its max-context
/// window, or `None` if no window contains it. Ties go to the
/// lowest window index.
pub fn max_context_owner(windows: &[DocWindow], position: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, window) in windows.iter().enumerate() {
        if !window.contains(position) {
            continue;
        }
        let num_left_context  = position - window.start;
        let num_right_context = window.end() - position;
        let score = num_left_context.min(num_right_context) as f64 + 0.01 * window.length as f64;

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
}

/// Whether `windows[current]` is the max-context window for `position`.
pub fn is_max_context(windows: &[DocWindow], current: usize, position: usize) -> bool {
    max_context_owner(windows, position) == Some(current)
}
