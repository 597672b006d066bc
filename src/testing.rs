// Test helpers shared by the unit tests.

use crate::domain::error::Result;
use crate::domain::traits::SubwordTokenizer;

/// A small deterministic tokenizer: splits on whitespace, emits
/// every ASCII punctuation character on its own, and optionally
/// breaks long words into WordPiece-style "##" continuations.
pub(crate) struct PunctTokenizer {
    max_piece: usize,
}

impl PunctTokenizer {
    pub(crate) fn new() -> Self {
        Self { max_piece: usize::MAX }
    }

    pub(crate) fn with_max_piece(max_piece: usize) -> Self {
        Self { max_piece }
    }

    fn flush(&self, word: &mut String, out: &mut Vec<String>) {
        let chars: Vec<char> = word.chars().collect();
        for (i, piece) in chars.chunks(self.max_piece.max(1)).enumerate() {
            let piece: String = piece.iter().collect();
            if i == 0 {
                out.push(piece);
            } else {
                out.push(format!("##{piece}"));
            }
        }
        word.clear();
    }
}

impl SubwordTokenizer for PunctTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut out  = Vec::new();
        let mut word = String::new();
        for c in text.chars() {
            if c.is_whitespace() {
                self.flush(&mut word, &mut out);
            } else if c.is_ascii_punctuation() {
                self.flush(&mut word, &mut out);
                out.push(c.to_string());
            } else {
                word.push(c);
            }
        }
        self.flush(&mut word, &mut out);
        Ok(out)
    }

    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Result<Vec<u32>> {
        Ok(tokens
            .iter()
            .map(|t| match t.as_str() {
                "[PAD]" => 0,
                "[UNK]" => 1,
                "[CLS]" => 101,
                "[SEP]" => 102,
                other => {
                    let h = other
                        .bytes()
                        .fold(17u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
                    1000 + h % 20_000
                }
            })
            .collect())
    }
}
