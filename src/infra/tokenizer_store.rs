// ============================================================
// Layer 6 - Tokenizer Store
// ============================================================
// Supplies the sub-word tokenizer capability.
//
// A pretrained BERT vocabulary (a HuggingFace tokenizer.json) is
// loaded when one exists in the store directory. Otherwise a
// word-level vocabulary is built from the corpus and written as
// tokenizer.json, so every later run reuses the same ids.
//
// The fallback tokenizer mirrors BERT's pre-processing:
//   normalizer:    BertNormalizer (lowercase, no accent stripping)
//   pre-tokenizer: BertPreTokenizer (split on whitespace and
//                  punctuation, each punctuation char on its own)
//   model:         WordLevel with [UNK] for unseen words

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokenizers::normalizers::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{
    NormalizedString, Normalizer, OffsetReferential, OffsetType, PreTokenizedString,
    PreTokenizer, Tokenizer,
};

use crate::domain::error::SquadError;
use crate::domain::traits::SubwordTokenizer;

pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Special tokens and the BERT ids they keep in the fallback vocab
const SPECIAL_TOKENS: [(&str, u32); 5] = [
    ("[PAD]", 0),
    ("[UNK]", 100),
    ("[CLS]", 101),
    ("[SEP]", 102),
    ("[MASK]", 103),
];

// ─── SubwordTokenizer for HuggingFace tokenizers ──────────────────────────────
impl SubwordTokenizer for Tokenizer {
    fn tokenize(&self, text: &str) -> crate::Result<Vec<String>> {
        let encoding = self
            .encode(text, false)
            .map_err(|e| SquadError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_tokens().to_vec())
    }

    fn convert_tokens_to_ids(&self, tokens: &[String]) -> crate::Result<Vec<u32>> {
        tokens
            .iter()
            .map(|t| {
                self.token_to_id(t)
                    .ok_or_else(|| SquadError::UnknownToken(t.clone()))
            })
            .collect()
    }
}

// ─── TokenizerStore ───────────────────────────────────────────────────────────
pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load an existing tokenizer or build a word-level one from `texts`.
    pub fn load_or_build<S: AsRef<str>>(&self, texts: &[S], vocab_size: usize) -> Result<Tokenizer> {
        if self.path().exists() {
            tracing::info!("Loading existing tokenizer from '{}'", self.path().display());
            self.load()
        } else {
            tracing::info!("Building word-level tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    /// Load tokenizer.json, switching off any padding or truncation
    /// it was saved with: the feature assembler does both itself.
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        let mut tokenizer = Tokenizer::from_file(&path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(None)
            .map_err(|e| anyhow::anyhow!("Cannot disable truncation: {e}"))?;
        Ok(tokenizer)
    }

    /// Build a word-level vocabulary from `texts`, most frequent
    /// words first, write it as tokenizer.json and load it back.
    pub fn build_and_save<S: AsRef<str>>(&self, texts: &[S], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // ── Step 1: Count words the way the saved tokenizer will split them ───
        let freq = count_pieces(texts)?;

        // frequency descending, then alphabetical so ids are reproducible
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(SPECIAL_TOKENS.len()));

        // ── Step 2: Assign ids ────────────────────────────────────────────────
        let mut vocab = serde_json::Map::new();
        for (token, id) in SPECIAL_TOKENS {
            vocab.insert(token.to_string(), serde_json::json!(id));
        }
        let mut next_id = 104u32;
        for (word, _) in &words {
            if !vocab.contains_key(word) {
                vocab.insert(word.clone(), serde_json::json!(next_id));
                next_id += 1;
            }
        }

        let vocab_len = vocab.len();

        // ── Step 3: Write tokenizer JSON in HuggingFace format ────────────────
        let added_tokens: Vec<serde_json::Value> = SPECIAL_TOKENS
            .iter()
            .map(|(content, id)| {
                serde_json::json!({
                    "id": id, "content": content, "single_word": false,
                    "lstrip": false, "rstrip": false, "normalized": false, "special": true
                })
            })
            .collect();

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": false,
                "lowercase": true
            },
            "pre_tokenizer": { "type": "BertPreTokenizer" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let path = self.path();
        std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer to '{}'", path.display()))?;

        tracing::info!(
            "Tokenizer built with {} entries, saved to '{}'",
            vocab_len,
            path.display()
        );

        self.load()
    }
}

/// Normalizer written into the fallback tokenizer.json
fn bert_normalizer() -> BertNormalizer {
    // clean_text, handle_chinese_chars, strip_accents, lowercase
    BertNormalizer::new(true, true, Some(false), true)
}

/// Count the pieces the saved normalizer and pre-tokenizer produce
/// for `texts`, so every counted word is reachable at encode time.
fn count_pieces<S: AsRef<str>>(texts: &[S]) -> Result<HashMap<String, usize>> {
    let normalizer = bert_normalizer();
    let mut freq: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let mut normalized = NormalizedString::from(text.as_ref());
        normalizer
            .normalize(&mut normalized)
            .map_err(|e| anyhow::anyhow!("Cannot normalise corpus text: {e}"))?;

        let mut pretokenized = PreTokenizedString::from(normalized);
        BertPreTokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| anyhow::anyhow!("Cannot pre-tokenise corpus text: {e}"))?;

        for (piece, _, _) in pretokenized.get_splits(OffsetReferential::Original, OffsetType::Byte) {
            *freq.entry(piece.to_string()).or_insert(0) += 1;
        }
    }
    Ok(freq)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(tok: &Tokenizer, text: &str) -> Vec<String> {
        SubwordTokenizer::tokenize(tok, text).unwrap()
    }

    const CORPUS: [&str; 2] = [
        "The leader was John Smith (1895-1943).",
        "When was John Smith born?",
    ];

    #[test]
    fn test_count_pieces() {
        let freq = count_pieces(&["Smith (1895-1943).", "smith"]).unwrap();
        assert_eq!(freq["smith"], 2);
        assert_eq!(freq["1895"], 1);
        assert_eq!(freq["("], 1);
        assert!(!freq.contains_key("(1895-1943)."));
    }

    #[test]
    fn test_unicode_punctuation_is_in_vocab() {
        let dir = tempfile::tempdir().unwrap();
        let tok = TokenizerStore::new(dir.path())
            .build_and_save(&["He said \u{201c}hello\u{201d} to Zo\u{eb}\u{2014}twice."], 1000)
            .unwrap();

        let tokens = tokenize(&tok, "He said \u{201c}hello\u{201d} to Zo\u{eb}\u{2014}twice.");
        assert!(!tokens.iter().any(|t| t == "[UNK]"), "{tokens:?}");
        for word in ["hello", "twice", "zo\u{eb}", "\u{201c}", "\u{2014}"] {
            assert!(tokens.iter().any(|t| t == word), "missing {word} in {tokens:?}");
        }
    }

    #[test]
    fn test_builds_and_tokenizes() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok   = store.load_or_build(&CORPUS, 1000).unwrap();

        assert!(store.path().exists());
        assert_eq!(
            tokenize(&tok, "(1895-1943)."),
            vec!["(", "1895", "-", "1943", ")", "."]
        );
        assert_eq!(tokenize(&tok, "John SMITH"), vec!["john", "smith"]);
        assert_eq!(tokenize(&tok, "zebra"), vec!["[UNK]"]);
    }

    #[test]
    fn test_special_token_ids() {
        let dir = tempfile::tempdir().unwrap();
        let tok = TokenizerStore::new(dir.path()).build_and_save(&CORPUS, 1000).unwrap();

        let specials = ["[CLS]".to_string(), "[SEP]".to_string(), "[UNK]".to_string()];
        let ids = SubwordTokenizer::convert_tokens_to_ids(&tok, &specials).unwrap();
        assert_eq!(ids, vec![101, 102, 100]);
        assert!(matches!(
            SubwordTokenizer::convert_tokens_to_ids(&tok, &["zebra".to_string()]),
            Err(SquadError::UnknownToken(_))
        ));
    }

    #[test]
    fn test_reuses_saved_tokenizer() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let first = store.load_or_build(&CORPUS, 1000).unwrap();
        // a different corpus must not change the saved vocabulary
        let again = store.load_or_build(&["zebra"], 1000).unwrap();
        assert_eq!(first.get_vocab_size(true), again.get_vocab_size(true));
        assert_eq!(tokenize(&again, "zebra"), vec!["[UNK]"]);
    }
}
