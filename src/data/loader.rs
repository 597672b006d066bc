// ============================================================
// Layer 4 - SQuAD Loader
// ============================================================
// Reads a SQuAD JSON file and flattens it into one SquadRecord
// per question, in file order.
//
// File layout (v1.1 and v2.0):
//   { "version": "...",
//     "data": [ { "title": "...",
//                 "paragraphs": [ { "context": "...",
//                                   "qas": [ { "id", "question",
//                                              "answers": [ {"text", "answer_start"} ],
//                                              "is_impossible" (v2.0 only) } ] } ] } ] }
//
// Only the fields the pipeline needs are deserialised; anything
// else in the file (plausible_answers, titles, ...) is ignored.

use std::{fs::File, io::BufReader, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::record::{RawAnswer, SquadRecord};
use crate::domain::traits::RecordSource;

#[derive(Debug, Deserialize)]
struct SquadFile {
    data: Vec<SquadArticle>,
}

#[derive(Debug, Deserialize)]
struct SquadArticle {
    paragraphs: Vec<SquadParagraph>,
}

#[derive(Debug, Deserialize)]
struct SquadParagraph {
    context: String,
    qas:     Vec<SquadQa>,
}

#[derive(Debug, Deserialize)]
struct SquadQa {
    id:       String,
    question: String,
    #[serde(default)]
    answers: Vec<SquadAnswer>,
    #[serde(default)]
    is_impossible: bool,
}

#[derive(Debug, Deserialize)]
struct SquadAnswer {
    text:         String,
    answer_start: usize,
}

/// Loads records from a SQuAD JSON file on disk.
pub struct SquadLoader {
    path: PathBuf,
}

impl SquadLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for SquadLoader {
    fn load_records(&self) -> Result<Vec<SquadRecord>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open SQuAD file '{}'", self.path.display()))?;
        let parsed: SquadFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Cannot parse SQuAD JSON in '{}'", self.path.display()))?;

        let records = flatten(parsed);
        tracing::info!(
            "Loaded {} question records from '{}'",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Parse SQuAD JSON held in memory.
pub fn parse_squad_str(json: &str) -> Result<Vec<SquadRecord>> {
    let parsed: SquadFile = serde_json::from_str(json).context("Cannot parse SQuAD JSON")?;
    Ok(flatten(parsed))
}

fn flatten(file: SquadFile) -> Vec<SquadRecord> {
    let mut records         = Vec::new();
    let mut paragraph_index = 0usize;

    for article in file.data {
        for paragraph in article.paragraphs {
            let context: Arc<str> = paragraph.context.into();
            for qa in paragraph.qas {
                let answers = qa
                    .answers
                    .into_iter()
                    .map(|a| RawAnswer::new(a.text, a.answer_start))
                    .collect();
                records.push(SquadRecord::new(
                    paragraph_index,
                    Arc::clone(&context),
                    qa.question,
                    qa.id,
                    answers,
                    qa.is_impossible,
                ));
            }
            paragraph_index += 1;
        }
    }

    records
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const V1: &str = r#"{
        "version": "1.1",
        "data": [{
            "title": "Leaders",
            "paragraphs": [
                {
                    "context": "The leader was John Smith (1895-1943).",
                    "qas": [
                        {"id": "a1", "question": "Who was the leader?",
                         "answers": [{"text": "John Smith", "answer_start": 15}]},
                        {"id": "a2", "question": "When was he born?",
                         "answers": [{"text": "1895", "answer_start": 27}]}
                    ]
                },
                {
                    "context": "Second paragraph.",
                    "qas": [{"id": "b1", "question": "Which?",
                             "answers": [{"text": "Second", "answer_start": 0}]}]
                }
            ]
        }]
    }"#;

    const V2: &str = r#"{
        "version": "v2.0",
        "data": [{
            "title": "T",
            "paragraphs": [{
                "context": "Nothing here.",
                "qas": [{"id": "x", "question": "What is missing?", "answers": [],
                         "plausible_answers": [{"text": "Nothing", "answer_start": 0}],
                         "is_impossible": true}]
            }]
        }]
    }"#;

    #[test]
    fn test_flattens_v1_in_order() {
        let records = parse_squad_str(V1).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.qas_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(records[1].answers, vec![RawAnswer::new("1895", 27)]);
        assert!(!records[0].is_impossible);
        assert_eq!(records[0].paragraph_index, 0);
        assert_eq!(records[2].paragraph_index, 1);
        assert!(Arc::ptr_eq(&records[0].context, &records[1].context));
    }

    #[test]
    fn test_reads_v2_impossible_flag() {
        let records = parse_squad_str(V2).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_impossible);
        assert!(records[0].answers.is_empty());
    }

    #[test]
    fn test_loads_from_disk() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        std::fs::write(&path, V1).unwrap();

        let records = SquadLoader::new(&path).load_records().unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(SquadLoader::new("/definitely/not/here.json").load_records().is_err());
    }
}
