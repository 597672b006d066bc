// ============================================================
// Layer 6 - Worker Pool
// ============================================================
// Applies the feature transform to every example on a fixed
// size rayon pool.
//
// The transform is captured by reference in the worker closure;
// workers share nothing mutable. Results are collected in source
// order, so the flattened feature list is identical no matter
// how the pool schedules the work.

use std::time::Instant;

use anyhow::Context;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::data::assembler::FeatureTransform;
use crate::domain::error::Result;
use crate::domain::example::SquadExample;
use crate::domain::feature::SquadFeature;

pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// Build a pool with `num_workers` threads. Zero lets rayon pick
    /// one thread per CPU.
    pub fn new(num_workers: usize) -> anyhow::Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .thread_name(|i| format!("squad-worker-{i}"))
            .build()
            .context("unable to configure rayon thread pool")?;
        tracing::debug!("Worker pool ready with {} threads", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn num_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Transform all examples, returning their features concatenated
    /// in example order. Stops at the first error.
    pub fn transform_all(
        &self,
        transform: &FeatureTransform,
        examples:  &[SquadExample],
    ) -> Result<Vec<SquadFeature>> {
        let start = Instant::now();

        let per_example: Vec<Vec<SquadFeature>> = self.pool.install(|| {
            examples
                .par_iter()
                .map(|example| transform.transform(example))
                .collect::<Result<Vec<_>>>()
        })?;

        let features: Vec<SquadFeature> = per_example.into_iter().flatten().collect();
        tracing::info!(
            "Transformed {} examples into {} features in {:.2?}",
            examples.len(),
            features.len(),
            start.elapsed()
        );
        Ok(features)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::config::FeatureConfig;
    use crate::domain::example::WordSpan;
    use crate::testing::PunctTokenizer;

    fn examples(n: usize) -> Vec<SquadExample> {
        (0..n)
            .map(|i| {
                let words: Arc<[String]> = (0..(5 + i % 17)).map(|w| format!("p{i}w{w}")).collect();
                SquadExample {
                    qas_id:           format!("q{i}"),
                    sequence_id:      i,
                    question_text:    format!("question number {i}?"),
                    orig_answer_text: words[2].clone(),
                    doc_tokens:       words,
                    answer_span:      Some(WordSpan::new(2, 2)),
                    is_impossible:    false,
                }
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cfg = FeatureConfig {
            max_seq_length:   16,
            doc_stride:       3,
            max_query_length: 6,
            ..Default::default()
        };
        let transform = FeatureTransform::new(Arc::new(PunctTokenizer::new()), cfg).unwrap();
        let examples  = examples(60);

        let sequential: Vec<SquadFeature> = examples
            .iter()
            .flat_map(|e| transform.transform(e).unwrap())
            .collect();
        let parallel = WorkerPool::new(4).unwrap().transform_all(&transform, &examples).unwrap();

        assert_eq!(parallel, sequential);
        // features of one example stay contiguous and in window order
        for pair in parallel.windows(2) {
            assert!(pair[0].sequence_id <= pair[1].sequence_id);
        }
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(WorkerPool::new(3).unwrap().num_workers(), 3);
    }
}
