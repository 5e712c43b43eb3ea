use crate::models::PageResult;
use futures::future::join_all;
use indicatif::ProgressBar;
use std::future::Future;

/// Pages analyzed concurrently per batch
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Pages collected by a scheduler run
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Results in batch order, input order within each batch
    pub pages: Vec<PageResult>,
    pub batches: usize,
    /// Analyses that aborted unexpectedly and were left out of `pages`
    pub dropped: usize,
}

/// Runs page analyses in fixed-size batches: concurrent within a batch, sequential across batches
pub struct BatchScheduler {
    batch_size: usize,
}

impl BatchScheduler {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Each analysis runs as its own task, so a panicking one is dropped
    /// without cancelling its siblings or the remaining batches.
    pub async fn run<F, Fut>(
        &self,
        targets: &[String],
        analyze: F,
        progress: Option<&ProgressBar>,
    ) -> BatchOutcome
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = PageResult> + Send + 'static,
    {
        let mut outcome = BatchOutcome::default();

        for batch in targets.chunks(self.batch_size) {
            let handles: Vec<_> = batch
                .iter()
                .map(|url| tokio::spawn(analyze(url.clone())))
                .collect();

            for (url, settled) in batch.iter().zip(join_all(handles).await) {
                match settled {
                    Ok(page) => outcome.pages.push(page),
                    Err(e) => {
                        tracing::error!(url = %url, error = %e, "Page analysis aborted, dropping page");
                        outcome.dropped += 1;
                    }
                }
            }

            outcome.batches += 1;
            tracing::debug!(
                batch = outcome.batches,
                size = batch.len(),
                collected = outcome.pages.len(),
                "Batch complete"
            );

            if let Some(pb) = progress {
                pb.inc(batch.len() as u64);
            }
        }

        outcome
    }
}

impl Default for BatchScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
