use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use anyhow::Result;
use tracing::debug;

use crate::config::Config;
use crate::detection::CrackAnalyzer;
use crate::error::AnalysisError;
use crate::models::AnalysisResult;

/// One queued invocation: the caller-chosen id is echoed back on the outcome
/// so submissions and results can be paired up.
pub struct AnalysisJob {
    pub id: u64,
    pub bytes: Vec<u8>,
}

pub struct AnalysisOutcome {
    pub id: u64,
    pub result: std::result::Result<AnalysisResult, AnalysisError>,
}

/// Bounded worker pool serving concurrent analysis runs over an MPSC job
/// queue.
///
/// Each worker owns its own `CrackAnalyzer`; the only state shared between
/// runs is the immutable `Arc<Config>`. Jobs run to completion or failure —
/// there is no cancellation of in-flight work. Dropping the pool closes the
/// queue, lets queued jobs drain, and joins the workers.
pub struct AnalysisPool {
    job_tx: Option<Sender<AnalysisJob>>,
    outcome_rx: Receiver<AnalysisOutcome>,
    workers: Vec<JoinHandle<()>>,
}

impl AnalysisPool {
    /// Spawn `config.processing_threads` workers (at least one).
    pub fn new(config: Config) -> Self {
        let threads = config.processing_threads.max(1);
        let config = Arc::new(config);

        let (job_tx, job_rx) = mpsc::channel::<AnalysisJob>();
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (outcome_tx, outcome_rx) = mpsc::channel();

        let mut workers = Vec::with_capacity(threads);
        for worker_id in 0..threads {
            let job_rx = Arc::clone(&job_rx);
            let outcome_tx = outcome_tx.clone();
            let analyzer = CrackAnalyzer::from_shared(Arc::clone(&config));

            workers.push(thread::spawn(move || {
                loop {
                    // Hold the lock only while taking a job off the queue.
                    let job = {
                        let rx = job_rx.lock().unwrap();
                        rx.recv()
                    };
                    let Ok(job) = job else {
                        break; // queue closed
                    };

                    debug!(worker_id, job_id = job.id, "job picked up");
                    let result = analyzer.analyze(&job.bytes);
                    if outcome_tx
                        .send(AnalysisOutcome { id: job.id, result })
                        .is_err()
                    {
                        break; // nobody is listening anymore
                    }
                }
            }));
        }

        Self {
            job_tx: Some(job_tx),
            outcome_rx,
            workers,
        }
    }

    /// Enqueue a job; it will be picked up by the next free worker.
    pub fn submit(&self, job: AnalysisJob) -> Result<()> {
        self.job_tx
            .as_ref()
            .expect("pool queue already closed")
            .send(job)
            .map_err(|e| anyhow::anyhow!("Failed to send analysis job: {}", e))
    }

    /// Block until the next outcome arrives. Returns `None` once the queue is
    /// closed and every worker has exited.
    pub fn recv(&self) -> Option<AnalysisOutcome> {
        self.outcome_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<AnalysisOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    /// Close the queue and join the workers. Queued jobs still drain first.
    pub fn shutdown(self) {}

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for AnalysisPool {
    fn drop(&mut self) {
        self.job_tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}
