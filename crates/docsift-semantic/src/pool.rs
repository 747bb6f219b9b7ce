//! Worker pool: bounded dispatch queue, warm-up, and shutdown.
//!
//! Workers compete for tasks from a single bounded queue, which doubles
//! as the backpressure point. A submitting caller parks on a per-task
//! completion channel until its assigned worker responds; the pool never
//! leaves a caller hanging, every task resolves exactly once with a
//! result or an error value.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use docsift_core::defaults::WARMUP_TEXT;
use docsift_core::{Error, MatchOutcome, Result, TagCache, TagMatcher};

use crate::config::{MatcherConfig, PoolConfig, QueuePolicy, WorkerCommand};
use crate::worker::InferenceWorker;

/// One unit of work owned by exactly one worker during execution.
struct Task {
    request_id: Uuid,
    text: String,
    candidate_tags: Vec<String>,
    respond_to: oneshot::Sender<Result<MatchOutcome>>,
}

/// Pool of inference worker processes behind a bounded task queue.
pub struct WorkerPool {
    queue_tx: mpsc::Sender<Task>,
    runners: Vec<JoinHandle<()>>,
    cache: Arc<TagCache>,
    config: PoolConfig,
}

impl WorkerPool {
    /// Launch all workers, warm them up, and start dispatching.
    ///
    /// Startup is all-or-nothing: if any worker fails to launch,
    /// acknowledge readiness, or complete its warm-up probe, every
    /// already-started worker is torn down and the error is returned.
    /// Warm-up is sequential on purpose — one synthetic task per worker,
    /// carrying the full known tag set, bounds peak load during startup
    /// while forcing each process to embed the tag vocabulary before
    /// real traffic arrives.
    pub async fn initialize(
        config: PoolConfig,
        matcher_config: MatcherConfig,
        command: WorkerCommand,
        known_tags: &[String],
    ) -> Result<Self> {
        config.validate()?;
        matcher_config.validate()?;

        info!(
            worker_count = config.worker_count,
            queue_capacity = config.queue_capacity,
            model = %matcher_config.model_name,
            "Initializing semantic worker pool"
        );

        let startup_timeout = Duration::from_millis(config.startup_timeout_ms);
        let mut workers: Vec<InferenceWorker> = Vec::with_capacity(config.worker_count);

        for id in 0..config.worker_count {
            match InferenceWorker::spawn(id, &command, &matcher_config, startup_timeout).await {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    error!(worker_id = id, error = %e, "Worker failed to start, aborting pool");
                    close_all(workers).await;
                    return Err(e);
                }
            }
        }

        let mut warmup_error = None;
        for worker in workers.iter_mut() {
            let started = Instant::now();
            match worker.process(WARMUP_TEXT, known_tags).await {
                Ok(_) => debug!(
                    worker_id = worker.id(),
                    tag_count = known_tags.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Worker warm-up complete"
                ),
                Err(e) => {
                    error!(worker_id = worker.id(), error = %e, "Warm-up failed, aborting pool");
                    warmup_error = Some(Error::WorkerStartup(format!(
                        "worker {} warm-up failed: {}",
                        worker.id(),
                        e
                    )));
                    break;
                }
            }
        }
        if let Some(err) = warmup_error {
            close_all(workers).await;
            return Err(err);
        }

        let cache = Arc::new(TagCache::new());
        cache.lookup_and_record(known_tags);

        let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity);
        let queue_rx = Arc::new(Mutex::new(queue_rx));

        let runners = workers
            .into_iter()
            .map(|worker| tokio::spawn(run_worker(worker, Arc::clone(&queue_rx))))
            .collect();

        info!("Semantic worker pool initialized");

        Ok(Self {
            queue_tx,
            runners,
            cache,
            config,
        })
    }

    /// The pool-wide tag bookkeeping cache.
    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    /// Submit a task and wait for its resolution.
    async fn submit(
        &self,
        text: &str,
        candidate_tags: &[String],
        request_id: Uuid,
    ) -> Result<MatchOutcome> {
        let new_tags = self.cache.lookup_and_record(candidate_tags);
        if !new_tags.is_empty() {
            debug!(
                %request_id,
                tag_count = new_tags.len(),
                "Recorded tags not seen before"
            );
        }

        let (respond_to, response) = oneshot::channel();
        let task = Task {
            request_id,
            text: text.to_string(),
            candidate_tags: candidate_tags.to_vec(),
            respond_to,
        };

        match self.config.submit_policy {
            QueuePolicy::Block => {
                self.queue_tx
                    .send(task)
                    .await
                    .map_err(|_| Error::Worker("worker pool is not accepting tasks".to_string()))?;
            }
            QueuePolicy::Reject => {
                self.queue_tx.try_send(task).map_err(|e| match e {
                    mpsc::error::TrySendError::Full(_) => Error::QueueFull,
                    mpsc::error::TrySendError::Closed(_) => {
                        Error::Worker("worker pool is not accepting tasks".to_string())
                    }
                })?;
            }
        }

        let timeout = Duration::from_millis(self.config.request_timeout_ms);
        match tokio::time::timeout(timeout, response).await {
            // Dropping the receiver abandons the task; the worker still
            // finishes it and its late result is discarded.
            Err(_) => Err(Error::Timeout(self.config.request_timeout_ms)),
            Ok(Err(_)) => Err(Error::Worker(
                "worker exited before responding".to_string(),
            )),
            Ok(Ok(result)) => result,
        }
    }

    /// Drain the queue and stop every worker, waiting for all of them.
    pub async fn shutdown(self) -> Result<()> {
        info!(worker_count = self.runners.len(), "Shutting down semantic worker pool");

        // Closing the queue's send side signals runners to drain and exit
        drop(self.queue_tx);
        for runner in self.runners {
            if let Err(e) = runner.await {
                warn!(error = %e, "Worker runner did not exit cleanly");
            }
        }

        info!("Semantic worker pool shut down");
        Ok(())
    }
}

#[async_trait]
impl TagMatcher for WorkerPool {
    async fn suggest_tags(
        &self,
        text: &str,
        candidate_tags: &[String],
        request_id: Uuid,
    ) -> Result<MatchOutcome> {
        self.submit(text, candidate_tags, request_id).await
    }

    async fn health_check(&self) -> Result<()> {
        let probe_tags = vec![
            "test".to_string(),
            "document".to_string(),
            "invoice".to_string(),
        ];
        self.submit("test document for health check", &probe_tags, Uuid::new_v4())
            .await
            .map(|_| ())
    }
}

async fn close_all(workers: Vec<InferenceWorker>) {
    for worker in workers {
        worker.close().await;
    }
}

/// One worker's dispatch loop: compete for tasks until the queue closes
/// or the worker hits an infrastructure failure.
async fn run_worker(mut worker: InferenceWorker, queue: Arc<Mutex<mpsc::Receiver<Task>>>) {
    let worker_id = worker.id();
    debug!(worker_id, "Worker runner started");

    loop {
        // Hold the queue lock only while waiting for one task
        let task = { queue.lock().await.recv().await };
        let Some(task) = task else {
            debug!(worker_id, "Task queue closed, draining worker");
            break;
        };

        let request_id = task.request_id;
        let started = Instant::now();
        let result = worker.process(&task.text, &task.candidate_tags).await;

        match &result {
            Ok(outcome) => {
                info!(
                    worker_id,
                    %request_id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    result_count = outcome.suggested_tags.len(),
                    "Task completed"
                );
            }
            Err(e) if e.is_worker_recoverable() => {
                warn!(worker_id, %request_id, error = %e, "Task failed upstream");
            }
            Err(e) => {
                error!(worker_id, %request_id, error = %e, "Worker infrastructure failure");
            }
        }

        let fatal = matches!(&result, Err(e) if !e.is_worker_recoverable());

        // The caller may have timed out and gone away; that is fine
        let _ = task.respond_to.send(result);

        if fatal {
            // Restart policy is an operator decision, not automatic
            break;
        }
    }

    worker.close().await;
    debug!(worker_id, "Worker runner stopped");
}
