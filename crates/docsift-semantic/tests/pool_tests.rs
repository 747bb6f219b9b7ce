//! Worker-pool integration tests against real child processes.
//!
//! Each fake worker is a `/bin/sh` script speaking the line protocol:
//! it consumes the startup config, prints a ready line, then answers one
//! response line per request line. Scripts vary per test to exercise the
//! error classes, saturation, timeout, and shutdown paths.

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use uuid::Uuid;

use docsift_core::{Error, TagMatcher};
use docsift_semantic::{MatcherConfig, PoolConfig, QueuePolicy, WorkerCommand, WorkerPool};

/// Answers every request with a per-process request counter baked into
/// the suggested tag, so tests can observe request ordering.
const COUNTING_WORKER: &str = r#"
read -r config || exit 1
echo '{"status":"ready","embedding_dim":384}'
n=0
while read -r line; do
  n=$((n+1))
  echo "{\"suggested_tags\":[\"seen-$n\"],\"similarities\":[{\"tag\":\"seen-$n\",\"score\":0.9}],\"error\":null}"
done
"#;

/// Reports an inference error for requests mentioning "boom", succeeds
/// otherwise.
const FLAKY_WORKER: &str = r#"
read -r config || exit 1
echo '{"status":"ready","embedding_dim":8}'
while read -r line; do
  case "$line" in
    *boom*) echo '{"suggested_tags":["should-ignore"],"similarities":[],"error":"model exploded"}' ;;
    *) echo '{"suggested_tags":["ok"],"similarities":[],"error":null}' ;;
  esac
done
"#;

/// Answers the warm-up probe correctly, then emits garbage.
const GARBAGE_WORKER: &str = r#"
read -r config || exit 1
echo '{"status":"ready","embedding_dim":8}'
n=0
while read -r line; do
  n=$((n+1))
  if [ "$n" -le 1 ]; then
    echo '{"suggested_tags":[],"similarities":[],"error":null}'
  else
    echo 'definitely not json'
  fi
done
"#;

/// Never becomes ready.
const NOT_READY_WORKER: &str = r#"
read -r config || exit 1
echo '{"status":"loading"}'
sleep 5
"#;

/// Fails its warm-up probe with an inference error.
const WARMUP_FAILING_WORKER: &str = r#"
read -r config || exit 1
echo '{"status":"ready","embedding_dim":8}'
read -r line
echo '{"suggested_tags":[],"similarities":[],"error":"no model weights"}'
"#;

/// Takes one second per request after the warm-up probe.
const SLOW_WORKER: &str = r#"
read -r config || exit 1
echo '{"status":"ready","embedding_dim":8}'
n=0
while read -r line; do
  n=$((n+1))
  if [ "$n" -gt 1 ]; then sleep 1; fi
  echo '{"suggested_tags":["slow"],"similarities":[],"error":null}'
done
"#;

fn shell_worker(script: &str) -> WorkerCommand {
    WorkerCommand::new("/bin/sh").with_args(["-c", script])
}

fn tag_list(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("tag{i}")).collect()
}

fn seen_counter(tag: &str) -> usize {
    tag.strip_prefix("seen-")
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("unexpected tag {tag}"))
}

#[tokio::test]
async fn suggest_tags_end_to_end() {
    let pool = WorkerPool::initialize(
        PoolConfig::default().with_worker_count(1),
        MatcherConfig::default(),
        shell_worker(COUNTING_WORKER),
        &tag_list(5),
    )
    .await
    .expect("pool should initialize");

    let outcome = pool
        .suggest_tags("a plain test document", &tag_list(5), Uuid::new_v4())
        .await
        .expect("task should succeed");

    // The warm-up probe was this worker's first request
    assert_eq!(outcome.suggested_tags, vec!["seen-2"]);
    assert_eq!(outcome.similarities.len(), 1);
    assert_eq!(outcome.similarities[0].score, 0.9);

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn warm_up_precedes_every_external_task() {
    let pool = WorkerPool::initialize(
        PoolConfig::default().with_worker_count(3),
        MatcherConfig::default(),
        shell_worker(COUNTING_WORKER),
        &tag_list(50),
    )
    .await
    .expect("pool should initialize");

    let submissions = (0..9).map(|i| {
        let text = format!("document {i}");
        let pool = &pool;
        async move {
            pool.suggest_tags(&text, &tag_list(50), Uuid::new_v4())
                .await
        }
    });
    let outcomes = join_all(submissions).await;

    assert_eq!(outcomes.len(), 9);
    for outcome in outcomes {
        let outcome = outcome.expect("task should succeed");
        // Every worker handled its warm-up probe as request 1, so no
        // external task can ever observe a counter below 2.
        let counter = seen_counter(&outcome.suggested_tags[0]);
        assert!(counter >= 2, "external task saw counter {counter}");
    }

    pool.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn more_tasks_than_workers_never_deadlocks() {
    let pool = WorkerPool::initialize(
        PoolConfig::default()
            .with_worker_count(2)
            .with_queue_capacity(4),
        MatcherConfig::default(),
        shell_worker(COUNTING_WORKER),
        &tag_list(3),
    )
    .await
    .expect("pool should initialize");

    let submissions = (0..20).map(|i| {
        let text = format!("document {i}");
        let pool = &pool;
        async move {
            pool.suggest_tags(&text, &tag_list(3), Uuid::new_v4())
                .await
        }
    });
    let outcomes = join_all(submissions).await;

    assert_eq!(outcomes.len(), 20);
    for outcome in outcomes {
        assert!(outcome.is_ok(), "task failed: {:?}", outcome.err());
    }

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn inference_error_fails_task_but_worker_survives() {
    let pool = WorkerPool::initialize(
        PoolConfig::default().with_worker_count(1),
        MatcherConfig::default(),
        shell_worker(FLAKY_WORKER),
        &tag_list(3),
    )
    .await
    .expect("pool should initialize");

    let err = pool
        .suggest_tags("this will go boom", &tag_list(3), Uuid::new_v4())
        .await
        .expect_err("task should fail");
    match err {
        Error::Inference(message) => assert_eq!(message, "model exploded"),
        other => panic!("expected Inference error, got {other}"),
    }

    // Same worker keeps serving
    let outcome = pool
        .suggest_tags("a well behaved document", &tag_list(3), Uuid::new_v4())
        .await
        .expect("follow-up task should succeed");
    assert_eq!(outcome.suggested_tags, vec!["ok"]);

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn protocol_error_kills_worker_but_still_resolves_callers() {
    let pool = WorkerPool::initialize(
        PoolConfig::default()
            .with_worker_count(1)
            .with_request_timeout_ms(2_000),
        MatcherConfig::default(),
        shell_worker(GARBAGE_WORKER),
        &tag_list(3),
    )
    .await
    .expect("pool should initialize");

    let err = pool
        .suggest_tags("first real task", &tag_list(3), Uuid::new_v4())
        .await
        .expect_err("task should fail");
    match err {
        Error::Protocol(message) => assert!(message.contains("malformed"), "{message}"),
        other => panic!("expected Protocol error, got {other}"),
    }

    // The only worker is gone; later submissions still resolve with an
    // error value instead of hanging.
    let err = pool
        .suggest_tags("second task", &tag_list(3), Uuid::new_v4())
        .await
        .expect_err("task should fail");
    assert!(
        matches!(err, Error::Worker(_)),
        "expected Worker error, got {err}"
    );

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn bad_ready_acknowledgement_fails_initialization() {
    let result = WorkerPool::initialize(
        PoolConfig::default().with_worker_count(2),
        MatcherConfig::default(),
        shell_worker(NOT_READY_WORKER),
        &tag_list(3),
    )
    .await;

    let err = result.err().expect("initialization should fail");
    match err {
        Error::WorkerStartup(message) => {
            assert!(message.contains("unexpected startup status"), "{message}")
        }
        other => panic!("expected WorkerStartup error, got {other}"),
    }
}

#[tokio::test]
async fn missing_program_fails_initialization() {
    let result = WorkerPool::initialize(
        PoolConfig::default().with_worker_count(1),
        MatcherConfig::default(),
        WorkerCommand::new("/nonexistent/docsift-matcher"),
        &tag_list(3),
    )
    .await;

    assert!(matches!(result.err(), Some(Error::WorkerStartup(_))));
}

#[tokio::test]
async fn warm_up_failure_fails_initialization() {
    let result = WorkerPool::initialize(
        PoolConfig::default().with_worker_count(1),
        MatcherConfig::default(),
        shell_worker(WARMUP_FAILING_WORKER),
        &tag_list(3),
    )
    .await;

    let err = result.err().expect("initialization should fail");
    match err {
        Error::WorkerStartup(message) => {
            assert!(message.contains("warm-up failed"), "{message}")
        }
        other => panic!("expected WorkerStartup error, got {other}"),
    }
}

#[tokio::test]
async fn reject_policy_surfaces_queue_full() {
    let pool = WorkerPool::initialize(
        PoolConfig::default()
            .with_worker_count(1)
            .with_queue_capacity(1)
            .with_request_timeout_ms(10_000)
            .with_submit_policy(QueuePolicy::Reject),
        MatcherConfig::default(),
        shell_worker(SLOW_WORKER),
        &tag_list(3),
    )
    .await
    .expect("pool should initialize");

    let pool = Arc::new(pool);

    // First task occupies the worker for ~1s
    let first = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move {
            pool.suggest_tags("one", &tag_list(3), Uuid::new_v4()).await
        })
    };
    tokio::time::sleep(Duration::from_millis(300)).await;

    // Second task fills the single queue slot
    let second = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move {
            pool.suggest_tags("two", &tag_list(3), Uuid::new_v4()).await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Third submission finds the queue full
    let err = pool
        .suggest_tags("three", &tag_list(3), Uuid::new_v4())
        .await
        .expect_err("submission should be rejected");
    assert!(matches!(err, Error::QueueFull), "got {err}");

    assert!(first.await.unwrap().is_ok());
    assert!(second.await.unwrap().is_ok());

    Arc::try_unwrap(pool)
        .ok()
        .expect("all clones released")
        .shutdown()
        .await
        .unwrap();
}

#[tokio::test]
async fn request_timeout_resolves_as_error() {
    let pool = WorkerPool::initialize(
        PoolConfig::default()
            .with_worker_count(1)
            .with_request_timeout_ms(200),
        MatcherConfig::default(),
        shell_worker(SLOW_WORKER),
        &tag_list(3),
    )
    .await
    .expect("pool should initialize");

    let err = pool
        .suggest_tags("too slow", &tag_list(3), Uuid::new_v4())
        .await
        .expect_err("task should time out");
    assert!(matches!(err, Error::Timeout(200)), "got {err}");

    // The worker is still bound to the abandoned task but the pool shuts
    // down cleanly once it finishes.
    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn health_check_round_trips() {
    let pool = WorkerPool::initialize(
        PoolConfig::default().with_worker_count(1),
        MatcherConfig::default(),
        shell_worker(COUNTING_WORKER),
        &tag_list(3),
    )
    .await
    .expect("pool should initialize");

    pool.health_check().await.expect("health check should pass");

    pool.shutdown().await.unwrap();
}

#[tokio::test]
async fn pool_cache_tracks_known_tags() {
    let pool = WorkerPool::initialize(
        PoolConfig::default().with_worker_count(1),
        MatcherConfig::default(),
        shell_worker(COUNTING_WORKER),
        &tag_list(50),
    )
    .await
    .expect("pool should initialize");

    assert_eq!(pool.cache().len(), 50);

    // A request introducing one unseen tag grows the cache by one
    let mut candidates = tag_list(50);
    candidates.push("brand-new".to_string());
    pool.suggest_tags("text", &candidates, Uuid::new_v4())
        .await
        .expect("task should succeed");
    assert_eq!(pool.cache().len(), 51);

    // Repeating the same candidates is all hits
    let stats_before = pool.cache().stats();
    pool.suggest_tags("text again", &candidates, Uuid::new_v4())
        .await
        .expect("task should succeed");
    let stats_after = pool.cache().stats();
    assert_eq!(stats_after.misses, stats_before.misses);
    assert_eq!(stats_after.hits, stats_before.hits + 51);

    pool.shutdown().await.unwrap();
}
