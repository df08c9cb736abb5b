//! Tests for the fixed-interval pass runner.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use mirror_core::{Error, MemoryLog, PassReport, Reconciler, Result, Scheduler, SyncPass};
use mirror_test_utils::MirrorFixture;
use tokio_util::sync::CancellationToken;

/// Pass that sleeps and tracks how many runs overlap.
#[derive(Default)]
struct SlowPass {
    delay: Duration,
    started: AtomicUsize,
    finished: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl SlowPass {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Default::default()
        })
    }
}

impl SyncPass for SlowPass {
    fn run_pass(&self) -> Result<PassReport> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(PassReport::default())
    }
}

struct FailingPass {
    runs: AtomicUsize,
    panic: bool,
}

impl SyncPass for FailingPass {
    fn run_pass(&self) -> Result<PassReport> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.panic {
            panic!("pass blew up");
        }
        Err(Error::Fs(mirror_fs::Error::SourceMissing {
            path: "/gone".into(),
        }))
    }
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(10), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[test]
fn test_zero_interval_is_rejected() {
    let result = Scheduler::new(
        SlowPass::new(Duration::ZERO),
        Arc::new(MemoryLog::new()),
        Duration::ZERO,
    );

    assert!(matches!(result, Err(Error::InvalidInterval { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_no_pass_before_first_interval() {
    let pass = SlowPass::new(Duration::ZERO);
    let scheduler =
        Scheduler::new(pass.clone(), Arc::new(MemoryLog::new()), Duration::from_secs(30)).unwrap();
    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());

    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(pass.started.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_passes_never_overlap() {
    let pass = SlowPass::new(Duration::from_millis(60));
    let scheduler =
        Scheduler::new(pass.clone(), Arc::new(MemoryLog::new()), Duration::from_millis(10))
            .unwrap();
    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());

    wait_for(|| pass.finished.load(Ordering::SeqCst) >= 3).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(pass.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancel_waits_for_in_flight_pass() {
    let pass = SlowPass::new(Duration::from_millis(300));
    let scheduler =
        Scheduler::new(pass.clone(), Arc::new(MemoryLog::new()), Duration::from_millis(10))
            .unwrap();
    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());

    wait_for(|| pass.in_flight.load(Ordering::SeqCst) == 1).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(pass.in_flight.load(Ordering::SeqCst), 0);
    assert_eq!(
        pass.started.load(Ordering::SeqCst),
        pass.finished.load(Ordering::SeqCst)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_pass_is_logged_and_ticking_continues() {
    let pass = Arc::new(FailingPass {
        runs: AtomicUsize::new(0),
        panic: false,
    });
    let log = Arc::new(MemoryLog::new());
    let scheduler = Scheduler::new(pass.clone(), log.clone(), Duration::from_millis(10)).unwrap();
    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());

    wait_for(|| pass.runs.load(Ordering::SeqCst) >= 2).await;
    cancel.cancel();
    handle.await.unwrap();

    let records = log.records();
    assert!(records.len() >= 2);
    assert_eq!(
        records[0],
        "Error during synchronization: Source folder '/gone' does not exist."
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_pass_does_not_stop_scheduler() {
    let pass = Arc::new(FailingPass {
        runs: AtomicUsize::new(0),
        panic: true,
    });
    let log = Arc::new(MemoryLog::new());
    let scheduler = Scheduler::new(pass.clone(), log.clone(), Duration::from_millis(10)).unwrap();
    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());

    wait_for(|| pass.runs.load(Ordering::SeqCst) >= 2).await;
    cancel.cancel();
    handle.await.unwrap();

    assert!(
        log.records()
            .iter()
            .all(|r| r.starts_with("Error during synchronization:"))
    );
}

#[tokio::test]
async fn test_run_once_reports_progress() {
    let log = Arc::new(MemoryLog::new());
    let scheduler = Scheduler::new(
        SlowPass::new(Duration::ZERO),
        log.clone(),
        Duration::from_secs(1),
    )
    .unwrap();

    let report = scheduler.run_once().await;

    assert_eq!(report, Some(PassReport::default()));
    let notices = log.notices();
    assert_eq!(notices.len(), 2);
    assert!(notices[0].starts_with("Synchronization started at "));
    assert!(notices[1].starts_with("Synchronization completed at "));
    assert!(log.records().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_scheduler_mirrors_tree() {
    let fx = MirrorFixture::new();
    fx.write_source("a.txt", "hi");
    fx.write_source("sub/b.txt", "yo");
    let log = Arc::new(MemoryLog::new());
    let reconciler = Arc::new(Reconciler::new(fx.source(), fx.replica(), log.clone()));
    let scheduler = Scheduler::new(reconciler, log.clone(), Duration::from_millis(50)).unwrap();
    let cancel = CancellationToken::new();
    let handle = scheduler.spawn(cancel.clone());

    let done = fx.replica().join("sub").join("b.txt");
    wait_for(|| done.exists()).await;
    cancel.cancel();
    handle.await.unwrap();

    fx.assert_mirrored();
}
