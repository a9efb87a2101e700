//! Collection Driver
//!
//! One cycle is fetch → dedupe → insert → persist. Cycles run on demand
//! ([`Collector::collect_once`]) or on a fixed interval
//! ([`Collector::run_periodic`]); the driver takes `&mut self` for both, so at
//! most one cycle is ever in flight.

use std::future::Future;
use std::time::Duration;
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use crate::source::FactSource;
use crate::storage::FactStore;
use crate::{Error, FactRecord, Result};

/// Result of a single collection cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectOutcome {
    Added(FactRecord),
    /// Carries a short preview of the rejected text
    Duplicate(String),
    Empty,
    FetchFailed(String),
}

impl CollectOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectOutcome::Added(_) => "added",
            CollectOutcome::Duplicate(_) => "duplicate",
            CollectOutcome::Empty => "empty",
            CollectOutcome::FetchFailed(_) => "fetch_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Counters accumulated by one driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub cycles: usize,
    pub added: usize,
    pub duplicates: usize,
    pub empty: usize,
    pub fetch_failures: usize,
}

impl SessionStats {
    fn record(&mut self, outcome: &CollectOutcome) {
        self.cycles += 1;
        match outcome {
            CollectOutcome::Added(_) => self.added += 1,
            CollectOutcome::Duplicate(_) => self.duplicates += 1,
            CollectOutcome::Empty => self.empty += 1,
            CollectOutcome::FetchFailed(_) => self.fetch_failures += 1,
        }
    }
}

impl std::fmt::Display for SessionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} cycles: {} added, {} duplicates, {} empty, {} fetch failures",
            self.cycles, self.added, self.duplicates, self.empty, self.fetch_failures
        )
    }
}

/// Future that resolves on Ctrl+C.
///
/// The handler is installed when this is called, not when the future is first
/// polled, so an interrupt during the immediate first cycle is not lost.
/// Must be called from within a tokio runtime.
#[cfg(unix)]
pub fn interrupt_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    Ok(async move {
        interrupt.recv().await;
    })
}

#[cfg(windows)]
pub fn interrupt_signal() -> std::io::Result<impl Future<Output = ()>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        ctrl_c.recv().await;
    })
}

/// Drives collection cycles against one store and one source
pub struct Collector<S: FactSource> {
    store: FactStore,
    source: S,
    state: DriverState,
    session: SessionStats,
}

impl<S: FactSource> Collector<S> {
    pub fn new(store: FactStore, source: S) -> Self {
        Self {
            store,
            source,
            state: DriverState::Idle,
            session: SessionStats::default(),
        }
    }

    /// Run one fetch-and-store cycle.
    ///
    /// Fetch failures, duplicates and blank text are reported as outcomes.
    /// Only a failure to persist the collection is returned as `Err`.
    pub async fn collect_once(&mut self) -> Result<CollectOutcome> {
        debug!("Collecting fact...");

        let outcome = match self.source.fetch_fact().await {
            Err(e) => {
                warn!("Error fetching fact: {}", e);
                CollectOutcome::FetchFailed(e.to_string())
            }
            Ok(text) => match self.store.add(&text) {
                Ok(record) => CollectOutcome::Added(record),
                Err(Error::EmptyInput) => {
                    info!("Empty fact received, skipping");
                    CollectOutcome::Empty
                }
                Err(Error::Duplicate { preview }) => {
                    warn!("Duplicate detected: '{}...'", preview);
                    CollectOutcome::Duplicate(preview)
                }
                Err(e) => return Err(e),
            },
        };

        self.session.record(&outcome);
        Ok(outcome)
    }

    /// Collect immediately, then once per `interval` until `shutdown` resolves.
    ///
    /// Shutdown is only observed between cycles. Ticks that fall behind are
    /// delayed rather than replayed in a burst. A persist failure ends the run
    /// with that error.
    pub async fn run_periodic<F, C>(
        &mut self,
        interval: Duration,
        shutdown: F,
        mut on_cycle: C,
    ) -> Result<SessionStats>
    where
        F: Future<Output = ()>,
        C: FnMut(&CollectOutcome),
    {
        if interval.is_zero() {
            return Err(Error::Config("collection interval must be greater than zero".to_string()));
        }

        info!("Starting periodic collection every {:?}", interval);
        self.state = DriverState::Running;

        let result = self.tick_loop(interval, shutdown, &mut on_cycle).await;

        self.state = DriverState::Idle;
        info!("Stopped periodic collection ({})", self.session);
        result.map(|_| self.session.clone())
    }

    async fn tick_loop<F, C>(&mut self, interval: Duration, shutdown: F, on_cycle: &mut C) -> Result<()>
    where
        F: Future<Output = ()>,
        C: FnMut(&CollectOutcome),
    {
        tokio::pin!(shutdown);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            let outcome = self.collect_once().await?;
            on_cycle(&outcome);

            tokio::select! {
                biased;
                _ = &mut shutdown => return Ok(()),
                _ = ticker.tick() => {}
            }
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn session(&self) -> &SessionStats {
        &self.session
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Replays a fixed script of fetch results, then fails
    struct ScriptedSource {
        script: Mutex<VecDeque<std::result::Result<String, String>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<std::result::Result<&str, &str>>) -> Self {
            let script = script
                .into_iter()
                .map(|r| r.map(str::to_string).map_err(str::to_string))
                .collect();
            Self { script: Mutex::new(script) }
        }
    }

    #[async_trait]
    impl FactSource for ScriptedSource {
        async fn fetch_fact(&self) -> Result<String> {
            match self.script.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text.trim().to_string()),
                Some(Err(msg)) => Err(Error::Fetch(msg)),
                None => Err(Error::Fetch("script exhausted".to_string())),
            }
        }
    }

    fn collector(dir: &tempfile::TempDir, script: Vec<std::result::Result<&str, &str>>) -> Collector<ScriptedSource> {
        let store = FactStore::open(dir.path().join("facts_database.json"));
        Collector::new(store, ScriptedSource::new(script))
    }

    #[tokio::test]
    async fn test_added_then_duplicate() {
        let dir = tempdir().unwrap();
        let mut collector = collector(
            &dir,
            vec![
                Ok("Water boils at 100 degrees Celsius"),
                Ok("  WATER boils at 100 degrees celsius "),
            ],
        );

        match collector.collect_once().await.unwrap() {
            CollectOutcome::Added(record) => assert_eq!(record.id, 1),
            other => panic!("expected added, got {:?}", other),
        }
        assert_eq!(collector.store().len(), 1);

        let second = collector.collect_once().await.unwrap();
        assert_eq!(second.as_str(), "duplicate");
        assert_eq!(collector.store().len(), 1);
    }

    /// Log sink shared with a test subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_duplicate_logged_as_warning() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let dir = tempdir().unwrap();
        let mut collector = collector(&dir, vec![Ok("Bananas are berries"), Ok("bananas are BERRIES")]);
        collector.collect_once().await.unwrap();
        collector.collect_once().await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let line = output
            .lines()
            .find(|l| l.contains("Duplicate detected"))
            .expect("duplicate should be logged");
        assert!(line.contains("WARN"), "unexpected level: {}", line);
    }

    #[tokio::test]
    async fn test_fetch_failure_and_empty_are_outcomes() {
        let dir = tempdir().unwrap();
        let mut collector = collector(&dir, vec![Err("timed out"), Ok("   ")]);

        assert_eq!(
            collector.collect_once().await.unwrap(),
            CollectOutcome::FetchFailed("Fetch error: timed out".to_string())
        );
        assert_eq!(collector.collect_once().await.unwrap(), CollectOutcome::Empty);
        assert!(collector.store().is_empty());

        let session = collector.session();
        assert_eq!(session.cycles, 2);
        assert_eq!(session.fetch_failures, 1);
        assert_eq!(session.empty, 1);
    }

    #[tokio::test]
    async fn test_persist_failure_propagates() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let store = FactStore::open(blocker.join("facts.json"));
        let mut collector = Collector::new(store, ScriptedSource::new(vec![Ok("Unsaveable")]));

        let err = collector.collect_once().await.unwrap_err();
        assert!(matches!(err, Error::Persist(_)));
        assert!(collector.store().is_empty());
    }

    #[tokio::test]
    async fn test_periodic_runs_until_shutdown() {
        let dir = tempdir().unwrap();
        let mut collector = collector(
            &dir,
            vec![Ok("First fact"), Ok("Second fact"), Ok("first FACT"), Ok("Never fetched")],
        );

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut tx = Some(tx);
        let mut seen = Vec::new();

        let session = collector
            .run_periodic(
                Duration::from_millis(10),
                async {
                    rx.await.ok();
                },
                |outcome| {
                    seen.push(outcome.as_str());
                    if seen.len() == 3 {
                        if let Some(tx) = tx.take() {
                            tx.send(()).ok();
                        }
                    }
                },
            )
            .await
            .unwrap();

        assert_eq!(seen, vec!["added", "added", "duplicate"]);
        assert_eq!(session.cycles, 3);
        assert_eq!(session.added, 2);
        assert_eq!(session.duplicates, 1);
        assert_eq!(collector.state(), DriverState::Idle);
        assert_eq!(collector.store().len(), 2);
    }

    #[tokio::test]
    async fn test_periodic_collects_immediately_even_if_cancelled() {
        let dir = tempdir().unwrap();
        let mut collector = collector(&dir, vec![Ok("Immediate fact")]);

        let session = collector
            .run_periodic(Duration::from_secs(3600), async {}, |_| {})
            .await
            .unwrap();

        assert_eq!(session.cycles, 1);
        assert_eq!(collector.store().len(), 1);
    }

    /// Signals when a fetch starts, then takes a while to answer
    struct SlowSource {
        started: Mutex<Option<tokio::sync::oneshot::Sender<()>>>,
    }

    #[async_trait]
    impl FactSource for SlowSource {
        async fn fetch_fact(&self) -> Result<String> {
            if let Some(tx) = self.started.lock().unwrap().take() {
                tx.send(()).ok();
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok("Slow facts still count".to_string())
        }
    }

    #[tokio::test]
    async fn test_shutdown_during_fetch_finishes_cycle() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("facts_database.json");
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let source = SlowSource { started: Mutex::new(Some(tx)) };
        let mut collector = Collector::new(FactStore::open(&path), source);

        let session = collector
            .run_periodic(
                Duration::from_secs(3600),
                async {
                    rx.await.ok();
                },
                |_| {},
            )
            .await
            .unwrap();

        assert_eq!(session.cycles, 1);
        assert_eq!(session.added, 1);
        assert_eq!(collector.state(), DriverState::Idle);

        let stored = crate::storage::load(&path).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].fact, "Slow facts still count");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_interrupt_before_first_poll_is_delivered() {
        let signal = interrupt_signal().unwrap();

        // Delivered before the future is ever polled
        unsafe {
            libc::raise(libc::SIGINT);
        }

        tokio::time::timeout(Duration::from_secs(5), signal)
            .await
            .expect("interrupt should be observed");
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let dir = tempdir().unwrap();
        let mut collector = collector(&dir, vec![]);

        let err = collector
            .run_periodic(Duration::ZERO, async {}, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(collector.session().cycles, 0);
    }
}
