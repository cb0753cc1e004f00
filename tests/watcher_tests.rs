use async_trait::async_trait;
use orbit::adapters::{ChangeWatcher, WatchState};
use orbit::core::VersionControl;
use orbit::{Result, SyncDaemon, SyncPipeline, SyncPolicy, WatchSignal};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::{sleep, timeout, Instant};

#[derive(Clone, Default)]
struct LogVcs {
    log: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl VersionControl for LogVcs {
    async fn stage_all(&self) -> Result<()> {
        self.log.lock().unwrap().push("stage");
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        self.log.lock().unwrap().push("commit");
        Ok(())
    }

    async fn push(&self) -> Result<()> {
        self.log.lock().unwrap().push("push");
        Ok(())
    }
}

#[tokio::test]
async fn test_file_write_produces_write_event() {
    let temp_dir = TempDir::new().unwrap();
    let mut watcher = ChangeWatcher::new(temp_dir.path());
    let mut signals = watcher.start().unwrap();
    assert_eq!(watcher.state(), WatchState::Watching);

    let file = temp_dir.path().join("notes.md");
    std::fs::write(&file, "first draft").unwrap();

    let write = timeout(Duration::from_secs(10), async {
        loop {
            match signals.recv().await {
                Some(WatchSignal::Change(event)) if event.is_write() => return event,
                Some(_) => continue,
                None => panic!("watcher channel closed"),
            }
        }
    })
    .await
    .expect("no write event within 10s");

    assert!(write.paths.iter().any(|p| p.ends_with("notes.md")));
    watcher.stop();
}

#[tokio::test]
async fn test_git_directory_changes_are_not_reported() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir(temp_dir.path().join(".git")).unwrap();

    let mut watcher = ChangeWatcher::new(temp_dir.path());
    let mut signals = watcher.start().unwrap();

    std::fs::write(temp_dir.path().join(".git").join("index"), "git internals").unwrap();
    std::fs::write(temp_dir.path().join("README.md"), "hello").unwrap();

    let seen = timeout(Duration::from_secs(10), async {
        let mut seen = Vec::new();
        loop {
            match signals.recv().await {
                Some(WatchSignal::Change(event)) => {
                    let done = event.is_write();
                    seen.push(event);
                    if done {
                        return seen;
                    }
                }
                Some(WatchSignal::Error(_)) => continue,
                None => panic!("watcher channel closed"),
            }
        }
    })
    .await
    .expect("no write event within 10s");

    for event in &seen {
        assert!(
            event.paths.iter().all(|p| !p.components().any(|c| c.as_os_str() == ".git")),
            "unexpected git event: {event:?}"
        );
    }
}

#[tokio::test]
async fn test_daemon_syncs_real_file_changes() {
    let temp_dir = TempDir::new().unwrap();
    let mut watcher = ChangeWatcher::new(temp_dir.path());
    let signals = watcher.start().unwrap();

    let vcs = LogVcs::default();
    let daemon = SyncDaemon::new(SyncPipeline::new(vcs.clone(), SyncPolicy::default()));
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(daemon.run(signals, async {
        let _ = stop_rx.await;
    }));

    std::fs::write(temp_dir.path().join("main.rs"), "fn main() {}").unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !vcs.log.lock().unwrap().contains(&"push") {
        assert!(Instant::now() < deadline, "no sync cycle within 10s");
        sleep(Duration::from_millis(25)).await;
    }

    stop_tx.send(()).unwrap();
    let report = handle.await.unwrap().unwrap();
    watcher.stop();

    assert!(report.cycles >= 1);
    let log = vcs.log.lock().unwrap().clone();
    assert_eq!(log.len() % 3, 0);
    for cycle in log.chunks(3) {
        assert_eq!(cycle, ["stage", "commit", "push"]);
    }
}

#[tokio::test]
async fn test_rejected_second_start_keeps_delivering() {
    let temp_dir = TempDir::new().unwrap();
    let mut watcher = ChangeWatcher::new(temp_dir.path());
    let mut signals = watcher.start().unwrap();

    assert!(watcher.start().is_err());
    assert_eq!(watcher.state(), WatchState::Watching);

    std::fs::write(temp_dir.path().join("after.txt"), "still watched").unwrap();

    let delivered = timeout(Duration::from_secs(10), async {
        loop {
            match signals.recv().await {
                Some(WatchSignal::Change(event)) if event.is_write() => return,
                Some(_) => continue,
                None => panic!("watcher channel closed"),
            }
        }
    })
    .await;
    assert!(delivered.is_ok());

    watcher.stop();
    assert_eq!(watcher.state(), WatchState::Stopped);
}

#[tokio::test]
async fn test_stopping_watcher_closes_stream() {
    let temp_dir = TempDir::new().unwrap();
    let mut watcher = ChangeWatcher::new(temp_dir.path());
    let mut signals = watcher.start().unwrap();

    watcher.stop();

    let closed = timeout(Duration::from_secs(10), async {
        while signals.recv().await.is_some() {}
    })
    .await;
    assert!(closed.is_ok());
    assert_eq!(watcher.state(), WatchState::Stopped);
}
