//! Artifact tracking, delayed deletion and shutdown cleanup

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use md2img::*;
use md2img_integration_tests::{init_tracing, start, test_config, MockRenderer};
use tempfile::TempDir;

async fn render_n(orchestrator: &InterceptionOrchestrator, n: usize) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(n);
    for i in 0..n {
        let replies = orchestrator.handle_command(&format!("md2img # Doc {}", i)).await;
        let path = replies[0].components()[0]
            .image_path()
            .expect("command reply carries an image")
            .to_path_buf();
        paths.push(path);
    }
    paths
}

async fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..300 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[tokio::test]
async fn test_n_renders_track_n_distinct_paths_and_drain_removes_them() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let orchestrator = start(test_config(dir.path()), MockRenderer::new()).await;
    let artifacts = orchestrator.context().artifacts();

    let paths = render_n(&orchestrator, 5).await;

    let distinct: HashSet<_> = paths.iter().collect();
    assert_eq!(distinct.len(), 5);
    assert_eq!(artifacts.len(), 5);
    assert_eq!(artifacts.tracked_paths(), paths);
    assert!(paths.iter().all(|p| p.exists()));
    assert_eq!(artifacts.pending_deletions(), 5);

    assert_eq!(artifacts.drain_all(), 5);

    assert!(artifacts.is_empty());
    assert!(paths.iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn test_concurrent_renders_get_distinct_paths() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let orchestrator = start(test_config(dir.path()), MockRenderer::new()).await;

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle_command(&format!("md2img text {}", i)).await })
        })
        .collect();

    let mut paths = HashSet::new();
    for handle in handles {
        let replies = handle.await.unwrap();
        paths.insert(replies[0].components()[0].image_path().unwrap().to_path_buf());
    }

    assert_eq!(paths.len(), 8);
    assert_eq!(orchestrator.context().artifacts().len(), 8);
}

#[tokio::test]
async fn test_expired_artifacts_are_deleted() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let config = ConvertConfig {
        artifact_ttl_seconds: 0,
        ..test_config(dir.path())
    };
    let orchestrator = start(config, MockRenderer::new()).await;

    let paths = render_n(&orchestrator, 3).await;
    let artifacts = orchestrator.context().artifacts();

    assert!(wait_for(|| paths.iter().all(|p| !p.exists())).await);
    assert!(wait_for(|| artifacts.is_empty()).await);
    assert!(wait_for(|| artifacts.pending_deletions() == 0).await);
}

#[tokio::test]
async fn test_terminate_cleans_up_and_returns_within_grace() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let orchestrator = start(test_config(dir.path()), MockRenderer::new()).await;
    let paths = render_n(&orchestrator, 2).await;

    let started = std::time::Instant::now();
    orchestrator.terminate().await;

    // Deletion tasks still sleep on the default TTL; shutdown must not wait for them
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(orchestrator.context().artifacts().is_empty());
    assert!(paths.iter().all(|p| !p.exists()));
}

#[tokio::test]
async fn test_failed_render_leaves_no_artifact() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let orchestrator = start(test_config(dir.path()), MockRenderer::failing()).await;

    orchestrator.handle_command("md2img # Title").await;

    assert!(orchestrator.context().artifacts().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
