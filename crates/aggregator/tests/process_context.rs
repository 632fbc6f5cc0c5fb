use context_aggregator::{project_context, AggregatorConfig};
use std::fs;
use tempfile::TempDir;

// The process-wide memo is global, so this binary holds a single test.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn project_context_is_computed_once_per_process() {
    let first_dir = TempDir::new().expect("tempdir");
    fs::write(first_dir.path().join("CLAUDE.md"), "first project").expect("write");
    let second_dir = TempDir::new().expect("tempdir");
    fs::write(second_dir.path().join("CLAUDE.md"), "second project").expect("write");

    let first_config = AggregatorConfig::new(first_dir.path(), vec!["CLAUDE.md".into()]);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let config = first_config.clone();
            tokio::spawn(async move { project_context(&config).await })
        })
        .collect();
    let mut seen = Vec::new();
    for handle in handles {
        seen.push(handle.await.expect("join"));
    }
    assert!(seen.iter().all(|text| *text == seen[0]));
    assert!(seen[0].ends_with("first project"), "{}", seen[0]);

    fs::write(first_dir.path().join("CLAUDE.md"), "rewritten").expect("rewrite");
    let second_config = AggregatorConfig::new(second_dir.path(), vec!["CLAUDE.md".into()]);
    let later = project_context(&second_config).await;

    assert_eq!(later, seen[0]);
    assert!(std::ptr::eq(later, seen[0]));
}
