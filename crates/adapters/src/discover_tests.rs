// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, body: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, body).unwrap();
    path
}

const HELLO_TASK: &str = r#"
slug = "hello"
name = "Hello"
kind = "python"
entrypoint = "hello.py"
resources = ["db"]
"#;

const DASH_VIEW: &str = r#"
slug = "dash"
entrypoint = "src/dash.tsx"
command = ["npx", "vite"]
"#;

#[tokio::test]
async fn discovers_tasks_and_views_in_directory() {
    let dir = TempDir::new().unwrap();
    let task_file = write(dir.path(), "hello.task.toml", HELLO_TASK);
    let view_file = write(dir.path(), "ui/dash.view.toml", DASH_VIEW);

    let found = ManifestDiscoverer::new().discover(&[dir.path().to_path_buf()]).await.unwrap();

    assert_eq!(found.tasks.len(), 1);
    let task = &found.tasks[0];
    assert_eq!(task.slug, "hello");
    assert_eq!(task.name, "Hello");
    assert_eq!(task.defn_file_path, task_file);
    assert_eq!(task.entrypoint, dir.path().join("hello.py"));
    assert_eq!(task.resources, vec!["db".to_string()]);

    assert_eq!(found.views.len(), 1);
    let view = &found.views[0];
    assert_eq!(view.slug, "dash");
    assert_eq!(view.name, "dash");
    assert_eq!(view.defn_file_path, view_file);
    assert_eq!(view.entrypoint, dir.path().join("ui/src/dash.tsx"));
    assert_eq!(view.root, dir.path().join("ui"));
}

#[tokio::test]
async fn malformed_definition_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "hello.task.toml", HELLO_TASK);
    write(dir.path(), "broken.task.toml", "slug = ");

    let found = ManifestDiscoverer::new().discover(&[dir.path().to_path_buf()]).await.unwrap();

    assert_eq!(found.tasks.len(), 1);
    assert_eq!(found.tasks[0].slug, "hello");
}

#[tokio::test]
async fn ignored_directories_are_not_searched() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "node_modules/pkg/hidden.task.toml", HELLO_TASK);

    let found = ManifestDiscoverer::new().discover(&[dir.path().to_path_buf()]).await.unwrap();

    assert!(found.tasks.is_empty());
}

#[tokio::test]
async fn single_file_and_entrypoint_paths() {
    let dir = TempDir::new().unwrap();
    let task_file = write(dir.path(), "hello.task.toml", HELLO_TASK);
    let entrypoint = write(dir.path(), "hello.py", "print('hi')");

    let found = ManifestDiscoverer::new().discover(&[entrypoint, task_file.clone()]).await.unwrap();

    assert_eq!(found.tasks.len(), 1);
    assert_eq!(found.tasks[0].defn_file_path, task_file);
}

#[tokio::test]
async fn missing_paths_yield_nothing() {
    let dir = TempDir::new().unwrap();
    let found =
        ManifestDiscoverer::new().discover(&[dir.path().join("gone.task.toml")]).await.unwrap();
    assert_eq!(found, Discovered::default());
}

#[yare::parameterized(
    task_definition = { "/app/hello.task.toml",          true },
    view_definition = { "/app/ui/dash.view.toml",        true },
    dev_config      = { "/app/studio.dev.toml",          true },
    python_source   = { "/app/hello.py",                 true },
    tsx_source      = { "/app/ui/dash.tsx",              true },
    readme          = { "/app/README.md",                false },
    hidden_file     = { "/app/.hello.task.toml",         false },
    node_modules    = { "/app/node_modules/x/index.js",  false },
    git_dir         = { "/app/.git/config.toml",         false },
)]
fn watched_paths(path: &str, expected: bool) {
    assert_eq!(is_watched_path(Path::new(path)), expected);
}

#[tokio::test]
async fn fake_discoverer_records_calls_and_errors() {
    let fake = FakeDiscoverer::new();
    fake.set_error("boom");
    let result = fake.discover(&[PathBuf::from("/a")]).await;
    assert!(result.is_err());
    assert_eq!(fake.calls(), vec![vec![PathBuf::from("/a")]]);
}

#[tokio::test]
async fn parent_relative_entrypoint_is_normalized() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "tasks/util.task.toml",
        "slug = \"util\"\nentrypoint = \"../lib/./util.py\"\n",
    );

    let found = ManifestDiscoverer::new().discover(&[dir.path().to_path_buf()]).await.unwrap();

    assert_eq!(found.tasks.len(), 1);
    assert_eq!(found.tasks[0].entrypoint, dir.path().join("lib/util.py"));
}

#[yare::parameterized(
    plain        = { "/app/tasks", "run.py",          "/app/tasks/run.py" },
    parent       = { "/app/tasks", "../lib/util.py",  "/app/lib/util.py" },
    current      = { "/app/tasks", "./run.py",        "/app/tasks/run.py" },
    absolute     = { "/app/tasks", "/srv/../opt/x.py", "/opt/x.py" },
    above_root   = { "/app",       "../../x.py",      "/x.py" },
)]
fn resolve_folds_dot_components(base: &str, path: &str, expected: &str) {
    assert_eq!(resolve(Path::new(base), Path::new(path)), PathBuf::from(expected));
}
