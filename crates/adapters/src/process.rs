// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Companion dev-server processes for views.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use studio_core::ViewConfig;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::info;

/// Errors from launching a view's companion process
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("view {0} has no command")]
    NoCommand(String),

    #[error("failed to allocate port: {0}")]
    Port(#[source] std::io::Error),

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// A live subprocess that can be terminated.
pub trait ProcessHandle: Send {
    /// OS process id, if the process is still known
    fn id(&self) -> Option<u32>;

    /// Ask the process to terminate. Must not block.
    fn kill(&mut self) -> std::io::Result<()>;
}

/// A scoped resource released alongside a process.
pub trait Closer: Send {
    fn close(&mut self) -> std::io::Result<()>;
}

/// A view's running companion dev server.
///
/// Owns the process and its scratch resources; whoever drops the context
/// out of the cache is responsible for killing and closing it exactly once.
pub struct ViteContext {
    pub process: Box<dyn ProcessHandle>,
    pub closer: Box<dyn Closer>,
    pub server_url: String,
}

impl std::fmt::Debug for ViteContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViteContext")
            .field("pid", &self.process.id())
            .field("server_url", &self.server_url)
            .finish_non_exhaustive()
    }
}

/// Starts a view's companion dev server.
#[async_trait]
pub trait ViewLauncher: Send + Sync + 'static {
    async fn launch(&self, view: &ViewConfig) -> Result<ViteContext, LaunchError>;
}

/// A child process spawned by the studio.
pub struct ChildProcess(Child);

impl ChildProcess {
    pub fn new(child: Child) -> Self {
        Self(child)
    }
}

impl ProcessHandle for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.0.id()
    }

    fn kill(&mut self) -> std::io::Result<()> {
        self.0.start_kill()
    }
}

/// Scratch directory removed when the owning context is closed, or when
/// dropped without ever being handed to a context.
pub struct ScratchDir {
    path: PathBuf,
    dir: Option<tempfile::TempDir>,
}

impl ScratchDir {
    pub fn create(prefix: &str) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(&format!("{prefix}-")).tempdir()?;
        Ok(Self { path: dir.path().to_path_buf(), dir: Some(dir) })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Closer for ScratchDir {
    fn close(&mut self) -> std::io::Result<()> {
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

/// Launches a view's `command` in its root with `PORT` set to a free port.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandViewLauncher;

impl CommandViewLauncher {
    pub fn new() -> Self {
        Self
    }
}

/// Find a free localhost port. Racy by nature: the port is released before
/// the child binds it.
pub fn find_free_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0))?;
    Ok(listener.local_addr()?.port())
}

#[async_trait]
impl ViewLauncher for CommandViewLauncher {
    async fn launch(&self, view: &ViewConfig) -> Result<ViteContext, LaunchError> {
        let (program, args) =
            view.command.split_first().ok_or_else(|| LaunchError::NoCommand(view.slug.clone()))?;
        let port = find_free_port().map_err(LaunchError::Port)?;
        let scratch = ScratchDir::create(&format!("studio-view-{}", view.slug))
            .map_err(|source| LaunchError::Spawn { command: program.clone(), source })?;

        let child = Command::new(program)
            .args(args)
            .current_dir(&view.root)
            .env("PORT", port.to_string())
            .env("STUDIO_VIEW_ENTRYPOINT", &view.entrypoint)
            .env("STUDIO_VIEW_SCRATCH", scratch.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError::Spawn { command: program.clone(), source })?;

        let server_url = format!("http://localhost:{port}");
        info!(view = %view.slug, pid = ?child.id(), %server_url, "started view server");
        Ok(ViteContext {
            process: Box::new(ChildProcess::new(child)),
            closer: Box::new(scratch),
            server_url,
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Closer, LaunchError, ProcessHandle, ViewLauncher, ViteContext};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use studio_core::ViewConfig;

    /// Shared counter for observing calls after ownership moves away.
    #[derive(Clone, Debug, Default)]
    pub struct Tally(Arc<AtomicUsize>);

    impl Tally {
        pub fn get(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }

        fn bump(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Fake process counting kills
    pub struct FakeProcess {
        kills: Tally,
        fail: bool,
    }

    impl FakeProcess {
        pub fn new(kills: Tally) -> Self {
            Self { kills, fail: false }
        }

        /// A process whose kill is counted but reports an error
        pub fn failing(kills: Tally) -> Self {
            Self { kills, fail: true }
        }
    }

    impl ProcessHandle for FakeProcess {
        fn id(&self) -> Option<u32> {
            Some(4242)
        }

        fn kill(&mut self) -> std::io::Result<()> {
            self.kills.bump();
            if self.fail {
                return Err(std::io::Error::other("no such process"));
            }
            Ok(())
        }
    }

    /// Fake closer counting closes
    pub struct FakeCloser {
        closes: Tally,
        fail: bool,
    }

    impl FakeCloser {
        pub fn new(closes: Tally) -> Self {
            Self { closes, fail: false }
        }

        pub fn failing(closes: Tally) -> Self {
            Self { closes, fail: true }
        }
    }

    impl Closer for FakeCloser {
        fn close(&mut self) -> std::io::Result<()> {
            self.closes.bump();
            if self.fail {
                return Err(std::io::Error::other("already closed"));
            }
            Ok(())
        }
    }

    /// Build a fake context for `url` sharing the given tallies.
    pub fn fake_context(url: &str, kills: &Tally, closes: &Tally) -> ViteContext {
        ViteContext {
            process: Box::new(FakeProcess::new(kills.clone())),
            closer: Box::new(FakeCloser::new(closes.clone())),
            server_url: url.to_string(),
        }
    }

    /// Fake launcher recording launched view slugs
    #[derive(Clone, Default)]
    pub struct FakeViewLauncher {
        launched: Arc<Mutex<Vec<String>>>,
        pub kills: Tally,
        pub closes: Tally,
    }

    impl FakeViewLauncher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn launched(&self) -> Vec<String> {
            self.launched.lock().clone()
        }
    }

    #[async_trait]
    impl ViewLauncher for FakeViewLauncher {
        async fn launch(&self, view: &ViewConfig) -> Result<ViteContext, LaunchError> {
            let mut launched = self.launched.lock();
            launched.push(view.slug.clone());
            let url = format!("http://localhost:{}", 5000 + launched.len());
            Ok(fake_context(&url, &self.kills, &self.closes))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{fake_context, FakeCloser, FakeProcess, FakeViewLauncher, Tally};

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
