//! Reloads the shared [`State`] when anything under the root changes.
//!
//! Filesystem events arrive on notify's thread and are forwarded into a small
//! tokio channel. A task waits for the first event, lets the burst settle,
//! drains whatever queued up meanwhile and then collects a fresh `State` on
//! the blocking pool.
//! The new value is swapped in under the write lock. If collecting fails the
//! previous state stays in place.

use crate::state::State;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const DEBOUNCE: Duration = Duration::from_millis(200);

/// Starts watching `root`. Dropping the returned watcher stops the reloads.
pub fn spawn(root: PathBuf, state: Arc<RwLock<State>>) -> notify::Result<RecommendedWatcher> {
    let (tx, mut rx) = mpsc::channel::<()>(16);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if is_change(&event) => {
            // A full channel already has a reload pending.
            let _ = tx.try_send(());
        }
        Ok(_) => {}
        Err(e) => warn!("watch error: {}", e),
    })?;
    watcher.watch(&root, RecursiveMode::Recursive)?;
    debug!(root = %root.display(), "watching for changes");

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            tokio::time::sleep(DEBOUNCE).await;
            while rx.try_recv().is_ok() {}
            reload_blocking(root.clone(), Arc::clone(&state)).await;
        }
    });

    Ok(watcher)
}

fn is_change(event: &Event) -> bool {
    !matches!(event.kind, EventKind::Access(_))
}

/// Runs [`reload`] on the blocking pool so directory scans and the std lock
/// stay off the async workers.
pub async fn reload_blocking(root: PathBuf, state: Arc<RwLock<State>>) -> bool {
    match tokio::task::spawn_blocking(move || reload(&root, &state)).await {
        Ok(swapped) => swapped,
        Err(e) => {
            warn!("reload task failed: {}", e);
            false
        }
    }
}

/// Collects a fresh `State` and swaps it in. Returns whether the swap happened.
pub fn reload(root: &Path, state: &RwLock<State>) -> bool {
    let fresh = match State::collect_all(root) {
        Ok(fresh) => fresh,
        Err(e) => {
            warn!(root = %root.display(), "reload failed, keeping previous state: {}", e);
            return false;
        }
    };

    match state.write() {
        Ok(mut guard) => {
            *guard = fresh;
            info!(root = %root.display(), prints = guard.prints.len(), "reloaded state");
            true
        }
        Err(_) => {
            warn!("state lock poisoned, skipping reload");
            false
        }
    }
}
