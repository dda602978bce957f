// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run records with per-task history and parent/child lineage.

use std::collections::HashMap;

use parking_lot::Mutex;
use studio_core::{Run, RunId};

use crate::error::StateError;

#[derive(Debug, Default)]
struct RunIndex {
    runs: HashMap<RunId, Run>,
    /// task slug -> run ids, most recent first
    history: HashMap<String, Vec<RunId>>,
    /// parent run id -> child run ids, in creation order
    descendants: HashMap<RunId, Vec<RunId>>,
}

/// Store of runs plus the two indices derived from them.
///
/// One lock covers the primary map and both indices, so a reader never sees
/// a run id in history that is missing from the map.
#[derive(Debug, Default)]
pub struct RunStore {
    inner: Mutex<RunIndex>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `run` under `run_id` and index it.
    ///
    /// A new id goes to the front of the task history; re-adding an id
    /// replaces the stored run and keeps its history position. A parent need
    /// not exist yet for the child to be linked.
    pub fn add(&self, task_slug: &str, run_id: RunId, mut run: Run) {
        run.id = run_id.clone();
        let parent = run.parent_id.clone().filter(|p| !p.is_empty());

        let mut inner = self.inner.lock();
        inner.runs.insert(run_id.clone(), run);

        let history = inner.history.entry(task_slug.to_string()).or_default();
        if !history.contains(&run_id) {
            history.insert(0, run_id.clone());
        }

        if let Some(parent) = parent {
            let children = inner.descendants.entry(parent).or_default();
            if !children.contains(&run_id) {
                children.push(run_id);
            }
        }
    }

    pub fn get(&self, run_id: &str) -> Option<Run> {
        self.inner.lock().runs.get(run_id).cloned()
    }

    /// Apply `mutate` to a copy of the run and store it only if the mutator
    /// succeeds. Returns the updated copy.
    ///
    /// The store lock is held while `mutate` runs; it must not call back into
    /// this store.
    pub fn update<E, F>(&self, run_id: &str, mutate: F) -> Result<Run, E>
    where
        E: From<StateError>,
        F: FnOnce(&mut Run) -> Result<(), E>,
    {
        let mut inner = self.inner.lock();
        let current = inner
            .runs
            .get_mut(run_id)
            .ok_or_else(|| StateError::RunNotFound(RunId::from_string(run_id)))?;
        let mut next = current.clone();
        mutate(&mut next)?;
        *current = next.clone();
        Ok(next)
    }

    /// Children of `run_id` in creation order. Unknown ids are skipped.
    pub fn get_descendants(&self, run_id: &str) -> Vec<Run> {
        let inner = self.inner.lock();
        inner
            .descendants
            .get(run_id)
            .map(|ids| ids.iter().filter_map(|id| inner.runs.get(id).cloned()).collect())
            .unwrap_or_default()
    }

    /// Runs of `task_slug`, most recent first.
    pub fn get_run_history(&self, task_slug: &str) -> Vec<Run> {
        let inner = self.inner.lock();
        inner
            .history
            .get(task_slug)
            .map(|ids| ids.iter().filter_map(|id| inner.runs.get(id).cloned()).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().runs.is_empty()
    }
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;
