// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! View process specs
//!
//! Companion dev servers are bounded by the cache capacity and every
//! process is released exactly once.

use crate::prelude::*;
use studio_daemon::start_view;

fn harness_with_views(count: usize) -> Harness {
    let h = Harness::new();
    for i in 0..count {
        let slug = format!("view{i}");
        h.seed_view(view_config(&slug, &h.root().join(&slug).to_string_lossy()));
    }
    h
}

#[tokio::test]
async fn sixth_view_evicts_least_recently_used() {
    let h = harness_with_views(6);
    for i in 0..5 {
        start_view(&h.ctx, &format!("view{i}"), false).await.unwrap();
    }
    // touch view0 so view1 becomes the oldest
    start_view(&h.ctx, "view0", false).await.unwrap();

    start_view(&h.ctx, "view5", false).await.unwrap();

    let processes = &h.studio().view_processes;
    assert_eq!(processes.len(), 5);
    assert!(processes.get("view0").is_some());
    assert!(processes.get("view1").is_none());
    assert_eq!(h.launcher.kills.get(), 1);
    assert_eq!(h.launcher.closes.get(), 1);
    assert_eq!(h.launcher.launched().len(), 6);
}

#[tokio::test]
async fn removed_view_is_never_killed_twice() {
    let h = harness_with_views(6);
    start_view(&h.ctx, "view0", false).await.unwrap();

    assert!(h.studio().view_processes.remove("view0"));
    assert!(!h.studio().view_processes.remove("view0"));
    assert_eq!(h.launcher.kills.get(), 1);

    for i in 1..6 {
        start_view(&h.ctx, &format!("view{i}"), false).await.unwrap();
    }
    h.studio().view_processes.clear();

    // five live processes released at clear, plus the one removed earlier
    assert_eq!(h.launcher.kills.get(), 6);
    assert_eq!(h.launcher.closes.get(), 6);
}
