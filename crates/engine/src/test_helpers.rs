// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine unit tests.

use crate::config::Config;
use crate::engine::{Engine, EngineDeps};
use bf_adapters::{FakeBuildQueue, FakeBuildStore, FakeContentStore, FakeNotifyAdapter};
use bf_core::{Build, FakeClock, QueueRecord};
use tempfile::TempDir;

pub(crate) type TestEngine =
    Engine<FakeContentStore, FakeBuildStore, FakeBuildQueue, FakeNotifyAdapter, FakeClock>;

/// Staging leaf for the default build at the fake clock's default time.
pub(crate) const LEAF: &str = "20260130-081409-PACKAGEBUILD-1";

/// Fakes created before the store, so a commit hook can watch them.
#[derive(Clone)]
pub(crate) struct Parts {
    pub config: Config,
    pub librarian: FakeContentStore,
    pub queue: FakeBuildQueue,
    pub notifier: FakeNotifyAdapter,
}

pub(crate) struct TestContext {
    pub engine: TestEngine,
    pub librarian: FakeContentStore,
    pub store: FakeBuildStore,
    pub queue: FakeBuildQueue,
    pub notifier: FakeNotifyAdapter,
    pub config: Config,
    _dir: TempDir,
}

pub(crate) fn setup() -> TestContext {
    setup_with(FakeContentStore::new(), |_| FakeBuildStore::new())
}

pub(crate) fn setup_with_store(make_store: impl FnOnce(&Parts) -> FakeBuildStore) -> TestContext {
    setup_with(FakeContentStore::new(), make_store)
}

pub(crate) fn setup_with(
    librarian: FakeContentStore,
    make_store: impl FnOnce(&Parts) -> FakeBuildStore,
) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let parts = Parts {
        config: Config::for_root(dir.path()),
        librarian,
        queue: FakeBuildQueue::new(),
        notifier: FakeNotifyAdapter::new(),
    };
    let store = make_store(&parts);
    let Parts { config, librarian, queue, notifier } = parts;
    let deps = EngineDeps {
        librarian: librarian.clone(),
        store: store.clone(),
        queue: queue.clone(),
        notifier: notifier.clone(),
    };
    let engine = Engine::new(deps, config.clone(), FakeClock::new());
    TestContext { engine, librarian, store, queue, notifier, config, _dir: dir }
}

impl TestContext {
    pub fn grabbing(&self) -> std::path::PathBuf {
        self.config.upload_root.join("grabbing").join(LEAF)
    }

    pub fn incoming(&self) -> std::path::PathBuf {
        self.config.upload_root.join("incoming").join(LEAF)
    }

    pub fn failed(&self) -> std::path::PathBuf {
        self.config.upload_root.join("failed").join(LEAF)
    }
}

/// Attach `build` to a fresh queue record on builder `bob`.
pub(crate) fn assign(mut build: Build) -> (Build, QueueRecord) {
    let record = QueueRecord::new(build.id.clone(), "bob");
    build.queue_record = Some(record.id.clone());
    (build, record)
}
