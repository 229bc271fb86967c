// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the specs.

pub use bf_adapters::{
    BuildStore, FakeBuildQueue, FakeNotifyAdapter, FakeWorker, FsContentStore, JsonBuildStore,
    QueueCall, WorkerCall,
};
pub use bf_core::test_support::library_file;
pub use bf_core::{
    Archive, ArchivePurpose, Build, BuildId, BuildStatus, DistroArchSeries, FakeClock,
    JobPayload, QueueRecord, SlaveStatus, SourcePackageRelease,
};
pub use bf_engine::{Config, DispatchError, Engine, EngineDeps, StatusError, BUILDLOG_HASH};

use flate2::read::GzDecoder;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub type SpecEngine =
    Engine<FsContentStore, JsonBuildStore, FakeBuildQueue, FakeNotifyAdapter, FakeClock>;

/// An engine over a temp state dir, with real storage and fake scheduler,
/// notifier and clock.
pub struct Farm {
    pub engine: SpecEngine,
    pub librarian: FsContentStore,
    pub builds: JsonBuildStore,
    pub queue: FakeBuildQueue,
    pub notifier: FakeNotifyAdapter,
    pub config: Config,
    _dir: TempDir,
}

impl Farm {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_root(dir.path());
        let librarian =
            FsContentStore::new(config.librarian_dir.clone(), config.librarian_url.clone());
        let builds = JsonBuildStore::new(config.builds_dir.clone());
        let queue = FakeBuildQueue::new();
        let notifier = FakeNotifyAdapter::new();
        let deps = EngineDeps {
            librarian: librarian.clone(),
            store: builds.clone(),
            queue: queue.clone(),
            notifier: notifier.clone(),
        };
        let engine = Engine::new(deps, config.clone(), FakeClock::new());
        Self { engine, librarian, builds, queue, notifier, config, _dir: dir }
    }

    /// Leaf directory names under `grabbing`, `incoming` or `failed`.
    pub fn leaves(&self, home: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.config.upload_root.join(home))
            .map(|entries| {
                entries.map(|e| e.unwrap().file_name().to_string_lossy().into_owned()).collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn upload_root(&self) -> &Path {
        &self.config.upload_root
    }

    pub fn staged(&self, home: &str, leaf: &str) -> PathBuf {
        self.config.upload_root.join(home).join(leaf).join("1/ubuntu")
    }

    /// The build as last committed.
    pub async fn persisted(&self, id: &BuildId) -> Option<Build> {
        self.builds.load(id).await.unwrap()
    }

    /// Decompressed content of a stored build log.
    pub async fn log_text(&self, build: &Build) -> String {
        let id = build.log.as_ref().expect("build has a log");
        let meta = self.librarian.metadata(id).await.unwrap().unwrap();
        let blob = self.librarian.blob_path(&meta.sha256);
        let mut text = String::new();
        GzDecoder::new(std::fs::File::open(blob).unwrap()).read_to_string(&mut text).unwrap();
        text
    }
}

/// Bind `build` to a fresh queue record on builder `bob`.
pub fn assign(mut build: Build) -> (Build, QueueRecord) {
    let record = QueueRecord::new(build.id.clone(), "bob");
    build.queue_record = Some(record.id.clone());
    (build, record)
}

/// A worker holding a build log and two package files.
pub fn busy_worker() -> FakeWorker {
    FakeWorker::default()
        .with_file(BUILDLOG_HASH, "dpkg-buildpackage: info: binary-only upload\n")
        .with_file("h1", "!<arch>\ndebian-binary")
        .with_file("h2", "Format: 1.8\n")
}

pub const LEAF: &str = "20260130-081409-PACKAGEBUILD-1";
