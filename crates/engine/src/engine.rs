// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine and its collaborators

use crate::composer::ComposerRegistry;
use crate::config::Config;
use crate::log_archive::LogArchiver;
use bf_adapters::{
    BuildQueue, BuildStore, ContentStore, FsContentStore, JsonBuildStore, NotifyAdapter,
    TracingNotifyAdapter, WorkerClient,
};
use bf_core::{Build, Clock, SystemClock};

/// External collaborators the engine drives
pub struct EngineDeps<L, S, Q, N> {
    pub librarian: L,
    pub store: S,
    pub queue: Q,
    pub notifier: N,
}

/// Dispatches builds to workers and processes their status reports.
///
/// Holds no per-build state; distinct builds may be handled concurrently.
pub struct Engine<L, S, Q, N, C: Clock> {
    pub(crate) archiver: LogArchiver<L>,
    pub(crate) store: S,
    pub(crate) queue: Q,
    pub(crate) notifier: N,
    pub(crate) clock: C,
    pub(crate) config: Config,
    pub(crate) composers: ComposerRegistry,
}

impl<L, S, Q, N, C> Engine<L, S, Q, N, C>
where
    L: ContentStore,
    S: BuildStore,
    Q: BuildQueue,
    N: NotifyAdapter,
    C: Clock,
{
    pub fn new(deps: EngineDeps<L, S, Q, N>, config: Config, clock: C) -> Self {
        Self {
            archiver: LogArchiver::new(deps.librarian, config.tmp_dir.clone()),
            store: deps.store,
            queue: deps.queue,
            notifier: deps.notifier,
            clock,
            config,
            composers: ComposerRegistry::default(),
        }
    }

    /// Replace the default composers.
    pub fn with_composers(mut self, composers: ComposerRegistry) -> Self {
        self.composers = composers;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn archiver(&self) -> &LogArchiver<L> {
        &self.archiver
    }

    /// Archive the build log and point the build at it.
    ///
    /// Runs after the terminal status is committed, so a failure here is
    /// logged and the build simply keeps no log.
    pub(crate) async fn store_log<W: WorkerClient>(&self, worker: &W, build: &mut Build) {
        match self.archiver.archive_log(worker, build).await {
            Ok(id) => {
                tracing::info!(build_id = %build.id, log = %id, "archived build log");
                build.log = Some(id);
            }
            Err(e) => {
                tracing::error!(build_id = %build.id, error = %e, "failed to archive build log");
            }
        }
    }

    pub(crate) async fn send_notification(&self, build: &Build, extra_info: Option<&str>) {
        if let Err(e) = self.notifier.notify(build, extra_info).await {
            tracing::warn!(build_id = %build.id, error = %e, "notification failed");
        }
    }
}

/// Engine wired to the filesystem-backed adapters.
pub type FsEngine<Q> = Engine<FsContentStore, JsonBuildStore, Q, TracingNotifyAdapter, SystemClock>;

impl<Q: BuildQueue> Engine<FsContentStore, JsonBuildStore, Q, TracingNotifyAdapter, SystemClock> {
    /// Build an engine from `config`; the scheduler supplies the queue.
    pub fn from_config(config: Config, queue: Q) -> Self {
        let deps = EngineDeps {
            librarian: FsContentStore::new(config.librarian_dir.clone(), config.librarian_url.clone()),
            store: JsonBuildStore::new(config.builds_dir.clone()),
            queue,
            notifier: TracingNotifyAdapter,
        };
        Self::new(deps, config, SystemClock)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
