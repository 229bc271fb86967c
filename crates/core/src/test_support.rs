// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test builders for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::archive::{
    Archive, ArchivePurpose, ContentId, DistroArchSeries, LibraryFile, Pocket, SeriesStatus,
};
use crate::build::{
    Build, BuildId, BuildStatus, JobPayload, PublicationStatus, RecipeSpec, SourcePackageRelease,
};
use crate::queue::QueueRecordId;

/// Content-store file served from the test librarian.
pub fn library_file(filename: &str, content_hash: &str) -> LibraryFile {
    LibraryFile {
        filename: filename.to_string(),
        content_hash: content_hash.to_string(),
        url: format!("http://librarian.test/{}/{}", content_hash, filename),
    }
}

crate::builder! {
    pub struct ArchiveBuilder => Archive {
        into {
            name: String = "primary",
            owner: String = "ubuntu",
        }
        set {
            id: u32 = 1,
            purpose: ArchivePurpose = ArchivePurpose::Primary,
            private: bool = false,
            dependencies: Vec<String> = Vec::new(),
        }
        option {
            buildd_secret: String = None,
        }
    }
}

crate::builder! {
    pub struct DistroArchSeriesBuilder => DistroArchSeries {
        into {
            distribution: String = "ubuntu",
            series: String = "noble",
            arch: String = "amd64",
        }
        set {
            series_status: SeriesStatus = SeriesStatus::Development,
        }
        option {
            chroot: LibraryFile = Some(library_file("chroot-noble-amd64.tar.gz", "chroot-sha1")),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
impl DistroArchSeriesBuilder {
    /// Platform with no chroot uploaded.
    pub fn without_chroot(mut self) -> Self {
        self.chroot = None;
        self
    }
}

crate::builder! {
    pub struct SourcePackageReleaseBuilder => SourcePackageRelease {
        into {
            name: String = "hello",
            version: String = "2.10-3",
            component: String = "main",
        }
        set {
            arch_indep: bool = false,
            files: Vec<LibraryFile> = vec![library_file("hello_2.10-3.dsc", "dsc-sha1")],
            publication: PublicationStatus = PublicationStatus::Published,
        }
    }
}

crate::builder! {
    pub struct RecipeSpecBuilder => RecipeSpec {
        into {
            name: String = "daily",
            recipe_text: String = "# bzr-builder format 0.3 deb-version {debupstream}-0~{revno}\nlp:hello\n",
            author_name: String = "Sample Person",
            author_email: String = "sample@example.com",
            component: String = "main",
        }
    }
}

crate::builder! {
    pub struct BuildBuilder => Build {
        into {
            id: BuildId = "bld-1",
            build_cookie: String = "PACKAGEBUILD-1",
        }
        set {
            status: BuildStatus = BuildStatus::Building,
            archive: Archive = Archive::builder().build(),
            pocket: Pocket = Pocket::Release,
            distro_arch_series: DistroArchSeries = DistroArchSeries::builder().build(),
            payload: JobPayload = JobPayload::BinaryPackage(SourcePackageRelease::builder().build()),
        }
        option {
            queue_record: QueueRecordId = None,
            builder: String = None,
            date_started_ms: u64 = None,
            date_finished_ms: u64 = None,
            dependencies: String = None,
            log: ContentId = None,
        }
    }
}
