// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch through to a staged upload.

use crate::prelude::*;
use std::time::Duration;

fn build_with_one_input() -> Build {
    let spr = SourcePackageRelease::builder()
        .files(vec![library_file("foo.dsc", "hashA")])
        .build();
    Build::builder()
        .distro_arch_series(
            DistroArchSeries::builder()
                .chroot(library_file("chroot.tar.gz", "hashB"))
                .build(),
        )
        .payload(JobPayload::BinaryPackage(spr))
        .build()
}

#[tokio::test]
async fn two_concurrent_transfers_then_one_start() {
    let farm = Farm::new();
    let worker = FakeWorker::default().with_send_barrier(2);

    tokio::time::timeout(
        Duration::from_secs(2),
        farm.engine.dispatch(&build_with_one_input(), &worker),
    )
    .await
    .expect("both transfers should be in flight together")
    .unwrap();

    let calls = worker.calls();
    assert_eq!(calls.len(), 3);
    let mut sent = worker.sent_hashes();
    sent.sort();
    assert_eq!(sent, vec!["hashA", "hashB"]);
    assert!(matches!(&calls[2], WorkerCall::StartBuild { chroot_hash, filemap, .. }
        if chroot_hash == "hashB" && filemap.get("foo.dsc").map(String::as_str) == Some("hashA")));
}

#[tokio::test]
async fn either_transfer_failing_means_no_start() {
    for failing in ["hashA", "hashB"] {
        let farm = Farm::new();
        let worker = FakeWorker::default().fail_send(failing);

        let err = farm.engine.dispatch(&build_with_one_input(), &worker).await.unwrap_err();

        assert!(matches!(err, DispatchError::Worker(_)), "{failing}: {err:?}");
        assert_eq!(worker.start_calls(), 0, "{failing}");
    }
}

#[tokio::test]
async fn dispatch_then_ok_hands_off_to_uploader() {
    let farm = Farm::new();
    let worker = busy_worker();
    let (mut build, record) = assign(Build::builder().build());

    farm.engine.dispatch(&build, &worker).await.unwrap();
    let report = SlaveStatus::with_cookie(build.build_cookie.clone())
        .file("hello_2.10-3_amd64.deb", "h1")
        .file("hello_2.10-3_amd64.changes", "h2");
    farm.engine.handle_status(&mut build, &record, &worker, "BuildStatus.OK", &report).await.unwrap();

    assert_eq!(farm.leaves("incoming"), vec![LEAF]);
    assert!(farm.leaves("grabbing").is_empty());
    assert!(farm.leaves("failed").is_empty());
    let staged = farm.staged("incoming", LEAF);
    assert_eq!(std::fs::read_to_string(staged.join("hello_2.10-3_amd64.changes")).unwrap(), "Format: 1.8\n");

    let persisted = farm.persisted(&build.id).await.unwrap();
    assert_eq!(persisted.status, BuildStatus::Uploading);
    assert_eq!(persisted.builder.as_deref(), Some("bob"));
    assert_eq!(persisted.log, build.log);
    assert!(farm.log_text(&persisted).await.contains("binary-only upload"));
    assert_eq!(farm.queue.calls(), vec![QueueCall::Destroy(record.id.clone())]);
}
