// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-supplied filenames never escape the staging root.

use crate::prelude::*;

#[tokio::test]
async fn parent_reference_fails_the_upload() {
    let farm = Farm::new();
    let worker = busy_worker();
    let (mut build, record) = assign(Build::builder().build());
    let report = SlaveStatus::default().file("pkg.deb", "h1").file("../x", "h2");

    farm.engine.handle_status(&mut build, &record, &worker, "OK", &report).await.unwrap();

    assert_eq!(build.status, BuildStatus::FailedToUpload);
    assert_eq!(farm.leaves("failed"), vec![LEAF]);
    assert!(farm.leaves("incoming").is_empty());
    let fetched: Vec<_> =
        worker.fetched_hashes().into_iter().filter(|h| h != BUILDLOG_HASH).collect();
    assert_eq!(fetched, vec!["h1"]);
    assert!(farm.staged("failed", LEAF).join("pkg.deb").exists());
    assert!(!farm.upload_root().join("failed").join(LEAF).join("1/x").exists());
    assert_eq!(
        farm.persisted(&build.id).await.unwrap().status,
        BuildStatus::FailedToUpload
    );
}

#[tokio::test]
async fn absolute_and_deep_paths_write_nothing_outside() {
    for evil in ["/etc/passwd", "../../../../outside", "a/../../../b"] {
        let farm = Farm::new();
        let worker = busy_worker();
        let (mut build, record) = assign(Build::builder().build());
        let report = SlaveStatus::default().file(evil, "h2");

        farm.engine.handle_status(&mut build, &record, &worker, "OK", &report).await.unwrap();

        assert_eq!(build.status, BuildStatus::FailedToUpload, "{evil}");
        assert!(!worker.fetched_hashes().contains(&"h2".to_string()), "{evil}");
        assert_eq!(farm.leaves("failed"), vec![LEAF], "{evil}");
        assert_eq!(farm.queue.destroyed(), 1, "{evil}");
    }
}

#[tokio::test]
async fn distinct_builds_stage_independently() {
    let farm = Farm::new();
    let worker = busy_worker();
    let (mut first, first_record) = assign(Build::builder().build());
    let (mut second, second_record) = assign(
        Build::builder().id("bld-2").build_cookie("PACKAGEBUILD-2").build(),
    );
    let report = SlaveStatus::default().file("pkg.deb", "h1");

    let (a, b) = tokio::join!(
        farm.engine.handle_status(&mut first, &first_record, &worker, "OK", &report),
        farm.engine.handle_status(&mut second, &second_record, &worker, "OK", &report),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(
        farm.leaves("incoming"),
        vec![LEAF.to_string(), "20260130-081409-PACKAGEBUILD-2".to_string()]
    );
    assert_eq!(farm.queue.destroyed(), 2);
}
