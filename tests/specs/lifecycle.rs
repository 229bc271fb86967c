// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure classification and queue record lifecycle.

use crate::prelude::*;

#[tokio::test]
async fn generic_failures_destroy_queue_record_once() {
    let table = [
        ("PACKAGEFAIL", BuildStatus::FailedToBuild, 1),
        ("DEPFAIL", BuildStatus::ManualDepWait, 0),
        ("CHROOTFAIL", BuildStatus::ChrootWait, 1),
    ];
    for (name, expected, notifications) in table {
        let farm = Farm::new();
        let worker = busy_worker();
        let (mut build, record) = assign(Build::builder().build());

        farm.engine
            .handle_status(&mut build, &record, &worker, name, &SlaveStatus::default())
            .await
            .unwrap();

        assert_eq!(build.status, expected, "{name}");
        assert_eq!(farm.queue.calls(), vec![QueueCall::Destroy(record.id.clone())], "{name}");
        assert_eq!(farm.notifier.calls().len(), notifications, "{name}");
        let persisted = farm.persisted(&build.id).await.unwrap();
        assert_eq!(persisted.status, expected, "{name}");
        assert!(farm.log_text(&persisted).await.contains("dpkg-buildpackage"), "{name}");
        assert!(farm.leaves("grabbing").is_empty(), "{name}");
    }
}

#[tokio::test]
async fn escalations_never_touch_build_or_queue() {
    for name in ["BUILDERFAIL", "GIVENBACK"] {
        let farm = Farm::new();
        let worker = busy_worker();
        let (mut build, record) = assign(Build::builder().build());
        let before = build.clone();

        let err = farm
            .engine
            .handle_status(&mut build, &record, &worker, name, &SlaveStatus::default())
            .await
            .unwrap_err();

        assert_eq!(build, before, "{name}");
        assert!(farm.queue.calls().is_empty(), "{name}");
        assert!(farm.persisted(&build.id).await.is_none(), "{name}");
        match name {
            "BUILDERFAIL" => assert!(err.is_builder_fault()),
            _ => assert!(err.is_retryable()),
        }
    }
}

#[tokio::test]
async fn aborted_requires_cancelling() {
    let farm = Farm::new();
    let worker = busy_worker();
    let (mut building, record) = assign(Build::builder().build());

    let err = farm
        .engine
        .handle_status(&mut building, &record, &worker, "ABORTED", &SlaveStatus::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StatusError::NotCancelling { .. }));
    assert!(farm.queue.calls().is_empty());

    let (mut cancelling, record) =
        assign(Build::builder().status(BuildStatus::Cancelling).build());
    farm.engine
        .handle_status(&mut cancelling, &record, &worker, "ABORTED", &SlaveStatus::default())
        .await
        .unwrap();
    assert_eq!(farm.queue.calls(), vec![QueueCall::MarkAsCancelled(record.id.clone())]);
    assert_eq!(
        farm.persisted(&cancelling.id).await.unwrap().status,
        BuildStatus::Cancelling
    );
}

#[tokio::test]
async fn unknown_status_changes_nothing() {
    let farm = Farm::new();
    let worker = busy_worker();
    let (mut build, record) = assign(Build::builder().build());

    farm.engine
        .handle_status(&mut build, &record, &worker, "BuildStatus.MELTED", &SlaveStatus::default())
        .await
        .unwrap();

    assert!(farm.persisted(&build.id).await.is_none());
    assert!(farm.queue.calls().is_empty());
    assert!(worker.calls().is_empty());
}
