// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn given_back_err() -> StatusError {
    StatusError::GivenBack { builder: "bob".to_string(), build_id: BuildId::from_string("bld-1") }
}

fn builder_fail_err() -> StatusError {
    StatusError::BuilderFail { builder: "bob".to_string() }
}

fn worker_err() -> StatusError {
    StatusError::Worker(WorkerError::Rpc("gone".to_string()))
}

fn illegal_err() -> StatusError {
    StatusError::IllegalBuild("nope".to_string())
}

#[parameterized(
    given_back = { given_back_err(), true, false },
    builder_fail = { builder_fail_err(), false, true },
    worker = { worker_err(), false, true },
    illegal = { illegal_err(), false, false },
)]
fn status_error_classification(err: StatusError, retryable: bool, builder_fault: bool) {
    assert_eq!(err.is_retryable(), retryable);
    assert_eq!(err.is_builder_fault(), builder_fault);
}

#[test]
fn not_cancelling_message_names_status() {
    let err = StatusError::NotCancelling {
        build_id: BuildId::from_string("bld-7"),
        status: BuildStatus::Building,
    };
    assert_eq!(
        err.to_string(),
        "build bld-7 was aborted by its worker while BUILDING, not CANCELLING"
    );
}
