// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use bf_core::test_support::library_file;
use bf_core::{Archive, ArchivePurpose, Pocket, PublicationStatus, RecipeSpec};

fn build_with(spr: SourcePackageRelease) -> Build {
    Build::builder().payload(JobPayload::BinaryPackage(spr)).build()
}

#[tokio::test]
async fn composes_public_build() {
    let spr = SourcePackageRelease::builder()
        .arch_indep(true)
        .files(vec![
            library_file("hello_2.10-3.dsc", "dsc-sha1"),
            library_file("hello_2.10.orig.tar.gz", "orig-sha1"),
        ])
        .build();
    let build = build_with(spr);

    let request = BinaryPackageComposer
        .compose_build_request(&build, &build.distro_arch_series)
        .await
        .unwrap();

    assert_eq!(request.builder_type, "binarypackage");
    let hashes: Vec<_> = request.files.iter().map(|f| f.content_hash.as_str()).collect();
    assert_eq!(hashes, vec!["dsc-sha1", "orig-sha1"]);
    assert!(request.files.iter().all(|f| f.credentials.is_none()));
    assert_eq!(request.args["arch_indep"], true);
    assert_eq!(request.args["ogrecomponent"], "main");
    assert_eq!(request.args["suite"], "noble");
}

#[tokio::test]
async fn private_build_files_carry_credentials() {
    let build = Build::builder()
        .archive(
            Archive::builder()
                .purpose(ArchivePurpose::Ppa)
                .private(true)
                .buildd_secret("s3kr1t")
                .build(),
        )
        .build();

    let request = BinaryPackageComposer
        .compose_build_request(&build, &build.distro_arch_series)
        .await
        .unwrap();

    let creds = request.files[0].credentials.as_ref().unwrap();
    assert_eq!(creds.password, "s3kr1t");
    assert_eq!(request.args["archive_private"], true);
}

#[test]
fn verify_refuses_illegal_pocket() {
    let build = Build::builder().pocket(Pocket::Backports).build();
    assert!(matches!(
        BinaryPackageComposer.verify_build_request(&build),
        Err(ComposeError::Invalid(_))
    ));
}

#[test]
fn verify_refuses_recipe_payload() {
    let build = Build::builder()
        .payload(JobPayload::Recipe(RecipeSpec::builder().build()))
        .build();
    assert!(matches!(
        BinaryPackageComposer.verify_build_request(&build),
        Err(ComposeError::WrongJobType { expected: JobType::BinaryPackageBuild, .. })
    ));
}

#[test]
fn verify_accepts_default_build() {
    assert!(BinaryPackageComposer.verify_build_request(&Build::builder().build()).is_ok());
}

#[test]
fn superseded_when_publication_no_longer_current() {
    let current = build_with(SourcePackageRelease::builder().build());
    let replaced = build_with(
        SourcePackageRelease::builder().publication(PublicationStatus::Superseded).build(),
    );
    assert!(!BinaryPackageComposer.is_superseded(&current));
    assert!(BinaryPackageComposer.is_superseded(&replaced));
}
