// Copyright (c) The testalot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::{Result, ensure};
use pretty_assertions::assert_eq;
use std::{collections::BTreeSet, fs, os::unix::fs::MetadataExt, time::Duration};
use testalot_runner::{
    aggregate::{FlakyTest, KindCounts, ResultAggregate},
    errors::RunError,
};

#[test]
fn repeated_runs_are_archived_and_aggregated() -> Result<()> {
    let project = TempProject::with_stub()?;

    let records = project.run(3)??;
    assert_eq!(records.len(), 6, "two tests in each of three runs");

    let archived = project.archived_runs()?;
    assert_eq!(archived.len(), 3, "each run is archived: {archived:?}");
    for name in &archived {
        ensure!(
            name.starts_with("surefire-reports-"),
            "archive directory {name} has the configured prefix"
        );
    }
    assert_eq!(
        archived.iter().collect::<BTreeSet<_>>().len(),
        3,
        "archive directories are distinct"
    );
    ensure!(
        !project.reports_dir().exists(),
        "reports directory was moved into the archive"
    );

    let aggregate = ResultAggregate::from_records(records);
    assert_eq!(aggregate.test_count(), 2);
    assert_eq!(
        aggregate.flaky(),
        vec![FlakyTest {
            name: "com.example.FooTest.beta()",
            counts: &KindCounts {
                pass: 2,
                fail: 1,
                error: 0,
            },
        }]
    );
    assert_eq!(
        aggregate.max_duration("com.example.FooTest.alpha()"),
        Some(Duration::from_secs(2))
    );
    assert_eq!(
        aggregate.max_duration("com.example.FooTest.beta()"),
        Some(Duration::from_millis(1250))
    );

    Ok(())
}

#[test]
fn archive_is_appended_to() -> Result<()> {
    let project = TempProject::with_stub()?;

    assert_eq!(project.run(1)??.len(), 2);
    assert_eq!(project.run(2)??.len(), 6, "earlier runs are collected too");
    assert_eq!(project.archived_runs()?.len(), 3);

    Ok(())
}

#[test]
fn archive_on_another_filesystem() -> Result<()> {
    let shm = Utf8Path::new("/dev/shm");
    if !shm.is_dir() {
        eprintln!("skipping: {shm} is not available");
        return Ok(());
    }
    let archive_parent = Utf8TempDir::with_prefix_in("testalot-archive-", shm)?;
    let archive_dir = archive_parent.path().join("archive");

    let project =
        TempProject::with_archive_dir(&["sh", "-c", STUB_SCRIPT], Some(archive_dir.as_path()))?;
    project.write_marker()?;
    if fs::metadata(project.root())?.dev() == fs::metadata(archive_parent.path())?.dev() {
        eprintln!("skipping: {shm} is on the same filesystem as the project");
        return Ok(());
    }

    let records = project.run(2)??;
    assert_eq!(records.len(), 4, "two tests in each of two runs");
    assert_eq!(project.archived_runs()?.len(), 2);
    ensure!(
        !project.reports_dir().exists(),
        "reports directory was removed after copying"
    );

    Ok(())
}

#[test]
fn stale_reports_are_removed() -> Result<()> {
    let project = TempProject::with_stub()?;
    let reports_dir = project.reports_dir();
    fs::create_dir_all(&reports_dir)?;
    fs::write(
        reports_dir.join("TEST-com.example.StaleTest.xml"),
        "<testcase name=\"stale\" classname=\"com.example.StaleTest\" time=\"1.0\"/>\n",
    )?;

    let records = project.run(1)??;
    ensure!(
        records
            .iter()
            .all(|record| record.name() != "com.example.StaleTest.stale()"),
        "stale report was not archived: {records:?}"
    );

    Ok(())
}

#[test]
fn missing_project_marker() -> Result<()> {
    let project = TempProject::new(&["sh", "-c", STUB_SCRIPT])?;

    match project.run(2)? {
        Err(RunError::ProjectMarkerNotFound { path }) => {
            assert_eq!(path, project.root().join("pom.xml"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    ensure!(
        !project.root().join(".run-count").exists(),
        "command was not run"
    );
    assert_eq!(project.archived_runs()?, Vec::<String>::new());

    Ok(())
}

#[test]
fn command_without_reports() -> Result<()> {
    let project = TempProject::new(&["sh", "-c", "exit 0"])?;
    project.write_marker()?;

    match project.run(2)? {
        Err(RunError::ReportsDirMissing { path, command }) => {
            assert_eq!(path, project.reports_dir());
            assert_eq!(command, "sh -c exit 0");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    Ok(())
}

#[test]
fn command_not_found() -> Result<()> {
    let project = TempProject::new(&["/nonexistent/testalot-stub", "test"])?;
    project.write_marker()?;

    match project.run(1)? {
        Err(RunError::CommandExec { command, .. }) => {
            assert_eq!(command, "/nonexistent/testalot-stub test");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    Ok(())
}
