mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::tempdir;

use watchrun::scan::ChangeDetector;

type TestResult = Result<(), Box<dyn Error>>;

fn set_mtime(path: &Path, time: SystemTime) -> TestResult {
    filetime::set_file_mtime(path, FileTime::from_system_time(time))?;
    Ok(())
}

#[test]
fn first_scan_reports_the_initial_state_as_a_change() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("main.go"), "package main")?;

    let mut detector = ChangeDetector::new(dir.path(), "go");

    assert!(
        detector.scan(),
        "first scan with sources present must report a change"
    );
    assert!(
        !detector.scan(),
        "second scan without modifications must be quiet"
    );

    Ok(())
}

#[test]
fn empty_directory_stays_quiet() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let mut detector = ChangeDetector::new(dir.path(), "go");

    assert!(!detector.scan(), "no matching files means nothing to report");

    // Files with other extensions do not wake the detector either.
    fs::write(dir.path().join("README.md"), "docs")?;
    assert!(!detector.scan());

    Ok(())
}

#[test]
fn newer_modification_time_fires_exactly_once() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let file = dir.path().join("main.go");
    fs::write(&file, "package main")?;

    let mut detector = ChangeDetector::new(dir.path(), "go");
    detector.scan();

    set_mtime(&file, SystemTime::now() + Duration::from_secs(10))?;

    assert!(detector.scan(), "a raised timestamp must be detected");
    assert!(!detector.scan(), "an unchanged timestamp must not fire again");

    Ok(())
}

#[test]
fn new_file_with_an_old_timestamp_is_seen_through_the_count() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("main.go"), "package main")?;

    let mut detector = ChangeDetector::new(dir.path(), "go");
    detector.scan();

    // Restored from a backup, say: present, but older than anything seen.
    let restored = dir.path().join("util.go");
    fs::write(&restored, "package main")?;
    set_mtime(&restored, SystemTime::now() - Duration::from_secs(3600))?;

    assert!(
        detector.scan(),
        "a new matching file must be detected even with an old timestamp"
    );
    assert!(!detector.scan());

    Ok(())
}

#[test]
fn deleting_a_source_file_reports_a_change() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("main.go"), "package main")?;
    let helper = dir.path().join("helper.go");
    fs::write(&helper, "package main")?;

    let mut detector = ChangeDetector::new(dir.path(), "go");
    detector.scan();

    fs::remove_file(&helper)?;

    assert!(detector.scan(), "a removed matching file must be detected");
    assert!(!detector.scan());

    Ok(())
}

#[test]
fn files_with_other_extensions_never_trigger() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("main.go"), "package main")?;

    let mut detector = ChangeDetector::new(dir.path(), "go");
    detector.scan();

    let notes = dir.path().join("notes.md");
    fs::write(&notes, "scratch")?;
    set_mtime(&notes, SystemTime::now() + Duration::from_secs(60))?;

    assert!(
        !detector.scan(),
        "files outside the watched extension must be invisible"
    );

    Ok(())
}

#[test]
fn nested_and_hidden_sources_are_watched() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("internal/db"))?;
    fs::write(dir.path().join("internal/db/conn.go"), "package db")?;

    let mut detector = ChangeDetector::new(dir.path(), "go");
    assert!(detector.scan(), "nested sources must be found");
    assert!(!detector.scan());

    // Dotfiles are not filtered out of the walk.
    fs::write(dir.path().join(".hidden.go"), "package main")?;
    assert!(detector.scan(), "hidden sources must be found");

    Ok(())
}

#[test]
fn extension_with_leading_dot_is_accepted() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("main.go"), "package main")?;

    let mut detector = ChangeDetector::new(dir.path(), ".go");
    assert!(detector.scan(), "\".go\" must behave exactly like \"go\"");

    Ok(())
}

#[test]
fn timestamps_moving_backwards_do_not_retrigger() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let file = dir.path().join("main.go");
    fs::write(&file, "package main")?;

    let mut detector = ChangeDetector::new(dir.path(), "go");
    detector.scan();

    set_mtime(&file, SystemTime::now() - Duration::from_secs(3600))?;
    assert!(!detector.scan(), "an older timestamp is not a change");

    // The high-water mark survives the regression: a later bump that stays
    // below the recorded mark is still quiet.
    set_mtime(&file, SystemTime::now() - Duration::from_secs(1800))?;
    assert!(!detector.scan());

    Ok(())
}
