// Copyright 2025 the Covergrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end runs of CLI commands against a temporary state directory.

use std::path::Path;

use clap::Parser;
use covergrid::config::Cli;
use covergrid::{CliError, run};

const FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/fonts/dejavu/DejaVuSans.ttf");

fn covergrid(state: &Path, args: &[&str]) -> Result<String, String> {
    let mut argv = vec!["covergrid", "--state-dir", state.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).map_err(|e| e.to_string())?;
    let mut out = Vec::new();
    run(cli, &mut out).map_err(|e| e.to_string())?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn edits_survive_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    covergrid(dir.path(), &["fill", "4", "first dance"]).unwrap();
    covergrid(dir.path(), &["background", "4", "#000080"]).unwrap();

    let shown = covergrid(dir.path(), &["show"]).unwrap();
    let lines: Vec<&str> = shown.lines().collect();
    assert_eq!(lines.len(), 9);
    assert!(lines[4].contains("\"first dance\""), "line: {}", lines[4]);
    assert!(lines[4].contains("bg #000080 text text-light"), "line: {}", lines[4]);
    assert!(lines[3].contains("bg bg-neutral-700 text text-light"), "line: {}", lines[3]);
    assert!(lines[1].contains("text text-dark"), "line: {}", lines[1]);
}

#[test]
fn clearing_an_override_restores_the_default() {
    let dir = tempfile::tempdir().unwrap();
    covergrid(dir.path(), &["text-color", "0", "text-light"]).unwrap();
    let line = covergrid(dir.path(), &["text-color", "0", "none"]).unwrap();
    assert!(line.contains("bg bg-blue-200 text text-dark"), "line: {line}");
}

#[test]
fn renamed_label_is_reset_on_the_next_run() {
    let dir = tempfile::tempdir().unwrap();
    let renamed = covergrid(dir.path(), &["label", "0", "Azure"]).unwrap();
    assert!(renamed.starts_with("0 Azure"), "output: {renamed}");
    let shown = covergrid(dir.path(), &["show"]).unwrap();
    assert!(shown.starts_with("0 Blue"), "output: {shown}");
}

#[test]
fn bad_arguments_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = covergrid(dir.path(), &["clear", "9"]).unwrap_err();
    assert!(err.contains("out of range"), "error: {err}");
    assert!(covergrid(dir.path(), &["background", "1", "#fff"]).is_err(), "short hex");
    let err = covergrid(dir.path(), &["search", "abba"]).unwrap_err();
    assert_eq!(err, CliError::NoCatalog.to_string());
}

#[test]
fn search_and_pick_from_a_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("songs.json");
    std::fs::write(
        &catalog,
        r#"[{"id":"1","title":"Waterloo","artist":"ABBA"},
            {"id":"2","title":"Mamma Mia","artist":"ABBA","album":"ABBA"}]"#,
    )
    .unwrap();
    let state = dir.path().join("state");
    let catalog = catalog.to_str().unwrap();

    let found = covergrid(&state, &["--catalog", catalog, "search", "abba"]).unwrap();
    assert!(found.contains(" 1. Waterloo / ABBA"), "output: {found}");
    assert!(found.contains(" 2. Mamma Mia / ABBA (ABBA)"), "output: {found}");

    let picked = covergrid(&state, &["--catalog", catalog, "pick", "7", "abba", "2"]).unwrap();
    assert!(picked.contains("Mamma Mia / ABBA"), "output: {picked}");

    let err = covergrid(&state, &["--catalog", catalog, "pick", "7", "abba", "3"]).unwrap_err();
    assert_eq!(err, CliError::NoSuchResult { n: 3, found: 2 }.to_string());
}

#[test]
fn fit_reports_the_display_scale() {
    let dir = tempfile::tempdir().unwrap();
    let out = covergrid(dir.path(), &["fit", "395", "2000"]).unwrap();
    assert_eq!(out.trim(), "scale 0.500: 790x1012 cover shown at 395x506");
    let out = covergrid(dir.path(), &["fit", "4000", "4000"]).unwrap();
    assert!(out.starts_with("scale 1.000"), "never enlarged: {out}");
}

#[test]
fn export_writes_a_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    covergrid(dir.path(), &["fill", "0", "hello"]).unwrap();
    let path = dir.path().join("out").join("cover.jpg");
    let out = covergrid(
        dir.path(),
        &[
            "export",
            path.to_str().unwrap(),
            "--scale",
            "0.5",
            "--font",
            FONT,
            "--heading",
            "Test cover",
        ],
    )
    .unwrap();
    assert!(out.contains("(395x506,"), "output: {out}");
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], &[0xff, 0xd8], "JPEG start of image");
}
