//! End-to-end tests for the `tagsieve` binary.

mod common;

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use common::{GALLERY_IMAGES, GALLERY_TAGS};
use serde_json::Value;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    tags: PathBuf,
    images: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let tags = dir.path().join("tag_index.json");
    let images = dir.path().join("search_index.json");
    std::fs::write(&tags, GALLERY_TAGS).unwrap();
    std::fs::write(&images, GALLERY_IMAGES).unwrap();
    Fixture {
        _dir: dir,
        tags,
        images,
    }
}

fn tagsieve(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tagsieve"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("TAGSIEVE_LOG")
        .output()
        .expect("failed to run tagsieve")
}

fn path(p: &Path) -> &str {
    p.to_str().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn search_json(fixture: &Fixture, extra: &[&str]) -> Vec<String> {
    let mut args = vec!["search", "-t", path(&fixture.tags), "-i", path(&fixture.images), "--json"];
    args.extend_from_slice(extra);
    let output = tagsieve(&args);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let results: Vec<Value> = serde_json::from_str(&stdout(&output)).unwrap();
    results
        .iter()
        .map(|record| record["uuid"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn search_prints_json_results() {
    let fixture = fixture();
    assert_eq!(search_json(&fixture, &["animal"]), ["kitten", "ears", "dog"]);
    assert_eq!(search_json(&fixture, &["--", "-animal -print"]), ["road", "blank"]);
}

#[test]
fn search_applies_facet_flags_and_limit() {
    let fixture = fixture();
    assert_eq!(search_json(&fixture, &["--collection", "pets"]), ["kitten", "dog"]);
    assert_eq!(search_json(&fixture, &["--artist", "hokusai"]), ["wave"]);
    assert_eq!(search_json(&fixture, &["sort:big", "--limit", "2"]), ["ears", "wave"]);
}

#[test]
fn seeded_random_sort_is_reproducible() {
    let fixture = fixture();
    let first = search_json(&fixture, &["sort:random", "--seed", "9"]);
    let second = search_json(&fixture, &["sort:random", "--seed", "9"]);
    assert_eq!(first, second);
    assert_eq!(first.len(), 6);
}

#[test]
fn search_table_lists_matches() {
    let fixture = fixture();
    let output = tagsieve(&["search", "-t", path(&fixture.tags), "-i", path(&fixture.images), "kitty"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("2 of 6 images"));
    assert!(text.contains("kitten"));
    assert!(text.contains("ears"));
}

#[test]
fn unknown_directive_policy_from_config() {
    let fixture = fixture();
    let config = fixture.tags.with_file_name("options.json");
    std::fs::write(&config, r#"{"unknown_directives": "free_text"}"#).unwrap();

    let output = tagsieve(&["parse", "-t", path(&fixture.tags), "bogus:value", "--config", path(&config)]);
    assert!(output.status.success());
    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["text_terms"][0], "bogus:value");
}

#[test]
fn parse_prints_canonical_tags() {
    let fixture = fixture();
    let output = tagsieve(&["parse", "-t", path(&fixture.tags), "neko -doggo w>=100"]);
    assert!(output.status.success());
    let parsed: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["include_tags"][0], "cat");
    assert_eq!(parsed["exclude_tags"][0], "dog");
    assert_eq!(parsed["filters"]["width"]["min"], 100);
}

#[test]
fn suggest_reports_unique_prefix() {
    let fixture = fixture();
    let output = tagsieve(&["suggest", "-t", path(&fixture.tags), "hoku"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.lines().next().unwrap().contains("hokusai"));
    assert!(text.contains("unique prefix → hokusai"));

    let ambiguous = stdout(&tagsieve(&["suggest", "-t", path(&fixture.tags), "ca"]));
    assert!(ambiguous.contains("no unique prefix"));
}

#[test]
fn inspect_reports_findings_and_facets() {
    let fixture = fixture();
    let broken = fixture.tags.with_file_name("broken.json");
    std::fs::write(
        &broken,
        r#"{"tags": [{"tag": "a", "parents": ["b"]}, {"tag": "b", "parents": ["a"]}]}"#,
    )
    .unwrap();

    let clean = stdout(&tagsieve(&["inspect", "-t", path(&fixture.tags), "-i", path(&fixture.images)]));
    assert!(clean.contains("FINDINGS (0)"));
    assert!(clean.contains("ARTISTS"));
    assert!(clean.contains("hokusai"));
    assert!(clean.contains("2024-06"));

    let report = stdout(&tagsieve(&["inspect", "-t", path(&broken)]));
    assert!(report.contains("FINDINGS (1)"));
}

#[test]
fn inspect_honors_artist_limit_from_config() {
    let fixture = fixture();
    let config = fixture.tags.with_file_name("options.json");
    std::fs::write(&config, r#"{"artist_facet_limit": 1}"#).unwrap();

    let output = tagsieve(&[
        "inspect",
        "-t",
        path(&fixture.tags),
        "-i",
        path(&fixture.images),
        "--config",
        path(&config),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report = stdout(&output);
    assert!(report.contains("hiroshige"));
    assert!(!report.contains("hokusai"));
}

#[test]
fn missing_files_fail_with_a_message() {
    let output = tagsieve(&["parse", "-t", "/definitely/not/here.json", "cat"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("❌"));
}
