// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tagsieve::{
    evaluate_at, facet_counts, find_missing_parents, human_bytes, normalize_tag_name,
    parse_query_with, read_search_document, read_tag_document, read_tag_index, suggest_tags,
    validate_tag_document, EngineOptions, Error, EvalCache, FacetCount, FacetSelection,
    ImageRecord, TagIndex,
};

mod cli;
use cli::display::*;
use cli::{Cli, Commands};

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("{}", error_text(&format!("❌ {}", e)));
        std::process::exit(1);
    }
}

/// Logs go to stderr so `search --json` and `parse` output stays pipeable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("TAGSIEVE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: Commands) -> tagsieve::Result<()> {
    match command {
        Commands::Search {
            tags,
            images,
            query,
            facets,
            limit,
            json,
            seed,
            config,
        } => run_search(
            &tags,
            &images,
            &query,
            facets.into(),
            limit,
            json,
            seed,
            config.as_deref(),
        ),
        Commands::Parse {
            tags,
            query,
            config,
        } => run_parse(&tags, &query, config.as_deref()),
        Commands::Suggest {
            tags,
            prefix,
            limit,
        } => run_suggest(&tags, &prefix, limit),
        Commands::Inspect {
            tags,
            images,
            config,
        } => run_inspect(&tags, images.as_deref(), config.as_deref()),
    }
}

fn load_options(config: Option<&Path>) -> tagsieve::Result<EngineOptions> {
    match config {
        Some(path) => EngineOptions::from_path(path),
        None => Ok(EngineOptions::default()),
    }
}

fn to_json<T: serde::Serialize>(value: &T, what: &str) -> tagsieve::Result<String> {
    serde_json::to_string_pretty(value).map_err(|err| Error::json(what, err))
}

// ============================================================================
// SEARCH
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn run_search(
    tags: &Path,
    images: &Path,
    query: &str,
    facets: FacetSelection,
    limit: usize,
    json: bool,
    seed: Option<u64>,
    config: Option<&Path>,
) -> tagsieve::Result<()> {
    let options = load_options(config)?;
    let index = read_tag_index(tags)?;
    let document = read_search_document(images)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let parsed = parse_query_with(query, &index, &options);
    let mut results = evaluate_at(&document.images, &parsed, &facets, &index, Utc::now(), &mut rng);
    let matched = results.len();
    info!(query, matched, total = document.images.len(), "search finished");

    if limit > 0 {
        results.truncate(limit);
    }
    if json {
        println!("{}", to_json(&results, "search results")?);
        return Ok(());
    }

    section_top(&format!(
        "{} of {} images (showing {})",
        matched,
        document.images.len(),
        results.len()
    ));
    if results.is_empty() {
        row(&dim(" no matches"));
    }
    for record in &results {
        print_record(record, &index);
    }
    section_bot();
    Ok(())
}

fn print_record(record: &ImageRecord, index: &TagIndex) {
    let uuid = record.uuid.as_deref().unwrap_or("-");
    let title = record.title.as_deref().unwrap_or("");
    let bytes = record
        .bytes_human
        .clone()
        .or_else(|| record.bytes.map(human_bytes))
        .unwrap_or_default();
    row(&format!(
        " {} {} {} {} {}",
        pad_right(&themed(CYAN, &[BOLD], &truncate(uuid, 12)), 12),
        pad_right(&truncate(title, 30), 30),
        pad_right(&record.orientation(), 9),
        pad_right(&record.size_bucket(), 7),
        dim(&bytes)
    ));
    if !record.tags.is_empty() {
        let tags: Vec<String> = record
            .tags
            .iter()
            .map(|tag| {
                let canonical = index.resolve_raw(tag);
                tag_label(&canonical, index.tag_type(&canonical))
            })
            .collect();
        row(&format!("   {}", tags.join(" ")));
    }
}

// ============================================================================
// PARSE / SUGGEST
// ============================================================================

fn run_parse(tags: &Path, query: &str, config: Option<&Path>) -> tagsieve::Result<()> {
    let options = load_options(config)?;
    let index = read_tag_index(tags)?;
    let parsed = parse_query_with(query, &index, &options);
    println!("{}", to_json(&parsed, "parsed query")?);
    Ok(())
}

fn run_suggest(tags: &Path, prefix: &str, limit: usize) -> tagsieve::Result<()> {
    let index = read_tag_index(tags)?;
    for suggestion in suggest_tags(prefix, &index, &[] as &[&str], limit) {
        let canonical = index.resolve(&suggestion);
        println!("{}", tag_label(&suggestion, index.tag_type(&canonical)));
    }
    match index.resolve_prefix(&normalize_tag_name(prefix)) {
        Some(tag) => println!("{}", dim(&format!("unique prefix → {}", tag))),
        None => println!("{}", dim("no unique prefix")),
    }
    Ok(())
}

// ============================================================================
// INSPECT
// ============================================================================

fn run_inspect(
    tags: &Path,
    images: Option<&Path>,
    config: Option<&Path>,
) -> tagsieve::Result<()> {
    let options = load_options(config)?;
    let document = read_tag_document(tags)?;
    let index = TagIndex::from_document(&document);
    let findings = validate_tag_document(&document.tags);

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    for tag in index.canonical_tags() {
        *by_type.entry(index.tag_type(tag)).or_default() += 1;
    }

    section_top("TAG INDEX");
    row(&format!(" file          {}", tags.display()));
    row(&format!(" canonical     {}", count(index.canonical_tags().len(), 6)));
    row(&format!(" aliases       {}", count(index.alias_entries().len(), 6)));
    for (tag_type, n) in &by_type {
        row(&format!(
            "   {} {}",
            pad_right(&tag_label(tag_type, tag_type), 11),
            count(*n, 6)
        ));
    }
    row(&format!(" fingerprint   {}", dim(&format!("{:08x}", index.fingerprint()))));

    section_mid(&format!("FINDINGS ({})", findings.len()));
    if findings.is_empty() {
        row(&dim(" none"));
    }
    for finding in &findings {
        row(&format!(" {}", warning(&finding.to_string())));
    }

    if let Some(images) = images {
        inspect_images(
            &read_search_document(images)?.images,
            &index,
            images,
            options.artist_facet_limit,
        );
    }
    section_bot();
    Ok(())
}

fn inspect_images(images: &[ImageRecord], index: &TagIndex, path: &Path, artist_limit: usize) {
    let mut cache = EvalCache::new();
    cache.prepare(images, index);
    let counts = facet_counts(images, index, &cache, artist_limit);
    let incomplete = images
        .iter()
        .filter(|image| !find_missing_parents(image.tags.as_slice(), index).is_empty())
        .count();

    section_mid("IMAGES");
    row(&format!(" file          {}", path.display()));
    row(&format!(" images        {}", count(images.len(), 6)));
    row(&format!(" missing parents {}", count(incomplete, 4)));

    for (label, tag_type, facet) in [
        ("ARTISTS", "artist", &counts.artists),
        ("CHARACTERS", "character", &counts.characters),
        ("MONTHS", "", &counts.months),
    ] {
        section_mid(label);
        if facet.is_empty() {
            row(&dim(" none"));
        }
        for FacetCount { key, count: n } in facet {
            row(&format!(" {}  {}", count(*n, 5), tag_label(key, tag_type)));
        }
    }
}
