// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the tagsieve command-line interface.
//!
//! Four subcommands over the same two documents the gallery page loads:
//! `search` runs a query end to end, `parse` shows how a query is understood,
//! `suggest` completes a partial tag, and `inspect` reports on a tag document
//! (statistics, structural problems and, given images, facet counts).

pub mod display;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use tagsieve::FacetSelection;

#[derive(Parser)]
#[command(
    name = "tagsieve",
    about = "Tag-aware search over booru-style gallery indexes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search images with a query and optional facet selections
    Search {
        /// Path to tag_index.json
        #[arg(short, long)]
        tags: PathBuf,

        /// Path to search_index.json
        #[arg(short, long)]
        images: PathBuf,

        /// Search query, e.g. `cat -dog w>=1920 sort:new`
        #[arg(default_value = "", allow_hyphen_values = true)]
        query: String,

        #[command(flatten)]
        facets: FacetArgs,

        /// Maximum number of results to print (0 for all)
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print results as a JSON array instead of a table
        #[arg(long)]
        json: bool,

        /// Seed for `sort:random`, for reproducible shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Engine options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the parsed form of a query as JSON
    Parse {
        /// Path to tag_index.json
        #[arg(short, long)]
        tags: PathBuf,

        /// Search query
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Engine options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Suggest tags for a partially typed name
    Suggest {
        /// Path to tag_index.json
        #[arg(short, long)]
        tags: PathBuf,

        /// Partial tag name
        prefix: String,

        /// Maximum number of suggestions
        #[arg(short, long, default_value = "8")]
        limit: usize,
    },

    /// Inspect a tag document and, optionally, facet counts over images
    Inspect {
        /// Path to tag_index.json
        #[arg(short, long)]
        tags: PathBuf,

        /// Path to search_index.json
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// Engine options file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Facet selections, as the gallery's dropdowns would set them.
#[derive(Args, Debug, Default)]
pub struct FacetArgs {
    #[arg(long)]
    pub collection: Option<String>,

    /// landscape, portrait or square
    #[arg(long)]
    pub orientation: Option<String>,

    /// compact, medium, large or ultra
    #[arg(long)]
    pub size: Option<String>,

    /// Only images created within the last N days
    #[arg(long)]
    pub days: Option<u64>,

    #[arg(long)]
    pub tag: Option<String>,

    #[arg(long)]
    pub artist: Option<String>,

    #[arg(long)]
    pub character: Option<String>,

    /// Favorited (or created) month, `YYYY-MM`
    #[arg(long)]
    pub month: Option<String>,
}

impl From<FacetArgs> for FacetSelection {
    fn from(args: FacetArgs) -> Self {
        FacetSelection {
            collection: args.collection,
            orientation: args.orientation,
            size: args.size,
            time_window_days: args.days,
            tag: args.tag,
            artist: args.artist,
            character: args.character,
            month: args.month,
        }
    }
}
