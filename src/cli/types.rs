//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::annotate::AnnotateArgs;
use super::commands::query::QueryArgs;

#[derive(Parser)]
#[command(name = "corenlp-client")]
#[command(about = "Client for a CoreNLP annotation server", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to corenlp.yaml and corenlp.local.yaml)
    #[arg(short, long, global = true, env = "CORENLP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Wait until the server answers its liveness probe
    Ping,

    /// Annotate text and summarize the returned document
    Annotate(AnnotateArgs),

    /// Match a semgrex pattern against dependency graphs
    Semgrex(QueryArgs),

    /// Match a TokensRegex pattern against tokens
    Tokensregex(QueryArgs),

    /// Match a tregex pattern against constituency trees
    Tregex(QueryArgs),
}
