//! Pattern query commands (semgrex, tokensregex, tregex).

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{IndexedWord, QueryOutput};
use crate::infrastructure::corenlp::AnnotationClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Semgrex,
    Tokensregex,
    Tregex,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Text to query (read from stdin when omitted)
    pub text: Option<String>,

    /// Pattern to match
    #[arg(short, long)]
    pub pattern: String,

    /// Only return sentences that contain a match
    #[arg(long)]
    pub filter: bool,

    /// Report each matched node once (semgrex only)
    #[arg(long)]
    pub unique: bool,

    /// Flatten matches into words tagged with their sentence index
    #[arg(long)]
    pub flatten: bool,

    /// With --flatten, keep only matches from this sentence
    #[arg(long, requires = "flatten")]
    pub sentence: Option<usize>,
}

impl CommandOutput for QueryOutput {
    fn to_human(&self) -> String {
        match self {
            Self::Json(value) => serde_json::to_string_pretty(value).unwrap_or_default(),
            Self::Text(text) => text.clone(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Text(text) => serde_json::Value::String(text.clone()),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct FlattenedOutput {
    pub words: Vec<IndexedWord>,
}

impl CommandOutput for FlattenedOutput {
    fn to_human(&self) -> String {
        if self.words.is_empty() {
            return "No matches.".to_string();
        }
        self.words
            .iter()
            .map(|w| {
                let word = w
                    .field_str("text")
                    .or_else(|| w.field_str("word"))
                    .unwrap_or("?");
                format!("[{}] {}", w.sent_index, word)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.words).unwrap_or_default()
    }
}

pub async fn execute(
    client: &AnnotationClient,
    kind: QueryKind,
    args: QueryArgs,
    json: bool,
) -> Result<()> {
    let text = super::read_text(args.text).await?;

    let result = match kind {
        QueryKind::Semgrex => {
            client
                .semgrex(&text, &args.pattern, args.filter, args.unique)
                .await?
        }
        QueryKind::Tokensregex => client.tokensregex(&text, &args.pattern, args.filter).await?,
        QueryKind::Tregex => client.tregex(&text, &args.pattern, args.filter).await?,
    };

    if args.flatten {
        let words = result.flatten(args.sentence)?;
        output(&FlattenedOutput { words }, json);
    } else {
        output(&result, json);
    }
    Ok(())
}
