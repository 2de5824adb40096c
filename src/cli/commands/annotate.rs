//! Annotate command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, truncate, CommandOutput};
use crate::infrastructure::corenlp::AnnotationClient;

#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Text to annotate (read from stdin when omitted)
    pub text: Option<String>,

    /// Annotators to run (comma-separated); defaults to the configured list
    #[arg(short, long, value_delimiter = ',')]
    pub annotators: Vec<String>,
}

/// Leading fields of the server's document message.
///
/// Only the text and the sentence count are read; every other field is
/// skipped while decoding.
#[derive(Clone, PartialEq, prost::Message)]
pub struct DocumentSummary {
    #[prost(string, tag = "1")]
    pub text: String,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub sentence: Vec<Vec<u8>>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateOutput {
    pub text: String,
    pub sentences: usize,
}

impl CommandOutput for AnnotateOutput {
    fn to_human(&self) -> String {
        format!(
            "Annotated {} sentence(s): {}",
            self.sentences,
            truncate(&self.text, 60)
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(client: &AnnotationClient, args: AnnotateArgs, json: bool) -> Result<()> {
    let text = super::read_text(args.text).await?;
    let annotators = (!args.annotators.is_empty()).then_some(args.annotators.as_slice());

    let doc: DocumentSummary = client.annotate(&text, annotators, None).await?;

    let result = AnnotateOutput {
        text: doc.text,
        sentences: doc.sentence.len(),
    };
    output(&result, json);
    Ok(())
}
