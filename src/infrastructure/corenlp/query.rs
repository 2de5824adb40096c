//! Pattern-query endpoints (`/tokensregex`, `/semgrex`, `/tregex`)
//!
//! These run a pattern over text the server annotates on the fly. They do not
//! pass the readiness gate, so they can target a server the client does not
//! supervise.

use tracing::{debug, instrument};

use super::client::AnnotationClient;
use super::error::Result;
use crate::domain::models::QueryOutput;

impl AnnotationClient {
    /// Run a TokensRegex pattern over `text`
    pub async fn tokensregex(&self, text: &str, pattern: &str, filter: bool) -> Result<QueryOutput> {
        self.pattern_query("/tokensregex", text, pattern, filter, false)
            .await
    }

    /// Run a Semgrex pattern over the dependency graphs of `text`
    pub async fn semgrex(
        &self,
        text: &str,
        pattern: &str,
        filter: bool,
        unique: bool,
    ) -> Result<QueryOutput> {
        self.pattern_query("/semgrex", text, pattern, filter, unique)
            .await
    }

    /// Run a Tregex pattern over the parse trees of `text`
    pub async fn tregex(&self, text: &str, pattern: &str, filter: bool) -> Result<QueryOutput> {
        self.pattern_query("/tregex", text, pattern, filter, false)
            .await
    }

    #[instrument(skip(self, text), fields(bytes = text.len()))]
    async fn pattern_query(
        &self,
        path: &str,
        text: &str,
        pattern: &str,
        filter: bool,
        unique: bool,
    ) -> Result<QueryOutput> {
        let url = self.endpoint().join(path);
        debug!(url = %url, "GET pattern query");

        let response = self
            .http_client()
            .get(&url)
            .query(&[
                ("pattern", pattern),
                ("filter", if filter { "true" } else { "false" }),
                ("unique", if unique { "true" } else { "false" }),
            ])
            .body(text.as_bytes().to_vec())
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(QueryOutput::from_body(response.text().await?))
    }
}
