//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::corenlp::AnnotationClient;
use commands::query::QueryKind;

/// Run one command inside a scoped service lifetime.
///
/// A server started for the command is stopped before returning, whether the
/// command succeeded or not.
pub async fn run(command: Commands, config: &Config, json: bool) -> Result<()> {
    let client = AnnotationClient::from_config(config)?;
    let guard = client.supervisor().scoped()?;

    let result = match command {
        Commands::Ping => commands::ping::execute(&client, json).await,
        Commands::Annotate(args) => commands::annotate::execute(&client, args, json).await,
        Commands::Semgrex(args) => {
            commands::query::execute(&client, QueryKind::Semgrex, args, json).await
        }
        Commands::Tokensregex(args) => {
            commands::query::execute(&client, QueryKind::Tokensregex, args, json).await
        }
        Commands::Tregex(args) => {
            commands::query::execute(&client, QueryKind::Tregex, args, json).await
        }
    };

    let released = guard.release().await;
    result?;
    released?;
    Ok(())
}

/// Report a failed command and exit with a non-zero status
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let body = serde_json::json!({
            "error": err.to_string(),
            "causes": err.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
    }
    std::process::exit(1);
}
