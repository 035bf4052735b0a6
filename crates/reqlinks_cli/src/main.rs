//! Line-oriented host for the request router.
//!
//! Reads one JSON request per stdin line and writes one JSON envelope per
//! stdout line. Unknown request types produce no output.

use log::error;
use reqlinks_core::{
    init_logging, spawn_router, CoreConfig, DocumentRepository, DocumentStore, Envelope,
    KvBackend, Router, SqliteKvBackend,
};
use serde_json::Value;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> ExitCode {
    match run(CoreConfig::from_env()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("reqlinks: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: CoreConfig) -> Result<(), String> {
    if let Some(log_dir) = config.log_dir.as_deref().and_then(|dir| dir.to_str()) {
        init_logging(&config.log_level, log_dir).map_err(|err| err.to_string())?;
    }

    let kv: Arc<dyn KvBackend> = Arc::new(
        SqliteKvBackend::open(&config.db_path)
            .map_err(|err| format!("cannot open `{}`: {err}", config.db_path.display()))?,
    );
    let store = Arc::new(DocumentStore::new(DocumentRepository::with_key(
        kv,
        config.storage_key.clone(),
    )));
    store
        .ensure_initialized()
        .await
        .map_err(|err| err.to_string())?;

    let (router, _task) = spawn_router(Router::new(store));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.map_err(|err| err.to_string())? {
        if line.trim().is_empty() {
            continue;
        }
        let envelope = match serde_json::from_str::<Value>(&line) {
            Ok(message) => router.handle_message(&message).await,
            Err(err) => Some(Envelope::failure(format!("invalid argument: {err}"))),
        };
        let Some(envelope) = envelope else {
            continue;
        };

        let mut encoded = serde_json::to_string(&envelope).map_err(|err| err.to_string())?;
        encoded.push('\n');
        stdout
            .write_all(encoded.as_bytes())
            .await
            .map_err(|err| err.to_string())?;
        stdout.flush().await.map_err(|err| err.to_string())?;
    }

    Ok(())
}
