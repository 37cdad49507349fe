use anyhow::Context;
use keypath_ops::OperationEngine;
use keypath_server::{command, logging, Server, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    let config = ServerConfig::from_matches(&matches);

    logging::init(&config).context("failed to install log subscriber")?;
    tracing::info!(
        version = keypath_server::VERSION,
        indent = config.engine.indent,
        use_cache = config.engine.use_cache,
        timeout = ?config.timeout,
        "keypath server starting"
    );

    let engine = Arc::new(OperationEngine::new(config.engine));
    let server = Server::new(engine, config.timeout);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server
        .serve(stdin, tokio::io::stdout())
        .await
        .context("serving stdio")?;
    Ok(())
}
