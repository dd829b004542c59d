use anyhow::{Context, Result};
use contact_server::{ContactServer, ContactStore, ServerConfig};
use std::sync::Arc;

use super::Args;

pub(super) fn resolve_config(args: &Args) -> Result<ServerConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => ServerConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if let Some(context_root) = args.context_root.as_ref() {
        config.context_root = context_root.clone();
    }
    Ok(config)
}

pub(super) async fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    let store = Arc::new(ContactStore::new());
    let server = ContactServer::bind(&config, store)
        .await
        .with_context(|| format!("binding {}", config.listen))?;

    tokio::select! {
        () = server.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("waiting for ctrl-c")?;
            log::info!("exit");
        }
    }
    Ok(())
}
