use std::sync::Arc;

use gemserve::config::Config;
use gemserve::server::{listener, tls};

#[tokio::main]
async fn main() -> anyhow::Result<()>{
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Arc::new(Config::load()?);
    let acceptor = tls::acceptor(&cfg.tls)?;

    tracing::info!(
        content = %cfg.content.display(),
        host = %cfg.host,
        blocked = cfg.block.len(),
        auto_list = cfg.auto_list,
        "Configuration loaded"
    );

    let http = {
        let cfg = Arc::clone(&cfg);
        async move {
            if cfg.http.enabled {
                listener::run_http(cfg).await
            } else {
                std::future::pending().await
            }
        }
    };

    tokio::select! {
        res = listener::run_gemini(Arc::clone(&cfg), acceptor) => {
            res?;
        }

        res = http => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
