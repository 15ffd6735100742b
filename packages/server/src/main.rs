use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use alienshot_common::storage::filesystem::FilesystemBlobStore;
use tracing::{Level, info};

use alienshot_server::config::AppConfig;
use alienshot_server::state::AppState;
use alienshot_server::{build_router, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    // SQLite URLs point at a file; make sure its directory exists before connecting.
    if let Some(path) = config.database.url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let db = database::init_db(&config.database.url).await?;
    let blob_store = FilesystemBlobStore::new(PathBuf::from(&config.storage.upload_dir)).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = AppState {
        db,
        blob_store: Arc::new(blob_store),
        config,
    };

    let app = build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
