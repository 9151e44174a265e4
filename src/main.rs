use clap::Parser;
use retailcloud::cli::Cli;
use retailcloud::config::{watcher::ConfigWatcher, Settings};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!("Starting RetailCloud admin host on {}:{}", host, port);

    let registry = settings.load_registry()?;
    info!(
        "Loaded {} categories for {} tenants from {}",
        registry.category_count(),
        registry.tenant_count(),
        settings.categories_dir().display()
    );
    let registry = registry.shared();

    let _watcher = if settings.categories.watch {
        let registry_for_watcher = registry.clone();
        let settings_for_watcher = settings.clone();
        Some(ConfigWatcher::new(
            vec![settings.categories_dir()],
            move || match settings_for_watcher.load_registry() {
                Ok(new_registry) => {
                    let categories = new_registry.category_count();
                    *registry_for_watcher.blocking_write() = new_registry;
                    info!("Category definitions reloaded ({} categories)", categories);
                }
                // Keep serving the last good definitions
                Err(e) => error!("Failed to reload category definitions: {:#}", e),
            },
        )?)
    } else {
        None
    };

    let app = retailcloud::create_app(registry);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
