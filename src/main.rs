use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use portfolio_cms::{
    graceful_shutdown::shutdown_signal,
    http::cors,
    routes::configure_routes,
    settings::AppConfig,
    store::RemoteStoreGateway,
    AppState,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,sqlx=warn"));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let gateway = RemoteStoreGateway::from_config(&config)?;
    let app_state = web::Data::new(AppState::new(&config, gateway));

    let server_addr = format!("{}:{}", config.host, config.port);
    let origins = config.cors_origins();

    tracing::info!(
        "🚀 Starting Portfolio CMS v{} on {} ({} mode)",
        env!("CARGO_PKG_VERSION"),
        server_addr,
        if app_state.gateway.is_configured() { "database" } else { "fallback" }
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(cors(&origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res?,
        signal = shutdown_signal() => {
            tracing::info!("Shutting down after {}", signal?);
            handle.stop(true).await;
        }
    }

    Ok(())
}
