mod application;
mod bootstrap;
mod config;
mod controllers;
mod logger;
mod managers;
mod runtime;

pub async fn run() {
    // Install rustls crypto provider before any TLS connections
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Signing keys and DB_PASSWORD may come from a local .env file
    dotenvy::dotenv().ok();

    let bootstrap::CoreBootstrap { config, managers } = bootstrap::build_core().await;

    display_tokenops_banner();

    let application = bootstrap::build_application(&config, &managers);

    match application.database_admin.seed().await {
        Ok(0) => tracing::debug!("Seed templates already present"),
        Ok(seeded) => tracing::info!(seeded, "Installed seed contract templates"),
        Err(error) => tracing::warn!(error = %error, "Failed to install seed contract templates"),
    }

    let controllers = bootstrap::build_controllers(&config, &application);

    runtime::run(controllers.http_router).await;
}

fn display_tokenops_banner() {
    tracing::info!("======================================================");
    tracing::info!(
        "          tokenops engine v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("======================================================");
    tracing::info!(
        "Running in {} environment",
        config::current_env()
    );
}
