use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(err) = mafia_bot::run().await {
        tracing::error!("Error: {err}");
        std::process::exit(1);
    }
}
