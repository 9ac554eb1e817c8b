//! Bloom web client entry point.

use bloom_web::app::App;

fn main() {
    // Initialize logging on server builds; the wasm client logs through
    // tracing without a subscriber.
    #[cfg(feature = "server")]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "bloom_web=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();

        tracing::info!("Starting Bloom web client v{}", env!("BLOOM_VERSION"));
    }

    dioxus::launch(App);
}
