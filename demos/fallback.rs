use resilient_http::{ClientOptions, FallbackTable, ResilientClient};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("resilient_http=debug")),
        )
        .init();

    // Nothing listens here, so every attempt fails with a network error.
    let api = ResilientClient::from_options(ClientOptions {
        base_address: "http://127.0.0.1:9/api".to_owned(),
        timeout_ms: 2_000,
        max_retries: 1,
        retry_delay_ms: 500,
    })
    .with_fallbacks(
        FallbackTable::default().with_entry("/test", json!({ "cached": true, "items": [] })),
    );

    let result = api.get_with_fallback("/test").await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
