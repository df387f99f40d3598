use resilient_http::{ClientOptions, ResilientClient};
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

    let options = ClientOptions::from_env().map_err(anyhow::Error::msg)?;
    let api = ResilientClient::from_options(options);

    let created = api.post("/items", &json!({ "name": "Task 4" })).await?;
    println!("created ({}): {}", created.status_code, created.data);

    match api.get("/items").await {
        Ok(result) => println!("items ({}): {}", result.status_code, result.data),
        Err(err) => eprintln!("request failed [{}]: {}", err.status_code(), err),
    }

    Ok(())
}
