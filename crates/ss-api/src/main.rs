#[tokio::main]
async fn main() {
    if let Err(err) = ss_api::run().await {
        tracing::error!(error = %err, "ss-api failed");
        std::process::exit(1);
    }
}
