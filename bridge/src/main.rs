#[tokio::main]
async fn main() -> anyhow::Result<()> {
    thermostat_bridge::host::run().await
}
