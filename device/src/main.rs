mod actions;
mod host;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    host::run().await
}
