mod app;
mod cli;
mod commands;
mod error;
mod freshness;
mod local;
mod plan;
mod progress;
mod remote;
mod storage;
mod transfer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
