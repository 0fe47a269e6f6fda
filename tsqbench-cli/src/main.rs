//! tsqbench binary entry point.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tsqbench_cli::run().await
}
