use anyhow::Result;
use dotenv::dotenv;
use tweet_faucet::{display::formatter::RewardFormatter, FaucetBuilder, FaucetConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("tweet_faucet=info,ethers=warn")
        .init();

    // Load environment variables
    dotenv().ok();

    let config = FaucetConfig::from_env()?;

    println!("\n🚰 Tweet Faucet");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Listening for #{}:\n", config.keywords[0]);

    let formatter = RewardFormatter::new();

    let exit = FaucetBuilder::new(config)
        .on_reward(move |outcome| {
            formatter.display(outcome);
        })
        .run()
        .await?;

    println!("\n👋 Stream closed ({}), shutting down...", exit.as_str());

    Ok(())
}
