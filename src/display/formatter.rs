use colored::*;

use crate::types::RewardOutcome;

/// Human-readable console output for rewarded tweets. Not meant for
/// machine parsing; the audit log holds the raw payloads.
pub struct RewardFormatter;

impl RewardFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn display(&self, outcome: &RewardOutcome) {
        println!(
            "{} {} {}",
            "##########".bright_black(),
            format!("NEW TWEET Nr: {}", outcome.tweet_number)
                .bright_white()
                .bold(),
            "##########".bright_black()
        );

        println!("   {}", outcome.text);
        println!(
            "   Receiver: {}",
            format!("{:?}", outcome.receiver).bright_cyan()
        );
        println!(
            "   Balance: {}",
            outcome.balance.to_string().bright_yellow()
        );
        println!("   Tx: {:?}", outcome.receipt.transaction_hash);

        if let Some(block) = outcome.receipt.block_number {
            println!("   Block: {block}");
        }
        if let Some(ref timestamp) = outcome.timestamp {
            println!("   Time: {timestamp}");
        }

        println!("{}", "─".repeat(80).bright_black());
    }
}

impl Default for RewardFormatter {
    fn default() -> Self {
        Self::new()
    }
}
