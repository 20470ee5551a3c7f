//! Status command implementation
//!
//! This module implements the `status` command for displaying the lists
//! visible to the source key and their stored watermarks.

use crate::adapters::mailchimp::MailchimpClient;
use crate::adapters::state::create_watermark_store;
use crate::adapters::traits::SourceClient;
use crate::cli::exit_code_for;
use crate::config::load_config;
use crate::core::state::{StateManager, Watermark};
use crate::domain::Collection;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Filter by list ID
    #[arg(long)]
    pub list_id: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking sync status");

        println!("📊 Sync Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let source = match MailchimpClient::new(&config.source) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to create source client");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let store = match create_watermark_store(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to watermark store");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };
        let state_manager = StateManager::new(store, config.state.key_prefix.clone());

        let collections = match source.list_collections().await {
            Ok(c) => self.filter(c),
            Err(e) => {
                println!("❌ Failed to list collections");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if collections.is_empty() {
            println!("No lists match the specified filters.");
            return Ok(0);
        }

        println!("Found {} list(s):", collections.len());
        println!();
        println!(
            "{:<14} {:<30} {:>10} {:<25}",
            "List ID", "Name", "Members", "Last Completed Sync"
        );
        println!("{}", "-".repeat(82));

        let mut unreadable = 0;
        for collection in &collections {
            let last_sync = match state_manager.load_watermark(&collection.id).await {
                Ok(watermark) => describe(watermark.as_ref()),
                Err(e) => {
                    unreadable += 1;
                    tracing::warn!(list_id = %collection.id, error = %e, "Failed to load watermark");
                    "⚠️  Unreadable".to_string()
                }
            };

            println!(
                "{:<14} {:<30} {:>10} {:<25}",
                collection.id.as_str(),
                truncate_name(&collection.name, 30),
                collection.stats.member_count,
                last_sync
            );
        }

        println!();

        if unreadable > 0 {
            println!("❌ {unreadable} watermark(s) could not be read");
            return Ok(5); // Fatal error exit code
        }
        Ok(0)
    }

    fn filter(&self, collections: Vec<Collection>) -> Vec<Collection> {
        match &self.list_id {
            Some(id) => collections
                .into_iter()
                .filter(|c| c.id.as_str() == id)
                .collect(),
            None => collections,
        }
    }
}

fn describe(watermark: Option<&Watermark>) -> String {
    match watermark {
        Some(w) => w.last_completed_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "Never".to_string(),
    }
}

fn truncate_name(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut out: String = name.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
