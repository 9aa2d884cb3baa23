//! Cache command - manage the artifact store

use crate::cli::args::{CacheAction, CacheArgs};
use crate::config::{Config, ConfigManager};
use crate::error::BadgerResult;
use crate::store::ContentStore;
use console::style;

/// Execute the cache command
pub async fn execute(args: CacheArgs, manager: &ConfigManager, config: &Config) -> BadgerResult<()> {
    let store = ContentStore::open(&manager.store_config(config)).await;

    if !store.is_enabled() {
        println!(
            "{} caching is disabled (no usable cache path configured)",
            style("Note:").yellow()
        );
        return Ok(());
    }

    match args.action {
        CacheAction::Clear => {
            store.delete_all().await?;
            println!("Cache cleared.");
        }
        CacheAction::Verify => match store.verify().await? {
            Some(report) => {
                println!(
                    "Sweep complete: {} entries examined, {} entries and {} payloads reclaimed ({} bytes freed)",
                    report.entries_examined,
                    report.entries_reclaimed,
                    report.content_reclaimed,
                    report.bytes_reclaimed,
                );
            }
            None => println!("No sweep ran."),
        },
    }

    Ok(())
}
