// System status display — DB size, row counts per visibility, block count.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::output::terminal;
use crate::policy::ContentType;

/// Display system status to the terminal.
pub async fn show(db: &Arc<dyn Database>, config: &Config) -> Result<()> {
    let db_display_path = config.db_path.as_str();
    if !Path::new(db_display_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `shroud init` to set up the database.");
        return Ok(());
    }

    // Database file size
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    let thresholds = &config.report_thresholds;
    println!(
        "Reports to hide: user {}, post {}, comment {}",
        thresholds.for_type(ContentType::User),
        thresholds.for_type(ContentType::Post),
        thresholds.for_type(ContentType::Comment),
    );
    println!("Default content filter: {}", config.default_content_filter);

    println!();
    terminal::display_visibility_counts(&db.visibility_counts().await?);
    println!("\nBlock relationships: {}", db.block_count().await?);

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
