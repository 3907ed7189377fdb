//! CLI implementation for `unitbuild search`

use anyhow::Result;

use crate::cli::output;
use crate::core::global_config::GlobalConfig;
use crate::infra::dirs::UnitbuildDirs;
use crate::registry::RegistryClient;

/// Registry client honoring an explicit URL, then the global config
pub fn registry_client(registry: Option<String>) -> Result<RegistryClient> {
    let url = match registry {
        Some(url) => url,
        None => GlobalConfig::load(&UnitbuildDirs::new())?
            .registry_url()
            .to_string(),
    };
    Ok(RegistryClient::with_url(url))
}

/// Execute the search command
pub async fn execute(keyword: &str, registry: Option<String>) -> Result<()> {
    let client = registry_client(registry)?;

    tracing::info!("Searching for '{keyword}'...");
    let results = client.search(keyword).await?;

    if results.is_empty() {
        output::info(&format!("No components found for '{keyword}'"));
        return Ok(());
    }

    println!("{:<24} {:<12} {:<12} {}", "NAME", "VERSION", "LICENSE", "AUTHOR");
    for entry in &results {
        println!(
            "{:<24} {:<12} {:<12} {}",
            entry.name, entry.version, entry.license, entry.author
        );
    }
    println!();
    println!("Found {} component(s) for '{keyword}'", results.len());
    Ok(())
}
