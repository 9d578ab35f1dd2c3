//! Key command - show how the master key is resolved
//!
//! Never prints key material, only the source and the on-disk files that
//! back it.

use anyhow::Result;
use colored::Colorize;
use graphene_core::services::KeyService;

use super::get_graphene_dir;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let graphene_dir = get_graphene_dir();
    std::fs::create_dir_all(&graphene_dir)?;

    let material = KeyService::new(&graphene_dir).load()?;
    let source = material.source();

    let key_file = graphene_dir.join("secret.key");
    let metadata_file = graphene_dir.join("encryption.json");

    if json {
        println!(
            "{}",
            serde_json::json!({
                "source": source.as_str(),
                "key_file": key_file.exists().then(|| key_file.display().to_string()),
                "metadata_file": metadata_file.exists().then(|| metadata_file.display().to_string()),
            })
        );
        return Ok(());
    }

    println!("{}", "Master Key".bold());
    println!("  Source: {}", source.as_str());
    if key_file.exists() {
        println!("  Key file: {}", key_file.display());
    }
    if metadata_file.exists() {
        println!("  Derivation metadata: {}", metadata_file.display());
    }
    output::warning("Losing the key makes all encrypted fields unrecoverable. Back it up.");

    Ok(())
}
