//! Info command - project info and links

use anyhow::Result;
use colored::Colorize;

use super::get_context;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let links = &ctx.config.links;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "demo_mode": ctx.config.demo_mode,
                "links": {
                    "website": links.website,
                    "twitter": links.twitter,
                    "telegram": links.telegram,
                }
            })
        );
        return Ok(());
    }

    println!("{}", "Graphene".bold());
    println!("  Version: {}", env!("CARGO_PKG_VERSION"));
    println!("  Demo mode: {}", ctx.config.demo_mode);
    println!();
    println!("  Website: {}", links.website);
    println!("  Twitter: {}", links.twitter);
    println!("  Telegram: {}", links.telegram);

    Ok(())
}
