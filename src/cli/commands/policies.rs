//! List policies command.

use anyhow::Result;
use tactic_policies::PolicyRegistry;

pub async fn run() -> Result<()> {
    let registry = PolicyRegistry::new();

    println!("Available Policies");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for info in registry.list() {
        println!("  {}", info.name);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", info.description);
        println!("  defaults: {}", info.default_config);
        println!();
    }

    println!("Use --policy <name> to select policies for a replay.");

    Ok(())
}
