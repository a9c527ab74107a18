// show.rs — The `chainspect show` command.
//
// Prints a human-readable summary of the last resolved document:
// per function, the direct owners, each ultimate owner with its via
// chain and cumulative delay, and any warnings.

use std::path::Path;

use anyhow::{bail, Result};

use cs_store::ResolvedStore;

pub fn run(project_root: &Path) -> Result<()> {
    let Some(resolved) = ResolvedStore::new(project_root).load()? else {
        bail!("no resolved document yet; run `chainspect resolve` first");
    };

    println!(
        "Resolved at {} from snapshot {}",
        resolved.last_modified, resolved.generated_from.discovered_json_hash
    );

    for (contract, entry) in &resolved.contracts {
        println!("\n{}", contract);
        for function in &entry.functions {
            println!("  {}()", function.function_name);
            for owner in &function.direct_owners {
                println!("    direct: {}", owner);
            }
            for ultimate in &function.ultimate_owners {
                let via = if ultimate.via.is_empty() {
                    String::new()
                } else {
                    let chain: Vec<String> = ultimate
                        .via
                        .iter()
                        .map(|s| s.address.to_string())
                        .collect();
                    format!(" via {}", chain.join(" → "))
                };
                println!(
                    "    ultimate: {} ({}){} [{}]",
                    ultimate.address,
                    ultimate.address_type,
                    via,
                    ultimate.cumulative_delay_formatted
                );
            }
            for warning in &function.warnings {
                println!("    warning: {}", warning);
            }
        }
    }
    Ok(())
}
