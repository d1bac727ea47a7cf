use std::path::Path;

use eco_simulation::SimConfig;

pub fn run(output: Option<&Path>) -> Result<(), String> {
    let json = serde_json::to_string_pretty(&SimConfig::default())
        .map_err(|e| format!("JSON serialization error: {e}"))?;

    if let Some(path) = output {
        std::fs::write(path, format!("{json}\n"))
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Wrote default config to {}", path.display());
    } else {
        println!("{json}");
    }

    Ok(())
}
