//! Init command implementation.

use anyhow::{Context, Result};
use fracnet_model::RawSettings;
use std::fs;
use std::path::Path;
use tracing::info;

/// Runs the init command.
pub fn run(path: &str, force: bool) -> Result<()> {
    let settings_path = Path::new(path);
    if settings_path.exists() && !force {
        info!("Skipped: {} (already exists)", settings_path.display());
        return Ok(());
    }

    let defaults = RawSettings::default();
    let content = match settings_path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => serde_yaml::to_string(&defaults)?,
        Some("json") => {
            let mut json = serde_json::to_string_pretty(&defaults)?;
            json.push('\n');
            json
        }
        _ => {
            anyhow::bail!(
                "Unknown settings format: {}. Use .json, .yaml or .yml.",
                settings_path.display()
            );
        }
    };

    if let Some(parent) = settings_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(settings_path, content)
        .with_context(|| format!("Failed to create {}", settings_path.display()))?;
    info!("Created: {}", settings_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fracnet_model::GenerationSettings;

    #[test]
    fn written_defaults_load_back() {
        let tmp = tempfile::TempDir::new().unwrap();
        for name in ["settings.json", "settings.yaml"] {
            let path = tmp.path().join(name);
            run(path.to_str().unwrap(), false).unwrap();
            let settings = GenerationSettings::load(&path).unwrap();
            assert_eq!(settings.seed, 42);
            assert_eq!(settings.fracture_count, 5);
        }
    }

    #[test]
    fn existing_file_is_kept_without_force() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{}").unwrap();
        run(path.to_str().unwrap(), false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
