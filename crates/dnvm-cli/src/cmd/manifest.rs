use anyhow::{Context, Result};
use dnvm_core::{DnvmEnv, Reporter};
use dnvm_schema::manifest::{self, LATEST_VERSION};

/// Print the manifest, migrated to the latest format, as JSON.
pub fn show(env: &DnvmEnv, pretty: bool, reporter: &dyn Reporter) -> Result<()> {
    let store = env.manifest_store();
    if !store.exists() {
        reporter.info("No manifest found. Nothing has been installed yet.");
        return Ok(());
    }

    let current = store.read()?;
    let value = manifest::to_value(&current).context("Failed to serialize manifest")?;
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    reporter.info(&text);
    Ok(())
}

/// Rewrite the manifest in the latest format.
pub fn migrate(env: &DnvmEnv, reporter: &dyn Reporter) -> Result<()> {
    let store = env.manifest_store();
    let current = store.read()?;
    store.write(&current)?;
    reporter.info(&format!("Manifest is at version {LATEST_VERSION}."));
    Ok(())
}
