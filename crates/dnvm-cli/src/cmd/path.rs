use anyhow::Result;
use dnvm_core::{DnvmEnv, Reporter, ToolError, VfsPath, paths};
use dnvm_schema::Os;

/// Put `dir` on the user `PATH`, or the directory holding the installed dnvm
/// executable when `dir` is `None`. Only Windows keeps a user-scope `PATH`;
/// elsewhere dnvm's `env` script does this job.
pub fn add_to_path(
    env: &DnvmEnv,
    os: Os,
    dir: Option<&str>,
    reporter: &dyn Reporter,
) -> Result<()> {
    if os != Os::Windows {
        let script = display_path(env, &paths::env_script_path());
        return Err(ToolError::Unsupported(format!(
            "add-to-path is only needed on Windows. Source {script} from your shell profile instead."
        ))
        .into());
    }

    let dir = match dir {
        Some(dir) => dir.to_string(),
        None => {
            let exe_dir = paths::dnvm_exe_path(os).parent().unwrap_or_else(VfsPath::root);
            env.real_path(&exe_dir)
                .map_err(|e| ToolError::io("Failed to locate the dnvm install directory", e))?
                .display()
                .to_string()
        }
    };

    let changed = env
        .add_to_user_path(&dir)
        .map_err(|e| ToolError::io("Failed to update the user PATH", e))?;
    if changed {
        reporter.info(&format!("Added {dir} to PATH. Restart your shell to pick it up."));
    } else {
        reporter.info(&format!("{dir} is already on PATH."));
    }
    Ok(())
}

/// OS path of `path` when the home is on disk, its virtual path otherwise.
fn display_path(env: &DnvmEnv, path: &VfsPath) -> String {
    env.real_path(path)
        .map_or_else(|_| path.to_string(), |real| real.display().to_string())
}
