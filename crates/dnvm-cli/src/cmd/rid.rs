use anyhow::Result;
use dnvm_core::{Reporter, ToolError};
use dnvm_schema::Rid;

/// Print the runtime identifier SDK downloads are selected by.
pub fn rid(reporter: &dyn Reporter) -> Result<()> {
    let rid = Rid::current().map_err(ToolError::from)?;
    reporter.info(&rid.to_string());
    Ok(())
}
