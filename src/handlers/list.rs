use crate::api::{OutputFormat, RuleCatalog, TargetVersions};
use crate::error::Result;

/// Print the active rule catalog and target versions.
pub fn handle_list_versions(
    catalog: &RuleCatalog,
    targets: &TargetVersions,
    format: OutputFormat,
    no_headers: bool,
) -> Result<()> {
    print!("{}", catalog.render(targets, format, no_headers)?);
    Ok(())
}
