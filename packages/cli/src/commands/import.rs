use super::{page_id, Workspace};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_store::DraftConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ImportDraftArgs {
    /// Draft config JSON file
    pub file: PathBuf,

    /// Page id to store the converted page under
    pub page: String,
}

/// Convert a legacy draft config file into a stored page
pub async fn import_draft(args: ImportDraftArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let id = page_id(&args.page)?;

    let path = cwd.join(&args.file);
    let content = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let body: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))?;

    let draft = DraftConfig::from_value(&id, &body)?;
    let page = draft.to_page(&id, workspace.gateway.registry())?;

    for block in page.blocks() {
        if !workspace.gateway.registry().has(&block.block_type) {
            println!(
                "  {} Section {} has unknown type {}; it is kept but renders as a placeholder",
                "⚠️".yellow(),
                block.id,
                block.block_type.bright_white()
            );
        }
    }

    let ack = workspace.gateway.save(&id, &page).await?;
    println!(
        "  {} Imported {} sections into page {} (version {})",
        "✓".green(),
        page.len(),
        args.page.bright_white(),
        ack.version
    );
    Ok(())
}
