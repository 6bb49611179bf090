use super::Workspace;
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::BlockId;
use pagecraft_store::SyncedSession;
use std::path::Path;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Page id
    pub page: String,

    /// Block type (see `pagecraft blocks`)
    pub block_type: String,

    /// Insert after this block instead of at the end
    #[arg(short, long)]
    pub after: Option<String>,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Page id
    pub page: String,

    /// Block id
    pub block: String,

    /// Target position (0 = top, clamped to the last position)
    pub index: usize,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Page id
    pub page: String,

    /// Block id
    pub block: String,
}

pub async fn add(args: AddArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let mut synced = workspace.edit(&args.page).await?;

    if !workspace.gateway.registry().has(&args.block_type) {
        bail!(
            "Unknown block type {:?}. Run `pagecraft blocks` to list them.",
            args.block_type
        );
    }

    let after = args.after.map(BlockId::new);
    let id = synced.session_mut().add_block(&args.block_type, after.as_ref())?;
    let index = synced.session().page().index_of(&id).unwrap_or_default();

    save(&mut synced).await?;
    println!("  {} Added {} at position {}", "✓".green(), id.as_str().bright_white(), index);
    Ok(())
}

pub async fn move_block(args: MoveArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let mut synced = workspace.edit(&args.page).await?;
    let id = BlockId::new(args.block);

    let result = synced.session_mut().move_block(&id, args.index)?;
    if !result.changed {
        println!("  {} {} is already there", "•".dimmed(), id.as_str().bright_white());
        return Ok(());
    }

    let index = synced.session().page().index_of(&id).unwrap_or_default();
    save(&mut synced).await?;
    println!("  {} Moved {} to position {}", "✓".green(), id.as_str().bright_white(), index);
    Ok(())
}

pub async fn remove(args: RemoveArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let mut synced = workspace.edit(&args.page).await?;
    let id = BlockId::new(args.block);

    synced.session_mut().delete_block(&id)?;

    save(&mut synced).await?;
    println!(
        "  {} Removed {} ({} blocks left)",
        "✓".green(),
        id.as_str().bright_white(),
        synced.session().page().len()
    );
    Ok(())
}

async fn save(synced: &mut SyncedSession) -> Result<()> {
    let ack = synced.save().await?;
    tracing::debug!("Saved {} as version {}", synced.page_id(), ack.version);
    Ok(())
}
