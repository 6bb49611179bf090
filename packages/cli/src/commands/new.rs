use super::{page_id, Workspace};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_common::slugify;
use pagecraft_editor::{Page, TemplateCatalog, TemplateSource};
use pagecraft_store::SyncedSession;
use std::path::Path;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Page id (also the file name in the store)
    pub page: String,

    /// Template to start from (see `pagecraft templates`)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Page title (defaults to the template's title, or the page id)
    #[arg(long)]
    pub title: Option<String>,

    /// Force overwrite an existing page
    #[arg(short, long)]
    pub force: bool,
}

pub async fn new_page(args: NewArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let id = page_id(&args.page)?;

    if workspace.gateway.exists(&id).await? && !args.force {
        println!("{} Page {} already exists", "⚠️".yellow(), args.page.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    let registry = workspace.gateway.registry().clone();
    let mut page = match &args.template {
        Some(template) => {
            let catalog = TemplateCatalog::with_builtins();
            if catalog.get(template).is_none() {
                bail!("Unknown template {:?}. Run `pagecraft templates` to list them.", template);
            }
            catalog.instantiate(template, &registry, id.clone())?
        }
        None => Page::new(id.clone(), args.page.clone(), slugify(&args.page)),
    };
    if let Some(title) = &args.title {
        page = page.set_meta(Some(title.as_str()), Some(slugify(title).as_str()));
    }

    let mut synced = SyncedSession::create(workspace.gateway.clone(), page, workspace.config.history_depth);
    let ack = synced.save().await?;

    println!(
        "  {} Created page {} with {} blocks (version {})",
        "✓".green(),
        args.page.bright_white(),
        synced.session().page().len(),
        ack.version
    );
    Ok(())
}
