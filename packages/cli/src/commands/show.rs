use super::Workspace;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{Block, BlockCallbacks, BlockData, RenderContext, RendererDispatch, Viewport};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Page id
    pub page: String,

    /// Preview viewport (desktop, tablet, mobile); defaults to the config's
    #[arg(short, long)]
    pub viewport: Option<Viewport>,

    /// Include blocks hidden in this viewport
    #[arg(short, long)]
    pub all: bool,
}

pub async fn show(args: ShowArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open(cwd)?;
    let synced = workspace.edit(&args.page).await?;
    let page = synced.session().page();
    let viewport = args.viewport.unwrap_or(workspace.config.default_viewport);

    let mut dispatch = RendererDispatch::with_placeholder();
    for block_type in workspace.gateway.registry().types() {
        dispatch.register(block_type, outline);
    }

    let context = RenderContext {
        editing: args.all,
        viewport,
        selected: false,
    };
    let rendered = dispatch.render_page(page, &context);

    println!(
        "{} {} {}",
        page.title.bright_white().bold(),
        format!("/{}", page.slug).dimmed(),
        format!("[{} @ {}px]", viewport, viewport.width()).dimmed()
    );
    for (index, item) in rendered.iter().enumerate() {
        let hidden = page
            .get(&item.block_id)
            .map_or(false, |block| !block.is_visible_on(viewport));
        let line = format!("  {:>2}. {}", index, item.output);
        if hidden {
            println!("{} {}", line.dimmed(), "(hidden)".yellow());
        } else {
            println!("{}", line);
        }
    }
    if rendered.is_empty() {
        println!("  {}", "(no visible blocks)".dimmed());
    }

    Ok(())
}

/// One-line summary of a block for terminal output
fn outline(block: &Block, _context: &RenderContext, _callbacks: &mut BlockCallbacks) -> String {
    let summary = match BlockData::decode(&block.block_type, &block.content) {
        Ok(BlockData::Hero(hero)) => hero.headline.unwrap_or_default(),
        Ok(BlockData::Text(text)) => text.title.unwrap_or(text.text),
        Ok(BlockData::Image(image)) => image.alt_text.or(image.image_url).unwrap_or_default(),
        Ok(BlockData::Gallery(gallery)) => format!("{} images", gallery.images.len()),
        Ok(BlockData::Form(form)) => format!(
            "{} ({} fields)",
            form.title.unwrap_or_default(),
            form.fields.map_or(0, |fields| fields.len())
        ),
        Ok(BlockData::Unknown { content, .. }) => first_text(&content),
        Err(e) => format!("invalid content: {}", e),
    };

    format!("{:<10} {} {}", block.block_type, truncate(&summary, 48), block.id.as_str().dimmed())
}

/// First string value among the content's keys (titles usually come first)
fn first_text(content: &pagecraft_editor::DataMap) -> String {
    content
        .values()
        .find_map(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn truncate(text: &str, max: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let cut: String = single_line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a\nb", 10), "a b");
        assert_eq!(truncate("abcdefghijk", 5), "abcd…");
    }
}
