use anyhow::Result;
use colored::Colorize;
use pagecraft_editor::{BlockCategory, BlockRegistry, TemplateCatalog, TemplateSource};

/// List the builtin templates
pub fn templates() -> Result<()> {
    let catalog = TemplateCatalog::with_builtins();

    println!("{}", "Templates".bright_blue().bold());
    for template in catalog.list() {
        println!(
            "  {} {} ({} blocks)",
            template.id.bright_white().bold(),
            template.name.dimmed(),
            template.blocks.len()
        );
        println!("      {}", template.description);
    }

    Ok(())
}

/// List registered block types, grouped by category
pub fn blocks() -> Result<()> {
    let registry = BlockRegistry::with_builtins();

    for category in [
        BlockCategory::Layout,
        BlockCategory::Content,
        BlockCategory::Media,
        BlockCategory::Interactive,
        BlockCategory::Portfolio,
    ] {
        let definitions = registry.by_category(category);
        if definitions.is_empty() {
            continue;
        }

        println!("{}", format!("{:?}", category).bright_blue().bold());
        for definition in definitions {
            println!(
                "  {:<10} {}",
                definition.block_type.bright_white(),
                definition.description.dimmed()
            );
        }
    }

    Ok(())
}
