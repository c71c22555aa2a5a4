//! Convert command - page to component tree

use crate::cli::PageArgs;
use crate::context::{Context, PageInput, load_mappings};
use crate::output::print_json;
use anyhow::{Context as _, Result};
use composable_core::ConversionResult;
use composable_html::convert_page;
use std::path::Path;
use tracing::info;

/// Converts the page and prints or writes the JSON
///
/// # Arguments
///
/// * `ctx` - loaded configuration
/// * `page` - page to convert
/// * `mappings` - optional component mapping file
/// * `out` - write here instead of stdout
/// * `pretty` - pretty-print the JSON
pub fn run(
    ctx: &Context,
    page: &PageArgs,
    mappings: Option<&Path>,
    out: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let input = PageInput::load(page)?;
    let result = convert(ctx, &input, mappings)?;
    let json = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    match out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print_json(&json)?,
    }
    Ok(())
}

/// Converts a loaded page with the configured limits
pub fn convert(ctx: &Context, input: &PageInput, mappings: Option<&Path>) -> Result<ConversionResult> {
    let mappings = load_mappings(mappings)?;
    let snapshot = input.page()?;
    let result = convert_page(&snapshot, &mappings, &ctx.config.converter)
        .with_context(|| format!("Failed to convert {}", input.html_path.display()))?;
    Ok(result)
}
