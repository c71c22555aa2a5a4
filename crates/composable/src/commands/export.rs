//! Export command - timestamped result file

use crate::cli::PageArgs;
use crate::commands::convert::convert;
use crate::context::{Context, PageInput};
use crate::output::print_text;
use anyhow::Result;
use chrono::Utc;
use composable_bridge::export_result;
use std::path::Path;

pub fn run(ctx: &Context, page: &PageArgs, mappings: Option<&Path>, dir: Option<&Path>) -> Result<()> {
    let input = PageInput::load(page)?;
    let result = convert(ctx, &input, mappings)?;
    let directory = dir.unwrap_or(ctx.config.export.directory.as_path());

    let path = export_result(&result, directory, &input.location, Utc::now())?;
    print_text(&path.display().to_string())?;
    Ok(())
}
