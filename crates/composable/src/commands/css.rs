//! Css command - collected page CSS

use crate::cli::PageArgs;
use crate::context::PageInput;
use crate::output::print_text;
use anyhow::Result;
use composable_html::extract_all_css;

pub fn run(page: &PageArgs) -> Result<()> {
    let input = PageInput::load(page)?;
    print_text(&extract_all_css(&input.page()?))?;
    Ok(())
}
