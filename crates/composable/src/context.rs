//! Global context for CLI commands

use crate::cli::PageArgs;
use anyhow::{Context as _, Result, anyhow};
use composable_core::config::consts::CONFIG_FILE;
use composable_core::{Config, MappingTable};
use composable_html::{
    HtmlSource, NoopLoader, Page, PageSource, SiteRootLoader, StyleAccessError, StylesheetLoader,
};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Loaded configuration
pub struct Context {
    pub config: Config,
}

impl Context {
    /// Loads the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given config file is missing, or
    /// any config file cannot be parsed
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::load_or_default(CONFIG_FILE)?,
        };
        debug!(?config, "configuration loaded");
        Ok(Self { config })
    }
}

/// Stylesheet access for a page on disk
pub enum Loader {
    SiteRoot(SiteRootLoader),
    None(NoopLoader),
}

impl StylesheetLoader for Loader {
    fn load(&self, href: &Url) -> Result<String, StyleAccessError> {
        match self {
            Loader::SiteRoot(loader) => loader.load(href),
            Loader::None(loader) => loader.load(href),
        }
    }
}

/// Page named on the command line
pub struct PageInput {
    pub html_path: PathBuf,
    pub location: Url,
    source: HtmlSource<Loader>,
}

impl PageInput {
    /// Reads the HTML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or has no usable URL
    pub fn load(args: &PageArgs) -> Result<Self> {
        let html = std::fs::read_to_string(&args.html)
            .with_context(|| format!("Failed to read {}", args.html.display()))?;
        let location = match &args.url {
            Some(url) => url.clone(),
            None => file_url(&args.html)?,
        };
        let loader = match &args.site_root {
            Some(root) => Loader::SiteRoot(SiteRootLoader::new(root)),
            None => Loader::None(NoopLoader),
        };
        Ok(Self {
            html_path: args.html.clone(),
            source: HtmlSource::new(html, location.clone(), loader),
            location,
        })
    }

    /// Parses a snapshot of the page
    ///
    /// # Errors
    ///
    /// Returns an error if the markup cannot be parsed
    pub fn page(&self) -> Result<Page> {
        self.source
            .snapshot()
            .with_context(|| format!("Failed to parse {}", self.html_path.display()))
    }

    pub fn into_source(self) -> HtmlSource<Loader> {
        self.source
    }
}

/// Reads a mapping table, or an empty one when no file is given
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed
pub fn load_mappings(path: Option<&Path>) -> Result<MappingTable> {
    match path {
        Some(path) => MappingTable::from_file(path)
            .with_context(|| format!("Failed to load mappings {}", path.display())),
        None => Ok(MappingTable::default()),
    }
}

fn file_url(path: &Path) -> Result<Url> {
    let absolute = std::fs::canonicalize(path)?;
    Url::from_file_path(&absolute)
        .map_err(|_| anyhow!("Cannot build a URL for {}", absolute.display()))
}
