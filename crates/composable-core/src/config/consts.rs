//! Default values used across the workspace

/// Messaging bridge defaults
pub mod bridge {
    /// Origins trusted to request a conversion
    pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5174", "http://localhost:5173"];
}

/// Render wait defaults
pub mod render_wait {
    /// Give up waiting for host content after this long
    pub const TIMEOUT_MS: u64 = 3000;

    /// Delay between readiness polls
    pub const INTERVAL_MS: u64 = 100;
}

/// Tree converter limits
pub mod converter {
    /// Deepest element nesting converted before a subtree is abandoned
    ///
    /// Also the largest accepted `converter.max_depth`; conversion recurses
    /// once per level and must fit a 2 MiB thread stack.
    pub const MAX_DEPTH: usize = 128;

    /// Deepest JSON nesting accepted when reading a document back
    ///
    /// Each tree level costs three levels of JSON (node, slot map, slot).
    pub const MAX_JSON_NESTING: usize = 512;

    /// Characters of trimmed text kept in `contentPreview`
    pub const PREVIEW_CHARS: usize = 50;
}

/// Default configuration file name
pub const CONFIG_FILE: &str = "composable.toml";
