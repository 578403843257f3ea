use crate::core::filter::FilterState;
use anyhow::Result;

/// Base used when no `share_base_url` is configured.
pub const DEFAULT_SHARE_BASE: &str = "http://localhost/";

pub fn render(filter: &FilterState, base_url: Option<&str>) -> Result<String> {
    filter.share_url(base_url.unwrap_or(DEFAULT_SHARE_BASE))
}

pub fn run(filter: &FilterState, base_url: Option<&str>) -> Result<()> {
    println!("{}", render(filter, base_url)?);
    Ok(())
}
