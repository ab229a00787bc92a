use anyhow::Result;
use tracing::debug;

/// Downloads a feed archive over HTTP(S).
#[tracing::instrument]
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    let bytes = resp.bytes()?.to_vec();
    debug!(bytes = bytes.len(), "Feed archive downloaded");
    Ok(bytes)
}
