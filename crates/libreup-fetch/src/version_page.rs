use anyhow::{anyhow, Context, Result};
use regex_lite::Regex;
use tracing::debug;

use crate::http::HttpClient;

const VERSION_MARKER_CLASS: &str = "dl_version_number";
const EXPECTED_VERSIONS: usize = 2;

pub fn latest_version(client: &HttpClient, url: &str) -> Result<String> {
    let page = client
        .get_text(url)
        .with_context(|| format!("failed to fetch download page: {url}"))?;
    let versions = downloadable_versions(&page)?;
    debug!(?versions, "download page versions");
    select_stable_version(&versions).with_context(|| format!("download page: {url}"))
}

pub fn select_stable_version(versions: &[String]) -> Result<String> {
    if versions.len() != EXPECTED_VERSIONS {
        return Err(anyhow!(
            "expected {EXPECTED_VERSIONS} versions, found {}: {:?}",
            versions.len(),
            versions
        ));
    }
    Ok(versions[1].clone())
}

pub fn downloadable_versions(html: &str) -> Result<Vec<String>> {
    let span_open =
        Regex::new(r"(?i)<span\b([^>]*)>").context("failed to compile span pattern")?;
    let span_close =
        Regex::new(r"(?i)</span\s*>").context("failed to compile span close pattern")?;
    let class_attr =
        Regex::new(r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
            .context("failed to compile class pattern")?;
    let markup = Regex::new(r"<[^>]*>").context("failed to compile markup pattern")?;

    let opens: Vec<_> = span_open.captures_iter(html).collect();
    let mut versions = Vec::new();
    for (index, captures) in opens.iter().enumerate() {
        let attributes = captures.get(1).map_or("", |m| m.as_str());
        let has_marker = class_attr.captures_iter(attributes).any(|class| {
            let value = class
                .get(1)
                .or_else(|| class.get(2))
                .or_else(|| class.get(3))
                .map_or("", |m| m.as_str());
            value
                .split_whitespace()
                .any(|token| token == VERSION_MARKER_CLASS)
        });
        if !has_marker {
            continue;
        }

        // Body runs to the closing tag, the next span, or the end of input.
        let body_start = captures.get(0).map_or(0, |m| m.end());
        let body_end = opens
            .get(index + 1)
            .and_then(|next| next.get(0))
            .map_or(html.len(), |m| m.start());
        let body = &html[body_start..body_end];
        let body = span_close.find(body).map_or(body, |m| &body[..m.start()]);
        let text = markup.replace_all(body, "");
        let text = text.trim();
        if !text.is_empty() {
            versions.push(text.to_string());
        }
    }

    Ok(versions)
}
