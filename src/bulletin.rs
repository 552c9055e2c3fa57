//! # NOAA Coastal Waters Forecast Retrieval
//!
//! This module handles the network side of the pipeline: downloading the CWF
//! product page from forecast.weather.gov and reducing it to the plain text
//! of a single zone.
//!
//! ## Data Source
//! - **URL**: `https://forecast.weather.gov/product.php?site=MFL&issuedby=MFL&product=CWF`
//!   (Miami) and `...site=NWS&issuedby=KEY&product=CWF` (Key West)
//! - **Format**: an HTML page wrapping a `<pre>` block with the raw product
//! - **Layout**: one block per zone group, each opened by a UGC line such as
//!   `AMZ651-182315-` or `GMZ042>044-182315-` and closed by `$$`
//!
//! ## Error Handling
//! Any failure here means there is no text to parse, so the zone is skipped
//! for this run. All errors propagate through [`FetchError`].

use crate::config::{HttpConfig, ZoneConfig};
use crate::Bulletin;
use chrono::{DateTime, Local};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while retrieving a zone bulletin.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed (network, server, or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The product downloaded fine but carried no text
    #[error("empty product")]
    Empty,

    /// The product does not contain a block for the zone
    #[error("no forecast found for zone {0}")]
    ZoneNotFound(String),
}

/// Build the HTTP client used for every zone in a run.
pub fn http_client(http: &HttpConfig) -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent(http.user_agent.as_str())
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()?;
    Ok(client)
}

/// Download the product for `zone` and cut out its bulletin.
pub async fn fetch(client: &reqwest::Client, zone: &ZoneConfig) -> Result<Bulletin, FetchError> {
    info!(zone = %zone.id, url = %zone.url, "downloading coastal waters forecast");
    let body = client
        .get(&zone.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(zone = %zone.id, bytes = body.len(), "product downloaded");

    from_product(zone, &body, Local::now())
}

/// Turn a downloaded (or saved) product into one zone's bulletin.
pub fn from_product(
    zone: &ZoneConfig,
    product: &str,
    fetched_at: DateTime<Local>,
) -> Result<Bulletin, FetchError> {
    let text = strip_html(product);
    if text.trim().is_empty() {
        return Err(FetchError::Empty);
    }

    let block = zone_block(&text, &zone.id, &zone.aliases)
        .ok_or_else(|| FetchError::ZoneNotFound(zone.id.clone()))?;
    Ok(Bulletin::new(zone.id.clone(), fetched_at, block))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<.*?>").expect("tag pattern should be valid"))
}

/// Remove HTML tags and decode the handful of entities NOAA emits.
pub fn strip_html(raw: &str) -> String {
    tag_regex()
        .replace_all(raw, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Text of the block following the UGC line that names `id` (or an alias),
/// up to the `$$` terminator or end of text.
pub fn zone_block(text: &str, id: &str, aliases: &[String]) -> Option<String> {
    let names: Vec<String> = std::iter::once(id)
        .chain(aliases.iter().map(String::as_str))
        .map(regex::escape)
        .collect();
    let re = Regex::new(&format!(r"\b(?:{})\b[^\n]*\n", names.join("|"))).ok()?;

    let header = re.find(text)?;
    let rest = &text[header.end()..];
    let end = rest.find("\n$$").unwrap_or(rest.len());
    let block = rest[..end].trim_end();

    (!block.trim().is_empty()).then(|| block.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT: &str = r#"<html><body><pre class="glossaryProduct">
FZUS52 KKEY 181532
CWFKEY

Coastal Waters Forecast for Florida Keys
National Weather Service Key West FL

GMZ005-190000-
Synopsis for Florida Keys coastal waters &amp; Dry Tortugas-
Moderate easterly breezes will continue.
$$

GMZ042&gt;044-190000-
Hawk Channel from Ocean Reef to Craig Key out to the reef-
1132 AM EDT Sat Oct 18 2025

.TODAY...East winds near 15 knots. Seas 2 to 3 feet.
.TONIGHT...East winds 10 to 15 knots. Seas 2 feet.
$$
</pre></body></html>"#;

    fn keys() -> ZoneConfig {
        ZoneConfig {
            id: "GMZ044".to_string(),
            name: "Keys".to_string(),
            url: "http://127.0.0.1:9/cwf".to_string(),
            aliases: vec!["GMZ042>044".to_string()],
        }
    }

    #[test]
    fn test_strip_html() {
        let text = strip_html("<pre class=\"x\">A &amp; B &lt;C&gt;</pre>");
        assert_eq!(text, "A & B <C>");
    }

    #[test]
    fn test_zone_block_via_alias() {
        let bulletin = from_product(&keys(), PRODUCT, Local::now()).unwrap();
        assert_eq!(bulletin.zone, "GMZ044");
        assert!(bulletin.text.starts_with("Hawk Channel"));
        assert!(bulletin.text.contains(".TONIGHT...East winds 10 to 15 knots."));
        assert!(!bulletin.text.contains("$$"));
        assert!(!bulletin.text.contains("Synopsis"));
    }

    #[test]
    fn test_zone_not_found() {
        let mut zone = keys();
        zone.id = "AMZ651".to_string();
        zone.aliases.clear();
        assert!(matches!(
            from_product(&zone, PRODUCT, Local::now()),
            Err(FetchError::ZoneNotFound(id)) if id == "AMZ651"
        ));
    }

    #[test]
    fn test_empty_product() {
        assert!(matches!(
            from_product(&keys(), "<html></html>", Local::now()),
            Err(FetchError::Empty)
        ));
    }

    #[test]
    fn test_zone_block_runs_to_end_without_terminator() {
        let text = "AMZ651-182315-\nCoastal waters\n.TODAY...N winds 10 kt.";
        assert_eq!(
            zone_block(text, "AMZ651", &[]),
            Some("Coastal waters\n.TODAY...N winds 10 kt.".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_http_error() {
        let client = http_client(&HttpConfig {
            user_agent: "test".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let result = fetch(&client, &keys()).await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }
}
