use std::sync::LazyLock;
use std::time::Duration;

use regex::{Regex, RegexSet};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::Result;

/// Meta tags that carry a preview image, highest priority first.
const IMAGE_META_TIERS: &[(&str, &str)] = &[
    (
        "og:image",
        r#"(?i)<meta[^>]*property=["']og:image["'][^>]*content=["']([^"']+)["']"#,
    ),
    (
        "og:image (content first)",
        r#"(?i)<meta[^>]*content=["']([^"']+)["'][^>]*property=["']og:image["']"#,
    ),
    (
        "twitter:image",
        r#"(?i)<meta[^>]*name=["']twitter:image["'][^>]*content=["']([^"']+)["']"#,
    ),
];

/// Stock fallback images that say nothing about the page.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    // Sentry blog defaults
    r"(?i)/static/default-[a-f0-9]+\.png$",
    r"(?i)/default-og-image\.",
    r"(?i)/placeholder\.",
    r"(?i)/fallback\.",
];

static TIERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    IMAGE_META_TIERS
        .iter()
        .map(|(name, p)| (*name, Regex::new(p).unwrap()))
        .collect()
});

static PLACEHOLDERS: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(PLACEHOLDER_PATTERNS).unwrap());

pub fn is_placeholder_image(image_url: &str) -> bool {
    PLACEHOLDERS.is_match(image_url)
}

/// Preview image from the first matching meta tier. A placeholder in that
/// tier yields `None`; lower tiers are not consulted.
pub fn extract_image(html: &str) -> Option<String> {
    let (tier, image) = TIERS
        .iter()
        .find_map(|(name, re)| re.captures(html).map(|c| (*name, c[1].to_string())))?;

    if is_placeholder_image(&image) {
        debug!("Dropping placeholder {} image {}", tier, image);
        return None;
    }
    Some(image)
}

/// HTTP client for preview-image lookups. Cheap to clone.
#[derive(Clone)]
pub struct OgImageFetcher {
    client: reqwest::Client,
}

impl OgImageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(OgImageFetcher { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        OgImageFetcher { client }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.user_agent, settings.fetch_timeout())
    }

    /// Preview image for `url`. Every failure is logged and becomes `None`.
    pub async fn fetch(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(image) => image,
            Err(e) => {
                warn!("Failed to fetch OG image for {}: {}", url, e);
                None
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> reqwest::Result<Option<String>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Failed to fetch OG image for {}: HTTP {}", url, status);
            return Ok(None);
        }
        let html = response.text().await?;
        Ok(extract_image(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn og_image_beats_twitter_image() {
        let html = fixture("og_and_twitter");
        assert_eq!(
            extract_image(&html).as_deref(),
            Some("https://blog.example.com/images/og-card.png")
        );
    }

    #[test]
    fn content_before_property() {
        let html = r#"<head><meta content='https://x.dev/a.jpg' property='og:image' /></head>"#;
        assert_eq!(extract_image(html).as_deref(), Some("https://x.dev/a.jpg"));
    }

    #[test]
    fn twitter_image_fallback() {
        let html = fixture("twitter_only");
        assert_eq!(
            extract_image(&html).as_deref(),
            Some("https://cdn.example.com/twitter-card.jpg")
        );
    }

    #[test]
    fn case_insensitive_tags() {
        let html = r#"<META PROPERTY="OG:IMAGE" CONTENT="https://x.dev/b.png">"#;
        assert_eq!(extract_image(html).as_deref(), Some("https://x.dev/b.png"));
    }

    #[test]
    fn no_meta_tags() {
        assert_eq!(extract_image("<html><head><title>x</title></head></html>"), None);
    }

    #[test]
    fn og_image_subproperties_do_not_match() {
        let html = r#"<meta property="og:image:width" content="1200">"#;
        assert_eq!(extract_image(html), None);
    }

    #[test]
    fn placeholder_suppresses_result() {
        let html = fixture("placeholder");
        assert_eq!(extract_image(&html), None);
    }

    #[test]
    fn placeholder_patterns() {
        assert!(is_placeholder_image("https://blog.sentry.io/static/default-abc123.png"));
        assert!(is_placeholder_image("https://x.dev/img/DEFAULT-OG-IMAGE.jpg"));
        assert!(is_placeholder_image("https://x.dev/placeholder.png"));
        assert!(is_placeholder_image("https://x.dev/assets/Fallback.webp"));
        assert!(!is_placeholder_image("https://x.dev/static/default-abc123.png?v=2"));
        assert!(!is_placeholder_image("https://x.dev/static/default-xyz.png"));
        assert!(!is_placeholder_image("https://x.dev/images/post-cover.png"));
    }
}
