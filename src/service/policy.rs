//! Policy page loading and HTML-to-text extraction.
//!
//! The policy page is fetched exactly once, before the chat listener starts.  A failed
//! fetch is not fatal: the bot keeps running with an empty policy and simply loses
//! its context.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::base::{
    config::Config,
    types::{PolicyText, Res},
};

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("script pattern is valid"));
static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("style pattern is valid"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));
static STRUCTURED_DATA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?s)\{"@context":.*?\}\s*"#).expect("structured data pattern is valid"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Fetch the configured policy page and turn it into the process-wide snapshot.
///
/// Never fails; on any error the empty snapshot is returned and the error is logged.
#[instrument(skip_all, fields(url = %config.policy_url))]
pub async fn load_policy(config: &Config) -> PolicyText {
    match fetch_policy(&config.policy_url, &config.policy_marker).await {
        Ok(policy) => {
            info!("Loaded policy text ({} chars).", policy.len());
            policy
        }
        Err(err) => {
            error!("Error loading policy: {err:#}");
            PolicyText::empty()
        }
    }
}

/// Fetch a policy page and extract its text.
pub async fn fetch_policy(url: &str, marker: &str) -> Res<PolicyText> {
    let html = reqwest::get(url).await?.error_for_status()?.text().await?;

    Ok(PolicyText::new(extract_policy_text(&html, marker)))
}

/// Reduce an HTML document to single-spaced plain text starting at `marker`.
///
/// If `marker` does not occur in the cleaned text, the whole cleaned text is returned.
pub fn extract_policy_text(html: &str, marker: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, " ");
    let text = STRUCTURED_DATA_RE.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = text.trim();

    match text.find(marker) {
        Some(idx) => text[idx..].to_string(),
        None => {
            warn!("Policy marker `{marker}` not found; keeping the full page text.");
            text.to_string()
        }
    }
}

/// Decode the entities that commonly show up in prose.
///
/// `&lt;` and `&gt;` are left alone so decoding can never reintroduce markup.
/// `&amp;` goes last so `&amp;nbsp;` stays literal.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const MARKER: &str = "Policy brief & purpose";

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Company holiday policy</title>
  <STYLE type="text/css">
    body { color: red; }
  </STYLE>
  <script>
    window.tracking = "<b>not policy</b>";
  </script>
</head>
<body>
  <nav>Home | Templates</nav>
  <h2>Policy brief &amp; purpose</h2>
  <p>Our   company holiday policy
     explains how we   observe holidays.</p>
  <Script type="text/javascript">var x = 1;</Script>
  <ul><li>New Year&#39;s Day</li><li>Labor&nbsp;Day</li></ul>
</body>
</html>"#;

    #[test]
    fn strips_scripts_styles_and_tags() {
        let text = extract_policy_text(PAGE, MARKER);

        assert!(!text.contains('<'));
        assert!(!text.contains('>'));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("not policy"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("var x"));
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        let text = extract_policy_text("  <p>one \n\t two</p>\n\n<p>three</p>   ", MARKER);

        assert_eq!(text, "one two three");
    }

    #[test]
    fn no_whitespace_runs_remain() {
        let text = extract_policy_text(PAGE, MARKER);

        assert!(!text.contains("  "));
        assert_eq!(text, text.trim());
        assert!(!text.chars().zip(text.chars().skip(1)).any(|(a, b)| a.is_whitespace() && b.is_whitespace()));
    }

    #[test]
    fn starts_at_marker_when_present() {
        let text = extract_policy_text(PAGE, MARKER);

        assert!(text.starts_with(MARKER));
        assert!(!text.contains("Templates"));
        assert!(text.contains("New Year's Day Labor Day"));
    }

    #[test]
    fn keeps_full_text_without_marker() {
        let text = extract_policy_text("<h1>Holidays</h1><p>We close on Fridays.</p>", MARKER);

        assert_eq!(text, "Holidays We close on Fridays.");
    }

    #[test]
    fn removes_structured_data_blocks() {
        let html = r#"<div>{"@context":"https://schema.org","@type":"Article"} Before</div><p>Policy brief &amp; purpose Rest</p>"#;

        let text = extract_policy_text(html, MARKER);

        assert_eq!(text, "Policy brief & purpose Rest");
    }

    #[test]
    fn escaped_markup_is_not_decoded_into_tags() {
        let text = extract_policy_text("<p>Use &lt;b&gt; for bold</p>", MARKER);

        assert_eq!(text, "Use &lt;b&gt; for bold");
    }

    #[tokio::test]
    async fn fetches_and_extracts_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/company-holiday-policy"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/company-holiday-policy", server.uri());
        let policy = fetch_policy(&url, MARKER).await.unwrap();

        assert!(policy.starts_with(MARKER));
    }

    #[tokio::test]
    async fn load_degrades_to_empty_on_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET")).respond_with(ResponseTemplate::new(404)).mount(&server).await;

        let config = Config {
            inner: std::sync::Arc::new(crate::base::config::ConfigInner {
                policy_url: format!("{}/missing", server.uri()),
                ..Default::default()
            }),
        };

        let policy = load_policy(&config).await;

        assert!(policy.is_empty());
    }

    #[tokio::test]
    async fn load_degrades_to_empty_when_unreachable() {
        let config = Config {
            inner: std::sync::Arc::new(crate::base::config::ConfigInner {
                policy_url: "http://127.0.0.1:9/unreachable".to_string(),
                ..Default::default()
            }),
        };

        let policy = load_policy(&config).await;

        assert_eq!(policy, PolicyText::empty());
    }
}
