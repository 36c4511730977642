//! Details page rendering and publishing.
//!
//! The updated event details live as a markdown-ish document; this renders
//! it into the site's HTML template and optionally publishes the result to
//! the site bucket with a CDN invalidation. Supported markup: `###`
//! sections, `##` subsections, `-`/`*` bullets, inline `**bold**` and
//! `[text](url)`, and `IMG <alt>` directives that reuse images already in
//! the template.

use std::collections::HashMap;
use std::sync::OnceLock;

use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_sdk_cloudfront::Client as CloudFrontClient;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use regex::Regex;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Marker in the template after which generated content is inserted.
const CONTENT_MARKER: &str = "<!-- details-content -->";

/// Object key of the published page.
const PAGE_KEY: &str = "details.html";

struct Markup {
    section: Regex,
    subsection: Regex,
    img_directive: Regex,
    img_tag: Regex,
    bold: Regex,
    link: Regex,
}

fn markup() -> &'static Markup {
    static MARKUP: OnceLock<Markup> = OnceLock::new();
    MARKUP.get_or_init(|| Markup {
        section: Regex::new(r"^###\s+(.+?)(?:\s+###)?$").expect("valid regex"),
        subsection: Regex::new(r"^##\s+(.+?)(?:\s+##)?$").expect("valid regex"),
        img_directive: Regex::new(r"^IMG\s+(.+)$").expect("valid regex"),
        img_tag: Regex::new(r#"<img\s+src="([^"]+)"[^>]*?alt="([^"]+)"[^>]*>"#)
            .expect("valid regex"),
        bold: Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"),
        link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"),
    })
}

/// Render the details document into the page template.
///
/// The template keeps everything up to the content marker and everything
/// from its body close tag on; the document renders in between.
pub fn render_details_page(template: &str, doc: &str) -> Result<String> {
    let marker_at = template
        .find(CONTENT_MARKER)
        .ok_or_else(|| Error::Internal("content marker not found in template".to_string()))?;
    let body_end = template
        .find("</body>")
        .ok_or_else(|| Error::Internal("body close tag not found in template".to_string()))?;

    let head = &template[..marker_at + CONTENT_MARKER.len()];
    let footer = &template[body_end..];
    let images = image_map(template);
    let content = render_content(doc, &images);

    Ok(format!("{}\n{}{}", head, content, footer))
}

/// Map of alt text (lower-cased) to the full `<img>` tag in the template.
fn image_map(template: &str) -> HashMap<String, String> {
    markup()
        .img_tag
        .captures_iter(template)
        .map(|caps| (caps[2].to_lowercase(), caps[0].to_string()))
        .collect()
}

fn render_content(doc: &str, images: &HashMap<String, String>) -> String {
    let markup = markup();
    let mut html = String::new();
    let mut in_list = false;

    for line in doc.lines() {
        let line = line.trim();
        if line.is_empty() {
            close_list(&mut html, &mut in_list);
            continue;
        }

        if let Some(caps) = markup.img_directive.captures(line) {
            let alt = caps[1].trim().to_lowercase();
            match images.get(&alt) {
                Some(tag) => {
                    html.push_str(tag);
                    html.push('\n');
                }
                None => warn!(alt = %alt, "Image not found in template"),
            }
            continue;
        }

        if let Some(caps) = markup.section.captures(line) {
            close_list(&mut html, &mut in_list);
            let name = caps[1].trim();
            let id = name.to_lowercase().replace(' ', "-").replace('&', "and");
            html.push_str(&format!("<h2 id=\"{}\">{}</h2>\n", id, escape_html(name)));
            continue;
        }

        if let Some(caps) = markup.subsection.captures(line) {
            close_list(&mut html, &mut in_list);
            html.push_str(&format!("<h3>{}</h3>\n", escape_html(caps[1].trim())));
            continue;
        }

        if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            if !in_list {
                html.push_str("<ul>\n");
                in_list = true;
            }
            html.push_str(&format!("<li>{}</li>\n", render_inline(item.trim())));
            continue;
        }

        close_list(&mut html, &mut in_list);
        html.push_str(&format!("<p>{}</p>\n", render_inline(line)));
    }

    close_list(&mut html, &mut in_list);
    html
}

fn close_list(html: &mut String, in_list: &mut bool) {
    if *in_list {
        html.push_str("</ul>\n");
        *in_list = false;
    }
}

/// Escape first, then convert `**bold**` and `[text](url)` spans.
fn render_inline(text: &str) -> String {
    let markup = markup();
    let escaped = escape_html(text);
    let bolded = markup.bold.replace_all(&escaped, "<strong>$1</strong>");
    markup
        .link
        .replace_all(&bolded, r#"<a href="$2">$1</a>"#)
        .into_owned()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Publishes the rendered page to the site bucket and invalidates its CDN
/// path.
pub struct SiteDeployer {
    s3: S3Client,
    cloudfront: CloudFrontClient,
    bucket: String,
    distribution_id: Option<String>,
}

impl SiteDeployer {
    pub fn new(
        s3: S3Client,
        cloudfront: CloudFrontClient,
        bucket: impl Into<String>,
        distribution_id: Option<String>,
    ) -> Self {
        Self {
            s3,
            cloudfront,
            bucket: bucket.into(),
            distribution_id,
        }
    }

    /// Upload the page and invalidate its CDN path.
    pub async fn publish(&self, html: &str) -> Result<()> {
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(PAGE_KEY)
            .content_type("text/html; charset=utf-8")
            .body(ByteStream::from(html.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to upload details page: {}", e)))?;

        if let Some(distribution_id) = &self.distribution_id {
            let paths = Paths::builder()
                .quantity(1)
                .items(format!("/{}", PAGE_KEY))
                .build()
                .map_err(|e| Error::Aws(format!("Failed to build invalidation paths: {}", e)))?;
            let batch = InvalidationBatch::builder()
                .paths(paths)
                .caller_reference(Uuid::new_v4().to_string())
                .build()
                .map_err(|e| Error::Aws(format!("Failed to build invalidation batch: {}", e)))?;
            self.cloudfront
                .create_invalidation()
                .distribution_id(distribution_id)
                .invalidation_batch(batch)
                .send()
                .await
                .map_err(|e| Error::Aws(format!("Failed to invalidate CDN path: {}", e)))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<html><head><title>Details</title></head>\n<body class=\"prose\">\n<img src=\"/img/site-map.png\" alt=\"Site Map\">\n<!-- details-content -->\n</body></html>";

    #[test]
    fn renders_sections_bullets_and_paragraphs() {
        let doc = "### Getting There\nDrive north.\n- Bring **warm** clothes\n- See [the map](https://example.com/map)\n\n## Parking\nPark in the field.";
        let html = render_details_page(TEMPLATE, doc).expect("renders");

        assert!(html.contains(r#"<h2 id="getting-there">Getting There</h2>"#));
        assert!(html.contains("<p>Drive north.</p>"));
        assert!(html.contains("<li>Bring <strong>warm</strong> clothes</li>"));
        assert!(html.contains(r#"<a href="https://example.com/map">the map</a>"#));
        assert!(html.contains("</ul>"));
        assert!(html.contains("<h3>Parking</h3>"));
        assert!(html.contains("<p>Park in the field.</p>"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn img_directive_reuses_template_image() {
        let doc = "IMG site map\nSee you there.";
        let html = render_details_page(TEMPLATE, doc).expect("renders");
        assert!(html.contains(r#"<img src="/img/site-map.png" alt="Site Map">"#));
    }

    #[test]
    fn unknown_img_directive_is_dropped() {
        let doc = "IMG no such image";
        let html = render_details_page(TEMPLATE, doc).expect("renders");
        assert!(!html.contains("no such image"));
    }

    #[test]
    fn escapes_html_in_content() {
        let doc = "Tickets <$20 & free hugs";
        let html = render_details_page(TEMPLATE, doc).expect("renders");
        assert!(html.contains("<p>Tickets &lt;$20 &amp; free hugs</p>"));
    }

    #[test]
    fn section_ids_normalize_spaces_and_ampersands() {
        let doc = "### Food & Drink";
        let html = render_details_page(TEMPLATE, doc).expect("renders");
        assert!(html.contains(r#"<h2 id="food-and-drink">"#));
    }

    #[test]
    fn template_without_marker_is_an_error() {
        assert!(render_details_page("<html><body></body></html>", "text").is_err());
    }
}
