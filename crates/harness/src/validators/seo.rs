//! SEO validation of an HTML page

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use tracing::warn;

use siteeval_common::{check_pass_rate, Category, Failure, Outcome, TestCase};

use crate::client::SiteClient;
use crate::evaluators::Evaluator;

/// SEO checks a test case can switch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeoCheck {
    HasTitle,
    HasMetaDescription,
    HasOgTags,
    HasCharset,
    HasViewport,
    HasSingleH1,
    ProperHeadingHierarchy,
    AllImagesHaveAlt,
    HasOrganizationSchema,
    HasWebsiteSchema,
    MobileFriendly,
}

impl SeoCheck {
    pub fn from_name(name: &str) -> Option<Self> {
        let check = match name {
            "has_title" => SeoCheck::HasTitle,
            "has_meta_description" => SeoCheck::HasMetaDescription,
            "has_og_tags" => SeoCheck::HasOgTags,
            "has_charset" => SeoCheck::HasCharset,
            "has_viewport" => SeoCheck::HasViewport,
            "has_single_h1" => SeoCheck::HasSingleH1,
            "proper_heading_hierarchy" => SeoCheck::ProperHeadingHierarchy,
            "all_images_have_alt" => SeoCheck::AllImagesHaveAlt,
            "has_organization_schema" => SeoCheck::HasOrganizationSchema,
            "has_website_schema" => SeoCheck::HasWebsiteSchema,
            "mobile_friendly" => SeoCheck::MobileFriendly,
            _ => return None,
        };
        Some(check)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeoCheck::HasTitle => "has_title",
            SeoCheck::HasMetaDescription => "has_meta_description",
            SeoCheck::HasOgTags => "has_og_tags",
            SeoCheck::HasCharset => "has_charset",
            SeoCheck::HasViewport => "has_viewport",
            SeoCheck::HasSingleH1 => "has_single_h1",
            SeoCheck::ProperHeadingHierarchy => "proper_heading_hierarchy",
            SeoCheck::AllImagesHaveAlt => "all_images_have_alt",
            SeoCheck::HasOrganizationSchema => "has_organization_schema",
            SeoCheck::HasWebsiteSchema => "has_website_schema",
            SeoCheck::MobileFriendly => "mobile_friendly",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeoParams {
    pub endpoint: String,
    /// Checks to run; only those switched on in the test case
    pub checks: Vec<SeoCheck>,
}

impl From<&TestCase> for SeoParams {
    fn from(case: &TestCase) -> Self {
        let mut checks = Vec::new();
        for (name, enabled) in &case.seo_checks {
            if !enabled {
                continue;
            }
            match SeoCheck::from_name(name) {
                Some(check) => checks.push(check),
                None => warn!("Ignoring unknown SEO check '{}' in {}", name, case.id),
            }
        }
        Self {
            endpoint: case.endpoint.clone(),
            checks,
        }
    }
}

pub struct SeoValidator {
    client: SiteClient,
}

impl SeoValidator {
    pub fn new(client: SiteClient) -> Self {
        Self { client }
    }

    pub async fn check(&self, params: &SeoParams) -> Outcome {
        let response = match self.client.get(&params.endpoint).await {
            Ok(response) => response,
            Err(failure) => return Outcome::failed(failure),
        };

        if response.status != 200 {
            return Outcome::failed(Failure::http_status(response.status))
                .with_detail("url", response.url)
                .with_detail("status", response.status);
        }

        audit_html(&response.body, &params.checks)
            .with_detail("url", response.url)
            .with_detail("status", response.status)
    }
}

#[async_trait]
impl Evaluator for SeoValidator {
    fn category(&self) -> Category {
        Category::SeoValidation
    }

    async fn evaluate(&self, case: &TestCase) -> Outcome {
        self.check(&SeoParams::from(case)).await
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Parse `html` once and run the requested checks against it.
///
/// Score is the share of checks passed, 1.0 when none were requested.
pub fn audit_html(html: &str, requested: &[SeoCheck]) -> Outcome {
    let doc = Html::parse_document(html);
    let exists = |css: &str| doc.select(&selector(css)).next().is_some();

    let mut checks: BTreeMap<String, bool> = BTreeMap::new();
    let mut details: BTreeMap<String, serde_json::Value> = BTreeMap::new();

    for check in requested {
        let passed = match check {
            SeoCheck::HasTitle => doc
                .select(&selector("title"))
                .next()
                .map(|title| !text_of(title).is_empty())
                .unwrap_or(false),
            SeoCheck::HasMetaDescription => exists(r#"meta[name="description"]"#),
            SeoCheck::HasOgTags => {
                exists(r#"meta[property="og:title"]"#)
                    && exists(r#"meta[property="og:description"]"#)
                    && exists(r#"meta[property="og:image"]"#)
            }
            SeoCheck::HasCharset => exists("meta[charset]"),
            SeoCheck::HasViewport => exists(r#"meta[name="viewport"]"#),
            SeoCheck::HasSingleH1 => {
                let h1_count = doc.select(&selector("h1")).count();
                details.insert("h1_count".to_string(), h1_count.into());
                h1_count == 1
            }
            SeoCheck::ProperHeadingHierarchy => doc
                .select(&selector("h1, h2, h3, h4, h5, h6"))
                .next()
                .map(|first| first.value().name() == "h1")
                .unwrap_or(false),
            SeoCheck::AllImagesHaveAlt => {
                let images: Vec<_> = doc.select(&selector("img")).collect();
                let with_alt = images
                    .iter()
                    .filter(|img| img.value().attr("alt").map(|alt| !alt.is_empty()).unwrap_or(false))
                    .count();
                let coverage = if images.is_empty() {
                    1.0
                } else {
                    with_alt as f64 / images.len() as f64
                };
                details.insert("image_alt_coverage".to_string(), coverage.into());
                with_alt == images.len()
            }
            SeoCheck::HasOrganizationSchema => ld_json_mentions(&doc, "Organization"),
            SeoCheck::HasWebsiteSchema => ld_json_mentions(&doc, "Website"),
            SeoCheck::MobileFriendly => doc
                .select(&selector(r#"meta[name="viewport"]"#))
                .next()
                .and_then(|viewport| viewport.value().attr("content"))
                .map(|content| content.contains("width=device-width"))
                .unwrap_or(false),
        };
        checks.insert(check.name().to_string(), passed);
    }

    let passed_checks = checks.values().filter(|v| **v).count();
    let total_checks = checks.len();
    let pass_rate = check_pass_rate(&checks);
    details.insert("passed_checks".to_string(), passed_checks.into());
    details.insert("total_checks".to_string(), total_checks.into());
    details.insert("pass_rate".to_string(), pass_rate.into());

    Outcome::from_checks(checks, details)
}

fn ld_json_mentions(doc: &Html, needle: &str) -> bool {
    doc.select(&selector(r#"script[type="application/ld+json"]"#))
        .any(|script| text_of(script).contains(needle))
}
