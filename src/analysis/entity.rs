//! Entity and URL classification
//!
//! Hostname-substring matching against static, ordered association lists.
//! Iteration order is part of the contract: overlapping patterns (for
//! example "google-analytics" vs "google") resolve to whichever entry
//! appears first, and the tables are ordered most-specific first so the
//! result is stable and test-pinned.

use serde::{Deserialize, Serialize};
use url::Url;

/// Hostname-substring patterns mapped to display names, checked in order.
/// Specific services precede their umbrella vendors; the generic "cdn"
/// entry stays last so named CDNs win.
pub const ENTITY_PATTERNS: &[(&str, &str)] = &[
    ("google-analytics", "Google Analytics"),
    ("googletagmanager", "Google Tag Manager"),
    ("doubleclick", "DoubleClick"),
    ("googlesyndication", "Google AdSense"),
    ("gstatic", "Google Static"),
    ("googleapis", "Google APIs"),
    ("youtube", "YouTube"),
    ("google", "Google"),
    ("fbcdn", "Facebook CDN"),
    ("facebook", "Facebook"),
    ("twitter", "Twitter"),
    ("linkedin", "LinkedIn"),
    ("instagram", "Instagram"),
    ("tiktok", "TikTok"),
    ("hotjar", "Hotjar"),
    ("segment", "Segment"),
    ("mixpanel", "Mixpanel"),
    ("amplitude", "Amplitude"),
    ("intercom", "Intercom"),
    ("hubspot", "HubSpot"),
    ("marketo", "Marketo"),
    ("stripe", "Stripe"),
    ("cloudflare", "Cloudflare"),
    ("cloudfront", "CloudFront"),
    ("akamai", "Akamai"),
    ("fastly", "Fastly"),
    ("jsdelivr", "jsDelivr"),
    ("cdnjs", "cdnjs"),
    ("unpkg", "unpkg"),
    ("typekit", "Adobe Fonts"),
    ("fontawesome", "Font Awesome"),
    ("cdn", "CDN"),
];

/// Functional category of a third-party entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThirdPartyCategory {
    Analytics,
    Social,
    Advertising,
    Cdn,
    Fonts,
    LeadTracking,
    Other,
}

/// Name-substring keyword lists, checked in this category order. The
/// order is load-bearing: "ad" matches inside words like "LeadID", so a
/// lead-tracking vendor whose name contains "ad" classifies as
/// advertising. That misclassification is a documented compatibility
/// behavior, not a bug to fix.
const CATEGORY_KEYWORDS: &[(ThirdPartyCategory, &[&str])] = &[
    (
        ThirdPartyCategory::Analytics,
        &["analytics", "tag manager", "gtm", "segment", "mixpanel", "amplitude", "hotjar", "heap"],
    ),
    (
        ThirdPartyCategory::Social,
        &["facebook", "twitter", "linkedin", "instagram", "pinterest", "tiktok", "social"],
    ),
    (
        ThirdPartyCategory::Advertising,
        &["ad", "doubleclick", "criteo", "taboola", "outbrain"],
    ),
    (
        ThirdPartyCategory::Cdn,
        &["cdn", "cloudflare", "cloudfront", "fastly", "akamai", "jsdelivr", "unpkg"],
    ),
    (ThirdPartyCategory::Fonts, &["font", "typekit"]),
    (ThirdPartyCategory::LeadTracking, &["lead", "marketo", "pardot", "hubspot"]),
];

/// Hostname of a URL, or an empty string when it cannot be parsed.
pub fn host_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Whether a resource URL belongs to the analyzed site itself.
///
/// Subdomains count as first-party: `api.example.com` matches the host
/// domain `example.com` via the substring check.
pub fn is_first_party(url: &str, host_domain: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(hostname) => hostname == host_domain || hostname.contains(host_domain),
            None => false,
        },
        Err(_) => false,
    }
}

/// Resolve a recognizable entity name from a resource URL.
///
/// Returns `None` for unrecognized hosts and for URLs that fail to parse.
pub fn extract_entity_from_url(url: &str) -> Option<&'static str> {
    let parsed = Url::parse(url).ok()?;
    let hostname = parsed.host_str()?;
    ENTITY_PATTERNS
        .iter()
        .find(|(pattern, _)| hostname.contains(pattern))
        .map(|(_, name)| *name)
}

/// Categorize a third-party entity by name-substring membership.
pub fn categorize_third_party(entity_name: &str) -> ThirdPartyCategory {
    let name = entity_name.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| name.contains(keyword)) {
            return *category;
        }
    }
    ThirdPartyCategory::Other
}
