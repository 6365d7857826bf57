use url::{form_urlencoded, Url};

/// A search engine query that surfaces employer reviews on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewPlatform {
    pub id: &'static str,
    pub title: &'static str,
    site: &'static str,
}

pub static REVIEW_PLATFORMS: [ReviewPlatform; 4] = [
    ReviewPlatform {
        id: "jobstreet",
        title: "Review from JobStreet",
        site: "my.jobstreet.com",
    },
    ReviewPlatform {
        id: "indeed",
        title: "Review from Indeed",
        site: "malaysia.indeed.com",
    },
    ReviewPlatform {
        id: "glassdoor",
        title: "Review from Glassdoor",
        site: "glassdoor.com",
    },
    ReviewPlatform {
        id: "gmb",
        title: "Review from Google My Business",
        site: "business.google.com",
    },
];

const SEARCH_BASE: &str = "https://www.google.com/search";

/// Domains (and their subdomains) on which review lookups are offered.
const REVIEW_DOMAINS: [&str; 2] = ["jobstreet.com", "jobstreet.com.my"];

impl ReviewPlatform {
    /// Search URL for reviews of `company` on this platform.
    pub fn search_url(&self, company: &str) -> String {
        let query = format!("site:{} \"{}\" \"review\"", self.site, company.trim());
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{SEARCH_BASE}?q={encoded}")
    }
}

pub fn find_platform(id: &str) -> Option<&'static ReviewPlatform> {
    REVIEW_PLATFORMS
        .iter()
        .find(|platform| platform.id.eq_ignore_ascii_case(id))
}

/// Whether review lookups apply to a document at `url`.
pub fn offers_review_lookup(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    REVIEW_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}
