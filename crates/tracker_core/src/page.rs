use url::Url;

/// Host of the only supported job-listing site.
pub const SUPPORTED_HOST: &str = "my.jobstreet.com";

/// Whether the track affordance may be offered on `url` at all.
///
/// Only `https://my.jobstreet.com/...` pages qualify; whether the page is a
/// job detail view is decided separately from its content.
pub fn is_trackable_url(url: &str) -> bool {
    match Url::parse(url.trim()) {
        Ok(parsed) => {
            parsed.scheme() == "https"
                && parsed
                    .host_str()
                    .is_some_and(|host| host.eq_ignore_ascii_case(SUPPORTED_HOST))
        }
        Err(_) => false,
    }
}
