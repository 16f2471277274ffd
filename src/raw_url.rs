use regex::Regex;
use std::sync::OnceLock;

/// Rewrites a hosted "raw view" URL (`https://github.com/<owner>/<repo>/raw/<ref>/<path>`)
/// to the redirect-free content URL (`https://raw.githubusercontent.com/<owner>/<repo>/<ref>/<path>`).
/// Anything else is returned unchanged.
pub fn normalize_raw_url(url: &str) -> String {
    static RE_RAW_VIEW: OnceLock<Regex> = OnceLock::new();
    let re = RE_RAW_VIEW.get_or_init(|| {
        Regex::new(r"^https://([A-Za-z0-9-]+)\.com/([^/?#]+)/([^/?#]+)/raw/([^/?#]+)/(.+)$")
            .expect("valid raw view regex")
    });
    re.replace(url, "https://raw.${1}usercontent.com/$2/$3/$4/$5")
        .into_owned()
}
