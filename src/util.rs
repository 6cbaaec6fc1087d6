const MAIL_API_KEY: &str = "SENDGRID_API_KEY";

pub fn get_mail_api_key() -> Option<String> {
    let key_from_env = std::env::var(MAIL_API_KEY);
    key_from_env.ok()
}

/// Canonical form of a target URL: trimmed, lower-cased, no trailing
/// slashes, scheme defaulted to `http://`. Uniqueness checks compare
/// this form, so `"Example.com/"` and `"http://example.com"` collide.
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim().to_lowercase();
    let url = url.trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}
