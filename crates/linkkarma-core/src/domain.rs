//! Domain heuristics shared by the extractor and the security verifier.

use url::Url;

/// Parse an absolute http(s) URL.
pub fn parse_http_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

/// Hostname, lower-cased, without a leading `www.`.
pub fn extract_domain(raw: &str) -> Option<String> {
    let url = parse_http_url(raw)?;
    let host = url.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Heuristic service name: first DNS label, capitalized.
///
/// `nubank.com.br` -> `Nubank`, `app.picpay.com` -> `App`.
pub fn service_name(domain: &str) -> String {
    let label = domain.split('.').next().unwrap_or_default();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// True when `domain` equals `root` or is a subdomain of it.
pub fn domain_matches(domain: &str, root: &str) -> bool {
    domain == root
        || domain
            .strip_suffix(root)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
