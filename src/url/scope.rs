use crate::UrlError;
use url::Url;

/// The set of hosts considered "the same site" as a seed URL
///
/// A host is in scope when, ignoring a leading `www.`, it equals the seed's
/// host or is one of its subdomains. Scheme and port are not compared.
///
/// ```
/// use gleaner::url::SiteScope;
/// use url::Url;
///
/// let scope = SiteScope::for_url(&Url::parse("https://www.a.example/page").unwrap()).unwrap();
/// assert!(scope.contains(&Url::parse("https://a.example/y").unwrap()));
/// assert!(scope.contains(&Url::parse("http://blog.a.example/").unwrap()));
/// assert!(!scope.contains(&Url::parse("https://b.example/x").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    domain: String,
}

impl SiteScope {
    /// Builds the scope of the site `url` belongs to
    pub fn for_url(url: &Url) -> Result<Self, UrlError> {
        let domain = site_domain(url).ok_or(UrlError::MissingDomain)?;
        Ok(Self { domain })
    }

    /// The bare domain this scope matches (without `www.`)
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns true if `url` is an http(s) URL on this site
    pub fn contains(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match site_domain(url) {
            Some(host) => {
                host == self.domain
                    || host
                        .strip_suffix(self.domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
            None => false,
        }
    }
}

/// Lowercase host of `url` with a leading `www.` removed
pub fn site_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    if host.is_empty() {
        return None;
    }
    Some(match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    })
}
