// Host authorization oracle.
//
// A link whose host matches the configured base URL or the allow-list is
// trusted and never escaped. URI parse failures fail closed: an unparseable
// candidate is treated as unauthorized.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static HTTP_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>`"'(),]+"#).expect("http url regex")
});

pub(crate) struct HostAuthorizer {
    base_host: Option<String>,
    allowed_hosts: Vec<String>,
}

impl HostAuthorizer {
    pub fn new(base_url: Option<&str>, allowed_hosts: &[String]) -> Self {
        let base_host = base_url
            .and_then(|raw| Url::parse(raw).ok())
            .and_then(|url| url.host_str().map(str::to_owned));
        Self {
            base_host,
            allowed_hosts: allowed_hosts.to_vec(),
        }
    }

    /// Whether `text` contains an http(s) URL with an authorized host.
    pub fn url_authorized(&self, text: &str) -> bool {
        HTTP_URL
            .find_iter(text)
            .any(|m| self.host_allowed(m.as_str()))
    }

    fn host_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }
        match parsed.host_str() {
            Some(host) => {
                self.base_host.as_deref() == Some(host)
                    || self.allowed_hosts.iter().any(|allowed| allowed == host)
            }
            None => false,
        }
    }
}
