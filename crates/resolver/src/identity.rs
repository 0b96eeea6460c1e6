//! Request identity extraction
//!
//! Splits the request hostname and path into the candidate `short`,
//! `tenant`, and `cloud` tokens. This is a fixed positional heuristic,
//! not a general URL grammar: at most one hostname label is meaningful
//! as a short, and at most three path segments carry identity.

/// Identity tokens extracted from a single request, all lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestIdentity {
    pub short: Option<String>,
    pub tenant: Option<String>,
    pub cloud: Option<String>,
}

impl RequestIdentity {
    /// Extract identity tokens from a host header value and a URI path.
    ///
    /// A host with more than two labels carries the short as its leading
    /// label (`go.nav.ms/contoso.com/gcc`); otherwise the first three
    /// path segments are `short`, `tenant`, `cloud` in order
    /// (`nav.ms/go/contoso.com/gcc`).
    pub fn from_parts(host: &str, path: &str) -> Self {
        let host = normalize_host(host);
        let path = path.trim_start_matches('/');

        let host_labels: Vec<&str> = host.split('.').collect();
        let mut segments = path.split('/').map(normalize_segment);

        if host_labels.len() > 2 {
            Self {
                short: normalize_segment(host_labels[0]),
                tenant: segments.next().flatten(),
                cloud: segments.next().flatten(),
            }
        } else {
            Self {
                short: segments.next().flatten(),
                tenant: segments.next().flatten(),
                cloud: segments.next().flatten(),
            }
        }
    }
}

/// Normalize a host header value: drop the port, lowercase.
fn normalize_host(host: &str) -> String {
    let host = host.split(':').next().unwrap_or(host);
    host.to_lowercase()
}

/// Lowercase a token, treating the empty string as absent.
fn normalize_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(short: &str, tenant: &str, cloud: &str) -> RequestIdentity {
        let opt = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        RequestIdentity {
            short: opt(short),
            tenant: opt(tenant),
            cloud: opt(cloud),
        }
    }

    #[test]
    fn test_bare_domain_uses_path_segments() {
        assert_eq!(
            RequestIdentity::from_parts("nav.ms", "/go/contoso.com/gcc"),
            identity("go", "contoso.com", "gcc")
        );
    }

    #[test]
    fn test_subdomain_short_comes_from_host() {
        assert_eq!(
            RequestIdentity::from_parts("go.nav.ms", "/contoso.com/gcc"),
            identity("go", "contoso.com", "gcc")
        );
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            RequestIdentity::from_parts("nav.ms", "/go"),
            identity("go", "", "")
        );
        assert_eq!(
            RequestIdentity::from_parts("nav.ms", "/go/contoso.com"),
            identity("go", "contoso.com", "")
        );
        assert_eq!(
            RequestIdentity::from_parts("go.nav.ms", "/"),
            identity("go", "", "")
        );
    }

    #[test]
    fn test_empty_path_bare_domain() {
        assert_eq!(RequestIdentity::from_parts("nav.ms", "/"), identity("", "", ""));
        assert_eq!(RequestIdentity::from_parts("nav.ms", ""), identity("", "", ""));
    }

    #[test]
    fn test_tokens_are_lowercased() {
        assert_eq!(
            RequestIdentity::from_parts("GO.Nav.MS", "/Contoso.COM/GCC"),
            identity("go", "contoso.com", "gcc")
        );
        assert_eq!(
            RequestIdentity::from_parts("nav.ms", "/GO/Contoso.COM/GCC"),
            identity("go", "contoso.com", "gcc")
        );
    }

    #[test]
    fn test_host_port_is_ignored() {
        assert_eq!(
            RequestIdentity::from_parts("nav.ms:8080", "/go"),
            identity("go", "", "")
        );
        // Port does not add a host label
        assert_eq!(
            RequestIdentity::from_parts("localhost:3000", "/go/contoso.com"),
            identity("go", "contoso.com", "")
        );
    }

    #[test]
    fn test_empty_middle_segment_is_absent() {
        assert_eq!(
            RequestIdentity::from_parts("nav.ms", "/go//gcc"),
            identity("go", "", "gcc")
        );
    }

    #[test]
    fn test_leading_slashes_stripped() {
        assert_eq!(
            RequestIdentity::from_parts("nav.ms", "///go/contoso.com"),
            identity("go", "contoso.com", "")
        );
    }

    #[test]
    fn test_extra_segments_ignored() {
        assert_eq!(
            RequestIdentity::from_parts("nav.ms", "/go/contoso.com/gcc/extra/stuff"),
            identity("go", "contoso.com", "gcc")
        );
    }
}
