//! The redirect handler
//!
//! One handler serves every request. Whatever happens inside
//! resolution, the caller gets a 302: either the resolved target or the
//! project page, annotated with a reason code when resolution failed.

use axum::extract::{Host, State};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use navms_resolver::RequestIdentity;

use crate::state::AppState;

/// Resolve a request into a 302.
pub async fn resolve_redirect(
    State(state): State<AppState>,
    Host(host): Host,
    uri: Uri,
) -> Response {
    let identity = RequestIdentity::from_parts(&host, uri.path());

    // A bare host with an empty path is not a lookup attempt at all;
    // a subdomain host still carries its short with an empty path.
    if identity.short.is_none() && uri.path().trim_start_matches('/').is_empty() {
        return found(&state.fallback_url, &state.fallback_url);
    }

    tracing::debug!(
        host = %host,
        short = identity.short.as_deref().unwrap_or("-"),
        tenant = identity.tenant.as_deref().unwrap_or("-"),
        cloud = identity.cloud.as_deref().unwrap_or("-"),
        "resolving request"
    );

    match state.resolver.resolve(&identity).await {
        Ok(target) => found(&target, &state.fallback_url),
        Err(err) => {
            tracing::info!(host = %host, path = %uri.path(), error = %err, "resolution failed");
            let location = with_reason(&state.fallback_url, err.reason_code());
            found(&location, &state.fallback_url)
        }
    }
}

/// Append the failure reason as a `msg` query parameter.
fn with_reason(fallback_url: &str, reason: &str) -> String {
    let separator = if fallback_url.contains('?') { '&' } else { '?' };
    format!("{fallback_url}{separator}msg={reason}")
}

/// Build a 302 Found. A location that is not a valid header value (a
/// raw table entry could smuggle one in) degrades to the fallback page.
fn found(location: &str, fallback_url: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(location) {
        return (StatusCode::FOUND, [(header::LOCATION, value)]).into_response();
    }
    tracing::warn!(location = %location, "redirect target is not a valid Location header");
    match HeaderValue::from_str(fallback_url) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        // Config validation makes this unreachable; still no panic
        Err(_) => StatusCode::FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use navms_resolver::RedirectTable;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::routes::create_router;

    const TABLE: &str = r#"{
        "redirects": {
            "go": {
                "ww": ["https://a.com"],
                "gcc": ["https://a.com", "https://b.com/{tenant}"]
            },
            "id": {
                "ww": ["https://plain.example.com", "https://id.example.com/{tenantId}"]
            }
        },
        "alias": {
            "g": "go"
        }
    }"#;

    fn test_config(directory_endpoint: &str) -> Config {
        Config {
            bind_address: "127.0.0.1:0".to_string(),
            redirects_path: "unused".to_string(),
            directory_endpoint: directory_endpoint.to_string(),
            directory_timeout: Duration::from_millis(500),
            fallback_url: "https://github.com/justiniven/nav.ms".to_string(),
        }
    }

    fn router(directory_endpoint: &str) -> axum::Router {
        let table = Arc::new(RedirectTable::from_json(TABLE).unwrap());
        create_router(AppState::new(table, &test_config(directory_endpoint)))
    }

    async fn get_location(router: axum::Router, host: &str, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .uri(path)
            .header("host", host)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        (status, location)
    }

    #[test]
    fn test_with_reason_separator() {
        assert_eq!(
            with_reason("https://x.com", "noShortFound"),
            "https://x.com?msg=noShortFound"
        );
        assert_eq!(
            with_reason("https://x.com?a=b", "noShortFound"),
            "https://x.com?a=b&msg=noShortFound"
        );
    }

    #[tokio::test]
    async fn test_empty_path_goes_to_project_page() {
        let (status, location) = get_location(router("http://127.0.0.1:1"), "nav.ms", "/").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "https://github.com/justiniven/nav.ms");
    }

    #[tokio::test]
    async fn test_scenario_a_single_target_global() {
        // Subdomain carries the short even with an empty path
        let (status, location) =
            get_location(router("http://127.0.0.1:1"), "go.example.com", "/").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "https://a.com");
    }

    #[tokio::test]
    async fn test_scenario_b_tenant_template() {
        let (status, location) =
            get_location(router("http://127.0.0.1:1"), "go.nav.ms", "/tenant1/gcc").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "https://b.com/tenant1");
    }

    #[tokio::test]
    async fn test_scenario_c_cloud_from_directory() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::UrlEncoded("domain".into(), "tenant1".into()))
            .with_status(200)
            .with_body(r#"{"environment": "microsoftonline.us"}"#)
            .create_async()
            .await;

        let (status, location) =
            get_location(router(&server.url()), "go.nav.ms", "/tenant1").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "https://b.com/tenant1");
    }

    #[tokio::test]
    async fn test_scenario_d_unknown_short() {
        let (status, location) =
            get_location(router("http://127.0.0.1:1"), "nav.ms", "/doesnotexist").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(
            location,
            "https://github.com/justiniven/nav.ms?msg=noRedirectFound"
        );
    }

    #[tokio::test]
    async fn test_scenario_e_tenant_id_absent_falls_back_to_primary() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"environment": "Global"}"#)
            .expect(2)
            .create_async()
            .await;

        let (status, location) =
            get_location(router(&server.url()), "nav.ms", "/id/tenant1").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "https://plain.example.com");
    }

    #[tokio::test]
    async fn test_unsupported_cloud_reason() {
        let (status, location) =
            get_location(router("http://127.0.0.1:1"), "nav.ms", "/go/tenant1/dod").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(
            location,
            "https://github.com/justiniven/nav.ms?msg=noRedirectForCloud"
        );
    }

    #[tokio::test]
    async fn test_alias_path_resolves() {
        let (status, location) =
            get_location(router("http://127.0.0.1:1"), "nav.ms", "/g/tenant1/gcc").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "https://b.com/tenant1");
    }

    #[tokio::test]
    async fn test_case_insensitive_request() {
        let (status, location) =
            get_location(router("http://127.0.0.1:1"), "nav.ms", "/GO/Tenant1/GCC").await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(location, "https://b.com/tenant1");
    }

    #[tokio::test]
    async fn test_post_is_served_too() {
        let table = Arc::new(RedirectTable::from_json(TABLE).unwrap());
        let app = create_router(AppState::new(table, &test_config("http://127.0.0.1:1")));
        let request = Request::builder()
            .method("POST")
            .uri("/go/tenant1/gcc")
            .header("host", "nav.ms")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
    }
}
