//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. The content security
//! policy is built once at startup because the product image host is
//! configurable.

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};
use url::Url;

/// Where the HTMX runtime is loaded from.
pub const HTMX_ORIGIN: &str = "https://unpkg.com";

/// Build the content security policy for a storefront serving product images
/// from `image_base_url`.
///
/// ```text
/// default-src 'none';
/// script-src 'self' https://unpkg.com;
/// style-src 'self';
/// img-src 'self' <image origin>;
/// connect-src 'self';
/// form-action 'self';
/// frame-ancestors 'none';
/// ...
/// ```
///
/// An image base URL without an origin (never the case after config
/// validation) leaves `img-src` at `'self'`.
#[must_use]
pub fn content_security_policy(image_base_url: &str) -> HeaderValue {
    let image_origin = Url::parse(image_base_url)
        .ok()
        .map(|url| url.origin())
        .filter(url::Origin::is_tuple)
        .map(|origin| format!(" {}", origin.ascii_serialization()))
        .unwrap_or_default();

    let policy = format!(
        "default-src 'none'; \
         script-src 'self' {HTMX_ORIGIN}; \
         style-src 'self'; \
         font-src 'self'; \
         img-src 'self'{image_origin}; \
         connect-src 'self'; \
         frame-src 'none'; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    );

    HeaderValue::from_str(&policy).unwrap_or_else(|_| {
        HeaderValue::from_static("default-src 'none'; script-src 'self'; img-src 'self'")
    })
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY` - Prevent clickjacking
/// - `X-Content-Type-Options: nosniff` - Prevent MIME sniffing
/// - `Referrer-Policy: no-referrer` - Zero referrer leakage
/// - `Content-Security-Policy` - see [`content_security_policy`]
/// - `Permissions-Policy` - Deny sensitive features
/// - `Cache-Control: no-store, max-age=0` - Catalog pages are always live
/// - `Cross-Origin-Opener-Policy: same-origin` - Process isolation
/// - `Cross-Origin-Resource-Policy: same-origin` - Resource isolation
pub async fn security_headers_middleware(
    State(csp): State<HeaderValue>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
    headers.insert(CONTENT_SECURITY_POLICY, csp);

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), \
             geolocation=(), \
             microphone=(), \
             payment=(), \
             usb=()",
        ),
    );

    headers.insert(
        HeaderName::from_static("cache-control"),
        HeaderValue::from_static("no-store, max-age=0"),
    );

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    // Product images come from another origin, so COEP stays unset.
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_csp_allows_image_origin() {
        let csp = content_security_policy("https://admin.refabry.com/storage/product");
        let csp = csp.to_str().unwrap();
        assert!(csp.contains("img-src 'self' https://admin.refabry.com;"));
        assert!(csp.contains("script-src 'self' https://unpkg.com;"));
    }

    #[test]
    fn test_csp_keeps_explicit_port() {
        let csp = content_security_policy("http://127.0.0.1:8080/images");
        assert!(csp.to_str().unwrap().contains("img-src 'self' http://127.0.0.1:8080;"));
    }

    #[test]
    fn test_csp_without_origin_is_self_only() {
        let csp = content_security_policy("not a url");
        assert!(csp.to_str().unwrap().contains("img-src 'self';"));
    }
}
