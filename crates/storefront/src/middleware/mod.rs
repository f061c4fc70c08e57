//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only)
//! 2. CORS (permissive; the page may be served from another origin)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on the request span and returned in the response)
//! 5. Security headers

pub mod request_id;
pub mod security_headers;

pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
