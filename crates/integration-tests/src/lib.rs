//! Integration tests for Minimart.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process API tests (no server needed)
//! cargo test -p minimart-integration-tests
//!
//! # Live-server smoke test against a running storefront
//! STOREFRONT_BASE_URL=http://127.0.0.1:3000 \
//!     cargo test -p minimart-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - Cart and catalog endpoints driven through the router
//! - `live_server` - HTTP round trips against a running binary
//!
//! This library holds the shared [`TestContext`]: a storefront whose JSON
//! documents live in a fresh temporary directory.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use minimart_storefront::config::{ConfigError, StorefrontConfig};
use minimart_storefront::state::AppState;

/// Catalog written by [`TestContext::new`].
pub const SAMPLE_CATALOG: &str = r#"[
  {
    "id": 1,
    "name": "Enamel Trail Mug",
    "price": 14.5,
    "description": "A 350 ml enamel steel mug.",
    "image": "https://images.example.com/mug.jpg",
    "category": "kitchen"
  },
  {
    "id": 2,
    "name": "Canvas Tote",
    "price": 18.0,
    "description": "Heavyweight cotton canvas tote.",
    "image": "https://images.example.com/tote.jpg",
    "category": "bags"
  },
  {
    "id": 3,
    "name": "Pour-Over Kettle",
    "price": 39.99,
    "description": "Gooseneck kettle.",
    "image": "https://images.example.com/kettle.jpg",
    "category": "kitchen"
  }
]"#;

/// A storefront over JSON documents in a temporary directory.
///
/// The catalog cache is disabled so tests can rewrite `products.json` between
/// requests.
pub struct TestContext {
    dir: TempDir,
    state: AppState,
}

impl TestContext {
    /// Storefront with [`SAMPLE_CATALOG`] and no cart file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temporary directory cannot be prepared.
    pub fn new() -> std::io::Result<Self> {
        Self::with_env(&[])
    }

    /// Storefront with extra configuration variables, e.g.
    /// `STOREFRONT_STRICT_READS`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temporary directory cannot be prepared or
    /// the variables do not parse.
    pub fn with_env(vars: &[(&str, &str)]) -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("products.json"), SAMPLE_CATALOG)?;

        let mut env: HashMap<String, String> = HashMap::from([
            (
                "STOREFRONT_DATA_DIR".to_string(),
                dir.path().display().to_string(),
            ),
            (
                "STOREFRONT_STATIC_DIR".to_string(),
                static_dir().display().to_string(),
            ),
            ("STOREFRONT_CATALOG_CACHE_SECS".to_string(), "0".to_string()),
        ]);
        env.extend(vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));

        let config = StorefrontConfig::from_lookup(|key| env.get(key).cloned())
            .map_err(|e: ConfigError| std::io::Error::other(e.to_string()))?;

        Ok(Self {
            dir,
            state: AppState::from_config(config),
        })
    }

    /// The full application router, as served by the binary.
    #[must_use]
    pub fn app(&self) -> Router {
        minimart_storefront::app(self.state.clone())
    }

    /// Application state shared by every router from [`Self::app`].
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Path of the cart document.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.dir.path().join("cart.json")
    }

    /// Path of the catalog document.
    #[must_use]
    pub fn products_path(&self) -> PathBuf {
        self.dir.path().join("products.json")
    }

    /// Overwrite the cart document with raw text.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn write_cart(&self, contents: &str) -> std::io::Result<()> {
        std::fs::write(self.cart_path(), contents)
    }

    /// Read the cart document as raw text.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn read_cart(&self) -> std::io::Result<String> {
        std::fs::read_to_string(self.cart_path())
    }

    /// Send one request through a fresh router and decode the JSON response.
    ///
    /// Non-JSON bodies decode as `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body cannot be
    /// collected.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.app().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok((status, json))
    }

    /// Send a request with a raw (possibly malformed) JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the body cannot be
    /// collected.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
        body: &'static str,
    ) -> Result<(StatusCode, Value), Box<dyn std::error::Error>> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))?;

        let response = self.app().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        Ok((status, json))
    }
}

/// Bundled browser page and assets.
#[must_use]
pub fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("storefront")
        .join("static")
}
