//! Request extractors whose rejections are JSON `400` responses.
//!
//! Axum's built-in extractors reject malformed input with plain-text bodies
//! and a mix of `400`/`415`/`422` statuses. These wrappers route every
//! rejection through [`AppError::BadRequest`] so API clients always get
//! `400 {"error": ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Typed path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Typed query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
