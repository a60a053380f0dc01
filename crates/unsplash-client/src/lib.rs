// SPDX-License-Identifier: GPL-3.0-or-later

//! Unsplash API client for photo search.
//!
//! This crate provides a validated search-parameter builder, typed response
//! models and a client that issues a single request per call, translating
//! HTTP failures into [`UnsplashError`] variants. The client performs no
//! caching and no retries; retry policy belongs to the caller.

pub mod client;
#[cfg(test)]
mod client_tests;
pub mod error;
pub mod models;
pub mod search;

pub use client::{UnsplashClient, UnsplashClientBuilder};
pub use error::{ErrorKind, Result, UnsplashError};
pub use models::{Photo, PhotoUser, SearchResponse};
pub use search::{
    Color, ContentFilter, OrderBy, Orientation, SearchParams, SearchParamsBuilder, DEFAULT_PAGE,
    DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
