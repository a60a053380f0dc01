// SPDX-License-Identifier: GPL-3.0-or-later

//! Validated search criteria for the `/search/photos` endpoint.

use crate::error::{Result, UnsplashError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 30;

/// Defines a closed enumeration of API wire values.
///
/// Parsing an unknown value fails with a validation error naming `$field`.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value sent on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnsplashError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => {
                        let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        Err(UnsplashError::invalid_field(
                            $field,
                            format!("unrecognized value {:?}, expected one of: {}", other, allowed.join(", ")),
                        ))
                    }
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = UnsplashError;

            fn try_from(s: &str) -> Result<Self> {
                s.parse()
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnsplashError;

            fn try_from(s: String) -> Result<Self> {
                s.parse()
            }
        }
    };
}

wire_enum! {
    /// Photo orientation filter.
    Orientation, "orientation" {
        Landscape => "landscape",
        Portrait => "portrait",
        Squarish => "squarish",
    }
}

wire_enum! {
    /// Content safety filter. `Low` is the API default.
    ContentFilter, "content_filter" {
        Low => "low",
        High => "high",
    }
}

wire_enum! {
    /// Result ordering.
    OrderBy, "order_by" {
        Relevant => "relevant",
        Latest => "latest",
    }
}

wire_enum! {
    /// Dominant colour filter.
    Color, "color" {
        BlackAndWhite => "black_and_white",
        Black => "black",
        White => "white",
        Yellow => "yellow",
        Orange => "orange",
        Red => "red",
        Purple => "purple",
        Magenta => "magenta",
        Green => "green",
        Teal => "teal",
        Blue => "blue",
    }
}

/// Immutable, validated search criteria.
///
/// Only obtainable through [`SearchParamsBuilder::build`] or
/// [`SearchParams::from_query_pairs`], so every instance has a non-empty query
/// and in-range paging values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    query: String,
    page: u32,
    per_page: u32,
    orientation: Option<Orientation>,
    content_filter: Option<ContentFilter>,
    order_by: Option<OrderBy>,
    color: Option<Color>,
    collections: Vec<String>,
    lang: Option<String>,
}

impl SearchParams {
    pub fn builder() -> SearchParamsBuilder {
        SearchParamsBuilder::new()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    pub fn content_filter(&self) -> Option<ContentFilter> {
        self.content_filter
    }

    pub fn order_by(&self) -> Option<OrderBy> {
        self.order_by
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn collections(&self) -> &[String] {
        &self.collections
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Query parameters in wire order. Unset optional fields are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];

        if let Some(order_by) = self.order_by {
            pairs.push(("order_by", order_by.to_string()));
        }
        if !self.collections.is_empty() {
            pairs.push(("collections", self.collections.join(",")));
        }
        if let Some(filter) = self.content_filter {
            pairs.push(("content_filter", filter.to_string()));
        }
        if let Some(color) = self.color {
            pairs.push(("color", color.to_string()));
        }
        if let Some(orientation) = self.orientation {
            pairs.push(("orientation", orientation.to_string()));
        }
        if let Some(lang) = &self.lang {
            pairs.push(("lang", lang.clone()));
        }

        pairs
    }

    /// Rebuild params from query pairs, validating every value again.
    ///
    /// Unknown keys are ignored. A missing `page` or `per_page` takes its default.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut builder = SearchParamsBuilder::new();

        for (key, value) in pairs {
            let value = value.as_ref();
            builder = match key.as_ref() {
                "query" => builder.with_query(value)?,
                "page" => builder.with_page(parse_number("page", value)?)?,
                "per_page" => builder.with_per_page(parse_number("per_page", value)?)?,
                "orientation" => builder.with_orientation(value)?,
                "content_filter" => builder.with_content_filter(value)?,
                "order_by" => builder.with_order_by(value)?,
                "color" => builder.with_color(value)?,
                "collections" => builder.with_collections(value.split(','))?,
                "lang" => builder.with_lang(value)?,
                _ => builder,
            };
        }

        builder.build()
    }
}

fn parse_number(field: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| UnsplashError::invalid_field(field, format!("{value:?} is not a positive integer")))
}

/// Accumulates search criteria, validating each value as it is set.
///
/// Setters consume and return the builder so calls chain with `?`. Setting a
/// field twice keeps the last value.
///
/// # Example
/// ```
/// # use unsplash_client::{Orientation, SearchParamsBuilder};
/// # fn example() -> unsplash_client::Result<()> {
/// let params = SearchParamsBuilder::new()
///     .with_query("mountains")?
///     .with_per_page(20)?
///     .with_orientation(Orientation::Landscape)?
///     .with_order_by("latest")?
///     .build()?;
/// assert_eq!(params.per_page(), 20);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SearchParamsBuilder {
    query: Option<String>,
    page: u32,
    per_page: u32,
    orientation: Option<Orientation>,
    content_filter: Option<ContentFilter>,
    order_by: Option<OrderBy>,
    color: Option<Color>,
    collections: Vec<String>,
    lang: Option<String>,
}

impl Default for SearchParamsBuilder {
    fn default() -> Self {
        Self {
            query: None,
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            orientation: None,
            content_filter: None,
            order_by: None,
            color: None,
            collections: Vec::new(),
            lang: None,
        }
    }
}

impl SearchParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search terms. Empty or whitespace-only queries are rejected.
    pub fn with_query(mut self, query: impl Into<String>) -> Result<Self> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(UnsplashError::invalid_field(
                "query",
                "must not be empty or whitespace",
            ));
        }
        self.query = Some(query);
        Ok(self)
    }

    pub fn with_page(mut self, page: u32) -> Result<Self> {
        if page < 1 {
            return Err(UnsplashError::invalid_field("page", "must be at least 1"));
        }
        self.page = page;
        Ok(self)
    }

    /// Set the page size; the API accepts 1 to 30 inclusive.
    pub fn with_per_page(mut self, per_page: u32) -> Result<Self> {
        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(UnsplashError::invalid_field(
                "per_page",
                format!("must be between 1 and {MAX_PER_PAGE}, got {per_page}"),
            ));
        }
        self.per_page = per_page;
        Ok(self)
    }

    /// Accepts an [`Orientation`] or its wire name.
    pub fn with_orientation<T>(mut self, orientation: T) -> Result<Self>
    where
        T: TryInto<Orientation>,
        UnsplashError: From<T::Error>,
    {
        self.orientation = Some(orientation.try_into()?);
        Ok(self)
    }

    /// Accepts a [`ContentFilter`] or its wire name.
    pub fn with_content_filter<T>(mut self, filter: T) -> Result<Self>
    where
        T: TryInto<ContentFilter>,
        UnsplashError: From<T::Error>,
    {
        self.content_filter = Some(filter.try_into()?);
        Ok(self)
    }

    /// Accepts an [`OrderBy`] or its wire name.
    pub fn with_order_by<T>(mut self, order_by: T) -> Result<Self>
    where
        T: TryInto<OrderBy>,
        UnsplashError: From<T::Error>,
    {
        self.order_by = Some(order_by.try_into()?);
        Ok(self)
    }

    /// Accepts a [`Color`] or its wire name.
    pub fn with_color<T>(mut self, color: T) -> Result<Self>
    where
        T: TryInto<Color>,
        UnsplashError: From<T::Error>,
    {
        self.color = Some(color.try_into()?);
        Ok(self)
    }

    /// Restrict results to the given collection ids. Replaces any previous list.
    pub fn with_collections<I, S>(mut self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut collections = Vec::new();
        for id in ids {
            let id = id.as_ref().trim();
            if id.is_empty() || id.contains(',') {
                return Err(UnsplashError::invalid_field(
                    "collections",
                    format!("invalid collection id {id:?}"),
                ));
            }
            collections.push(id.to_string());
        }
        self.collections = collections;
        Ok(self)
    }

    /// Two-letter ISO 639-1 language of the query.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Result<Self> {
        let lang = lang.into();
        if lang.len() != 2 || !lang.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(UnsplashError::invalid_field(
                "lang",
                format!("expected a two-letter ISO 639-1 code, got {lang:?}"),
            ));
        }
        self.lang = Some(lang);
        Ok(self)
    }

    pub fn clear_orientation(mut self) -> Self {
        self.orientation = None;
        self
    }

    pub fn clear_content_filter(mut self) -> Self {
        self.content_filter = None;
        self
    }

    pub fn clear_order_by(mut self) -> Self {
        self.order_by = None;
        self
    }

    pub fn clear_color(mut self) -> Self {
        self.color = None;
        self
    }

    pub fn clear_collections(mut self) -> Self {
        self.collections.clear();
        self
    }

    pub fn clear_lang(mut self) -> Self {
        self.lang = None;
        self
    }

    /// Snapshot the accumulated criteria. Fails if no query was set.
    pub fn build(&self) -> Result<SearchParams> {
        let query = self
            .query
            .clone()
            .ok_or_else(|| UnsplashError::invalid_field("query", "is required"))?;

        Ok(SearchParams {
            query,
            page: self.page,
            per_page: self.per_page,
            orientation: self.orientation,
            content_filter: self.content_filter,
            order_by: self.order_by,
            color: self.color,
            collections: self.collections.clone(),
            lang: self.lang.clone(),
        })
    }
}
