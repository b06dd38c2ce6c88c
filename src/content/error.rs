//! Content ingestion errors
//!
//! Every variant is a broken data contract with the content source. They are
//! raised while loading and never recovered from.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{origin}: missing slug")]
    MissingSlug { origin: String },

    #[error("{origin}: slug {slug:?} is not a single URL path segment")]
    InvalidSlug { origin: String, slug: String },

    #[error("{origin}: missing date")]
    MissingDate { origin: String },

    #[error("{origin}: invalid date {value:?}")]
    InvalidDate { origin: String, value: String },

    #[error("duplicate slug {slug:?} in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },

    #[error("{origin}: invalid front-matter: {message}")]
    FrontMatter { origin: String, message: String },

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content index {path:?}")]
    Index {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
