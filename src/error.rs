//! Build errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::content::FrontMatterError;

/// Errors raised while scanning, rendering or writing a site.
///
/// Every variant is fatal to the build except where the layout chain is
/// configured to be lenient, in which case `UnknownLayout` is never raised.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {path:?}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid front matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("Not a valid post file name: {path:?}")]
    InvalidPost { path: PathBuf },

    #[error("Permalink {permalink:?} in {path:?} leaves the destination directory")]
    InvalidPermalink { path: PathBuf, permalink: String },

    #[error("Layout cycle detected: {}", chain.join(" -> "))]
    LayoutCycle { chain: Vec<String> },

    #[error("Unknown layout: {name}")]
    UnknownLayout { name: String },

    #[error("Failed to convert .{extension} content: {message}")]
    Convert { extension: String, message: String },

    #[error("Failed to render layout '{layout}': {message}")]
    Template { layout: String, message: String },

    #[error("Front matter cannot be used as template data: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
