//! Directory listing rendering.
//!
//! A listing is produced in three parts so it can be streamed while the
//! directory is still being read: a header, any number of entry chunks in
//! the order the handle returns them, and a footer. Nothing here buffers
//! more than the chunk it is handed.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd::listing::{ListingFormat, ListingRenderer};
//! use adhoc_httpd_core::{DirEntry, StorePath};
//!
//! let mut renderer = ListingRenderer::new(ListingFormat::Json, StorePath::root());
//! let mut body = renderer.header();
//! body.push_str(&renderer.entries(&[DirEntry::file("a.txt", 3), DirEntry::dir("docs")]));
//! body.push_str(&renderer.footer(None));
//!
//! let value: serde_json::Value = serde_json::from_str(&body).unwrap();
//! assert_eq!(value["entries"][1]["name"], "docs/");
//! ```

use adhoc_httpd_core::{DirEntry, FsError, StorePath};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Representation of a directory listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListingFormat {
    /// A minimal HTML page of links
    #[default]
    Html,
    /// A JSON document with entry metadata
    Json,
}

impl ListingFormat {
    /// `Content-Type` of a listing in this format.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    /// Picks the format for one request.
    ///
    /// An explicit `format=` query parameter wins, then an `Accept` header
    /// that ranks JSON above HTML, then the server default.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd::ListingFormat;
    ///
    /// let html = ListingFormat::Html;
    /// assert_eq!(ListingFormat::negotiate(Some("format=json"), None, html), ListingFormat::Json);
    /// assert_eq!(
    ///     ListingFormat::negotiate(None, Some("application/json"), html),
    ///     ListingFormat::Json
    /// );
    /// assert_eq!(ListingFormat::negotiate(None, Some("*/*"), html), html);
    /// ```
    #[must_use]
    pub fn negotiate(query: Option<&str>, accept: Option<&str>, default: Self) -> Self {
        if let Some(format) = query.and_then(Self::from_query) {
            return format;
        }
        if let Some(accept) = accept {
            let json = media_quality(accept, |ty| ty == "application/json");
            let html = media_quality(accept, |ty| ty == "text/html");
            if json > 0.0 && json > html {
                return Self::Json;
            }
            if html > 0.0 && html > json {
                return Self::Html;
            }
        }
        default
    }

    fn from_query(query: &str) -> Option<Self> {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "format")
            .and_then(|(_, value)| value.parse().ok())
    }
}

impl fmt::Display for ListingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ListingFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid listing format: '{s}', expected 'html' or 'json'")),
        }
    }
}

/// Highest `q` the `Accept` header gives a media type matching `matches`.
fn media_quality(accept: &str, matches: impl Fn(&str) -> bool) -> f32 {
    accept
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let media = parts.next()?.trim().to_ascii_lowercase();
            if !matches(&media) {
                return None;
            }
            let q = parts
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(q)
        })
        .fold(0.0, f32::max)
}

/// Incremental renderer for one directory listing.
#[derive(Debug)]
pub struct ListingRenderer {
    format: ListingFormat,
    path: StorePath,
    written: usize,
}

impl ListingRenderer {
    /// Creates a renderer for the directory at `path`.
    #[must_use]
    pub const fn new(format: ListingFormat, path: StorePath) -> Self {
        Self {
            format,
            path,
            written: 0,
        }
    }

    /// The format being rendered.
    #[must_use]
    pub const fn format(&self) -> ListingFormat {
        self.format
    }

    /// Number of entries rendered so far.
    #[must_use]
    pub const fn written(&self) -> usize {
        self.written
    }

    fn display_path(&self) -> String {
        if self.path.is_root() {
            "/".to_string()
        } else {
            format!("{}/", self.path)
        }
    }

    /// Opening part of the document.
    #[must_use]
    pub fn header(&self) -> String {
        let shown = self.display_path();
        match self.format {
            ListingFormat::Html => {
                let title = escape_html(&shown);
                let mut out = format!(
                    "<!doctype html>\n<meta charset=\"utf-8\">\n\
                     <meta name=\"viewport\" content=\"width=device-width\">\n\
                     <title>Index of {title}</title>\n<h1>Index of {title}</h1>\n<pre>\n"
                );
                if !self.path.is_root() {
                    out.push_str("<a href=\"../\">../</a>\n");
                }
                out
            }
            ListingFormat::Json => {
                format!("{{\"path\":{},\"entries\":[", json!(shown))
            }
        }
    }

    /// Renders one chunk of entries.
    pub fn entries(&mut self, entries: &[DirEntry]) -> String {
        let mut out = String::new();
        for entry in entries {
            match self.format {
                ListingFormat::Html => {
                    let name = display_name(entry);
                    let mut href = urlencoding::encode(entry.name()).into_owned();
                    if entry.is_dir() {
                        href.push('/');
                    }
                    out.push_str("<a href=\"");
                    out.push_str(&escape_html(&href));
                    out.push_str("\">");
                    out.push_str(&escape_html(&name));
                    out.push_str("</a>\n");
                }
                ListingFormat::Json => {
                    if self.written > 0 {
                        out.push(',');
                    }
                    out.push_str(&json!(JsonEntry::from(entry)).to_string());
                }
            }
            self.written += 1;
        }
        out
    }

    /// Closing part of the document.
    ///
    /// When the read ended with an error the document is still closed
    /// properly, with a note that the listing is incomplete.
    #[must_use]
    pub fn footer(&self, error: Option<&FsError>) -> String {
        match (self.format, error) {
            (ListingFormat::Html, None) => "</pre>\n".to_string(),
            (ListingFormat::Html, Some(_)) => {
                "</pre>\n<p>Listing incomplete: the directory could not be read in full.</p>\n"
                    .to_string()
            }
            (ListingFormat::Json, None) => "]}".to_string(),
            (ListingFormat::Json, Some(_)) => {
                "],\"error\":\"directory could not be read in full\"}".to_string()
            }
        }
    }
}

fn display_name(entry: &DirEntry) -> String {
    if entry.is_dir() {
        format!("{}/", entry.name())
    } else {
        entry.name().to_string()
    }
}

/// One element of a JSON listing's `entries` array.
#[derive(Debug, Serialize)]
struct JsonEntry {
    name: String,
    is_dir: bool,
    size: u64,
    mode: u32,
    /// RFC 3339, whole seconds, UTC.
    modified: Option<String>,
}

impl From<&DirEntry> for JsonEntry {
    fn from(entry: &DirEntry) -> Self {
        Self {
            name: display_name(entry),
            is_dir: entry.is_dir(),
            size: entry.size(),
            mode: entry.mode(),
            modified: entry
                .modified()
                .map(|t| DateTime::<Utc>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// Escapes the characters HTML treats specially in text and attributes.
///
/// # Examples
///
/// ```
/// use adhoc_httpd::listing::escape_html;
///
/// assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
/// ```
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
