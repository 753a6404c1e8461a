//! Document naming rules.
//!
//! Covers extension detection, create-time validation, the `name(N).ext`
//! numbering used when copying, and the document name derived from an
//! image URL.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Extension of plain-text documents.
pub const TEXT_EXTENSION: &str = ".txt";

/// Extension of markdown documents.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Image URLs must be strictly shorter than this.
pub const MAX_IMAGE_URL_LEN: usize = 256;

/// Accepted endings (last four characters) of an image URL.
const IMAGE_URL_SUFFIXES: &[&str] = &[".jpg", "jpeg", ".png", ".gif", ".bmp", "tiff", "ashx"];

/// First number handed out to a copy; the original is implicitly slot 1.
const FIRST_COPY_NUMBER: u32 = 2;

/// `stem(N)` -- captures the stem without its copy number.
static COPY_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\(\d+\)$").expect("valid regex"));

/// Everything before the last `.xx`..`.xxxx` extension of a URL segment.
static IMAGE_STEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\..{2,4}").expect("valid regex"));

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));

// ---------------------------------------------------------------------------
// Extensions
// ---------------------------------------------------------------------------

/// The two kinds of document the store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Markdown,
}

impl DocumentKind {
    /// Classify a file name by its extension.
    pub fn from_name(name: &str) -> Option<Self> {
        match extension(name) {
            TEXT_EXTENSION => Some(Self::Text),
            MARKDOWN_EXTENSION => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => TEXT_EXTENSION,
            Self::Markdown => MARKDOWN_EXTENSION,
        }
    }
}

/// Extension of `name` including the leading dot, or `""`.
///
/// A leading dot (as in `.profile`) does not start an extension.
pub fn extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx..],
        _ => "",
    }
}

/// Split `name` into `(stem, extension)`.
pub fn split_name(name: &str) -> (&str, &str) {
    let ext = extension(name);
    (&name[..name.len() - ext.len()], ext)
}

/// A creatable document name: non-blank and ending in `.txt` or `.md`.
///
/// The name and its stem must also be usable as single path segments, since
/// the stem names the document's version directory.
pub fn is_valid_document_name(name: &str) -> bool {
    !name.trim().is_empty()
        && DocumentKind::from_name(name).is_some()
        && is_safe_segment(name)
        && is_safe_segment(split_name(name).0)
}

/// `true` if `name` can be joined onto the data directory without escaping it.
pub fn is_safe_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

// ---------------------------------------------------------------------------
// Copy numbering
// ---------------------------------------------------------------------------

/// Stem of `stem` with any trailing `(N)` removed.
///
/// ```
/// use filecms_core::naming::copy_base_name;
///
/// assert_eq!(copy_base_name("hello"), "hello");
/// assert_eq!(copy_base_name("hello(3)"), "hello");
/// assert_eq!(copy_base_name("a(2)(3)"), "a(2)");
/// ```
pub fn copy_base_name(stem: &str) -> &str {
    COPY_SUFFIX_RE
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .map_or(stem, |m| m.as_str())
}

/// Lowest number `>= 2` not yet used by a `base(N)ext` sibling in `existing`.
pub fn next_copy_number<'a, I>(base: &str, ext: &str, existing: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    let used: BTreeSet<u32> = existing
        .into_iter()
        .filter_map(|name| copy_number(name, base, ext))
        .collect();

    let mut candidate = FIRST_COPY_NUMBER;
    while used.contains(&candidate) {
        candidate += 1;
    }
    candidate
}

/// Name for the next copy of `filename` given the names already present.
pub fn copy_name<'a, I>(filename: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let (stem, ext) = split_name(filename);
    let base = copy_base_name(stem);
    let number = next_copy_number(base, ext, existing);
    format!("{base}({number}){ext}")
}

/// `N` if `name` is exactly `base(N)ext`.
fn copy_number(name: &str, base: &str, ext: &str) -> Option<u32> {
    let digits = name
        .strip_prefix(base)?
        .strip_suffix(ext)?
        .strip_prefix('(')?
        .strip_suffix(')')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

// ---------------------------------------------------------------------------
// Image URLs
// ---------------------------------------------------------------------------

/// Accepts short `http(s)://` URLs ending in a known image suffix.
pub fn is_valid_image_url(url: &str) -> bool {
    url.len() < MAX_IMAGE_URL_LEN
        && (url.starts_with("http://") || url.starts_with("https://"))
        && IMAGE_URL_SUFFIXES.iter().any(|suffix| url.ends_with(suffix))
}

/// Markdown document name for an image URL.
///
/// Takes the last path segment, drops its extension, strips non-word
/// characters and appends `.md`. Returns `None` when nothing is left.
pub fn image_document_name(url: &str) -> Option<String> {
    let segment = url.rsplit('/').next()?;
    let stem = IMAGE_STEM_RE.captures(segment)?.get(1)?.as_str();
    let cleaned = NON_WORD_RE.replace_all(stem, "");
    if cleaned.is_empty() {
        return None;
    }
    Some(format!("{cleaned}{MARKDOWN_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_of_plain_names() {
        assert_eq!(extension("about.txt"), ".txt");
        assert_eq!(extension("notes.backup.md"), ".md");
        assert_eq!(extension("README"), "");
        assert_eq!(extension(".profile"), "");
    }

    #[test]
    fn kind_from_name() {
        assert_eq!(DocumentKind::from_name("a.txt"), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_name("a.md"), Some(DocumentKind::Markdown));
        assert_eq!(DocumentKind::from_name("a.ext"), None);
        assert_eq!(DocumentKind::Markdown.extension(), ".md");
    }

    #[test]
    fn valid_document_names() {
        assert!(is_valid_document_name("Hello World.md"));
        assert!(is_valid_document_name("about.txt"));
    }

    #[test]
    fn invalid_document_names() {
        assert!(!is_valid_document_name(""));
        assert!(!is_valid_document_name("   "));
        assert!(!is_valid_document_name("notes"));
        assert!(!is_valid_document_name("image.png"));
        assert!(!is_valid_document_name(".txt"));
        assert!(!is_valid_document_name("..txt"));
        assert!(!is_valid_document_name("nested/dir.md"));
    }

    #[test]
    fn unsafe_segments() {
        assert!(is_safe_segment("about.txt"));
        assert!(!is_safe_segment(""));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("../users.yml"));
        assert!(!is_safe_segment("a\\b.txt"));
    }

    #[test]
    fn first_copy_is_number_two() {
        assert_eq!(copy_name("hello.txt", ["hello.txt"]), "hello(2).txt");
    }

    #[test]
    fn copy_of_a_copy_uses_the_base_name() {
        let existing = ["hello.txt", "hello(2).txt"];
        assert_eq!(copy_name("hello(2).txt", existing), "hello(3).txt");
    }

    #[test]
    fn copy_fills_lowest_gap() {
        let existing = ["hello.txt", "hello(3).txt", "hello(4).txt"];
        assert_eq!(copy_name("hello.txt", existing), "hello(2).txt");

        let existing = ["hello.txt", "hello(2).txt", "hello(4).txt"];
        assert_eq!(copy_name("hello.txt", existing), "hello(3).txt");
    }

    #[test]
    fn copy_numbering_ignores_other_extensions_and_names() {
        let existing = ["hello.txt", "hello(2).md", "hello world(2).txt", "hello(x).txt"];
        assert_eq!(next_copy_number("hello", ".txt", existing), 2);
    }

    #[test]
    fn valid_image_urls() {
        assert!(is_valid_image_url("https://example.com/cat.jpg"));
        assert!(is_valid_image_url("http://example.com/photo.jpeg"));
        assert!(is_valid_image_url("https://cdn.example.com/img/handler.ashx"));
    }

    #[test]
    fn invalid_image_urls() {
        assert!(!is_valid_image_url("ftp://example.com/cat.jpg"));
        assert!(!is_valid_image_url("https://example.com/cat.txt"));
        assert!(!is_valid_image_url("example.com/cat.png"));
        let long = format!("https://example.com/{}.png", "a".repeat(MAX_IMAGE_URL_LEN));
        assert!(!is_valid_image_url(&long));
    }

    #[test]
    fn image_name_strips_extension_and_symbols() {
        assert_eq!(
            image_document_name("https://example.com/img/my-cat.photo.jpg").as_deref(),
            Some("mycatphoto.md")
        );
        assert_eq!(
            image_document_name("https://example.com/sunset_01.png").as_deref(),
            Some("sunset_01.md")
        );
    }

    #[test]
    fn image_name_empty_after_cleanup() {
        assert_eq!(image_document_name("https://example.com/--.png"), None);
    }
}
