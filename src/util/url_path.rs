/// Scheme prepended to addresses typed without one.
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Prepends `https://` when the address does not start with an `http` token.
///
/// This is purely syntactic: `youtube.com/user/x` becomes
/// `https://youtube.com/user/x`, while anything already starting with `http`
/// (including `http://` and `https://`) is returned untouched.
///
/// # Examples
///
/// ```
/// use tubecast::util::normalize_scheme;
///
/// assert_eq!(normalize_scheme("vimeo.com/fxigr1"), "https://vimeo.com/fxigr1");
/// assert_eq!(normalize_scheme("http://vimeo.com/fxigr1"), "http://vimeo.com/fxigr1");
/// ```
pub fn normalize_scheme(address: &str) -> String {
    if address.starts_with("http") {
        address.to_owned()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{address}")
    }
}

/// Returns the `index`-th `/`-separated segment of an escaped URL path.
///
/// Segments are counted on the raw split, so the leading empty segment
/// before the first `/` is index 0. A segment that is missing or empty
/// yields `None`; callers treat both the same way.
///
/// # Examples
///
/// ```
/// use tubecast::util::path_segment;
///
/// assert_eq!(path_segment("/channel/UC123/videos", 2), Some("UC123"));
/// assert_eq!(path_segment("/channel/", 2), None);
/// assert_eq!(path_segment("/channel", 2), None);
/// ```
pub fn path_segment(path: &str, index: usize) -> Option<&str> {
    path.split('/').nth(index).filter(|segment| !segment.is_empty())
}

/// Number of `/`-separated segments in an escaped URL path.
pub fn segment_count(path: &str) -> usize {
    path.split('/').count()
}
