// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Extensions recognized as direct images.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".gif", ".gifv", ".jpg", ".jpeg"];

/// Extensions filtered by the gif policy.
pub const GIF_EXTENSIONS: &[&str] = &[".gif", ".gifv"];

/// Path segment marking an album link.
pub const ALBUM_MARKER: &str = "/a/";

/// Prefix `http://` when the URL carries no scheme.
///
/// # Examples
/// ```
/// use imgbot::utils::url::normalize;
///
/// assert_eq!(normalize("imgur.com/abc"), "http://imgur.com/abc");
/// assert_eq!(normalize("https://imgur.com/abc"), "https://imgur.com/abc");
/// ```
pub fn normalize(url: &str) -> String {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Path component of a URL, lowercased. Falls back to the raw string when
/// the URL does not parse.
fn lower_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.to_lowercase(),
    }
}

/// Check whether the URL path ends with a direct-image extension.
pub fn has_image_extension(url: &str) -> bool {
    let path = lower_path(url);
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Check whether the URL path ends with a gif extension.
pub fn has_gif_extension(url: &str) -> bool {
    let path = lower_path(url);
    GIF_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Check whether the URL path contains the album marker.
pub fn is_album(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().contains(ALBUM_MARKER),
        Err(_) => url.contains(ALBUM_MARKER),
    }
}

/// Download URL of an album's zip archive.
pub fn album_archive(url: &str) -> String {
    format!("{}/zip", url.trim_end_matches('/'))
}

/// Extract the host from a URL string, lowercased.
///
/// # Examples
/// ```
/// use imgbot::utils::url::get_domain;
///
/// assert_eq!(
///     get_domain("https://Imgur.COM/gallery/x"),
///     Some("imgur.com".to_string())
/// );
/// ```
pub fn get_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}

/// Final non-empty path segment, used as the on-disk file name.
pub fn file_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .filter(|segment| *segment != "." && *segment != "..")
        .map(str::to_string)
}

/// Resolve a potentially relative URL against a base URL.
pub fn resolve(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize("i.imgur.com/x.jpg"), "http://i.imgur.com/x.jpg");
        assert_eq!(normalize("HTTPS://i.imgur.com/x.jpg"), "HTTPS://i.imgur.com/x.jpg");
    }

    #[test]
    fn test_image_extension_any_case() {
        assert!(has_image_extension("http://i.imgur.com/abc.JPG"));
        assert!(has_image_extension("http://i.imgur.com/abc.gifv"));
        assert!(has_image_extension("http://i.redd.it/abc.jpeg?width=640"));
        assert!(!has_image_extension("http://imgur.com/abc"));
        assert!(!has_image_extension("http://example.com/jpg"));
    }

    #[test]
    fn test_gif_extension() {
        assert!(has_gif_extension("http://i.imgur.com/a.gifv"));
        assert!(has_gif_extension("http://i.imgur.com/a.GIF"));
        assert!(!has_gif_extension("http://i.imgur.com/a.png"));
    }

    #[test]
    fn test_album_detection() {
        assert!(is_album("http://imgur.com/a/XYZ"));
        assert!(!is_album("http://imgur.com/gallery/XYZ"));
        assert!(!is_album("http://example.com/path?next=/a/b"));
    }

    #[test]
    fn test_album_archive() {
        assert_eq!(album_archive("http://imgur.com/a/XYZ"), "http://imgur.com/a/XYZ/zip");
        assert_eq!(album_archive("http://imgur.com/a/XYZ/"), "http://imgur.com/a/XYZ/zip");
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(get_domain("http://imgur.com/x"), Some("imgur.com".to_string()));
        assert_eq!(get_domain("not a url"), None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            file_name("http://i.imgur.com/abc.jpg?1"),
            Some("abc.jpg".to_string())
        );
        assert_eq!(file_name("http://example.com/dir/"), Some("dir".to_string()));
        assert_eq!(file_name("http://example.com/"), None);
    }

    #[test]
    fn test_resolve_relative() {
        let base = Url::parse("http://tinypic.com/view.php?pic=1").unwrap();
        assert_eq!(resolve(&base, "/images/1.png"), "http://tinypic.com/images/1.png");
        assert_eq!(resolve(&base, "https://cdn.example.com/x.png"), "https://cdn.example.com/x.png");
    }
}
