//! Cache-busting URLs for static files.
//!
//! A static URL carries the first characters of the file's content hash as a
//! `v` query parameter, so browsers refetch a file exactly when it changes.
//! Hashes are computed once per file and kept for the life of the process.

use crate::app_config;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};

const HASH_LEN: usize = 10;

static ASSET_URLS: Lazy<DashMap<PathBuf, String>> = Lazy::new(DashMap::new);

/// Versioned URL for `filename` using the configured static directory.
pub fn versioned_url(filename: &str) -> String {
    let config = app_config::static_files();
    versioned_url_in(
        Path::new(&config.dir),
        &config.url_prefix,
        filename,
        config.versioned,
    )
}

/// Versioned URL for `filename` inside `dir`, served under `url_prefix`.
///
/// Falls back to the plain URL when versioning is off or the file is missing.
/// Missing files are not remembered, so they are picked up once they appear.
pub fn versioned_url_in(dir: &Path, url_prefix: &str, filename: &str, versioned: bool) -> String {
    let filename = filename.trim_start_matches('/');
    let plain = format!("{}/{}", url_prefix.trim_end_matches('/'), filename);

    if !versioned {
        return plain;
    }

    let path = dir.join(filename);
    if let Some(url) = ASSET_URLS.get(&path) {
        return url.clone();
    }

    match std::fs::read(&path) {
        Ok(content) => {
            let hash = blake3::hash(&content).to_hex();
            let url = format!("{}?v={}", plain, &hash.as_str()[..HASH_LEN]);
            ASSET_URLS.insert(path, url.clone());
            url
        }
        Err(e) => {
            log::debug!("Static file {} not hashed: {}", path.display(), e);
            plain
        }
    }
}

/// `<script>` tag for a static JavaScript file
pub fn script_tag(filename: &str) -> String {
    format!(
        "<script type='text/javascript' src='{}'></script>",
        versioned_url(filename)
    )
}

/// `<link>` tag for a static stylesheet
pub fn link_tag(filename: &str) -> String {
    format!("<link rel='stylesheet' href='{}'>", versioned_url(filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_versioned_url_appends_content_hash() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        fs::write(dir.path().join("js/layout.js"), b"console.log('bar');").unwrap();

        let url = versioned_url_in(dir.path(), "/static", "js/layout.js", true);
        let expected = blake3::hash(b"console.log('bar');").to_hex();

        assert_eq!(
            url,
            format!("/static/js/layout.js?v={}", &expected.as_str()[..HASH_LEN])
        );
    }

    #[test]
    fn test_hash_is_cached_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.css");
        fs::write(&path, b"body { color: red; }").unwrap();

        let first = versioned_url_in(dir.path(), "/static", "site.css", true);
        fs::write(&path, b"body { color: blue; }").unwrap();
        let second = versioned_url_in(dir.path(), "/static", "site.css", true);

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_file_gets_plain_url() {
        let dir = tempfile::tempdir().unwrap();
        let url = versioned_url_in(dir.path(), "/static/", "/missing.js", true);
        assert_eq!(url, "/static/missing.js");
    }

    #[test]
    fn test_tags_wrap_url() {
        let script = script_tag("js/no-such-page.js");
        assert!(script.starts_with("<script type='text/javascript' src='"));
        assert!(script.contains("/js/no-such-page.js'"));

        let link = link_tag("css/no-such-page.css");
        assert!(link.starts_with("<link rel='stylesheet' href='"));
        assert!(link.ends_with("/css/no-such-page.css'>"));
    }

    #[test]
    fn test_unversioned_mode_skips_hashing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.js"), b"1").unwrap();
        let url = versioned_url_in(dir.path(), "/static", "app.js", false);
        assert_eq!(url, "/static/app.js");
    }
}
