//! Local cache of the remote source file.
//!
//! The file is stored as `<data_dir>/<file name from the URL path>`. When that
//! file already exists the download is skipped, so a re-run reads the same
//! bytes as the first run.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use reqwest::Url;
use reqwest::header::USER_AGENT;
use tracing::{info, info_span};

use crate::error::{IngestError, Result};

const CHUNK_SIZE: usize = 16 * 1024;

/// Where the source file ended up and whether this call fetched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSource {
    pub path: PathBuf,
    pub downloaded: bool,
}

/// Last segment of the URL path, ignoring any query string or fragment.
pub fn cached_file_name(url: &str) -> Result<String> {
    let invalid = || IngestError::InvalidUrl {
        url: url.to_string(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(String::from)
        .ok_or_else(invalid)
}

pub fn cache_path(data_dir: &Path, url: &str) -> Result<PathBuf> {
    Ok(data_dir.join(cached_file_name(url)?))
}

/// Return the cached copy of `url`, downloading it first if it is not cached.
///
/// The body is streamed into a `.part` file that is renamed into place once
/// complete, so an interrupted download is never mistaken for a cached copy.
pub fn fetch_or_reuse(url: &str, data_dir: &Path) -> Result<CachedSource> {
    let path = cache_path(data_dir, url)?;
    if path.exists() {
        info!(path = %path.display(), "skipping download, file already exists");
        return Ok(CachedSource {
            path,
            downloaded: false,
        });
    }

    let span = info_span!("download", url = %url);
    let _guard = span.enter();
    info!(path = %path.display(), "downloading source file");

    fs::create_dir_all(data_dir).map_err(|error| IngestError::io(data_dir, error))?;
    let download_error = |source| IngestError::Download {
        url: url.to_string(),
        source,
    };

    let client = Client::builder()
        .timeout(None)
        .build()
        .map_err(download_error)?;
    let mut response = client
        .get(url)
        .header(USER_AGENT, concat!("eva-import/", env!("CARGO_PKG_VERSION")))
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(download_error)?;

    let part_path = path.with_extension(match path.extension() {
        Some(ext) => format!("{}.part", ext.to_string_lossy()),
        None => "part".to_string(),
    });
    let file = File::create(&part_path).map_err(|error| IngestError::io(&part_path, error))?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
    let bytes = response.copy_to(&mut writer).map_err(download_error)?;
    writer
        .flush()
        .map_err(|error| IngestError::io(&part_path, error))?;
    drop(writer);
    fs::rename(&part_path, &path).map_err(|error| IngestError::io(&path, error))?;

    info!(bytes, path = %path.display(), "download complete");
    Ok(CachedSource {
        path,
        downloaded: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_comes_from_url_path() {
        assert_eq!(
            cached_file_name("https://example.org/exports/rsm-data.csv").unwrap(),
            "rsm-data.csv"
        );
        assert_eq!(
            cached_file_name("https://example.org/exports/rsm.csv?token=abc#top").unwrap(),
            "rsm.csv"
        );
    }

    #[test]
    fn url_without_file_name_is_rejected() {
        assert!(cached_file_name("https://example.org/").is_err());
        assert!(cached_file_name("https://example.org").is_err());
    }

    #[test]
    fn unparseable_url_is_rejected() {
        assert!(matches!(
            cached_file_name("exports/rsm.csv"),
            Err(IngestError::InvalidUrl { .. })
        ));
        assert!(cached_file_name("mailto:data@example.org").is_err());
    }

    #[test]
    fn existing_file_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        let cached = dir.path().join("rsm.csv");
        fs::write(&cached, "Evaluation ID,Report ID\n").unwrap();

        let source = fetch_or_reuse("https://example.invalid/data/rsm.csv", dir.path()).unwrap();
        assert_eq!(
            source,
            CachedSource {
                path: cached,
                downloaded: false
            }
        );
    }
}
