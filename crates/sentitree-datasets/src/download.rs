//! # Download & Extraction
//!
//! Fetches a corpus archive over HTTP and unpacks it under
//! `<root>/<name>`. An existing directory is reused unless the caller asks
//! to overwrite it.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{DatasetError, Result};
use crate::registry::archive_name;

/// Upper bound for a single archive download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Archive formats we know how to unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
}

impl ArchiveFormat {
    /// Detect the format from a file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("zip") {
            Some(Self::Zip)
        } else {
            None
        }
    }
}

/// Download `url` and extract it into `<root>/<name>`.
///
/// When `<root>/<name>` already exists and `overwrite` is false, nothing is
/// fetched. Otherwise the archive is downloaded and unpacked into a staging
/// directory `<root>/<name>.tmp`, which replaces the old directory only once
/// extraction succeeded. The archive itself is kept next to the extracted
/// files.
///
/// Returns the dataset directory.
pub fn download_extract(
    url: &str,
    name: &str,
    root: impl AsRef<Path>,
    overwrite: bool,
) -> Result<PathBuf> {
    let root = root.as_ref();
    let target = root.join(name);

    if target.exists() && !overwrite {
        info!(path = %target.display(), "dataset already present, skipping download");
        return Ok(target);
    }

    let archive = archive_name(url);
    if ArchiveFormat::from_path(Path::new(archive)).is_none() {
        return Err(DatasetError::UnsupportedArchive(PathBuf::from(archive)));
    }

    fs::create_dir_all(root)?;
    let partial = root.join(format!("{archive}.part"));
    download(url, &partial)?;

    let staging = root.join(format!("{name}.tmp"));
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    if let Err(err) = unpack_into(&partial, archive, &staging) {
        warn!(path = %staging.display(), error = %err, "extraction failed, discarding");
        let _ = fs::remove_dir_all(&staging);
        let _ = fs::remove_file(&partial);
        return Err(err);
    }

    if target.exists() {
        info!(path = %target.display(), "removing previous download");
        fs::remove_dir_all(&target)?;
    }
    fs::rename(&staging, &target)?;

    Ok(target)
}

/// Move the downloaded archive into `dir` and extract it there.
fn unpack_into(partial: &Path, archive: &str, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let archive_path = dir.join(archive);
    fs::rename(partial, &archive_path)?;
    extract(&archive_path, dir)
}

/// Stream `url` into `dest`, returning the number of bytes written.
///
/// A partially written file is removed on failure.
pub fn download(url: &str, dest: &Path) -> Result<u64> {
    info!(url, dest = %dest.display(), "downloading");

    let http_error = |source| DatasetError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("sentitree/", env!("CARGO_PKG_VERSION")))
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(http_error)?;

    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(http_error)?;

    let mut file = File::create(dest)?;
    match response.copy_to(&mut file) {
        Ok(bytes) => {
            info!(bytes, "download complete");
            Ok(bytes)
        }
        Err(source) => {
            drop(file);
            let _ = fs::remove_file(dest);
            Err(http_error(source))
        }
    }
}

/// Unpack `archive` into `dest`, creating directories as needed.
pub fn extract(archive: &Path, dest: &Path) -> Result<()> {
    match ArchiveFormat::from_path(archive) {
        Some(ArchiveFormat::Zip) => extract_zip(archive, dest),
        None => Err(DatasetError::UnsupportedArchive(archive.to_path_buf())),
    }
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))?;
    info!(archive = %archive.display(), entries = zip.len(), "extracting");

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;

        let Some(relative) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let out = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }

        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&out)?;
        io::copy(&mut entry, &mut file)?;
        debug!(path = %out.display(), "extracted");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use zip::write::SimpleFileOptions;

    use super::*;

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        fs::write(path, zip_bytes(entries)).unwrap();
    }

    /// Answers `requests` GETs on a loopback port with `body`.
    fn serve(body: Vec<u8>, requests: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming().take(requests) {
                let mut stream = stream.unwrap();
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                stream.write_all(head.as_bytes()).unwrap();
                stream.write_all(&body).unwrap();
            }
        });
        format!("http://{addr}/trainDevTestTrees_PTB.zip")
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ArchiveFormat::from_path(Path::new("trainDevTestTrees_PTB.zip")),
            Some(ArchiveFormat::Zip)
        );
        assert_eq!(ArchiveFormat::from_path(Path::new("SST.ZIP")), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_path(Path::new("sst.tar.gz")), None);
        assert_eq!(ArchiveFormat::from_path(Path::new("sst")), None);
    }

    #[test]
    fn test_extract_zip_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("trees.zip");
        write_zip(
            &archive,
            &[
                ("trees/train.txt", "(3 (2 a) (3 fine))\n"),
                ("trees/dev.txt", "(2 ok)\n"),
            ],
        );

        let dest = dir.path().join("sst");
        extract(&archive, &dest).unwrap();

        let train = fs::read_to_string(dest.join("trees/train.txt")).unwrap();
        assert_eq!(train, "(3 (2 a) (3 fine))\n");
        assert!(dest.join("trees/dev.txt").is_file());
    }

    #[test]
    fn test_extract_skips_escaping_entries() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.zip");
        write_zip(&archive, &[("../outside.txt", "x"), ("inside.txt", "y")]);

        let dest = dir.path().join("out");
        extract(&archive, &dest).unwrap();

        assert!(dest.join("inside.txt").is_file());
        assert!(!dir.path().join("outside.txt").exists());
    }

    #[test]
    fn test_extract_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract(&dir.path().join("a.rar"), dir.path()).unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedArchive(_)));
    }

    #[test]
    fn test_existing_directory_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sst/trees")).unwrap();

        // Nothing listens on the discard port; reaching the network would fail.
        let target =
            download_extract("http://127.0.0.1:9/sst.zip", "sst", dir.path(), false).unwrap();
        assert_eq!(target, dir.path().join("sst"));
    }

    #[test]
    fn test_failed_overwrite_keeps_previous_data() {
        let dir = tempfile::tempdir().unwrap();
        let trees = dir.path().join("sst/trees");
        fs::create_dir_all(&trees).unwrap();
        fs::write(trees.join("train.txt"), "(2 ok)\n").unwrap();

        let err =
            download_extract("http://127.0.0.1:9/sst.zip", "sst", dir.path(), true).unwrap_err();
        assert!(matches!(err, DatasetError::Http { .. }));
        assert!(trees.join("train.txt").is_file());
        assert!(!dir.path().join("sst.zip.part").exists());
    }

    #[test]
    fn test_unsupported_url_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let err = download_extract("http://127.0.0.1:9/sst.tar.gz", "sst", dir.path(), false)
            .unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedArchive(_)));
    }

    #[test]
    fn test_download_extract_from_server() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve(zip_bytes(&[("trees/train.txt", "(3 (3 fine))\n")]), 1);

        let target = download_extract(&url, "sst", dir.path(), false).unwrap();

        assert_eq!(target, dir.path().join("sst"));
        assert_eq!(
            fs::read_to_string(target.join("trees/train.txt")).unwrap(),
            "(3 (3 fine))\n"
        );
        assert!(target.join("trainDevTestTrees_PTB.zip").is_file());
        assert!(!dir.path().join("sst.tmp").exists());
        assert!(!dir.path().join("trainDevTestTrees_PTB.zip.part").exists());
    }

    #[test]
    fn test_overwrite_replaces_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("sst/trees");
        fs::create_dir_all(&old).unwrap();
        fs::write(old.join("stale.txt"), "old").unwrap();

        let url = serve(zip_bytes(&[("trees/dev.txt", "(2 ok)\n")]), 1);
        let target = download_extract(&url, "sst", dir.path(), true).unwrap();

        assert!(!target.join("trees/stale.txt").exists());
        assert!(target.join("trees/dev.txt").is_file());
    }

    #[test]
    fn test_failed_extraction_leaves_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve(b"<html>not found</html>".to_vec(), 1);

        let err = download_extract(&url, "sst", dir.path(), false).unwrap_err();
        assert!(matches!(err, DatasetError::Archive(_)));
        assert!(!dir.path().join("sst").exists());
        assert!(!dir.path().join("sst.tmp").exists());
        assert!(!dir.path().join("trainDevTestTrees_PTB.zip.part").exists());

        // The next run must try the network again instead of trusting a cache.
        let err = download_extract(
            "http://127.0.0.1:9/trainDevTestTrees_PTB.zip",
            "sst",
            dir.path(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, DatasetError::Http { .. }));
    }

    #[test]
    fn test_failed_extraction_keeps_previous_data() {
        let dir = tempfile::tempdir().unwrap();
        let trees = dir.path().join("sst/trees");
        fs::create_dir_all(&trees).unwrap();
        fs::write(trees.join("train.txt"), "(2 ok)\n").unwrap();

        let url = serve(b"garbage".to_vec(), 1);
        let err = download_extract(&url, "sst", dir.path(), true).unwrap_err();

        assert!(matches!(err, DatasetError::Archive(_)));
        assert!(trees.join("train.txt").is_file());
    }
}
