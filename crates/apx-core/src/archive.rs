//! Zip packaging of the assembled bundle.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{Error, Result};

/// A written archive and the digest of its bytes.
#[derive(Debug, Clone)]
pub struct BundleArchive {
    pub path: PathBuf,
    /// BLAKE3 hex digest of the archive file.
    pub digest: String,
}

/// Compress the `apiproxy` tree into a single archive.
///
/// Entries carry the `apiproxy/` prefix so the archive unpacks to the
/// layout the management API expects. Entries are sorted and stamped with
/// a fixed timestamp, so the same tree always produces the same bytes.
/// Overwrites any prior archive at the same path.
pub fn archive_bundle(bundle_dir: &Path, archive_path: &Path) -> Result<BundleArchive> {
    let file =
        fs::File::create(archive_path).map_err(|err| Error::archive(archive_path, err))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    add_dir_recursive(&mut zip, bundle_dir, "apiproxy", options, archive_path)?;
    zip.finish().map_err(|err| Error::archive(archive_path, err))?;

    let bytes = fs::read(archive_path).map_err(|err| Error::archive(archive_path, err))?;
    let digest = blake3::hash(&bytes).to_hex().to_string();
    info!("created bundle archive {}", archive_path.display());

    Ok(BundleArchive {
        path: archive_path.to_path_buf(),
        digest,
    })
}

fn add_dir_recursive(
    zip: &mut ZipWriter<fs::File>,
    dir: &Path,
    prefix: &str,
    options: SimpleFileOptions,
    archive_path: &Path,
) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|err| Error::archive(archive_path, err))?;
    let mut sorted: Vec<_> = entries
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|err| Error::archive(archive_path, err))?;
    sorted.sort_by_key(|entry| entry.file_name());

    for entry in sorted {
        let name = entry.file_name();
        let rel = format!("{}/{}", prefix, name.to_string_lossy());
        let ty = entry
            .file_type()
            .map_err(|err| Error::archive(archive_path, err))?;

        if ty.is_dir() {
            zip.add_directory(rel.as_str(), options)
                .map_err(|err| Error::archive(archive_path, err))?;
            add_dir_recursive(zip, &entry.path(), &rel, options, archive_path)?;
        } else {
            zip.start_file(rel.as_str(), options)
                .map_err(|err| Error::archive(archive_path, err))?;
            let content =
                fs::read(entry.path()).map_err(|err| Error::archive(archive_path, err))?;
            zip.write_all(&content)
                .map_err(|err| Error::archive(archive_path, err))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn open_archive(path: &Path) -> zip::ZipArchive<fs::File> {
        zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap()
    }

    #[test]
    fn archive_contains_prefixed_entries() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("apiproxy");
        write_file(&bundle.join("policies").join("quota.xml"), "<Quota/>");
        write_file(&bundle.join("proxies").join("default.xml"), "<Proxy/>");
        let archive_path = temp.path().join("apiproxy.zip");

        archive_bundle(&bundle, &archive_path).unwrap();

        let mut archive = open_archive(&archive_path);
        let mut content = String::new();
        archive
            .by_name("apiproxy/policies/quota.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<Quota/>");
    }

    #[test]
    fn empty_subdirectories_survive_archiving() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("apiproxy");
        for sub in ["policies", "proxies", "targets"] {
            fs::create_dir_all(bundle.join(sub)).unwrap();
        }
        let archive_path = temp.path().join("apiproxy.zip");

        archive_bundle(&bundle, &archive_path).unwrap();

        let archive = open_archive(&archive_path);
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"apiproxy/proxies/"));
        assert!(names.contains(&"apiproxy/targets/"));
    }

    #[test]
    fn rearchiving_the_same_tree_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let bundle = temp.path().join("apiproxy");
        write_file(&bundle.join("policies").join("a.xml"), "<A/>");
        write_file(&bundle.join("policies").join("b.xml"), "<B/>");
        let archive_path = temp.path().join("apiproxy.zip");

        let first = archive_bundle(&bundle, &archive_path).unwrap();
        let second = archive_bundle(&bundle, &archive_path).unwrap();

        assert_eq!(first.digest, second.digest);
    }

    #[test]
    fn missing_bundle_dir_is_an_archive_error() {
        let temp = TempDir::new().unwrap();
        let result = archive_bundle(
            &temp.path().join("nonexistent"),
            &temp.path().join("apiproxy.zip"),
        );
        assert!(matches!(result, Err(Error::Archive { .. })));
    }
}
