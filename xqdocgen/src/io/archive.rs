//! Bundle extraction from the zip archive.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, instrument};
use zip::ZipArchive;

use crate::bundle;

/// Extract every non-directory entry under `prefix` into `target`, with the
/// prefix stripped from each entry path.
///
/// Parent directories are created as needed. Pre-existing contents of
/// `target` are not cleared; files from a prior run are overwritten where
/// names collide. Returns the number of files written.
///
/// Any failure here aborts the whole run before a process is spawned.
#[instrument(skip_all, fields(archive = %archive_path.display(), target = %target.display()))]
pub fn extract_assets(archive_path: &Path, prefix: &str, target: &Path) -> Result<usize> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("open bundle archive {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("read bundle archive {}", archive_path.display()))?;

    let prefix = prefix.trim_end_matches('/');
    let mut written = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).context("read archive entry")?;
        if entry.is_dir() {
            continue;
        }
        let Some(name) = entry.enclosed_name() else {
            bail!("archive entry escapes extraction target: {}", entry.name());
        };
        let Ok(rel) = name.strip_prefix(prefix) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let dest = target.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let mut out =
            fs::File::create(&dest).with_context(|| format!("create {}", dest.display()))?;
        io::copy(&mut entry, &mut out).with_context(|| format!("extract {}", dest.display()))?;
        written += 1;
    }
    debug!(written, "extracted bundle entries");
    Ok(written)
}

/// Check that the archive holds everything a run extracts and invokes:
/// the Calabash jar, the pipeline file, and the static assets.
pub fn verify_bundle(archive_path: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)
        .with_context(|| format!("open bundle archive {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("read bundle archive {}", archive_path.display()))?;

    for rel in [bundle::CALABASH_JAR, bundle::PIPELINE_FILE]
        .into_iter()
        .chain(bundle::STATIC_ASSETS)
    {
        let name = format!("{}{rel}", bundle::ARCHIVE_PREFIX);
        if archive.by_name(&name).is_err() {
            bail!("bundle archive is missing entry {name}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_contents, write_bundle_zip};
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, Option<&str>)]) {
        let file = fs::File::create(path).expect("create zip");
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, contents) in entries {
            match contents {
                Some(contents) => {
                    zip.start_file(*name, options).expect("start file");
                    zip.write_all(contents.as_bytes()).expect("write entry");
                }
                None => {
                    zip.add_directory(*name, options).expect("add directory");
                }
            }
        }
        zip.finish().expect("finish zip");
    }

    /// Directory entries interleave with files; only files under the prefix
    /// are written, at prefix-stripped paths.
    #[test]
    fn extracts_prefix_stripped_files_only() {
        let temp = tempfile::tempdir().expect("tempdir");
        let archive_path = temp.path().join("bundle.zip");
        write_zip(
            &archive_path,
            &[
                ("xquerydoc/", None),
                ("xquerydoc/xpl/", None),
                ("xquerydoc/xpl/main.xpl", Some("<p:declare-step/>\n")),
                ("xquerydoc/xpl/README", Some("readme\n")),
                ("unrelated/skip.txt", Some("not extracted\n")),
            ],
        );

        let target = temp.path().join("scratch");
        let written =
            extract_assets(&archive_path, bundle::ARCHIVE_PREFIX, &target).expect("extract");

        assert_eq!(written, 2);
        let main = fs::read_to_string(target.join("xpl/main.xpl")).expect("read main.xpl");
        assert_eq!(main, "<p:declare-step/>\n");
        let readme = fs::read_to_string(target.join("xpl/README")).expect("read README");
        assert_eq!(readme, "readme\n");
        assert!(!target.join("xquerydoc").exists());
        assert!(!target.join("skip.txt").exists());
    }

    #[test]
    fn stale_files_are_overwritten() {
        let temp = tempfile::tempdir().expect("tempdir");
        let archive_path = temp.path().join("bundle.zip");
        write_zip(&archive_path, &[("xquerydoc/xpl/main.xpl", Some("fresh\n"))]);

        let target = temp.path().join("scratch");
        fs::create_dir_all(target.join("xpl")).expect("create stale dir");
        fs::write(target.join("xpl/main.xpl"), "stale\n").expect("write stale");
        fs::write(target.join("leftover.txt"), "old run\n").expect("write leftover");

        extract_assets(&archive_path, bundle::ARCHIVE_PREFIX, &target).expect("extract");

        let main = fs::read_to_string(target.join("xpl/main.xpl")).expect("read");
        assert_eq!(main, "fresh\n");
        // Extraction does not clear the target first.
        assert!(target.join("leftover.txt").exists());
    }

    #[test]
    fn missing_archive_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = extract_assets(
            &temp.path().join("missing.zip"),
            bundle::ARCHIVE_PREFIX,
            &temp.path().join("scratch"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("open bundle archive"));
    }

    #[test]
    fn fixture_bundle_round_trips_byte_identical() {
        let temp = tempfile::tempdir().expect("tempdir");
        let archive_path = temp.path().join("bundle.zip");
        write_bundle_zip(&archive_path).expect("write bundle");

        let target = temp.path().join("scratch");
        extract_assets(&archive_path, bundle::ARCHIVE_PREFIX, &target).expect("extract");

        for rel in [bundle::CALABASH_JAR, bundle::PIPELINE_FILE]
            .into_iter()
            .chain(bundle::STATIC_ASSETS)
        {
            let extracted = fs::read_to_string(target.join(rel)).expect("read extracted");
            assert_eq!(extracted, fixture_contents(rel));
        }
    }

    #[test]
    fn verify_bundle_accepts_complete_fixture() {
        let temp = tempfile::tempdir().expect("tempdir");
        let archive_path = temp.path().join("bundle.zip");
        write_bundle_zip(&archive_path).expect("write bundle");
        verify_bundle(&archive_path).expect("verify");
    }

    #[test]
    fn verify_bundle_reports_missing_entry() {
        let temp = tempfile::tempdir().expect("tempdir");
        let archive_path = temp.path().join("bundle.zip");
        write_zip(
            &archive_path,
            &[("xquerydoc/xquerydoc.xpl", Some("<p:declare-step/>\n"))],
        );

        let err = verify_bundle(&archive_path).unwrap_err();
        assert!(err.to_string().contains("calabash.jar"));
    }
}
