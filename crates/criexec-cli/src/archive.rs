//! Packing local directories into the gzip tarballs `cp` uploads.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use flate2::Compression;
use flate2::write::GzEncoder;

/// Packs `dir` into `<out_dir>/<dir name>.tar.gz`.
///
/// Entries are rooted at the directory's own name, so extracting under a
/// destination `D` recreates `D/<dir name>/...`.
///
/// # Errors
///
/// Returns an error if `dir` has no final component or cannot be read, or
/// the archive cannot be written.
pub fn pack_dir(dir: &Path, out_dir: &Path) -> anyhow::Result<PathBuf> {
    let name = dir
        .file_name()
        .with_context(|| format!("{} has no directory name", dir.display()))?;
    let mut archive_name = name.to_os_string();
    archive_name.push(".tar.gz");
    let archive = out_dir.join(archive_name);

    let file = File::create(&archive)
        .with_context(|| format!("creating {}", archive.display()))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder
        .append_dir_all(name, dir)
        .with_context(|| format!("packing {}", dir.display()))?;
    let _ = builder
        .into_inner()
        .and_then(GzEncoder::finish)
        .with_context(|| format!("finishing {}", archive.display()))?;

    tracing::debug!(dir = %dir.display(), archive = %archive.display(), "directory packed");
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    #[test]
    fn packs_tree_under_directory_name() {
        let src = tempfile::tempdir().unwrap();
        let tools = src.path().join("tools");
        std::fs::create_dir_all(tools.join("bin")).unwrap();
        std::fs::write(tools.join("bin/probe.sh"), "#!/bin/sh\necho probe\n").unwrap();
        let out = tempfile::tempdir().unwrap();

        let archive = pack_dir(&tools, out.path()).unwrap();
        assert_eq!(archive.file_name().unwrap(), "tools.tar.gz");

        let mut reader = tar::Archive::new(GzDecoder::new(File::open(&archive).unwrap()));
        let mut found = None;
        for entry in reader.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.path().unwrap() == Path::new("tools/bin/probe.sh") {
                let mut body = String::new();
                let _ = entry.read_to_string(&mut body).unwrap();
                found = Some(body);
            }
        }
        assert_eq!(found.as_deref(), Some("#!/bin/sh\necho probe\n"));
    }

    #[test]
    fn missing_directory_fails() {
        let out = tempfile::tempdir().unwrap();
        assert!(pack_dir(&out.path().join("absent"), out.path()).is_err());
    }
}
