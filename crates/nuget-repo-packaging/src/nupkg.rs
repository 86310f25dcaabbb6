//! Reading a `.nupkg` ZIP archive.

use std::io::{Cursor, Read};

use nuget_repo_domain::RepositoryError;
use zip::ZipArchive;

use crate::nuspec::Nuspec;

/// A `.nupkg` archive held entirely in memory, as staged by the ingestion
/// pipeline before its identity is known.
pub struct Nupkg {
    bytes: Vec<u8>,
}

impl Nupkg {
    pub fn new(bytes: Vec<u8>) -> Nupkg {
        Nupkg { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Locate the single top-level `*.nuspec` entry in the archive and
    /// return it as a [`Nuspec`].
    ///
    /// Fails with `InvalidPackage` if the archive cannot be opened, if no
    /// top-level `.nuspec` entry exists, or if more than one does. "Top
    /// level" excludes entries nested under a directory, since some nupkgs
    /// carry unrelated `.nuspec`-suffixed files inside `content/` or similar.
    pub fn nuspec(&self) -> Result<Nuspec, RepositoryError> {
        let cursor = Cursor::new(&self.bytes);
        let mut archive = ZipArchive::new(cursor)
            .map_err(|e| RepositoryError::InvalidPackage(format!("malformed zip archive: {e}")))?;

        let mut candidate_index: Option<usize> = None;
        for i in 0..archive.len() {
            let entry = archive
                .by_index(i)
                .map_err(|e| RepositoryError::InvalidPackage(format!("malformed zip entry: {e}")))?;
            let name = entry.name();
            if is_top_level_nuspec(name) {
                if candidate_index.is_some() {
                    return Err(RepositoryError::InvalidPackage(
                        "multiple top-level .nuspec entries".to_string(),
                    ));
                }
                candidate_index = Some(i);
            }
        }

        let index = candidate_index.ok_or_else(|| {
            RepositoryError::InvalidPackage("no top-level .nuspec entry found".to_string())
        })?;

        let mut entry = archive
            .by_index(index)
            .map_err(|e| RepositoryError::InvalidPackage(format!("malformed zip entry: {e}")))?;
        let mut buf = Vec::with_capacity(entry.size() as usize);
        entry
            .read_to_end(&mut buf)
            .map_err(|e| RepositoryError::InvalidPackage(format!("failed to read nuspec: {e}")))?;

        Ok(Nuspec::new(buf))
    }
}

fn is_top_level_nuspec(name: &str) -> bool {
    !name.contains('/') && !name.contains('\\') && name.to_lowercase().ends_with(".nuspec")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = Cursor::new(&mut buf);
            let mut writer = ZipWriter::new(cursor);
            let options = FileOptions::default();
            for (name, content) in entries {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn finds_top_level_nuspec() {
        let xml = b"<package><metadata><id>foo</id><version>1.0.0</version></metadata></package>";
        let zip = build_zip(&[("foo.nuspec", xml), ("lib/net8.0/foo.dll", b"binary")]);
        let nupkg = Nupkg::new(zip);
        let nuspec = nupkg.nuspec().unwrap();
        assert!(nuspec.package_id().is_ok());
    }

    #[test]
    fn ignores_nested_nuspec_like_files() {
        let xml = b"<package><metadata><id>foo</id><version>1.0.0</version></metadata></package>";
        let zip = build_zip(&[
            ("foo.nuspec", xml),
            ("content/decoy.nuspec", b"<package/>"),
        ]);
        let nupkg = Nupkg::new(zip);
        assert!(nupkg.nuspec().is_ok());
    }

    #[test]
    fn fails_when_no_nuspec_present() {
        let zip = build_zip(&[("readme.txt", b"hello")]);
        let nupkg = Nupkg::new(zip);
        assert!(nupkg.nuspec().is_err());
    }

    #[test]
    fn fails_when_multiple_top_level_nuspecs_present() {
        let xml = b"<package><metadata><id>foo</id><version>1.0.0</version></metadata></package>";
        let zip = build_zip(&[("foo.nuspec", xml), ("bar.nuspec", xml)]);
        let nupkg = Nupkg::new(zip);
        assert!(nupkg.nuspec().is_err());
    }

    #[test]
    fn fails_on_malformed_archive() {
        let nupkg = Nupkg::new(vec![0u8; 16]);
        assert!(nupkg.nuspec().is_err());
    }
}
