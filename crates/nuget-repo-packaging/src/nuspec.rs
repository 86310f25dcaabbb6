//! Reading the `.nuspec` XML manifest embedded in a `.nupkg`.

use nuget_repo_domain::{PackageId, PackageIdentity, RepositoryError, Version};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// The raw bytes of an extracted `.nuspec` manifest.
pub struct Nuspec {
    bytes: Vec<u8>,
}

impl Nuspec {
    pub fn new(bytes: Vec<u8>) -> Nuspec {
        Nuspec { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The package id read from the manifest's `<id>` element, in its
    /// original casing.
    ///
    /// Matching is namespace-agnostic: the `.nuspec` schema's default xmlns
    /// varies across NuGet tooling versions, so only the unqualified local
    /// element name is compared. Exactly one match is required.
    pub fn package_id(&self) -> Result<PackageId, RepositoryError> {
        let text = find_single_element_text(&self.bytes, "id")?;
        PackageId::parse(&text)
    }

    /// The version read from the manifest's `<version>` element.
    pub fn version(&self) -> Result<Version, RepositoryError> {
        let text = find_single_element_text(&self.bytes, "version")?;
        Version::parse(&text)
    }

    /// The identity this manifest describes, combining [`Nuspec::package_id`]
    /// and [`Nuspec::version`].
    pub fn identity(&self) -> Result<PackageIdentity, RepositoryError> {
        let id = self.package_id()?;
        let version = self.version()?;
        Ok(PackageIdentity::new(id, version))
    }
}

/// Find the text content of the single element in the document whose local
/// name (ignoring any namespace prefix) matches `local_name`. Zero or more
/// than one match is an `InvalidPackage` error, matching spec behavior for
/// missing/duplicate id or version elements.
fn find_single_element_text(xml: &[u8], local_name: &str) -> Result<String, RepositoryError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut matches: Vec<String> = Vec::new();
    let mut depth_matching: Option<usize> = None;
    let mut depth = 0usize;
    let mut buf = Vec::new();
    let mut current_text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                if local_part(e.name().as_ref()) == local_name.as_bytes() {
                    depth_matching = Some(depth);
                    current_text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                if local_part(e.name().as_ref()) == local_name.as_bytes() {
                    matches.push(String::new());
                }
            }
            Ok(Event::Text(e)) => {
                if depth_matching == Some(depth) {
                    current_text.push_str(&e.unescape().map_err(|e| {
                        RepositoryError::InvalidPackage(format!("malformed nuspec xml: {e}"))
                    })?);
                } else if depth_matching.is_some() {
                    // text inside a matching element deeper than its own start tag
                }
            }
            Ok(Event::End(e)) => {
                if local_part(e.name().as_ref()) == local_name.as_bytes()
                    && depth_matching == Some(depth)
                {
                    matches.push(std::mem::take(&mut current_text));
                    depth_matching = None;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(RepositoryError::InvalidPackage(format!(
                    "malformed nuspec xml: {e}"
                )))
            }
        }
        buf.clear();
    }

    match matches.len() {
        1 => Ok(matches.remove(0).trim().to_string()),
        0 => Err(RepositoryError::InvalidPackage(format!(
            "missing <{local_name}> element in nuspec"
        ))),
        _ => Err(RepositoryError::InvalidPackage(format!(
            "duplicate <{local_name}> element in nuspec"
        ))),
    }
}

fn local_part(qualified: &[u8]) -> &[u8] {
    match qualified.iter().position(|&b| b == b':') {
        Some(idx) => &qualified[idx + 1..],
        None => qualified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_id_and_version() {
        let xml = br#"<?xml version="1.0"?>
            <package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
              <metadata>
                <id>Foo.Bar</id>
                <version>1.2.3</version>
              </metadata>
            </package>"#;
        let nuspec = Nuspec::new(xml.to_vec());
        assert_eq!(nuspec.package_id().unwrap().original(), "Foo.Bar");
        assert_eq!(nuspec.version().unwrap().normalized(), "1.2.3");
    }

    #[test]
    fn namespace_agnostic_matching() {
        let xml = br#"<package><metadata><id>foo</id><version>1.0.0</version></metadata></package>"#;
        let nuspec = Nuspec::new(xml.to_vec());
        assert!(nuspec.package_id().is_ok());
        assert!(nuspec.version().is_ok());
    }

    #[test]
    fn missing_id_is_invalid_package() {
        let xml = br#"<package><metadata><version>1.0.0</version></metadata></package>"#;
        let nuspec = Nuspec::new(xml.to_vec());
        assert!(nuspec.package_id().is_err());
    }

    #[test]
    fn duplicate_id_is_invalid_package() {
        let xml =
            br#"<package><metadata><id>foo</id><id>bar</id><version>1.0.0</version></metadata></package>"#;
        let nuspec = Nuspec::new(xml.to_vec());
        assert!(nuspec.package_id().is_err());
    }

    #[test]
    fn invalid_version_element_is_invalid_version() {
        let xml = br#"<package><metadata><id>foo</id><version>1</version></metadata></package>"#;
        let nuspec = Nuspec::new(xml.to_vec());
        assert!(nuspec.version().is_err());
    }
}
