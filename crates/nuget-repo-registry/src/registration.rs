//! The NuGet v3 registration index JSON, built from a package's version
//! index and its stored `.nuspec`s.

use serde::Serialize;

/// Produces the absolute URL a client should fetch to download a specific
/// package version's content.
///
/// Kept as a collaborator trait implemented by the HTTP crate so this core
/// stays free of anything HTTP-specific: the URL scheme is a surface
/// concern, not part of the registration document's structure.
pub trait ContentLocation {
    fn package_content_url(&self, id: &str, version: &str) -> String;
    fn registration_leaf_url(&self, id: &str, version: &str) -> String;
    fn catalog_entry_url(&self, id: &str, version: &str) -> String;
}

#[derive(Debug, Serialize)]
pub struct RegistrationIndex {
    pub count: usize,
    pub items: Vec<RegistrationPage>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationPage {
    pub lower: String,
    pub upper: String,
    pub count: usize,
    pub items: Vec<RegistrationLeaf>,
}

#[derive(Debug, Serialize)]
pub struct RegistrationLeaf {
    #[serde(rename = "@id")]
    pub at_id: String,
    #[serde(rename = "catalogEntry")]
    pub catalog_entry: CatalogEntry,
    #[serde(rename = "packageContent")]
    pub package_content: String,
    pub listed: bool,
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    #[serde(rename = "@id")]
    pub at_id: String,
    pub id: String,
    pub version: String,
}

/// A single version and the display-cased package id from its own stored
/// `.nuspec`, as required for per-leaf fidelity in spec.md §4.F.
pub struct RegistrationEntry {
    pub display_id: String,
    pub normalized_version: String,
}

/// Build the registration index for a package from its sorted, per-version
/// entries. Empty input yields `{"count": 0, "items": []}`; non-empty input
/// yields a single page (pagination is not implemented, per spec).
pub fn build_registration_index(
    entries: &[RegistrationEntry],
    content_location: &dyn ContentLocation,
) -> RegistrationIndex {
    if entries.is_empty() {
        return RegistrationIndex {
            count: 0,
            items: Vec::new(),
        };
    }

    let lower = entries[0].normalized_version.clone();
    let upper = entries[entries.len() - 1].normalized_version.clone();

    let items: Vec<RegistrationLeaf> = entries
        .iter()
        .map(|entry| RegistrationLeaf {
            at_id: content_location
                .registration_leaf_url(&entry.display_id, &entry.normalized_version),
            catalog_entry: CatalogEntry {
                at_id: content_location
                    .catalog_entry_url(&entry.display_id, &entry.normalized_version),
                id: entry.display_id.clone(),
                version: entry.normalized_version.clone(),
            },
            package_content: content_location
                .package_content_url(&entry.display_id, &entry.normalized_version),
            listed: true,
        })
        .collect();

    RegistrationIndex {
        count: 1,
        items: vec![RegistrationPage {
            lower,
            upper,
            count: items.len(),
            items,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeContentLocation;

    impl ContentLocation for FakeContentLocation {
        fn package_content_url(&self, id: &str, version: &str) -> String {
            format!("https://example.test/flatcontainer/{id}/{version}/{id}.{version}.nupkg")
        }

        fn registration_leaf_url(&self, id: &str, version: &str) -> String {
            format!("https://example.test/registrations/{id}/{version}.json")
        }

        fn catalog_entry_url(&self, id: &str, version: &str) -> String {
            format!("https://example.test/catalog/{id}/{version}.json")
        }
    }

    #[test]
    fn empty_entries_yield_empty_index() {
        let index = build_registration_index(&[], &FakeContentLocation);
        assert_eq!(index.count, 0);
        assert!(index.items.is_empty());
    }

    #[test]
    fn single_page_with_bounds() {
        let entries = vec![
            RegistrationEntry {
                display_id: "Foo".to_string(),
                normalized_version: "1.0.0".to_string(),
            },
            RegistrationEntry {
                display_id: "Foo".to_string(),
                normalized_version: "1.1.0".to_string(),
            },
        ];
        let index = build_registration_index(&entries, &FakeContentLocation);
        assert_eq!(index.count, 1);
        let page = &index.items[0];
        assert_eq!(page.lower, "1.0.0");
        assert_eq!(page.upper, "1.1.0");
        assert_eq!(page.count, 2);
        assert!(page.items.iter().all(|leaf| leaf.listed));
        assert_eq!(page.items[0].catalog_entry.id, "Foo");
    }
}
