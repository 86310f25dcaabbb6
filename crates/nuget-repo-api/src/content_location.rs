//! The [`ContentLocation`] collaborator the registration view needs to
//! build absolute URLs, implemented here so the registry core stays free
//! of anything HTTP-specific (SPEC_FULL.md §4.F).

use nuget_repo_registry::ContentLocation;

/// Builds URLs rooted at the server's configured public base URL.
pub struct UrlBuilder {
    base_url: String,
}

impl UrlBuilder {
    pub fn new(base_url: impl Into<String>) -> UrlBuilder {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        UrlBuilder { base_url }
    }
}

impl ContentLocation for UrlBuilder {
    fn package_content_url(&self, id: &str, version: &str) -> String {
        let id = id.to_lowercase();
        format!(
            "{}/v3/flatcontainer/{id}/{version}/{id}.{version}.nupkg",
            self.base_url
        )
    }

    fn registration_leaf_url(&self, id: &str, version: &str) -> String {
        let id = id.to_lowercase();
        format!(
            "{}/registrations/{id}/{version}.json",
            self.base_url
        )
    }

    fn catalog_entry_url(&self, id: &str, version: &str) -> String {
        let id = id.to_lowercase();
        format!(
            "{}/registrations/{id}/{version}.json#catalogEntry",
            self.base_url
        )
    }
}
