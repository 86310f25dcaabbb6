//! Package ingestion orchestration ([`Repository`]), the versions index
//! ([`Versions`]), and the NuGet v3 registration view ([`registration`]).

pub mod registration;
pub mod repository;
pub mod versions;

pub use registration::{
    build_registration_index, CatalogEntry, ContentLocation, RegistrationEntry,
    RegistrationIndex, RegistrationLeaf, RegistrationPage,
};
pub use repository::Repository;
pub use versions::Versions;
