//! `.nupkg`/`.nuspec` reading and content hashing.

pub mod hash;
pub mod nupkg;
pub mod nuspec;

pub use hash::Hash;
pub use nupkg::Nupkg;
pub use nuspec::Nuspec;
