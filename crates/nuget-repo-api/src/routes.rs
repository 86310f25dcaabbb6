//! Route modules, one per resource, merged into a single router in
//! [`crate::app::create_app`].

pub mod flatcontainer;
pub mod health;
pub mod publish;
pub mod registration;
