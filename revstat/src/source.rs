//! Provides storage implementations backing the collaborator contracts consumed during
//! revocation status determination

pub mod status_cache;

pub use crate::source::status_cache::*;
