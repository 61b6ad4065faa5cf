//! Basic utility functionality supporting revocation status determination

pub mod alg_oids;
pub mod crypto;
pub mod error;
pub mod utilities;

pub use crate::{util::alg_oids::*, util::crypto::*, util::error::*, util::utilities::*};
