//! Revocation status determination via OCSP
//!
//! The revocation module provides the pieces used to determine the revocation status of an
//! X.509 certificate with OCSP: the certificate identity key used to correlate a certificate
//! with cached and responder-provided data, the request builder, the response processing
//! pipeline, the checker that orchestrates them, and the method registry into which checker
//! kinds are installed at startup.
//!
//! As shown in the example below, a checker is registered once during initialization and then
//! constructed against a [`RevocationEnvironment`](../environment/revocation_environment/struct.RevocationEnvironment.html)
//! that supplies signature verification, caching and transport functionality.
//!
//! ```
//! use revstat::*;
//!
//! // once, during library initialization
//! OcspChecker::register_self();
//!
//! let mut pe = RevocationEnvironment::default();
//! populate_default_environment(&mut pe);
//! pe.add_revocation_cache(Box::new(StatusCacheMap::default()));
//! # #[cfg(feature = "remote")]
//! pe.add_ocsp_transport(Box::new(HttpOcspTransport::default()));
//!
//! let checker = OcspChecker::create(
//!     RevocationMethodType::Ocsp,
//!     Default::default(),
//!     0,
//!     verify_ocsp_signature,
//! ).unwrap();
//! ```
//!
//! A revocation status determination is then performed with
//! [`check_local`](method/trait.RevocationChecker.html#tymethod.check_local) (cache only) and,
//! when that yields no information,
//! [`check_external`](method/trait.RevocationChecker.html#tymethod.check_external).

pub mod cert_id;
pub mod method;
pub mod ocsp_checker;
pub mod ocsp_request;
pub mod ocsp_response;
pub mod settings;

#[cfg(feature = "remote")]
pub mod ocsp_http;

pub use crate::revocation::{
    cert_id::*, method::*, ocsp_checker::*, ocsp_request::*, ocsp_response::*, settings::*,
};

#[cfg(feature = "remote")]
pub use crate::revocation::ocsp_http::*;
