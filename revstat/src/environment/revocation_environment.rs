//! RevocationEnvironment aggregates a set of function pointers and trait objects that supply
//! functionality used while determining the revocation status of a certificate: signature
//! verification, cached status storage and retrieval, and OCSP request/response transport.
//!
//! The sample below illustrates preparation of a RevocationEnvironment object for use with an
//! OCSP checker.
//! ```
//! use revstat::*;
//!
//! let mut pe = RevocationEnvironment::default();
//!
//! // add basic signature verification capabilities
//! populate_default_environment(&mut pe);
//!
//! // add a status cache (applications may supply their own implementation)
//! pe.add_revocation_cache(Box::new(StatusCacheMap::default()));
//! ```
//!
//! The aggregation of function pointers and trait objects allows implementations of features
//! to vary, e.g., one application may verify signatures via an FFI-backed module while
//! another uses the Rust Crypto support included here, and transports may be blocking or
//! non-blocking without the checker knowing the difference.

use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::environment::revocation_environment_traits::*;
use crate::revocation::cert_id::OcspCertId;
use crate::util::crypto::verify_signature_message_rust_crypto;
use crate::util::error::*;

/// [`RevocationEnvironment`] provides a switchboard of callback functions and trait objects
/// that allow support to vary on different platforms or to be tailored for specific use cases.
pub struct RevocationEnvironment {
    /// List of functions that provide signature verification functionality given a message
    verify_signature_message_callbacks: Vec<VerifySignatureMessage>,

    /// List of trait objects that provide access to cached revocation status determinations
    revocation_caches: Vec<Box<(dyn RevocationStatusCache + Send + Sync)>>,

    /// List of trait objects that provide OCSP request/response transport; the first
    /// registered transport services all exchanges
    ocsp_transports: Vec<Box<(dyn OcspTransport + Send + Sync)>>,
}

impl Default for RevocationEnvironment {
    /// RevocationEnvironment::default returns a new [`RevocationEnvironment`] with empty
    /// callback and trait object lists.
    fn default() -> Self {
        RevocationEnvironment {
            verify_signature_message_callbacks: vec![],
            revocation_caches: vec![],
            ocsp_transports: vec![],
        }
    }
}

impl RevocationEnvironment {
    /// Creates a new empty [`RevocationEnvironment`]
    pub fn new() -> Self {
        Self::default()
    }

    /// add_verify_signature_message_callback adds a [`VerifySignatureMessage`] callback to the
    /// list used by verify_signature_message.
    pub fn add_verify_signature_message_callback(&mut self, c: VerifySignatureMessage) {
        self.verify_signature_message_callbacks.push(c);
    }

    /// clear_verify_signature_message_callbacks clears the list of [`VerifySignatureMessage`]
    /// callbacks used by verify_signature_message.
    pub fn clear_verify_signature_message_callbacks(&mut self) {
        self.verify_signature_message_callbacks.clear();
    }

    /// verify_signature_message iterates over verify_signature_message_callbacks until an
    /// authoritative answer is found or all options have been exhausted.
    pub fn verify_signature_message(
        &self,
        pe: &RevocationEnvironment,
        message_to_verify: &[u8],                 // buffer to verify
        signature: &[u8],                         // signature
        signature_alg: &AlgorithmIdentifierOwned, // signature algorithm
        spki: &SubjectPublicKeyInfoOwned,         // public key
    ) -> Result<()> {
        for f in &self.verify_signature_message_callbacks {
            let r = f(pe, message_to_verify, signature, signature_alg, spki);
            if let Ok(r) = r {
                return Ok(r);
            }
        }
        Err(Error::Unrecognized)
    }

    /// add_revocation_cache adds a [`RevocationStatusCache`] object to the list used by
    /// get_fresh_status, add_status and record_processing_failure.
    pub fn add_revocation_cache(&mut self, c: Box<(dyn RevocationStatusCache + Send + Sync)>) {
        self.revocation_caches.push(c);
    }

    /// clear_revocation_caches clears the list of [`RevocationStatusCache`] objects.
    pub fn clear_revocation_caches(&mut self) {
        self.revocation_caches.clear();
    }

    /// get_fresh_status iterates over revocation_caches until an authoritative answer is found
    /// or all options have been exhausted.
    pub fn get_fresh_status(
        &self,
        cid: &OcspCertId,
        time_of_interest: u64,
    ) -> Option<CachedStatus> {
        for c in &self.revocation_caches {
            if let Some(status) = c.get_fresh_status(cid, time_of_interest) {
                return Some(status);
            }
        }
        None
    }

    /// add_status records a definitive determination with every registered cache.
    pub fn add_status(&self, cid: &OcspCertId, next_update: u64, status: CachedStatus) {
        for c in &self.revocation_caches {
            c.add_status(cid, next_update, status);
        }
    }

    /// record_processing_failure records a processing-failure marker with every registered
    /// cache, returning the first error observed, if any. Callers treat this operation as
    /// best-effort and ignore the returned error.
    pub fn record_processing_failure(&self, cid: &OcspCertId) -> Result<()> {
        let mut retval = Ok(());
        for c in &self.revocation_caches {
            let r = c.record_processing_failure(cid);
            if r.is_err() && retval.is_ok() {
                retval = r;
            }
        }
        retval
    }

    /// add_ocsp_transport adds an [`OcspTransport`] object to the list used by ocsp_exchange.
    pub fn add_ocsp_transport(&mut self, c: Box<(dyn OcspTransport + Send + Sync)>) {
        self.ocsp_transports.push(c);
    }

    /// clear_ocsp_transports clears the list of [`OcspTransport`] objects.
    pub fn clear_ocsp_transports(&mut self) {
        self.ocsp_transports.clear();
    }

    /// ocsp_exchange submits an encoded OCSP request (or resumes a suspended exchange) via the
    /// first registered transport. An error is returned if no transport has been registered.
    pub fn ocsp_exchange(
        &self,
        uri: &str,
        request: &[u8],
        resume: Option<ResumeToken>,
    ) -> Result<Suspendable<Vec<u8>>> {
        match self.ocsp_transports.first() {
            Some(t) => t.exchange(uri, request, resume),
            None => Err(Error::NetworkError),
        }
    }
}

/// populate_default_environment adds the signature verification capabilities provided by this
/// crate to the presented [`RevocationEnvironment`].
pub fn populate_default_environment(pe: &mut RevocationEnvironment) {
    pe.add_verify_signature_message_callback(verify_signature_message_rust_crypto);
}
