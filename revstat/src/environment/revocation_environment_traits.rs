//! The revocation_environment_traits module features trait definitions and type definitions
//! that are used by [`RevocationEnvironment`](../revocation_environment/struct.RevocationEnvironment.html)
//! to provide functionality that supports revocation status determination.

use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use crate::revocation::cert_id::OcspCertId;
use crate::util::error::*;

/// Opaque token identifying in-flight non-blocking work held by a collaborator.
///
/// Tokens are produced by a collaborator that cannot complete without blocking and are handed
/// back to that collaborator, unmodified and uninterpreted, when the caller re-invokes the
/// suspended operation after readiness has been signaled externally. A token is only
/// meaningful between a suspension and its matching resumption.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResumeToken(u64);

impl ResumeToken {
    /// Creates a token wrapping a collaborator-chosen session identifier.
    pub fn new(id: u64) -> Self {
        ResumeToken(id)
    }

    /// Returns the collaborator-chosen session identifier.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Outcome of an operation that may suspend pending I/O readiness.
///
/// Suspension is not an error: a `Pending` value carries the state needed to continue the
/// operation later and implies that no determination of any kind has been made yet.
#[derive(Debug)]
pub enum Suspendable<T> {
    /// The operation completed
    Ready(T),
    /// The operation suspended; re-invoke with the token once the underlying I/O is ready
    Pending(ResumeToken),
}

/// Entry returned by a fresh-status cache query and stored by a cache update.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CachedStatus {
    /// True if the certificate was affirmatively not revoked when the entry was recorded
    pub is_good: bool,
    /// Diagnostic code recorded alongside the determination
    pub reason: ReasonCode,
}

/// The [`RevocationStatusCache`] trait defines the interface for storing and retrieving cached
/// revocation status determinations, keyed by [`OcspCertId`].
///
/// Implementations must support safe concurrent reads and writes; callers hold no lock.
pub trait RevocationStatusCache {
    /// Returns the cached determination for the presented certificate identity if an entry
    /// exists whose validity window extends beyond the time of interest, else None.
    fn get_fresh_status(&self, cid: &OcspCertId, time_of_interest: u64) -> Option<CachedStatus>;

    /// Records a definitive determination for the presented certificate identity along with
    /// the time (seconds since Unix epoch) at which the determination ceases to be fresh.
    fn add_status(&self, cid: &OcspCertId, next_update: u64, status: CachedStatus);

    /// Records a durable marker indicating that processing failed for the presented
    /// certificate identity, so that subsequent checks need not retry indefinitely.
    ///
    /// This is a best-effort bookkeeping operation; callers tolerate and ignore failure.
    fn record_processing_failure(&self, cid: &OcspCertId) -> Result<()>;
}

/// The [`OcspTransport`] trait defines the interface for exchanging an encoded OCSP request
/// for an encoded OCSP response.
///
/// A non-blocking implementation returns [`Suspendable::Pending`] when the exchange cannot
/// complete without blocking; the caller re-invokes `exchange` with the returned token once
/// readiness has been signaled by whatever poll/select mechanism the application owns. No
/// timeout is enforced by callers; timeout policy belongs to the transport.
pub trait OcspTransport {
    /// Sends the encoded request to the given URI, or resumes an earlier exchange identified
    /// by `resume`, returning the DER-encoded response when complete.
    fn exchange(
        &self,
        uri: &str,
        request: &[u8],
        resume: Option<ResumeToken>,
    ) -> Result<Suspendable<Vec<u8>>>;
}

/// `VerifySignatureMessage` provides a function signature for implementations that perform
/// signature verification over a message.
pub type VerifySignatureMessage = fn(
    &crate::environment::revocation_environment::RevocationEnvironment,
    &[u8],                      // message to hash and verify
    &[u8],                      // signature
    &AlgorithmIdentifierOwned,  // signature algorithm
    &SubjectPublicKeyInfoOwned, // public key
) -> Result<()>;

/// `VerifyCallback` provides a function signature for the response signature verification
/// callback bound to a checker at construction time.
///
/// Unlike [`VerifySignatureMessage`], a `VerifyCallback` may suspend, i.e., when verification
/// requires fetching auxiliary trust material over I/O. Returning `Ok(Suspendable::Ready(()))`
/// means the signature verified; an error return means verification failed.
pub type VerifyCallback = fn(
    &crate::environment::revocation_environment::RevocationEnvironment,
    &[u8],                      // message to hash and verify
    &[u8],                      // signature
    &AlgorithmIdentifierOwned,  // signature algorithm
    &SubjectPublicKeyInfoOwned, // public key
    Option<ResumeToken>,        // continuation state from a prior suspension
) -> Result<Suspendable<()>>;
