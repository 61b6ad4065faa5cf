//! OCSP checker functionality
//!
//! The checker is created in an idle state. When an external check is requested, a request
//! message is constructed and given to the registered transport. If non-blocking I/O is used
//! the transport may indicate that it would block, in which case the checker returns a resume
//! handle to its caller in turn. On a subsequent call the I/O is resumed at the stage that
//! suspended. When a response is received it is decoded, validated, verified and matched
//! against the certificate identity, and the results are provided to the caller.

use flagset::FlagSet;
use log::{debug, error, info};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::Certificate;

use crate::environment::revocation_environment::RevocationEnvironment;
use crate::environment::revocation_environment_traits::{ResumeToken, Suspendable, VerifyCallback};
use crate::revocation::cert_id::OcspCertId;
use crate::revocation::method::{
    register_method, MethodFlags, MethodRegistration, RevocationChecker, RevocationMethod,
    RevocationMethodType,
};
use crate::revocation::ocsp_request::{build_request, OcspRequestInfo};
use crate::revocation::ocsp_response::OcspResponseData;
use crate::util::error::*;
use crate::util::utilities::name_to_string;

/// A revocation verdict and the diagnostic code accompanying it.
///
/// The reason code is [`ReasonCode::NoError`] whenever the status is
/// [`RevocationStatus::Success`]; on other statuses it describes the evidence (or lack of
/// evidence) that produced the verdict.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Verdict {
    /// Tri-state revocation outcome
    pub status: RevocationStatus,
    /// Diagnostic code accompanying the outcome
    pub reason: ReasonCode,
}

/// Continuation state for a suspended external check.
///
/// The handle is opaque to callers: it records the stage at which the check suspended, the
/// objects that stage had already established (certificate identity, request or decoded
/// response) and the collaborator's own resume token. Passing the handle back to
/// [`RevocationChecker::check_external`] re-enters the pipeline at exactly the suspended
/// stage; the certificate identity is not re-derived and the request is not rebuilt.
#[derive(Debug)]
pub struct ResumeHandle(pub(crate) OcspResume);

#[derive(Debug)]
pub(crate) enum OcspResume {
    /// The transport could not complete the exchange without blocking.
    SendAndReceive {
        cid: OcspCertId,
        request: OcspRequestInfo,
        io: ResumeToken,
    },
    /// The verification callback could not complete without blocking.
    VerifySignature {
        cid: OcspCertId,
        response: OcspResponseData,
        io: ResumeToken,
    },
}

/// Outcome of an external check invocation: either a definitive verdict or a handle with
/// which to resume a suspended check. Suspension is distinct from both success and failure;
/// no verdict decision has been made when a handle is returned.
#[derive(Debug)]
pub enum ExternalCheckOutcome {
    /// The check ran to completion and produced a verdict
    Decided(Verdict),
    /// The check suspended pending I/O readiness
    Suspended(ResumeHandle),
}

/// verify_ocsp_signature implements the [`VerifyCallback`] interface by delegating to the
/// signature verification callbacks registered with the [`RevocationEnvironment`]. It never
/// suspends; callbacks that fetch trust material over non-blocking I/O are expected to
/// return [`Suspendable::Pending`] themselves.
pub fn verify_ocsp_signature(
    pe: &RevocationEnvironment,
    message_to_verify: &[u8],
    signature: &[u8],
    signature_alg: &AlgorithmIdentifierOwned,
    spki: &SubjectPublicKeyInfoOwned,
    _resume: Option<ResumeToken>,
) -> Result<Suspendable<()>> {
    pe.verify_signature_message(pe, message_to_verify, signature, signature_alg, spki)
        .map_err(|_| Error::SignatureVerificationFailure)?;
    Ok(Suspendable::Ready(()))
}

/// [`OcspChecker`] determines the revocation status of a certificate using OCSP.
///
/// A checker composes the shared [`RevocationMethod`] base configuration with the signature
/// verification callback bound at construction time. Instances are immutable after
/// construction and may be invoked concurrently for different certificates.
pub struct OcspChecker {
    method: RevocationMethod,
    verify_fcn: VerifyCallback,
}

impl OcspChecker {
    /// Creates a checker bound to the presented verification callback, with the base
    /// configuration initialized from the presented method type, flags and priority.
    ///
    /// Fails with [`Error::Misconfiguration`] when the base cannot be constructed, i.e., when
    /// the method type has not been registered; nothing is leaked on failure.
    pub fn create(
        method_type: RevocationMethodType,
        flags: FlagSet<MethodFlags>,
        priority: u32,
        verify_fcn: VerifyCallback,
    ) -> Result<Self> {
        let method = RevocationMethod::new(method_type, flags, priority)?;
        Ok(OcspChecker { method, verify_fcn })
    }

    /// Registers the OCSP checker kind with the process-wide method registry.
    ///
    /// This is expected to run exactly once during library initialization, before any checks
    /// occur; it is not safe for concurrent invocation with other registrations. No
    /// destructor is registered because a checker holds no owned sub-objects requiring
    /// explicit release.
    pub fn register_self() {
        register_method(
            RevocationMethodType::Ocsp,
            MethodRegistration {
                description: "OcspChecker",
                object_size: core::mem::size_of::<OcspChecker>(),
            },
        );
    }
}

impl RevocationChecker for OcspChecker {
    fn method(&self) -> &RevocationMethod {
        &self.method
    }

    fn check_local(
        &self,
        pe: &RevocationEnvironment,
        cert: &Certificate,
        issuer: &Certificate,
        time_of_interest: u64,
        _flags: FlagSet<MethodFlags>,
    ) -> Result<Verdict> {
        let cid = OcspCertId::derive(cert, issuer)?;

        let mut status = RevocationStatus::NoInfo;
        let mut reason = ReasonCode::default();
        if let Some(cached) = pe.get_fresh_status(&cid, time_of_interest) {
            if cached.is_good {
                status = RevocationStatus::Success;
                reason = ReasonCode::NoError;
            } else {
                status = RevocationStatus::Revoked;
                reason = cached.reason;
            }
            info!(
                "Determined revocation status ({}) using cached status for certificate issued to {}",
                status,
                name_to_string(&cert.tbs_certificate.subject)
            );
        }
        Ok(Verdict { status, reason })
    }

    fn check_external(
        &self,
        pe: &RevocationEnvironment,
        cert: &Certificate,
        issuer: &Certificate,
        time_of_interest: u64,
        flags: FlagSet<MethodFlags>,
        resume: Option<ResumeHandle>,
    ) -> Result<ExternalCheckOutcome> {
        if self.method.method_type() != RevocationMethodType::Ocsp {
            error!("check_external invoked on a checker whose method type is not OCSP");
            return Err(Error::Misconfiguration);
        }

        let mut status = RevocationStatus::NoInfo;
        let mut reason = ReasonCode::default();
        let mut passed = true;
        let mut cache_written = false;

        // Entry normalization: a fresh call derives the identity and builds the request; a
        // resumed call re-enters at the stage that suspended with the objects that stage had
        // already established.
        let cid: OcspCertId;
        let mut exchange: Option<(OcspRequestInfo, Option<ResumeToken>)> = None;
        let mut response: Option<OcspResponseData> = None;
        let mut verify_resume: Option<ResumeToken> = None;
        let mut validated = false;

        match resume {
            None => {
                cid = OcspCertId::derive(cert, issuer)?;
                match build_request(cert, &cid)? {
                    Some(request) => exchange = Some((request, None)),
                    None => {
                        // no caching for certs lacking a responder URI
                        reason = ReasonCode::NoError;
                        if flags.contains(MethodFlags::RequireInfoOnMissingSource) {
                            status = RevocationStatus::Revoked;
                        }
                        info!(
                            "Determined revocation status ({}) for certificate issued to {} lacking an OCSP responder URI",
                            status,
                            name_to_string(&cert.tbs_certificate.subject)
                        );
                        return Ok(ExternalCheckOutcome::Decided(Verdict { status, reason }));
                    }
                }
            }
            Some(ResumeHandle(OcspResume::SendAndReceive { cid: c, request, io })) => {
                cid = c;
                exchange = Some((request, Some(io)));
            }
            Some(ResumeHandle(OcspResume::VerifySignature {
                cid: c,
                response: r,
                io,
            })) => {
                cid = c;
                response = Some(r);
                verify_resume = Some(io);
                validated = true;
            }
        }

        // SendAndReceive
        if let Some((request, io)) = exchange {
            match pe.ocsp_exchange(request.uri.as_str(), request.encoded.as_slice(), io) {
                Ok(Suspendable::Pending(token)) => {
                    debug!("OCSP exchange with {} would block", request.uri);
                    return Ok(ExternalCheckOutcome::Suspended(ResumeHandle(
                        OcspResume::SendAndReceive {
                            cid,
                            request,
                            io: token,
                        },
                    )));
                }
                Ok(Suspendable::Ready(enc_resp)) => {
                    match OcspResponseData::decode(enc_resp.as_slice()) {
                        Ok(r) => response = Some(r),
                        Err(e) => {
                            passed = false;
                            reason = ReasonCode::from(&e);
                        }
                    }
                }
                Err(e) => {
                    error!("OCSP exchange with {} failed with {}", request.uri, e);
                    passed = false;
                    reason = ReasonCode::from(&e);
                }
            }
        }

        // ValidateResponseStatus
        if passed && !validated {
            if let Some(r) = response.as_mut() {
                if let Err(e) = r.validate_status() {
                    passed = false;
                    reason = ReasonCode::from(&e);
                }
            }
        }

        // VerifySignature
        if passed {
            if let Some(r) = response.take() {
                match r.verify_signature(pe, issuer, self.verify_fcn, time_of_interest, verify_resume)
                {
                    Ok(Suspendable::Pending(token)) => {
                        debug!("OCSP response signature verification would block");
                        return Ok(ExternalCheckOutcome::Suspended(ResumeHandle(
                            OcspResume::VerifySignature {
                                cid,
                                response: r,
                                io: token,
                            },
                        )));
                    }
                    Ok(Suspendable::Ready(())) => {
                        response = Some(r);
                    }
                    Err(e) => {
                        passed = false;
                        reason = ReasonCode::from(&e);
                        response = Some(r);
                    }
                }
            }
        }

        // MatchCertStatus
        if passed {
            if let Some(r) = response.as_ref() {
                let m = r.status_for_cert(pe, &cid, time_of_interest);
                passed = m.passed;
                reason = m.reason;
                cache_written = m.cache_written;
                status = if m.passed {
                    RevocationStatus::Success
                } else {
                    RevocationStatus::Revoked
                };
            }
        }

        // Finalize. A responder URI was necessarily found on every path reaching this point,
        // so the escalation flag applies to any remaining no-information outcome.
        if status == RevocationStatus::NoInfo
            && flags.contains(MethodFlags::FailOnMissingFreshInfo)
        {
            status = RevocationStatus::Revoked;
        }

        if !passed && !cache_written {
            // The identity still holds an un-consumed cache handle; leave a durable marker so
            // that future checks do not silently retry forever.
            if let Err(e) = pe.record_processing_failure(&cid) {
                debug!("Failed to record OCSP processing failure with {}", e);
            }
        }

        info!(
            "Determined revocation status ({}) using OCSP for certificate issued to {}",
            status,
            name_to_string(&cert.tbs_certificate.subject)
        );
        Ok(ExternalCheckOutcome::Decided(Verdict { status, reason }))
    }
}
