//! Structures and functions to process OCSP responses: decoding, responder status
//! validation, signature verification and per-certificate status matching

use der::asn1::GeneralizedTime;
use der::{Any, Decode, Encode};
use log::error;
use x509_cert::ext::Extensions;
use x509_cert::Certificate;
use x509_ocsp::{
    BasicOcspResponse, CertStatus, OcspResponse, OcspResponseStatus, ResponseData, SingleResponse,
};

use const_oid::db::rfc6960::{ID_PKIX_OCSP_BASIC, ID_PKIX_OCSP_NOCHECK, ID_PKIX_OCSP_NONCE};

use crate::environment::revocation_environment::RevocationEnvironment;
use crate::environment::revocation_environment_traits::{
    CachedStatus, ResumeToken, Suspendable, VerifyCallback,
};
use crate::revocation::cert_id::OcspCertId;
use crate::util::error::*;
use crate::util::utilities::valid_at_time;

/// unsupported_critical_extensions_present_single_response returns true if any critical
/// extension is present with a SingleResponse
fn unsupported_critical_extensions_present_single_response(sr: &SingleResponse) -> bool {
    match &sr.single_extensions {
        Some(exts) => {
            for e in exts {
                if e.critical {
                    return true;
                }
            }
            false
        }
        None => false,
    }
}

/// unsupported_critical_extensions_present_response returns true if any critical extension
/// other than nonce is present with a ResponseData
fn unsupported_critical_extensions_present_response(rd: &ResponseData) -> bool {
    match &rd.response_extensions {
        Some(exts) => {
            for e in exts {
                if e.critical && e.extn_id != ID_PKIX_OCSP_NONCE {
                    return true;
                }
            }
            false
        }
        None => false,
    }
}

fn no_check_present(exts: &Option<Extensions>) -> bool {
    if let Some(exts) = exts {
        for ext in exts {
            if ext.extn_id == ID_PKIX_OCSP_NOCHECK {
                return true;
            }
        }
    }
    false
}

/// ocsp_time_secs reads an OCSP time field as seconds since the Unix epoch. Responses wrap
/// GeneralizedTime in an OCSP-specific newtype; re-decoding the DER encoding avoids
/// depending on that wrapper's accessors.
fn ocsp_time_secs<T: Encode>(value: &T) -> Option<u64> {
    let enc = value.to_der().ok()?;
    let gt = GeneralizedTime::from_der(enc.as_slice()).ok()?;
    Some(gt.to_unix_duration().as_secs())
}

/// check_response_time returns true if the presented SingleResponse is neither from the
/// future nor stale relative to the time of interest. A time of interest of zero disables
/// the check.
fn check_response_time(sr: &SingleResponse, time_of_interest: u64) -> bool {
    if 0 == time_of_interest {
        return true;
    }

    let tu = match ocsp_time_secs(&sr.this_update) {
        Some(tu) => tu,
        None => return false,
    };
    if tu > time_of_interest {
        //future response
        return false;
    }

    if let Some(next_update) = &sr.next_update {
        let nu = match ocsp_time_secs(next_update) {
            Some(nu) => nu,
            None => return false,
        };
        if nu < time_of_interest {
            //stale
            return false;
        }
    }
    true
}

/// [`DeferDecodeBasicOcspResponse`] is used to parse only the top-level BasicOCSPResponse
/// structure, without parsing the details of the ResponseData field.
///
/// Deferred decoding is useful when verifying responses to avoid re-encoding the
/// ResponseData (and potentially encountering problems with structures that were not
/// DER-encoded prior to signing).
struct DeferDecodeBasicOcspResponse {
    ///   tbsResponseData          ResponseData,
    pub tbs_response_data: Vec<u8>,
}

impl ::der::FixedTag for DeferDecodeBasicOcspResponse {
    const TAG: ::der::Tag = ::der::Tag::Sequence;
}

impl<'a> ::der::DecodeValue<'a> for DeferDecodeBasicOcspResponse {
    fn decode_value<R: ::der::Reader<'a>>(
        reader: &mut R,
        header: ::der::Header,
    ) -> ::der::Result<Self> {
        use ::der::Reader as _;
        reader.read_nested(header.length, |reader| {
            let tbs_response_data = reader.tlv_bytes()?;
            let _signature_algorithm = reader.tlv_bytes()?;
            let _signature = reader.tlv_bytes()?;
            let _certs: Option<::der::asn1::ContextSpecific<Vec<Any>>> =
                ::der::asn1::ContextSpecific::decode_explicit(reader, ::der::TagNumber::N0)?;
            Ok(Self {
                tbs_response_data: tbs_response_data.to_vec(),
            })
        })
    }
}

/// [`DeferDecodeCertificate`] is used to parse only the top-level Certificate structure,
/// without parsing the details of the TBSCertificate field, so that a candidate responder
/// certificate's signature can be verified over the bytes that were actually signed.
struct DeferDecodeCertificate {
    /// tbsCertificate       TBSCertificate,
    pub tbs_field: Vec<u8>,
    /// signatureAlgorithm   AlgorithmIdentifier,
    pub signature_algorithm: spki::AlgorithmIdentifierOwned,
    /// signature            BIT STRING
    pub signature: der::asn1::BitString,
}

impl ::der::FixedTag for DeferDecodeCertificate {
    const TAG: ::der::Tag = ::der::Tag::Sequence;
}

impl<'a> ::der::DecodeValue<'a> for DeferDecodeCertificate {
    fn decode_value<R: ::der::Reader<'a>>(
        reader: &mut R,
        header: ::der::Header,
    ) -> ::der::Result<Self> {
        use ::der::Reader as _;
        reader.read_nested(header.length, |reader| {
            let tbs_certificate = reader.tlv_bytes()?;
            let signature_algorithm = reader.decode()?;
            let signature = reader.decode()?;
            Ok(Self {
                tbs_field: tbs_certificate.to_vec(),
                signature_algorithm,
                signature,
            })
        })
    }
}

/// Result of matching a certificate identity against the per-certificate answers in a
/// verified response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusMatch {
    /// True if a fresh, affirmatively good answer was found for the identity
    pub passed: bool,
    /// Diagnostic code describing the match outcome
    pub reason: ReasonCode,
    /// True if a definitive answer was written to the status cache
    pub cache_written: bool,
}

/// Transient protocol object scoped to one external check invocation: a decoded OCSP
/// response progressing through the processing pipeline.
///
/// The pipeline stages mirror the order in which evidence is established: [`decode`](Self::decode),
/// then [`validate_status`](Self::validate_status), then [`verify_signature`](Self::verify_signature),
/// then [`status_for_cert`](Self::status_for_cert). Later stages must not be invoked before
/// earlier stages have succeeded.
#[derive(Clone, Debug)]
pub struct OcspResponseData {
    decoded: OcspResponse,
    basic: Option<BasicOcspResponse>,
}

impl OcspResponseData {
    /// Parses an OCSPResponse from the presented DER-encoded buffer.
    pub fn decode(enc_resp: &[u8]) -> Result<Self> {
        let decoded = match OcspResponse::from_der(enc_resp) {
            Ok(decoded) => decoded,
            Err(e) => {
                error!("Failed to parse OcspResponse with {}", e);
                return Err(Error::Asn1Error(e));
            }
        };
        Ok(OcspResponseData {
            decoded,
            basic: None,
        })
    }

    /// Validates the response's own status field (not yet the per-certificate answer): the
    /// responder must report success, the response must carry a basic response, and no
    /// unsupported critical response extensions may be present.
    pub fn validate_status(&mut self) -> Result<()> {
        if self.decoded.response_status != OcspResponseStatus::Successful {
            error!(
                "OcspResponse indicates failure ({:?})",
                self.decoded.response_status
            );
            return Err(Error::OcspResponseError);
        }

        let rb = match &self.decoded.response_bytes {
            Some(rb) => rb,
            None => {
                error!("OcspResponse contained no response bytes");
                return Err(Error::OcspResponseError);
            }
        };

        if rb.response_type != ID_PKIX_OCSP_BASIC {
            error!(
                "OcspResponse contained response bytes other than basic type ({})",
                rb.response_type
            );
            return Err(Error::OcspResponseError);
        }

        let bor = match BasicOcspResponse::from_der(rb.response.as_bytes()) {
            Ok(bor) => bor,
            Err(e) => {
                error!(
                    "OcspResponse contained BasicOcspResponse that could not be parsed with: {}",
                    e
                );
                return Err(Error::Asn1Error(e));
            }
        };

        if unsupported_critical_extensions_present_response(&bor.tbs_response_data) {
            error!("OcspResponse contained at least one unsupported critical extension");
            return Err(Error::UnprocessedCriticalExtension);
        }

        self.basic = Some(bor);
        Ok(())
    }

    /// Verifies the response signature against the certificate's trust context using the
    /// presented callback.
    ///
    /// If the response carries candidate responder certificates, each is screened: it must be
    /// signed by the same CA that issued the target certificate, must be valid at the time of
    /// interest and should carry the id-pkix-ocsp-nocheck extension. Otherwise the issuing
    /// CA's own key is used. The callback may suspend; pass the token from a prior suspension
    /// via `resume` to continue verification.
    pub fn verify_signature(
        &self,
        pe: &RevocationEnvironment,
        issuer: &Certificate,
        verify: VerifyCallback,
        time_of_interest: u64,
        resume: Option<ResumeToken>,
    ) -> Result<Suspendable<()>> {
        let basic = match &self.basic {
            Some(basic) => basic,
            None => return Err(Error::OcspResponseError),
        };
        let rb = match &self.decoded.response_bytes {
            Some(rb) => rb,
            None => return Err(Error::OcspResponseError),
        };

        let ddbor = DeferDecodeBasicOcspResponse::from_der(rb.response.as_bytes())?;
        let signature = match basic.signature.as_bytes() {
            Some(signature) => signature,
            None => return Err(Error::SignatureVerificationFailure),
        };

        // Candidates are screened in deterministic order, so on resumption the callback that
        // suspended is the first one invoked and receives the token.
        let mut resume = resume;

        if let Some(certs) = &basic.certs {
            for candidate in certs {
                let certbuf = match candidate.to_der() {
                    Ok(certbuf) => certbuf,
                    Err(_e) => continue,
                };
                let defer_cert = match DeferDecodeCertificate::from_der(certbuf.as_slice()) {
                    Ok(defer_cert) => defer_cert,
                    Err(_e) => continue,
                };
                if pe
                    .verify_signature_message(
                        pe,
                        &defer_cert.tbs_field,
                        defer_cert.signature.raw_bytes(),
                        &defer_cert.signature_algorithm,
                        &issuer.tbs_certificate.subject_public_key_info,
                    )
                    .is_err()
                {
                    continue;
                }

                let cert = match Certificate::from_der(certbuf.as_slice()) {
                    Ok(cert) => cert,
                    Err(_e) => continue,
                };

                if cert.tbs_certificate.signature != defer_cert.signature_algorithm {
                    error!("Verified candidate responder certificate but signature algorithm match failed");
                    continue;
                }

                if 0 != time_of_interest
                    && valid_at_time(&cert.tbs_certificate, time_of_interest).is_err()
                {
                    error!("Verified candidate responder certificate but certificate is not valid at the time of interest");
                    continue;
                }

                if !no_check_present(&cert.tbs_certificate.extensions) {
                    // revocation checking of responder certificates is not supported
                    error!("no-check absent");
                }

                match verify(
                    pe,
                    &ddbor.tbs_response_data,
                    signature,
                    &basic.signature_algorithm,
                    &cert.tbs_certificate.subject_public_key_info,
                    resume.take(),
                )? {
                    Suspendable::Pending(token) => return Ok(Suspendable::Pending(token)),
                    Suspendable::Ready(()) => return Ok(Suspendable::Ready(())),
                }
            }
            error!("Failed to find authorized responder for OCSPResponse among candidate certificates");
            Err(Error::SignatureVerificationFailure)
        } else {
            // no candidate certificates; the response must verify with the issuing CA's key
            verify(
                pe,
                &ddbor.tbs_response_data,
                signature,
                &basic.signature_algorithm,
                &issuer.tbs_certificate.subject_public_key_info,
                resume.take(),
            )
        }
    }

    /// Looks up the presented certificate identity's specific status inside the verified
    /// response and records definitive answers with the status cache.
    ///
    /// A fresh good answer passes and is cached when a nextUpdate value is available. A
    /// revoked answer never passes and is likewise cached when nextUpdate is available. An
    /// unknown, stale or absent answer neither passes nor consumes the cache handle, leaving
    /// failure accounting to the caller.
    pub fn status_for_cert(
        &self,
        pe: &RevocationEnvironment,
        cid: &OcspCertId,
        time_of_interest: u64,
    ) -> StatusMatch {
        let mut retval = StatusMatch {
            passed: false,
            reason: ReasonCode::UnknownCertificate,
            cache_written: false,
        };
        let basic = match &self.basic {
            Some(basic) => basic,
            None => return retval,
        };

        for sr in &basic.tbs_response_data.responses {
            if !cid.matches(&sr.cert_id) {
                continue;
            }
            if unsupported_critical_extensions_present_single_response(sr) {
                error!("OCSPResponse featured unrecognized critical extensions in single response");
                retval.reason = ReasonCode::UnprocessedCriticalExtension;
                return retval;
            }

            let next_update = sr.next_update.as_ref().and_then(|nu| ocsp_time_secs(nu));
            match &sr.cert_status {
                CertStatus::Good(_null) => {
                    if check_response_time(sr, time_of_interest) {
                        if let Some(nu) = next_update {
                            pe.add_status(
                                cid,
                                nu,
                                CachedStatus {
                                    is_good: true,
                                    reason: ReasonCode::NoError,
                                },
                            );
                            retval.cache_written = true;
                        }
                        retval.passed = true;
                        retval.reason = ReasonCode::NoError;
                    } else {
                        retval.reason = ReasonCode::StaleResponse;
                    }
                }
                CertStatus::Revoked(_revinfo) => {
                    if let Some(nu) = next_update {
                        pe.add_status(
                            cid,
                            nu,
                            CachedStatus {
                                is_good: false,
                                reason: ReasonCode::CertificateRevoked,
                            },
                        );
                        retval.cache_written = true;
                    }
                    retval.reason = ReasonCode::CertificateRevoked;
                }
                CertStatus::Unknown(_null) => {
                    retval.reason = ReasonCode::UnknownCertificate;
                }
            }
            if retval.passed || retval.reason == ReasonCode::CertificateRevoked {
                break;
            }
        }
        retval
    }
}
