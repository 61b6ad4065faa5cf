//! Error types

use core::fmt;

/// Result type
pub type Result<T> = core::result::Result<T, Error>;

/// Tri-state revocation verdict returned to callers.
///
/// Exactly one of the three variants holds at function return. `NoInfo` indicates that no
/// determination could be made, `Success` that the certificate is affirmatively not revoked
/// and `Revoked` that the certificate is revoked (or that policy flags forced a revoked
/// verdict in the absence of fresh information).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum RevocationStatus {
    /// Revocation status could not be determined
    NoInfo,
    /// Certificate is affirmatively not revoked
    Success,
    /// Certificate is revoked or treated as revoked per policy
    Revoked,
}

/// Diagnostic code returned alongside a [`RevocationStatus`] verdict.
///
/// The default value is [`ReasonCode::CertificateRevoked`], not an "unknown" sentinel, so
/// that any unexpected early exit resolves conservatively unless a success path explicitly
/// narrowed the code.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum ReasonCode {
    /// No error was observed
    NoError,
    /// Certificate is revoked
    CertificateRevoked,
    /// The responder did not recognize the certificate or the response did not address it
    UnknownCertificate,
    /// The request could not be exchanged with the responder
    TransportFailure,
    /// The response could not be parsed
    DecodeFailure,
    /// The responder reported an error status
    ResponderError,
    /// The signature on the response could not be verified
    SignatureVerificationFailure,
    /// The response was stale or not yet valid relative to the time of interest
    StaleResponse,
    /// The response featured an unsupported critical extension
    UnprocessedCriticalExtension,
}

impl Default for ReasonCode {
    fn default() -> Self {
        ReasonCode::CertificateRevoked
    }
}

/// Error type
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// NotFound occurs when an action failed because a necessary artifact was not found.
    NotFound,
    /// Unrecognized occurs when an error condition does not match anything else here.
    Unrecognized,
    /// A URI scheme was encountered that was not valid in given context, i.e., ldap URI presented to OCSP
    InvalidUriScheme,
    /// An artifact could not be parsed
    ParseError,
    /// A networking issue occurred.
    NetworkError,
    /// An error occurred processing an OCSP response
    OcspResponseError,
    /// A signature could not be verified
    SignatureVerificationFailure,
    /// An unsupported critical extension was encountered
    UnprocessedCriticalExtension,
    /// A configuration error was detected. See textual log output for more details.
    Misconfiguration,
    /// Asn1Error is used to propagate error information from the x509 crate.
    Asn1Error(der::Error),
}

impl From<der::Error> for Error {
    fn from(err: der::Error) -> Error {
        Error::Asn1Error(err)
    }
}

impl From<&Error> for ReasonCode {
    /// Folds an evidence failure into the diagnostic code reported beside the verdict.
    /// Errors with no specific mapping fall back to the conservative default.
    fn from(err: &Error) -> ReasonCode {
        match err {
            Error::NotFound => ReasonCode::TransportFailure,
            Error::NetworkError => ReasonCode::TransportFailure,
            Error::InvalidUriScheme => ReasonCode::TransportFailure,
            Error::OcspResponseError => ReasonCode::ResponderError,
            Error::SignatureVerificationFailure => ReasonCode::SignatureVerificationFailure,
            Error::UnprocessedCriticalExtension => ReasonCode::UnprocessedCriticalExtension,
            Error::ParseError => ReasonCode::DecodeFailure,
            Error::Asn1Error(_) => ReasonCode::DecodeFailure,
            _ => ReasonCode::default(),
        }
    }
}

impl fmt::Display for RevocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevocationStatus::NoInfo => write!(f, "NoInfo"),
            RevocationStatus::Success => write!(f, "Success"),
            RevocationStatus::Revoked => write!(f, "Revoked"),
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasonCode::NoError => write!(f, "NoError"),
            ReasonCode::CertificateRevoked => write!(f, "CertificateRevoked"),
            ReasonCode::UnknownCertificate => write!(f, "UnknownCertificate"),
            ReasonCode::TransportFailure => write!(f, "TransportFailure"),
            ReasonCode::DecodeFailure => write!(f, "DecodeFailure"),
            ReasonCode::ResponderError => write!(f, "ResponderError"),
            ReasonCode::SignatureVerificationFailure => {
                write!(f, "SignatureVerificationFailure")
            }
            ReasonCode::StaleResponse => write!(f, "StaleResponse"),
            ReasonCode::UnprocessedCriticalExtension => {
                write!(f, "UnprocessedCriticalExtension")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "NotFound"),
            Error::Unrecognized => write!(f, "Unrecognized"),
            Error::InvalidUriScheme => write!(f, "InvalidUriScheme"),
            Error::ParseError => write!(f, "ParseError"),
            Error::NetworkError => write!(f, "NetworkError"),
            Error::OcspResponseError => write!(f, "OcspResponseError"),
            Error::SignatureVerificationFailure => write!(f, "SignatureVerificationFailure"),
            Error::UnprocessedCriticalExtension => write!(f, "UnprocessedCriticalExtension"),
            Error::Misconfiguration => write!(f, "Misconfiguration"),
            Error::Asn1Error(e) => write!(f, "Asn1Error: {}", e),
        }
    }
}

#[test]
fn reason_code_defaults_conservative() {
    assert_eq!(ReasonCode::default(), ReasonCode::CertificateRevoked);
    assert_eq!(
        ReasonCode::from(&Error::NetworkError),
        ReasonCode::TransportFailure
    );
    assert_eq!(ReasonCode::from(&Error::Unrecognized), ReasonCode::default());
}
