//! Structures and functions related to the certificate identity key used to correlate a
//! certificate with cached revocation status and with per-certificate answers in OCSP
//! responses

use der::asn1::OctetString;
use der::Encode;
use sha1::{Digest, Sha1};
use spki::AlgorithmIdentifierOwned;
use x509_cert::serial_number::SerialNumber;
use x509_cert::Certificate;
use x509_ocsp::CertId;

use crate::util::alg_oids::PKIXALG_SHA1;
use crate::util::error::Result;
use crate::util::utilities::buffer_to_hex;

fn get_key_hash(cert: &Certificate) -> Vec<u8> {
    Sha1::digest(
        cert.tbs_certificate
            .subject_public_key_info
            .subject_public_key
            .raw_bytes(),
    )
    .to_vec()
}

fn get_subject_name_hash(cert: &Certificate) -> Result<Vec<u8>> {
    let enc_subject = cert.tbs_certificate.subject.to_der()?;
    Ok(Sha1::digest(enc_subject.as_slice()).to_vec())
}

/// [`OcspCertId`] is the identity key derived from a (certificate, issuer) pair: the SHA-1
/// hash of the issuer's subject name, the SHA-1 hash of the issuer's public key and the
/// certificate's serial number.
///
/// The same value serves three roles: cache key, request payload seed and the key matched
/// against the per-certificate answers in a responder's reply. Instances are immutable once
/// derived and live no longer than the check that derived them (or the resume handle that
/// carries a suspended check's state).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OcspCertId {
    serial_number: SerialNumber,
    issuer_name_hash: Vec<u8>,
    issuer_key_hash: Vec<u8>,
}

impl OcspCertId {
    /// Derives an identity from the presented certificate and its issuer. Fails with a hard
    /// error when the issuer's subject name cannot be DER encoded; there is no fallback.
    pub fn derive(cert: &Certificate, issuer: &Certificate) -> Result<Self> {
        Ok(OcspCertId {
            serial_number: cert.tbs_certificate.serial_number.clone(),
            issuer_name_hash: get_subject_name_hash(issuer)?,
            issuer_key_hash: get_key_hash(issuer),
        })
    }

    /// Returns the serial number of the certificate this identity describes.
    pub fn serial_number(&self) -> &SerialNumber {
        &self.serial_number
    }

    /// Produces the wire-format [`CertId`] used when constructing an OCSP request.
    pub fn to_cert_id(&self) -> Result<CertId> {
        Ok(CertId {
            hash_algorithm: AlgorithmIdentifierOwned {
                oid: PKIXALG_SHA1,
                parameters: None,
            },
            issuer_name_hash: OctetString::new(self.issuer_name_hash.as_slice())?,
            issuer_key_hash: OctetString::new(self.issuer_key_hash.as_slice())?,
            serial_number: self.serial_number.clone(),
        })
    }

    /// Returns true if the serial number, issuer name hash and issuer key hash in the
    /// presented [`CertId`] match this identity. Else it returns false.
    pub fn matches(&self, cert_id: &CertId) -> bool {
        if cert_id.serial_number.as_bytes() != self.serial_number.as_bytes() {
            return false;
        }
        if cert_id.issuer_name_hash.as_bytes() != self.issuer_name_hash.as_slice() {
            return false;
        }
        if cert_id.issuer_key_hash.as_bytes() != self.issuer_key_hash.as_slice() {
            return false;
        }
        true
    }

    /// Returns a stable string key suitable for indexing cache entries by this identity.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}",
            buffer_to_hex(self.issuer_name_hash.as_slice()),
            buffer_to_hex(self.issuer_key_hash.as_slice()),
            buffer_to_hex(self.serial_number.as_bytes())
        )
    }
}
