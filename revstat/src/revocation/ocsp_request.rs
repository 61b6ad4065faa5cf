//! Structures and functions to construct OCSP requests and discover responder locations

use der::{Decode, Encode};
use log::{error, info};
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::AuthorityInfoAccessSyntax;
use x509_cert::Certificate;
use x509_ocsp::{OcspRequest, Request, TbsRequest, Version};

use const_oid::db::rfc5912::{ID_AD_OCSP, ID_PE_AUTHORITY_INFO_ACCESS};

use crate::revocation::cert_id::OcspCertId;
use crate::util::error::Result;
use crate::util::utilities::name_to_string;

/// Transient protocol object scoped to one external check invocation: the DER-encoded OCSP
/// request and the responder URI it should be sent to.
#[derive(Clone, Debug)]
pub struct OcspRequestInfo {
    /// DER-encoded OCSPRequest
    pub encoded: Vec<u8>,
    /// HTTP URI of the responder, from the certificate's authority information access extension
    pub uri: String,
}

/// get_ocsp_uri returns the first HTTP URI associated with the id-ad-ocsp access method in the
/// certificate's authority information access extension, if any.
fn get_ocsp_uri(cert: &Certificate) -> Option<String> {
    let exts = cert.tbs_certificate.extensions.as_ref()?;
    for ext in exts {
        if ext.extn_id != ID_PE_AUTHORITY_INFO_ACCESS {
            continue;
        }
        let aias = match AuthorityInfoAccessSyntax::from_der(ext.extn_value.as_bytes()) {
            Ok(aias) => aias,
            Err(e) => {
                error!(
                    "Failed to parse authority information access extension for certificate issued to {} with {}",
                    name_to_string(&cert.tbs_certificate.subject),
                    e
                );
                continue;
            }
        };
        for aia in &aias.0 {
            if aia.access_method == ID_AD_OCSP {
                if let GeneralName::UniformResourceIdentifier(uri) = &aia.access_location {
                    let s = uri.to_string();
                    if s.starts_with("http") {
                        return Some(s);
                    }
                }
            }
        }
    }
    None
}

/// build_request prepares a DER-encoded OCSP request for the presented certificate identity
/// and reports where it should be sent.
///
/// Returns `Ok(None)` when the certificate carries no usable responder URI, in which case no
/// network attempt should be made and there is nothing to cache against. Encoding failures
/// propagate as hard errors.
pub fn build_request(cert: &Certificate, cid: &OcspCertId) -> Result<Option<OcspRequestInfo>> {
    let uri = match get_ocsp_uri(cert) {
        Some(uri) => uri,
        None => {
            info!(
                "No OCSP responder URI found for certificate issued to {}",
                name_to_string(&cert.tbs_certificate.subject)
            );
            return Ok(None);
        }
    };

    let request_list = vec![Request {
        req_cert: cid.to_cert_id()?,
        single_request_extensions: None,
    }];
    let tbs_request = TbsRequest {
        version: Version::V1,
        requestor_name: None,
        request_list,
        request_extensions: None,
    };
    let ocsp_req = OcspRequest {
        tbs_request,
        optional_signature: None,
    };
    let encoded = ocsp_req.to_der()?;
    Ok(Some(OcspRequestInfo { encoded, uri }))
}
