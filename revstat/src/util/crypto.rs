//! Provides an implementation of the signature verification interface consumed by
//! [`RevocationEnvironment`] using libraries from the
//! [Rust Crypto](https://github.com/RustCrypto) project for support.

use p256::ecdsa::{
    signature::Verifier as Verifier256, Signature as Signature256, VerifyingKey as VerifyingKey256,
};
use rsa::{pkcs8::DecodePublicKey, Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256, Sha384, Sha512};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

use der::Encode;
use log::error;

use crate::environment::revocation_environment::RevocationEnvironment;
use crate::util::alg_oids::*;
use crate::util::error::{Error, Result};

fn verify_rsa(spki: &SubjectPublicKeyInfoOwned, hashed: &[u8], scheme: Pkcs1v15Sign, signature: &[u8]) -> Result<()> {
    let enc_spki = spki.to_der()?;
    let public_key = match RsaPublicKey::from_public_key_der(&enc_spki) {
        Ok(public_key) => public_key,
        Err(e) => {
            error!("Failed to parse RSA public key from SubjectPublicKeyInfo: {}", e);
            return Err(Error::ParseError);
        }
    };
    public_key
        .verify(scheme, hashed, signature)
        .map_err(|_| Error::SignatureVerificationFailure)
}

/// verify_signature_message_rust_crypto implements the
/// [`VerifySignatureMessage`](../environment/revocation_environment_traits/type.VerifySignatureMessage.html)
/// interface for [`RevocationEnvironment`] using implementations from the Rust Crypto project.
///
/// It supports [`PKIXALG_SHA256_WITH_RSA_ENCRYPTION`], [`PKIXALG_SHA384_WITH_RSA_ENCRYPTION`],
/// [`PKIXALG_SHA512_WITH_RSA_ENCRYPTION`] and [`PKIXALG_ECDSA_WITH_SHA256`].
pub fn verify_signature_message_rust_crypto(
    _pe: &RevocationEnvironment,
    message_to_verify: &[u8],
    signature: &[u8],
    signature_alg: &AlgorithmIdentifierOwned,
    spki: &SubjectPublicKeyInfoOwned,
) -> Result<()> {
    match signature_alg.oid {
        PKIXALG_SHA256_WITH_RSA_ENCRYPTION => {
            let hashed = Sha256::digest(message_to_verify);
            verify_rsa(spki, hashed.as_slice(), Pkcs1v15Sign::new::<Sha256>(), signature)
        }
        PKIXALG_SHA384_WITH_RSA_ENCRYPTION => {
            let hashed = Sha384::digest(message_to_verify);
            verify_rsa(spki, hashed.as_slice(), Pkcs1v15Sign::new::<Sha384>(), signature)
        }
        PKIXALG_SHA512_WITH_RSA_ENCRYPTION => {
            let hashed = Sha512::digest(message_to_verify);
            verify_rsa(spki, hashed.as_slice(), Pkcs1v15Sign::new::<Sha512>(), signature)
        }
        PKIXALG_ECDSA_WITH_SHA256 => {
            let verifying_key =
                match VerifyingKey256::from_sec1_bytes(spki.subject_public_key.raw_bytes()) {
                    Ok(verifying_key) => verifying_key,
                    Err(e) => {
                        error!("Failed to parse P-256 public key from SubjectPublicKeyInfo: {}", e);
                        return Err(Error::ParseError);
                    }
                };
            let s = match Signature256::from_der(signature) {
                Ok(s) => s,
                Err(e) => {
                    error!("Failed to parse ECDSA signature: {}", e);
                    return Err(Error::ParseError);
                }
            };
            verifying_key
                .verify(message_to_verify, &s)
                .map_err(|_| Error::SignatureVerificationFailure)
        }
        _ => Err(Error::Unrecognized),
    }
}
