//! Provides definitions of OIDs from PKIXAlgs-2009 used when preparing OCSP requests and
//! verifying response signatures

use der::asn1::ObjectIdentifier;

/// id-sha1 OBJECT IDENTIFIER ::= {
///     iso(1) identified-organization(3) oiw(14) secsig(3)
///     algorithms(2) 26 }
pub const PKIXALG_SHA1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.14.3.2.26");

/// sha256WithRSAEncryption OBJECT IDENTIFIER ::= {
///     iso(1) member-body(2) us(840) rsadsi(113549) pkcs(1)
///     pkcs-1(1) 11 }
pub const PKIXALG_SHA256_WITH_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");

/// sha384WithRSAEncryption OBJECT IDENTIFIER ::= {
///     iso(1) member-body(2) us(840) rsadsi(113549) pkcs(1)
///     pkcs-1(1) 12 }
pub const PKIXALG_SHA384_WITH_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.12");

/// sha512WithRSAEncryption OBJECT IDENTIFIER ::= {
///     iso(1) member-body(2) us(840) rsadsi(113549) pkcs(1)
///     pkcs-1(1) 13 }
pub const PKIXALG_SHA512_WITH_RSA_ENCRYPTION: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.13");

/// ecdsa-with-SHA256 OBJECT IDENTIFIER ::= {
///     iso(1) member-body(2) us(840) ansi-X9-62(10045) signatures(4)
///     ecdsa-with-SHA2(3) 2 }
pub const PKIXALG_ECDSA_WITH_SHA256: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.10045.4.3.2");
