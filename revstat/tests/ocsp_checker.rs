//! End-to-end tests for the OCSP checker covering the cache-only and network-capable paths,
//! policy flag handling, suspend/resume behavior and failure accounting.


use der::asn1::Null;
use hex_literal::hex;
use x509_cert::Certificate;
use x509_ocsp::{CertStatus, OcspResponseStatus, RevokedInfo};

use revstat::*;

use ocsp_utils::*;

const TOI: u64 = 1_600_000_000;

fn target_with_uri() -> Certificate {
    make_cert(
        "CN=Target",
        "CN=Issuing CA",
        &[0x01, 0x02],
        Some("http://ocsp.example.com"),
    )
}

fn target_without_uri() -> Certificate {
    make_cert("CN=Target", "CN=Issuing CA", &[0x01, 0x02], None)
}

fn issuing_ca() -> Certificate {
    make_cert("CN=Issuing CA", "CN=Root CA", &[0x03], None)
}

fn good_response(cid: &OcspCertId) -> Vec<u8> {
    make_ocsp_response(
        cid,
        CertStatus::Good(Null),
        TOI - 1_000,
        Some(TOI + 10_000),
        vec![],
    )
}

fn revoked_response(cid: &OcspCertId) -> Vec<u8> {
    make_ocsp_response(
        cid,
        CertStatus::Revoked(RevokedInfo {
            revocation_time: ocsp_time(TOI - 5_000),
            revocation_reason: None,
        }),
        TOI - 1_000,
        Some(TOI + 10_000),
        vec![],
    )
}

fn make_checker(verify: VerifyCallback) -> OcspChecker {
    OcspChecker::register_self();
    OcspChecker::create(RevocationMethodType::Ocsp, Default::default(), 0, verify).unwrap()
}

fn make_env_with_cache(cache: &StatusCacheMap) -> RevocationEnvironment {
    let mut pe = RevocationEnvironment::default();
    pe.add_revocation_cache(Box::new(cache.clone()));
    pe
}

fn decided(outcome: ExternalCheckOutcome) -> Verdict {
    match outcome {
        ExternalCheckOutcome::Decided(verdict) => verdict,
        ExternalCheckOutcome::Suspended(_) => panic!("expected a verdict, got a suspension"),
    }
}

fn suspended(outcome: ExternalCheckOutcome) -> ResumeHandle {
    match outcome {
        ExternalCheckOutcome::Suspended(handle) => handle,
        ExternalCheckOutcome::Decided(v) => panic!("expected a suspension, got {:?}", v),
    }
}

#[test]
fn local_check_fresh_good_entry() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    pe.add_ocsp_transport(Box::new(PanickingTransport));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    cache.add_status(
        &cid,
        TOI + 10_000,
        CachedStatus {
            is_good: true,
            reason: ReasonCode::NoError,
        },
    );

    let verdict = checker
        .check_local(&pe, &cert, &issuer, TOI, Default::default())
        .unwrap();
    assert_eq!(RevocationStatus::Success, verdict.status);
    assert_eq!(ReasonCode::NoError, verdict.reason);
}

#[test]
fn local_check_fresh_revoked_entry() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    pe.add_ocsp_transport(Box::new(PanickingTransport));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    cache.add_status(
        &cid,
        TOI + 10_000,
        CachedStatus {
            is_good: false,
            reason: ReasonCode::CertificateRevoked,
        },
    );

    let verdict = checker
        .check_local(&pe, &cert, &issuer, TOI, Default::default())
        .unwrap();
    assert_eq!(RevocationStatus::Revoked, verdict.status);
    assert_eq!(ReasonCode::CertificateRevoked, verdict.reason);
}

#[test]
fn local_check_no_entry() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    pe.add_ocsp_transport(Box::new(PanickingTransport));

    let verdict = checker
        .check_local(&pe, &target_with_uri(), &issuing_ca(), TOI, Default::default())
        .unwrap();
    assert_eq!(RevocationStatus::NoInfo, verdict.status);
    assert_eq!(ReasonCode::CertificateRevoked, verdict.reason);
}

#[test]
fn local_check_stale_entry_yields_no_info() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    pe.add_ocsp_transport(Box::new(PanickingTransport));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    cache.add_status(
        &cid,
        TOI - 1,
        CachedStatus {
            is_good: true,
            reason: ReasonCode::NoError,
        },
    );

    let verdict = checker
        .check_local(&pe, &cert, &issuer, TOI, Default::default())
        .unwrap();
    assert_eq!(RevocationStatus::NoInfo, verdict.status);
}

#[test]
fn external_check_no_uri_without_flag() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    // the checker must not attempt any exchange when no responder URI is discoverable
    pe.add_ocsp_transport(Box::new(PanickingTransport));

    let cert = target_without_uri();
    let issuer = issuing_ca();
    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::NoInfo, verdict.status);
    assert_eq!(ReasonCode::NoError, verdict.reason);

    // nothing to cache against, so no failure marker either
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    assert_eq!(0, cache.processing_failures(&cid));
}

#[test]
fn external_check_no_uri_with_require_info_flag() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    pe.add_ocsp_transport(Box::new(PanickingTransport));

    let cert = target_without_uri();
    let issuer = issuing_ca();
    let verdict = decided(
        checker
            .check_external(
                &pe,
                &cert,
                &issuer,
                TOI,
                MethodFlags::RequireInfoOnMissingSource.into(),
                None,
            )
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Revoked, verdict.status);
    assert_eq!(ReasonCode::NoError, verdict.reason);

    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    assert_eq!(0, cache.processing_failures(&cid));
}

#[test]
fn external_check_good_response() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(good_response(&cid)));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Success, verdict.status);
    assert_eq!(ReasonCode::NoError, verdict.reason);

    // the definitive answer was cached and no failure marker was written
    assert_eq!(0, cache.processing_failures(&cid));
    let local = checker
        .check_local(&pe, &cert, &issuer, TOI, Default::default())
        .unwrap();
    assert_eq!(RevocationStatus::Success, local.status);

    let calls = transport.calls();
    assert_eq!(1, calls.len());
    assert_eq!("http://ocsp.example.com", calls[0].uri);
    assert_eq!(None, calls[0].resume_id);
}

#[test]
fn external_check_revoked_response() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(revoked_response(&cid)));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Revoked, verdict.status);
    assert_eq!(ReasonCode::CertificateRevoked, verdict.reason);

    // the revoked answer consumed the cache handle, so no failure marker is written
    assert_eq!(0, cache.processing_failures(&cid));
    let local = checker
        .check_local(&pe, &cert, &issuer, TOI, Default::default())
        .unwrap();
    assert_eq!(RevocationStatus::Revoked, local.status);
}

#[test]
fn external_check_suspend_and_resume_exchange() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::WouldBlock(7));
    transport.push(ScriptStep::Respond(good_response(&cid)));

    let handle = suspended(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );

    // no verdict yet, no failure marker, one exchange attempt so far
    assert_eq!(0, cache.processing_failures(&cid));
    assert_eq!(1, transport.calls().len());

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), Some(handle))
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Success, verdict.status);
    assert_eq!(ReasonCode::NoError, verdict.reason);

    // the resumed call continued the same exchange: same URI, identical request bytes (the
    // request was not rebuilt) and the transport's token handed back verbatim
    let calls = transport.calls();
    assert_eq!(2, calls.len());
    assert_eq!(calls[0].uri, calls[1].uri);
    assert_eq!(calls[0].request, calls[1].request);
    assert_eq!(None, calls[0].resume_id);
    assert_eq!(Some(7), calls[1].resume_id);
    assert_eq!(0, cache.processing_failures(&cid));
}

#[test]
fn external_check_suspend_and_resume_verification() {
    let checker = make_checker(suspend_once_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(good_response(&cid)));

    let handle = suspended(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), Some(handle))
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Success, verdict.status);
    assert_eq!(ReasonCode::NoError, verdict.reason);

    // resumption re-entered at the verification stage: exactly one exchange took place
    assert_eq!(1, transport.calls().len());
    assert_eq!(0, cache.processing_failures(&cid));
}

#[test]
fn external_check_decode_failure() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(hex!("DEADBEEF").to_vec()));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::NoInfo, verdict.status);
    assert_eq!(ReasonCode::DecodeFailure, verdict.reason);

    // exactly one failure marker per failed call
    assert_eq!(1, cache.processing_failures(&cid));

    transport.push(ScriptStep::Respond(hex!("DEAD").to_vec()));
    let _ = checker
        .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
        .unwrap();
    assert_eq!(2, cache.processing_failures(&cid));
}

#[test]
fn external_check_decode_failure_escalates_with_flag() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(vec![0x00]));

    let verdict = decided(
        checker
            .check_external(
                &pe,
                &cert,
                &issuer,
                TOI,
                MethodFlags::FailOnMissingFreshInfo.into(),
                None,
            )
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Revoked, verdict.status);
    assert_eq!(ReasonCode::DecodeFailure, verdict.reason);
    assert_eq!(1, cache.processing_failures(&cid));
}

#[test]
fn external_check_transport_failure() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Fail);

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::NoInfo, verdict.status);
    assert_eq!(ReasonCode::TransportFailure, verdict.reason);
    assert_eq!(1, cache.processing_failures(&cid));
}

#[test]
fn external_check_responder_reported_error() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(encode_ocsp_response(
        OcspResponseStatus::TryLater,
        None,
    )));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::NoInfo, verdict.status);
    assert_eq!(ReasonCode::ResponderError, verdict.reason);
    assert_eq!(1, cache.processing_failures(&cid));
}

#[test]
fn external_check_signature_verification_failure() {
    let checker = make_checker(reject_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(good_response(&cid)));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::NoInfo, verdict.status);
    assert_eq!(ReasonCode::SignatureVerificationFailure, verdict.reason);
    assert_eq!(1, cache.processing_failures(&cid));

    // nothing was cached for the unverified response
    let local = checker
        .check_local(&pe, &cert, &issuer, TOI, Default::default())
        .unwrap();
    assert_eq!(RevocationStatus::NoInfo, local.status);
}

#[test]
fn external_check_unknown_status_is_revoked() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(make_ocsp_response(
        &cid,
        CertStatus::Unknown(Null),
        TOI - 1_000,
        Some(TOI + 10_000),
        vec![],
    )));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Revoked, verdict.status);
    assert_eq!(ReasonCode::UnknownCertificate, verdict.reason);
    assert_eq!(1, cache.processing_failures(&cid));
}

#[test]
fn external_check_stale_response_is_revoked() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    transport.push(ScriptStep::Respond(make_ocsp_response(
        &cid,
        CertStatus::Good(Null),
        TOI - 10_000,
        Some(TOI - 1_000),
        vec![],
    )));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Revoked, verdict.status);
    assert_eq!(ReasonCode::StaleResponse, verdict.reason);
    assert_eq!(1, cache.processing_failures(&cid));

    // a stale answer must not have been cached
    let local = checker
        .check_local(&pe, &cert, &issuer, TOI, Default::default())
        .unwrap();
    assert_eq!(RevocationStatus::NoInfo, local.status);
}

#[test]
fn external_check_response_for_other_certificate() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();

    let other = make_cert("CN=Other", "CN=Issuing CA", &[0x7F], None);
    let other_cid = OcspCertId::derive(&other, &issuer).unwrap();
    transport.push(ScriptStep::Respond(good_response(&other_cid)));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Revoked, verdict.status);
    assert_eq!(ReasonCode::UnknownCertificate, verdict.reason);
    assert_eq!(1, cache.processing_failures(&cid));
}

#[test]
fn external_check_delegated_responder() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    let mut pe = make_env_with_cache(&cache);
    // accept the responder certificate's issuer signature without real cryptography
    pe.add_verify_signature_message_callback(accept_message_verification);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    let responder = make_cert("CN=Responder", "CN=Issuing CA", &[0x42], None);
    transport.push(ScriptStep::Respond(make_ocsp_response(
        &cid,
        CertStatus::Good(Null),
        TOI - 1_000,
        Some(TOI + 10_000),
        vec![responder],
    )));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::Success, verdict.status);
    assert_eq!(ReasonCode::NoError, verdict.reason);
}

#[test]
fn external_check_delegated_responder_not_verifiable() {
    let checker = make_checker(accept_all_verify);
    let cache = StatusCacheMap::new();
    // no message verification callback is registered, so the candidate responder
    // certificate cannot be screened and the response must be rejected
    let mut pe = make_env_with_cache(&cache);
    let transport = ScriptedTransport::default();
    pe.add_ocsp_transport(Box::new(transport.clone()));

    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    let responder = make_cert("CN=Responder", "CN=Issuing CA", &[0x42], None);
    transport.push(ScriptStep::Respond(make_ocsp_response(
        &cid,
        CertStatus::Good(Null),
        TOI - 1_000,
        Some(TOI + 10_000),
        vec![responder],
    )));

    let verdict = decided(
        checker
            .check_external(&pe, &cert, &issuer, TOI, Default::default(), None)
            .unwrap(),
    );
    assert_eq!(RevocationStatus::NoInfo, verdict.status);
    assert_eq!(ReasonCode::SignatureVerificationFailure, verdict.reason);
    assert_eq!(1, cache.processing_failures(&cid));
}

#[test]
fn external_check_wrong_method_type() {
    OcspChecker::register_self();
    register_method(
        RevocationMethodType::Crl,
        MethodRegistration {
            description: "CrlChecker",
            object_size: 0,
        },
    );
    let checker = OcspChecker::create(
        RevocationMethodType::Crl,
        Default::default(),
        0,
        accept_all_verify,
    )
    .unwrap();

    let pe = RevocationEnvironment::default();
    let r = checker.check_external(
        &pe,
        &target_with_uri(),
        &issuing_ca(),
        TOI,
        Default::default(),
        None,
    );
    assert_eq!(Some(Error::Misconfiguration), r.err());
}

#[test]
fn cert_id_derivation_and_matching() {
    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();
    let cid2 = OcspCertId::derive(&cert, &issuer).unwrap();
    assert_eq!(cid, cid2);
    assert_eq!(cid.cache_key(), cid2.cache_key());

    // the derived identity matches its own wire form
    assert!(cid.matches(&cid.to_cert_id().unwrap()));

    // a different serial number yields a different identity
    let other = make_cert("CN=Other", "CN=Issuing CA", &[0x7F], None);
    let other_cid = OcspCertId::derive(&other, &issuer).unwrap();
    assert_ne!(cid.cache_key(), other_cid.cache_key());
    assert!(!cid.matches(&other_cid.to_cert_id().unwrap()));

    // a different issuer yields a different identity for the same serial number
    let other_issuer = make_cert("CN=Another CA", "CN=Root CA", &[0x03], None);
    let cross_cid = OcspCertId::derive(&cert, &other_issuer).unwrap();
    assert_ne!(cid.cache_key(), cross_cid.cache_key());
}

#[test]
fn status_cache_newer_next_update_wins() {
    let cache = StatusCacheMap::new();
    let cert = target_with_uri();
    let issuer = issuing_ca();
    let cid = OcspCertId::derive(&cert, &issuer).unwrap();

    cache.add_status(
        &cid,
        TOI + 100,
        CachedStatus {
            is_good: true,
            reason: ReasonCode::NoError,
        },
    );
    // an older determination must not displace a newer one
    cache.add_status(
        &cid,
        TOI + 50,
        CachedStatus {
            is_good: false,
            reason: ReasonCode::CertificateRevoked,
        },
    );
    let status = cache.get_fresh_status(&cid, TOI).unwrap();
    assert!(status.is_good);

    // freshness horizon is exclusive
    assert!(cache.get_fresh_status(&cid, TOI + 100).is_none());
}
