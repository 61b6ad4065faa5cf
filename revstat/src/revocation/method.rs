//! Structures and functions shared by all revocation checking methods: the method-type tag,
//! per-check policy flags, the process-wide method registry and the base configuration struct
//! composed into concrete checkers

use std::collections::BTreeMap;
use std::sync::Mutex;

use flagset::{flags, FlagSet};
use lazy_static::lazy_static;
use log::{debug, error};
use x509_cert::Certificate;

use crate::environment::revocation_environment::RevocationEnvironment;
use crate::revocation::ocsp_checker::{ExternalCheckOutcome, ResumeHandle, Verdict};
use crate::util::error::*;

/// Tags the kind of revocation checking method a checker implements.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum RevocationMethodType {
    /// Certificate revocation list processing
    Crl,
    /// Online Certificate Status Protocol processing
    Ocsp,
}

flags! {
    /// Per-check policy flags supplied by the caller.
    pub enum MethodFlags: u32 {
        /// Treat a certificate with no discoverable responder URI as revoked rather than
        /// returning no information
        RequireInfoOnMissingSource,
        /// Escalate a no-information outcome to revoked when a responder URI was found but
        /// the round trip produced no fresh information
        FailOnMissingFreshInfo,
    }
}

/// Descriptor registered for a revocation method kind.
///
/// Checkers hold no owned sub-objects requiring explicit release, so no destructor is
/// registered; dropping a checker is sufficient teardown.
#[derive(Clone, Debug)]
pub struct MethodRegistration {
    /// Human readable description of the method kind
    pub description: &'static str,
    /// Size in bytes of a checker instance of this kind
    pub object_size: usize,
}

lazy_static! {
    static ref METHOD_REGISTRY: Mutex<BTreeMap<RevocationMethodType, MethodRegistration>> =
        Mutex::new(BTreeMap::new());
}

/// register_method installs a [`MethodRegistration`] for the given method type into the
/// process-wide registry.
///
/// Registration is expected to run exactly once per method type during library
/// initialization, before any checks occur; concurrent registration is not supported.
pub fn register_method(method_type: RevocationMethodType, registration: MethodRegistration) {
    if let Ok(mut registry) = METHOD_REGISTRY.lock() {
        debug!(
            "Registering revocation method {:?} ({})",
            method_type, registration.description
        );
        registry.insert(method_type, registration);
    }
}

/// method_registration returns the [`MethodRegistration`] for the given method type, if one
/// has been registered.
pub fn method_registration(method_type: RevocationMethodType) -> Option<MethodRegistration> {
    match METHOD_REGISTRY.lock() {
        Ok(registry) => registry.get(&method_type).cloned(),
        Err(_) => None,
    }
}

/// [`RevocationMethod`] is the base configuration composed into each concrete checker: the
/// method-type tag, the flags the checker was configured with and its priority relative to
/// other methods. Instances are immutable after construction.
#[derive(Clone, Debug)]
pub struct RevocationMethod {
    method_type: RevocationMethodType,
    flags: FlagSet<MethodFlags>,
    priority: u32,
}

impl RevocationMethod {
    /// Initializes a base configuration for a checker of the given kind. Fails with
    /// [`Error::Misconfiguration`] when the method type has not been registered, i.e., when
    /// the library's startup sequence did not run the corresponding register function.
    pub fn new(
        method_type: RevocationMethodType,
        flags: FlagSet<MethodFlags>,
        priority: u32,
    ) -> Result<Self> {
        if method_registration(method_type).is_none() {
            error!(
                "Attempted to initialize a revocation method of unregistered type {:?}",
                method_type
            );
            return Err(Error::Misconfiguration);
        }
        Ok(RevocationMethod {
            method_type,
            flags,
            priority,
        })
    }

    /// Returns the method-type tag.
    pub fn method_type(&self) -> RevocationMethodType {
        self.method_type
    }

    /// Returns the flags the checker was configured with.
    pub fn flags(&self) -> FlagSet<MethodFlags> {
        self.flags
    }

    /// Returns the priority of this method relative to other methods.
    pub fn priority(&self) -> u32 {
        self.priority
    }
}

/// The [`RevocationChecker`] trait defines the two check entry points implemented by each
/// revocation checking method.
///
/// Checkers are read-only after construction and may be invoked concurrently for different
/// certificates without synchronization. The status cache reached through the
/// [`RevocationEnvironment`] is the only resource shared across concurrent checks and owns
/// its own concurrency discipline.
pub trait RevocationChecker {
    /// Returns the base configuration composed into this checker.
    fn method(&self) -> &RevocationMethod;

    /// Answers a revocation query from already-cached evidence only. No request is built, no
    /// network I/O occurs and no suspension is possible. A derivation failure for the
    /// certificate identity propagates as a hard error.
    fn check_local(
        &self,
        pe: &RevocationEnvironment,
        cert: &Certificate,
        issuer: &Certificate,
        time_of_interest: u64,
        flags: FlagSet<MethodFlags>,
    ) -> Result<Verdict>;

    /// Produces a verdict using a live round trip with the responder, respecting policy flags
    /// and supporting suspend/resume for non-blocking I/O. Pass the [`ResumeHandle`] returned
    /// by a suspended call to continue that call at exactly the stage that suspended.
    fn check_external(
        &self,
        pe: &RevocationEnvironment,
        cert: &Certificate,
        issuer: &Certificate,
        time_of_interest: u64,
        flags: FlagSet<MethodFlags>,
        resume: Option<ResumeHandle>,
    ) -> Result<ExternalCheckOutcome>;
}

#[test]
fn unregistered_method_type_is_misconfiguration() {
    // Crl is never registered by this crate
    let r = RevocationMethod::new(RevocationMethodType::Crl, Default::default(), 0);
    assert_eq!(Some(Error::Misconfiguration), r.err());
}
