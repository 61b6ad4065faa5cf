//! Provides a place to store revocation status determinations for retrieval at a later time

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use log::{debug, info};

use crate::environment::revocation_environment_traits::{CachedStatus, RevocationStatusCache};
use crate::revocation::cert_id::OcspCertId;
use crate::util::error::{Error, Result};

struct StatusAndTime {
    status: CachedStatus,
    time: u64, // freshness horizon, seconds since Unix epoch
}

type CacheMap = BTreeMap<String, StatusAndTime>;
type FailureMap = BTreeMap<String, u64>;

/// StatusCacheMap provides a simple in-memory revocation status cache that supports storing
/// determinations obtained from OCSP responders for subsequent use.
///
/// Cloning a StatusCacheMap yields a handle onto the same underlying maps, so an application
/// can retain one handle for inspection while registering another with a
/// [`RevocationEnvironment`](../environment/revocation_environment/struct.RevocationEnvironment.html).
#[derive(Clone, Default)]
pub struct StatusCacheMap {
    cache_map: Arc<Mutex<CacheMap>>,
    failure_map: Arc<Mutex<FailureMap>>,
}

impl StatusCacheMap {
    /// Instantiates a new empty StatusCacheMap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of processing failures recorded against the presented certificate
    /// identity since the cache was created.
    pub fn processing_failures(&self, cid: &OcspCertId) -> u64 {
        let failure_map = match self.failure_map.lock() {
            Ok(g) => g,
            Err(_) => return 0,
        };
        *failure_map.get(&cid.cache_key()).unwrap_or(&0)
    }
}

impl RevocationStatusCache for StatusCacheMap {
    fn get_fresh_status(&self, cid: &OcspCertId, time_of_interest: u64) -> Option<CachedStatus> {
        let cache_map = match self.cache_map.lock() {
            Ok(g) => g,
            Err(_) => return None,
        };
        let key = cid.cache_key();
        if let Some(status_and_time) = cache_map.get(&key) {
            if status_and_time.time > time_of_interest {
                info!(
                    "Serviced revocation status check for certificate with identity {} from cache",
                    key
                );
                return Some(status_and_time.status);
            }
        }
        None
    }

    fn add_status(&self, cid: &OcspCertId, next_update: u64, status: CachedStatus) {
        let key = cid.cache_key();
        let mut cache_map = match self.cache_map.lock() {
            Ok(g) => g,
            Err(_) => return,
        };
        let status_and_time = StatusAndTime {
            status,
            time: next_update,
        };
        if let Some(old_status_and_time) = cache_map.get(&key) {
            if old_status_and_time.time < next_update {
                debug!(
                    "Updating entry for certificate with identity {} in revocation status cache",
                    key
                );
                cache_map.insert(key, status_and_time);
            }
        } else {
            debug!(
                "Adding entry for certificate with identity {} to revocation status cache",
                key
            );
            cache_map.insert(key, status_and_time);
        }
    }

    fn record_processing_failure(&self, cid: &OcspCertId) -> Result<()> {
        let key = cid.cache_key();
        let mut failure_map = match self.failure_map.lock() {
            Ok(g) => g,
            Err(_) => return Err(Error::Unrecognized),
        };
        let count = failure_map.entry(key.clone()).or_insert(0);
        *count += 1;
        debug!(
            "Recorded OCSP processing failure #{} for certificate with identity {}",
            count, key
        );
        Ok(())
    }
}
