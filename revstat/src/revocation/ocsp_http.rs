//! Blocking HTTP transport for OCSP request/response exchanges

use core::time::Duration;

use log::{debug, error};
use reqwest::header::CONTENT_TYPE;

use crate::environment::revocation_environment_traits::{OcspTransport, ResumeToken, Suspendable};
use crate::util::error::{Error, Result};

/// [`HttpOcspTransport`] implements the [`OcspTransport`] interface over a blocking HTTP
/// client. Requests are submitted via POST with the application/ocsp-request content type.
///
/// This transport blocks until the exchange completes or times out and therefore never
/// returns [`Suspendable::Pending`]; resume tokens presented to it are ignored.
#[derive(Clone, Debug)]
pub struct HttpOcspTransport {
    timeout_secs: u64,
}

impl Default for HttpOcspTransport {
    fn default() -> Self {
        HttpOcspTransport { timeout_secs: 10 }
    }
}

impl HttpOcspTransport {
    /// Creates a transport that applies the presented timeout, in seconds, to each exchange.
    pub fn new(timeout_secs: u64) -> Self {
        HttpOcspTransport { timeout_secs }
    }
}

impl OcspTransport for HttpOcspTransport {
    fn exchange(
        &self,
        uri: &str,
        request: &[u8],
        _resume: Option<ResumeToken>,
    ) -> Result<Suspendable<Vec<u8>>> {
        if !uri.starts_with("http") {
            debug!("Ignored non-HTTP URI presented to OCSP client");
            return Err(Error::InvalidUriScheme);
        }

        let client = match reqwest::blocking::Client::builder()
            .pool_max_idle_per_host(0)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
        {
            Ok(client) => client,
            Err(_e) => {
                error!("Failed to prepare OCSP client: {}", uri);
                return Err(Error::NetworkError);
            }
        };

        let body = match client
            .post(uri)
            .body(request.to_vec())
            .header(CONTENT_TYPE, "application/ocsp-request")
            .send()
        {
            Ok(body) => body,
            Err(e) => {
                debug!("OCSP request send failed with {}: {}", e, uri);
                return Err(Error::NetworkError);
            }
        };

        let body_bytes = match body.bytes() {
            Ok(bb) => bb,
            Err(e) => {
                error!("Failed to read OCSP response with {}: {}", e, uri);
                return Err(Error::NetworkError);
            }
        };

        Ok(Suspendable::Ready(body_bytes.to_vec()))
    }
}
