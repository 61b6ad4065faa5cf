//! Utility functions supporting revocation status determination

use log::error;
use x509_cert::name::Name;
use x509_cert::TbsCertificate;

use crate::util::error::{Error, Result};

/// `buffer_to_hex` takes a byte array and returns a string featuring upper case ASCII hex
/// characters (without commas, spaces, or brackets).
/// ```
/// use revstat::buffer_to_hex;
/// let buf: [u8; 3] = [1, 2, 3];
/// let bufhex = buffer_to_hex(&buf);
/// assert_eq!(bufhex, "010203");
/// ```
pub fn buffer_to_hex(buffer: &[u8]) -> String {
    hex::encode_upper(buffer)
}

/// `name_to_string` returns a string representation of given Name value.
pub fn name_to_string(name: &Name) -> String {
    name.to_string()
}

/// `valid_at_time` evaluates the not_before and not_after fields of the given TBSCertificate
/// instance and provides an indication of validity relative to presented time of interest.
///
/// It returns the number of seconds left to live if the certificate is valid at the given time
/// or an error indicating which field failed if the certificate is not valid. The not_before
/// field is evaluated first. A time of interest of zero disables the check.
pub fn valid_at_time(target: &TbsCertificate, toi: u64) -> Result<u64> {
    if 0 == toi {
        // zero is used to disable validity check
        return Ok(0);
    }

    let nb = target.validity.not_before.to_unix_duration().as_secs();
    if nb > toi {
        error!(
            "Certificate issued to {} is not yet valid relative to the configured time of interest",
            name_to_string(&target.subject)
        );
        return Err(Error::Unrecognized);
    }

    let na = target.validity.not_after.to_unix_duration().as_secs();
    if na < toi {
        error!(
            "Certificate issued to {} is expired relative to the configured time of interest: {}",
            name_to_string(&target.subject),
            target.validity.not_after
        );
        Err(Error::Unrecognized)
    } else {
        Ok(na - toi)
    }
}

#[test]
fn buffer_to_hex_upper() {
    assert_eq!("DEADBEEF", buffer_to_hex(&[0xDE, 0xAD, 0xBE, 0xEF]));
    assert_eq!("", buffer_to_hex(&[]));
}
