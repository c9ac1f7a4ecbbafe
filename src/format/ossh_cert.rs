use crate::error::*;
use crate::keys::cert::{CertType, RsaCertificate};
use crate::sshbuf::{SshReadExt, SshReader};
use log::{debug, trace};

pub(crate) const RSA_CERT_NAME: &str = "ssh-rsa-cert-v01@openssh.com";

/// Split a certificate line `"<algorithm> <base64> [comment]"` and decode it
pub(crate) fn parse_ossh_cert(keystr: &str) -> OsshResult<RsaCertificate> {
    let key_split: Vec<&str> = keystr.split_ascii_whitespace().collect();
    if key_split.len() < 2 || key_split.len() > 3 {
        return Err(ErrorKind::FormatMismatch.into());
    }
    if key_split[0] != RSA_CERT_NAME {
        return Err(ErrorKind::AlgorithmMismatch.into());
    }
    let blob = base64::decode(key_split[1])?;
    let mut cert = decode_ossh_cert(&blob)?;
    if key_split.len() == 3 {
        cert.comment = key_split[2].to_owned();
    }
    Ok(cert)
}

/// Decode the binary body of an RSA certificate
///
/// Fields are read in wire order and the first failing read aborts the decode.
pub(crate) fn decode_ossh_cert(blob: &[u8]) -> OsshResult<RsaCertificate> {
    let mut reader = SshReader::new(blob);
    // Unused 4 bytes ahead of the bare identifier
    reader.skip(4)?;
    if reader.read(RSA_CERT_NAME.len())? != RSA_CERT_NAME.as_bytes() {
        return Err(ErrorKind::AlgorithmMismatch.into());
    }

    let nonce = reader.read_string()?.to_vec();
    let e = reader.read_mpint()?;
    let n = reader.read_mpint()?;
    let serial = reader.read_uint64()?;
    let cert_type = CertType::from(reader.read_uint32()?);
    let key_id = reader.read_string()?.to_vec();
    trace!("Certificate key id {:?}, serial {}", String::from_utf8_lossy(&key_id), serial);

    let principals = reader
        .read_string_list()?
        .into_iter()
        .map(<[u8]>::to_vec)
        .collect::<Vec<_>>();
    let valid_after = reader.read_uint64()?;
    let valid_before = reader.read_uint64()?;
    let critical_options = reader.read_string()?.to_vec();
    let extensions = reader.read_string()?.to_vec();
    let reserved = reader.read_string()?.to_vec();
    let signature_key = reader.read_string()?.to_vec();
    let signature = reader.read_string()?.to_vec();

    debug!(
        "Decoded {} certificate, serial {}, {} principal(s)",
        cert_type,
        serial,
        principals.len()
    );
    Ok(RsaCertificate {
        nonce,
        e,
        n,
        serial,
        cert_type,
        key_id,
        principals,
        valid_after,
        valid_before,
        critical_options,
        extensions,
        reserved,
        signature_key,
        signature,
        comment: String::new(),
    })
}
