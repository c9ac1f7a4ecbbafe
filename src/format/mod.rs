use crate::error::*;
use crate::keys::PrivateKeyContainer;

pub(crate) mod ossh_cert;
pub(crate) mod ossh_privkey;
pub mod ossh_pubkey;

const OSSH_PRIVKEY_BLOCK: &str = "OPENSSH PRIVATE KEY";

pub(crate) fn parse_keystr(pem: &[u8]) -> OsshResult<PrivateKeyContainer> {
    // HACK: Fix parsing problem of CRLF in nom_pem
    let s;
    let pemdata = if pem.contains(&b'\r') {
        s = std::str::from_utf8(pem)
            .map_err(|e| Error::with_error(ErrorKind::InvalidPemFormat, e))?
            .replace("\r\n", "\n");
        nom_pem::decode_block(s.as_bytes())?
    } else {
        nom_pem::decode_block(pem)?
    };

    match pemdata.block_type {
        OSSH_PRIVKEY_BLOCK => PrivateKeyContainer::from_bytes(&pemdata.data),
        _ => Err(ErrorKind::InvalidPemFormat.into()),
    }
}
