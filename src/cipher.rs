use crate::error::*;
use crate::sshbuf::{SshReadExt, SshReader};

pub const KDF_NONE: &[u8] = b"none";
pub const KDF_BCRYPT: &[u8] = b"bcrypt";

/// Decrypt the private section of an `openssh-key-v1` container
///
/// Implementations pick the key derivation and cipher from `kdfname` and `kdfoptions`.
/// The name is passed as stored in the container, it isn't required to be UTF-8.
/// They must fail with [`ErrorKind::UnsupportedKdf`](../error/enum.ErrorKind.html#variant.UnsupportedKdf)
/// for a key derivation function they don't implement, and with
/// [`ErrorKind::IncorrectPass`](../error/enum.ErrorKind.html#variant.IncorrectPass)
/// when the passphrase fails authentication.
/// The returned error is passed to the caller unchanged.
pub trait Decryptor {
    fn decrypt(
        &self,
        ciphertext: &[u8],
        passphrase: &str,
        kdfname: &[u8],
        kdfoptions: &[u8],
    ) -> OsshResult<Vec<u8>>;
}

/// Only handles unencrypted keys (`kdfname` is `none`)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDecryptor;

impl Decryptor for NullDecryptor {
    fn decrypt(
        &self,
        ciphertext: &[u8],
        _passphrase: &str,
        kdfname: &[u8],
        _kdfoptions: &[u8],
    ) -> OsshResult<Vec<u8>> {
        if kdfname == KDF_NONE {
            Ok(ciphertext.to_vec())
        } else {
            Err(ErrorKind::UnsupportedKdf.into())
        }
    }
}

/// Decoded `kdfoptions` of a private key container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KdfOptions {
    None,
    Bcrypt { salt: Vec<u8>, rounds: u32 },
}

impl KdfOptions {
    pub fn decode(kdfname: &[u8], kdfoptions: &[u8]) -> OsshResult<Self> {
        if kdfname == KDF_NONE {
            if kdfoptions.is_empty() {
                Ok(KdfOptions::None)
            } else {
                Err(ErrorKind::FormatMismatch.into())
            }
        } else if kdfname == KDF_BCRYPT {
            let mut reader = SshReader::new(kdfoptions);
            let salt = reader.read_string()?.to_vec();
            let rounds = reader.read_uint32()?;
            Ok(KdfOptions::Bcrypt { salt, rounds })
        } else {
            Err(ErrorKind::UnsupportedKdf.into())
        }
    }
}
