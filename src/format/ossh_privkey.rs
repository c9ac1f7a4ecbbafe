use super::ossh_pubkey::PublicKeyRegistry;
use crate::cipher::Decryptor;
use crate::error::*;
use crate::keys::{PrivateKeyContainer, RsaKeyPair};
use crate::sshbuf::{SshReadExt, SshReader};
use log::{debug, trace};
use zeroize::Zeroizing;

pub(crate) const OSSH_MAGIC: &[u8] = b"openssh-key-v1\0";

pub(crate) fn decode_ossh_priv(
    keydata: &[u8],
    registry: &PublicKeyRegistry,
) -> OsshResult<PrivateKeyContainer> {
    let mut reader = SshReader::new(keydata);
    if reader.read(OSSH_MAGIC.len())? != OSSH_MAGIC {
        return Err(ErrorKind::FormatMismatch.into());
    }

    let ciphername = reader.read_string()?.to_vec();
    let kdfname = reader.read_string()?.to_vec();
    let kdfoptions = reader.read_string()?.to_vec();

    let nkeys = reader.read_uint32()?;
    let mut public_keys = Vec::new();
    for _ in 0..nkeys {
        let mut keyreader = SshReader::new(reader.read_string()?);
        // Unused 4 bytes ahead of the bare identifier
        keyreader.skip(4)?;
        public_keys.push(registry.decode(&mut keyreader)?);
    }
    let encrypted = Zeroizing::new(reader.read_string()?.to_vec());

    debug!(
        "Decoded openssh-key-v1 container, cipher {}, kdf {}, {} key(s)",
        String::from_utf8_lossy(&ciphername),
        String::from_utf8_lossy(&kdfname),
        public_keys.len()
    );
    Ok(PrivateKeyContainer {
        ciphername,
        kdfname,
        kdfoptions,
        public_keys,
        encrypted,
    })
}

/// Decrypt and decode the private section of the container
///
/// The first check integer is taken from the blob before decryption and
/// the second one from the decrypted data. They must be equal before any key field is read.
pub(crate) fn decode_ossh_private_section(
    container: &PrivateKeyContainer,
    passphrase: &str,
    decryptor: &dyn Decryptor,
    registry: &PublicKeyRegistry,
) -> OsshResult<Vec<RsaKeyPair>> {
    let mut reader = SshReader::new(container.encrypted.as_slice());
    let checkint0 = Zeroizing::new(reader.read_uint32()?);

    let decrypted = Zeroizing::new(decryptor.decrypt(
        reader.remaining(),
        passphrase,
        &container.kdfname,
        &container.kdfoptions,
    )?);
    let mut secret_reader = SshReader::new(decrypted.as_slice());
    let checkint1 = Zeroizing::new(
        secret_reader
            .read_uint32()
            .map_err(|e| e.into_kind(ErrorKind::FormatMismatch))?,
    );
    if *checkint0 != *checkint1 {
        debug!("Private section rejected: check integers differ");
        return Err(ErrorKind::IntegrityMismatch.into());
    }

    let nkeys = container.public_keys.len().max(1);
    let mut keys = Vec::new();
    for i in 0..nkeys {
        let key = decode_private_key(&mut secret_reader, registry).map_err(|e| {
            debug!("Private section rejected at key {}: {}", i, e);
            e.into_kind(ErrorKind::FormatMismatch)
        })?;
        trace!("Decoded private key {} ({} bits)", i, key.n().num_bits());
        keys.push(key);
    }
    // The rest is padding
    Ok(keys)
}

fn decode_private_key(
    reader: &mut SshReader,
    registry: &PublicKeyRegistry,
) -> OsshResult<RsaKeyPair> {
    reader.skip(4)?;
    registry.skip_identifier(reader);
    RsaKeyPair::decode(reader)
}
