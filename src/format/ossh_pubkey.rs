use crate::error::*;
use crate::keys::rsa::{RsaPublicKey, RSA_NAME};
use crate::keys::PublicKey;
use crate::sshbuf::SshReader;
use log::trace;

/// Decode the key parameters following an algorithm identifier
pub type DecodeFn = fn(&mut SshReader) -> OsshResult<PublicKey>;

/// Maps algorithm identifiers to public key decoders
///
/// The identifiers are matched as bare bytes at the reader position,
/// longest identifier first, so a shorter identifier never matches the prefix of a longer one.
#[derive(Clone)]
pub struct PublicKeyRegistry {
    decoders: Vec<(&'static str, DecodeFn)>,
}

impl PublicKeyRegistry {
    /// Create a registry without any decoder
    pub fn new() -> Self {
        PublicKeyRegistry {
            decoders: Vec::new(),
        }
    }

    /// Register a decoder, replacing the one registered under the same identifier
    pub fn register(&mut self, name: &'static str, decoder: DecodeFn) {
        self.decoders.retain(|(n, _)| *n != name);
        let idx = self
            .decoders
            .iter()
            .position(|(n, _)| n.len() < name.len())
            .unwrap_or_else(|| self.decoders.len());
        self.decoders.insert(idx, (name, decoder));
    }

    /// The registered identifiers, longest first
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.iter().map(|(n, _)| *n)
    }

    /// Identify the algorithm at the reader position and decode the key
    pub fn decode(&self, reader: &mut SshReader) -> OsshResult<PublicKey> {
        for (name, decoder) in &self.decoders {
            let matched = reader
                .peek(name.len())
                .map_or(false, |ident| ident == name.as_bytes());
            if matched {
                trace!("Decoding {} public key", name);
                reader.skip(name.len())?;
                return decoder(reader);
            }
        }
        match self.names().map(str::len).min() {
            Some(shortest) if reader.remaining().len() < shortest => {
                Err(ErrorKind::Truncated.into())
            }
            _ => Err(ErrorKind::UnsupportedAlgorithm.into()),
        }
    }

    /// Consume a bare identifier at the reader position if it is a registered one
    pub(crate) fn skip_identifier(&self, reader: &mut SshReader) -> bool {
        for name in self.names() {
            if reader.peek(name.len()).map_or(false, |ident| ident == name.as_bytes()) {
                return reader.skip(name.len()).is_ok();
            }
        }
        false
    }
}

impl Default for PublicKeyRegistry {
    fn default() -> Self {
        let mut registry = PublicKeyRegistry::new();
        registry.register(RSA_NAME, decode_rsa_pubkey);
        registry
    }
}

pub(crate) fn decode_rsa_pubkey(reader: &mut SshReader) -> OsshResult<PublicKey> {
    Ok(RsaPublicKey::decode(reader)?.into())
}
