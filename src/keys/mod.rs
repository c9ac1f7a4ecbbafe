use crate::error::*;
use crate::format::ossh_pubkey::PublicKeyRegistry;
use crate::sshbuf::SshReader;

/// OpenSSH certificate type
pub mod cert;
/// `openssh-key-v1` private key container
pub mod container;
/// RSA key type
pub mod rsa;

pub use cert::{CertType, RsaCertificate};
pub use container::PrivateKeyContainer;
pub use rsa::{RsaKeyPair, RsaPublicKey};

/// An enum representing the type of key being stored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum KeyType {
    RSA,
}

/// General public key type
///
/// Each variant holds one of the key types supported in this crate.
/// Decoders producing it are looked up in a [`PublicKeyRegistry`](../format/ossh_pubkey/struct.PublicKeyRegistry.html).
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublicKey {
    Rsa(RsaPublicKey),
}

impl PublicKey {
    /// Decode a public key blob which starts with a bare algorithm identifier
    ///
    /// Only the built-in decoders are tried.
    /// Use [`PublicKeyRegistry::decode`](../format/ossh_pubkey/struct.PublicKeyRegistry.html#method.decode) for others.
    pub fn from_bytes(blob: &[u8]) -> OsshResult<Self> {
        PublicKeyRegistry::default().decode(&mut SshReader::new(blob))
    }

    /// Indicate the key type being stored
    pub fn keytype(&self) -> KeyType {
        match self {
            PublicKey::Rsa(_) => KeyType::RSA,
        }
    }

    pub fn as_rsa(&self) -> Option<&RsaPublicKey> {
        match self {
            PublicKey::Rsa(key) => Some(key),
        }
    }

    fn inner_key(&self) -> &dyn Key {
        match self {
            PublicKey::Rsa(key) => key,
        }
    }
}

impl Key for PublicKey {
    fn size(&self) -> usize {
        self.inner_key().size()
    }

    fn keyname(&self) -> &'static str {
        self.inner_key().keyname()
    }
}

impl From<RsaPublicKey> for PublicKey {
    fn from(inner: RsaPublicKey) -> PublicKey {
        PublicKey::Rsa(inner)
    }
}

/// The basic trait of a key
pub trait Key {
    /// The size in bits of the key
    fn size(&self) -> usize;
    /// The key name of the key
    fn keyname(&self) -> &'static str;
}
