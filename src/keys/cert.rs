use super::{Key, PrivateKeyContainer, PublicKey, RsaKeyPair, RsaPublicKey};
use crate::error::*;
use crate::format::ossh_cert::{decode_ossh_cert, parse_ossh_cert, RSA_CERT_NAME};
use openssl::bn::{BigNum, BigNumRef};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// The certificate type field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertType {
    User,
    Host,
    Unknown(u32),
}

impl CertType {
    pub fn value(self) -> u32 {
        match self {
            CertType::User => 1,
            CertType::Host => 2,
            CertType::Unknown(v) => v,
        }
    }
}

impl From<u32> for CertType {
    fn from(v: u32) -> Self {
        match v {
            1 => CertType::User,
            2 => CertType::Host,
            v => CertType::Unknown(v),
        }
    }
}

impl fmt::Display for CertType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CertType::User => write!(f, "user"),
            CertType::Host => write!(f, "host"),
            CertType::Unknown(v) => write!(f, "unknown({})", v),
        }
    }
}

/// An OpenSSH RSA certificate (`ssh-rsa-cert-v01@openssh.com`)
///
/// Built in one pass from the certificate body and never modified afterwards.
/// The critical options, extensions, reserved field, signature key and signature
/// are kept as opaque bytes; the signature is not verified.
pub struct RsaCertificate {
    pub(crate) nonce: Vec<u8>,
    pub(crate) e: BigNum,
    pub(crate) n: BigNum,
    pub(crate) serial: u64,
    pub(crate) cert_type: CertType,
    pub(crate) key_id: Vec<u8>,
    pub(crate) principals: Vec<Vec<u8>>,
    pub(crate) valid_after: u64,
    pub(crate) valid_before: u64,
    pub(crate) critical_options: Vec<u8>,
    pub(crate) extensions: Vec<u8>,
    pub(crate) reserved: Vec<u8>,
    pub(crate) signature_key: Vec<u8>,
    pub(crate) signature: Vec<u8>,
    pub(crate) comment: String,
}

impl RsaCertificate {
    /// Parse a certificate line as found in the `*-cert.pub` file
    pub fn from_keystr(keystr: &str) -> OsshResult<Self> {
        parse_ossh_cert(keystr)
    }

    /// Decode the binary (Base64 decoded) certificate body
    pub fn from_bytes(blob: &[u8]) -> OsshResult<Self> {
        decode_ossh_cert(blob)
    }

    /// Check that `now` (seconds since the Unix epoch) lies strictly inside the validity period
    pub fn is_valid_time(&self, now: u64) -> bool {
        self.valid_after < now && now < self.valid_before
    }

    /// Check the validity period against the system clock
    pub fn is_valid_now(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        self.is_valid_time(now)
    }

    /// Whether the container holds a key matching the certified public key
    pub fn is_valid_private_key(&self, container: &PrivateKeyContainer) -> bool {
        container.public_keys().iter().any(|key| match key {
            PublicKey::Rsa(rsa) => self.is_valid_public_key(rsa),
        })
    }

    /// Whether the modulus and the public exponent are the ones being certified
    pub fn is_valid_public_key(&self, key: &RsaPublicKey) -> bool {
        key.n() == self.n() && key.e() == self.e()
    }

    pub fn is_valid_key_pair(&self, keypair: &RsaKeyPair) -> bool {
        keypair.n() == self.n() && keypair.e() == self.e()
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// The public exponent of the certified key
    pub fn e(&self) -> &BigNumRef {
        &self.e
    }

    /// The modulus of the certified key
    pub fn n(&self) -> &BigNumRef {
        &self.n
    }

    pub fn public_key(&self) -> OsshResult<RsaPublicKey> {
        Ok(RsaPublicKey::new(self.n.to_owned()?, self.e.to_owned()?))
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn cert_type(&self) -> CertType {
        self.cert_type
    }

    pub fn key_id(&self) -> String {
        String::from_utf8_lossy(&self.key_id).into_owned()
    }

    /// Principals in the order they appear in the certificate
    pub fn principals(&self) -> Vec<String> {
        self.principals
            .iter()
            .map(|p| String::from_utf8_lossy(p).into_owned())
            .collect()
    }

    pub fn raw_principals(&self) -> &[Vec<u8>] {
        &self.principals
    }

    pub fn valid_after(&self) -> u64 {
        self.valid_after
    }

    pub fn valid_before(&self) -> u64 {
        self.valid_before
    }

    pub fn critical_options(&self) -> &[u8] {
        &self.critical_options
    }

    pub fn extensions(&self) -> &[u8] {
        &self.extensions
    }

    pub fn reserved(&self) -> &[u8] {
        &self.reserved
    }

    pub fn signature_key(&self) -> &[u8] {
        &self.signature_key
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The comment following the Base64 body, if parsed from a certificate line
    pub fn comment(&self) -> &str {
        &self.comment
    }
}

impl Key for RsaCertificate {
    fn size(&self) -> usize {
        self.n.num_bits() as usize
    }

    fn keyname(&self) -> &'static str {
        RSA_CERT_NAME
    }
}

impl fmt::Debug for RsaCertificate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RsaCertificate")
            .field("serial", &self.serial)
            .field("cert_type", &self.cert_type)
            .field("key_id", &self.key_id())
            .field("principals", &self.principals())
            .field("valid_after", &self.valid_after)
            .field("valid_before", &self.valid_before)
            .field("e", &self.e)
            .field("n", &self.n)
            .finish()
    }
}
