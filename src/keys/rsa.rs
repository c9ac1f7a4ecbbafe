use super::Key;
use crate::error::*;
use crate::sshbuf::{SshReadExt, SshReader};
use openssl::bn::{BigNum, BigNumContext, BigNumRef};
use openssl::pkey::Private;
use openssl::rsa::Rsa;
use std::fmt;

pub const RSA_NAME: &str = "ssh-rsa";

/// Represent the RSA public key
///
/// Two keys are equal iff both the modulus and the public exponent are equal.
pub struct RsaPublicKey {
    e: BigNum,
    n: BigNum,
}

impl RsaPublicKey {
    pub fn new(n: BigNum, e: BigNum) -> RsaPublicKey {
        RsaPublicKey { e, n }
    }

    /// Decode the key parameters following an already consumed `ssh-rsa` identifier
    ///
    /// The public exponent comes before the modulus.
    pub fn decode(reader: &mut SshReader) -> OsshResult<RsaPublicKey> {
        let e = reader.read_mpint()?;
        let n = reader.read_mpint()?;
        Ok(RsaPublicKey::new(n, e))
    }

    /// The public exponent
    pub fn e(&self) -> &BigNumRef {
        &self.e
    }

    /// The modulus
    pub fn n(&self) -> &BigNumRef {
        &self.n
    }
}

impl Key for RsaPublicKey {
    fn size(&self) -> usize {
        self.n.num_bits() as usize
    }

    fn keyname(&self) -> &'static str {
        RSA_NAME
    }
}

impl PartialEq for RsaPublicKey {
    fn eq(&self, other: &RsaPublicKey) -> bool {
        self.e == other.e && self.n == other.n
    }
}

impl Eq for RsaPublicKey {}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("e", &self.e)
            .field("n", &self.n)
            .finish()
    }
}

/// Represent the RSA key pair stored in the private section of an OpenSSH key
pub struct RsaKeyPair {
    n: BigNum,
    e: BigNum,
    d: BigNum,
    iqmp: BigNum,
    p: BigNum,
    q: BigNum,
    comment: String,
}

impl RsaKeyPair {
    /// Decode the private fields in their wire order: n, e, d, iqmp, p, q, comment
    pub(crate) fn decode(reader: &mut SshReader) -> OsshResult<RsaKeyPair> {
        let n = reader.read_mpint()?;
        let e = reader.read_mpint()?;
        let d = reader.read_mpint()?;
        let iqmp = reader.read_mpint()?;
        let p = reader.read_mpint()?;
        let q = reader.read_mpint()?;
        let comment = String::from_utf8_lossy(reader.read_string()?).into_owned();
        Ok(RsaKeyPair {
            n,
            e,
            d,
            iqmp,
            p,
            q,
            comment,
        })
    }

    pub fn n(&self) -> &BigNumRef {
        &self.n
    }

    pub fn e(&self) -> &BigNumRef {
        &self.e
    }

    /// The private exponent
    pub fn d(&self) -> &BigNumRef {
        &self.d
    }

    /// The CRT coefficient `q^-1 mod p`
    pub fn iqmp(&self) -> &BigNumRef {
        &self.iqmp
    }

    pub fn p(&self) -> &BigNumRef {
        &self.p
    }

    pub fn q(&self) -> &BigNumRef {
        &self.q
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn clone_public_key(&self) -> OsshResult<RsaPublicKey> {
        Ok(RsaPublicKey::new(self.n.to_owned()?, self.e.to_owned()?))
    }

    /// Build an OpenSSL RSA key, deriving the CRT exponents from `d`, `p` and `q`
    pub fn ossl_rsa(&self) -> OsshResult<Rsa<Private>> {
        let mut ctx = BigNumContext::new()?;
        let one = BigNum::from_u32(1)?;

        let mut p1 = BigNum::new()?;
        p1.checked_sub(&self.p, &one)?;
        let mut dmp1 = BigNum::new()?;
        dmp1.checked_rem(&self.d, &p1, &mut ctx)?;

        let mut q1 = BigNum::new()?;
        q1.checked_sub(&self.q, &one)?;
        let mut dmq1 = BigNum::new()?;
        dmq1.checked_rem(&self.d, &q1, &mut ctx)?;

        Ok(Rsa::from_private_components(
            self.n.to_owned()?,
            self.e.to_owned()?,
            self.d.to_owned()?,
            self.p.to_owned()?,
            self.q.to_owned()?,
            dmp1,
            dmq1,
            self.iqmp.to_owned()?,
        )?)
    }
}

impl Key for RsaKeyPair {
    fn size(&self) -> usize {
        self.n.num_bits() as usize
    }

    fn keyname(&self) -> &'static str {
        RSA_NAME
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("e", &self.e)
            .field("n", &self.n)
            .field("comment", &self.comment)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sshbuf::test_utils::*;
    use hex_literal::hex;

    #[test]
    fn rsa_publickey_decode_order() {
        let mut data = string(&hex!("01 00 01"));
        data.extend(string(&hex!("00 c3 5f")));
        let mut reader = SshReader::new(&data);
        let key = RsaPublicKey::decode(&mut reader).unwrap();
        assert_eq!(key.e(), &*BigNum::from_u32(65537).unwrap());
        assert_eq!(key.n(), &*BigNum::from_u32(0xc35f).unwrap());
        assert_eq!(key.size(), 16);
        assert_eq!(key.keyname(), "ssh-rsa");
        assert!(reader.is_exhausted());
    }

    #[test]
    fn rsa_publickey_eq() {
        let key = |n: u32, e: u32| {
            RsaPublicKey::new(BigNum::from_u32(n).unwrap(), BigNum::from_u32(e).unwrap())
        };
        assert_eq!(key(0xc35f, 65537), key(0xc35f, 65537));
        assert_ne!(key(0xc35f, 65537), key(0xc35e, 65537));
        assert_ne!(key(0xc35f, 65537), key(0xc35f, 3));
    }

    #[test]
    fn rsa_keypair_decode() {
        // p = 61, q = 53, n = 3233, e = 17, d = 2753, iqmp = 53^-1 mod 61 = 38
        let mut data = Vec::new();
        for v in &[3233u32, 17, 2753, 38, 61, 53] {
            data.extend(string(&v.to_be_bytes()));
        }
        data.extend(string(b"toy key"));
        let mut reader = SshReader::new(&data);
        let key = RsaKeyPair::decode(&mut reader).unwrap();
        assert_eq!(key.n(), &*BigNum::from_u32(3233).unwrap());
        assert_eq!(key.d(), &*BigNum::from_u32(2753).unwrap());
        assert_eq!(key.iqmp(), &*BigNum::from_u32(38).unwrap());
        assert_eq!(key.p(), &*BigNum::from_u32(61).unwrap());
        assert_eq!(key.q(), &*BigNum::from_u32(53).unwrap());
        assert_eq!(key.comment(), "toy key");
        assert_eq!(
            key.clone_public_key().unwrap(),
            RsaPublicKey::new(BigNum::from_u32(3233).unwrap(), BigNum::from_u32(17).unwrap())
        );
        assert!(!format!("{:?}", key).contains("2753"));
    }

    #[test]
    fn rsa_keypair_truncated() {
        let mut data = string(&hex!("0c a1"));
        data.extend(string(&hex!("11")));
        let mut reader = SshReader::new(&data);
        assert_eq!(RsaKeyPair::decode(&mut reader).unwrap_err().kind(), ErrorKind::Truncated);
    }
}
