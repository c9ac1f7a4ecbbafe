//! Decode and validate OpenSSH RSA certificates and `openssh-key-v1` private keys
//!
//! ```no_run
//! use osshcert::keys::{PrivateKeyContainer, RsaCertificate};
//!
//! # fn main() -> osshcert::error::OsshResult<()> {
//! let cert = RsaCertificate::from_keystr(&std::fs::read_to_string("id_rsa-cert.pub").unwrap())?;
//! let key = PrivateKeyContainer::from_keystr(&std::fs::read_to_string("id_rsa").unwrap())?;
//! println!("principals: {:?}", cert.principals());
//! println!("valid now: {}", cert.is_valid_now());
//! println!("matching key: {}", cert.is_valid_private_key(&key));
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod error;
pub mod format;
pub mod keys;
pub mod sshbuf;
