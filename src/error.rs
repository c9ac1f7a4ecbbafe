use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FmtResult};

pub type OsshResult<T> = Result<T, Error>;

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// The error type of this crate
///
/// It carries an [`ErrorKind`](enum.ErrorKind.html) and, when the failure came from
/// another library (or from an external [`Decryptor`](../cipher/trait.Decryptor.html)),
/// the original error as its source.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    inner: Option<BoxedError>,
}

impl Error {
    pub(crate) fn from_kind(kind: ErrorKind) -> Self {
        Error { kind, inner: None }
    }

    /// Create an error of the given kind wrapping another error
    pub fn with_error<E: StdError + Send + Sync + 'static>(kind: ErrorKind, err: E) -> Self {
        Error {
            kind,
            inner: Some(Box::new(err)),
        }
    }

    /// Get the kind of the error
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Re-tag an error with another kind, keeping its source
    pub(crate) fn into_kind(self, kind: ErrorKind) -> Self {
        Error { kind, ..self }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.kind)?;
        if let Some(cause) = &self.inner {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<openssl::error::ErrorStack> for Error {
    fn from(err: openssl::error::ErrorStack) -> Self {
        Self::with_error(ErrorKind::OpenSslError, err)
    }
}
impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::with_error(ErrorKind::Base64Error, err)
    }
}
impl From<nom_pem::PemParsingError> for Error {
    fn from(_err: nom_pem::PemParsingError) -> Self {
        // nom_pem::PemParsingError doesn't implement std::error::Error
        Self::from_kind(ErrorKind::InvalidPemFormat)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    /// The buffer ran out of bytes for a requested read
    Truncated,
    /// The algorithm identifier of a record is not the expected one
    AlgorithmMismatch,
    /// A fixed literal or a decrypted field did not match the format
    FormatMismatch,
    /// No registered public key decoder matched the identifier
    UnsupportedAlgorithm,
    /// The two check integers of a private section differ
    IntegrityMismatch,
    /// The key derivation function is not available
    UnsupportedKdf,
    IncorrectPass,
    InvalidKeySize,
    OpenSslError,
    Base64Error,
    InvalidPemFormat,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        use ErrorKind::*;

        match self {
            Truncated => "Truncated Data",
            AlgorithmMismatch => "Algorithm Identifier Not Match",
            FormatMismatch => "Invalid Format",
            UnsupportedAlgorithm => "Unsupported Key Type",
            IntegrityMismatch => "Check Integers Not Match",
            UnsupportedKdf => "Unsupported Key Derivation Function",
            IncorrectPass => "Incorrect Passphrase",
            InvalidKeySize => "Invalid Key Size",
            OpenSslError => "OpenSSL Error",
            Base64Error => "Base64 Error",
            InvalidPemFormat => "Invalid PEM Format",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.name())
    }
}
