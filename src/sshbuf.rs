use crate::error::*;
use byteorder::{BigEndian, ByteOrder};
pub use openssl::bn::{BigNum, BigNumRef};
use std::convert::TryFrom;
use std::str;
use zeroize::Zeroizing;

const MAX_BIGNUM: usize = 16384 / 8;

/// A bounds-checked, forward-only reader over a borrowed byte buffer
///
/// The read position is private and only moves forward by exactly the number of
/// bytes a successful read consumed. A failing read never moves it.
#[derive(Debug, Clone)]
pub struct SshReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> SshReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        SshReader { buf, pos: 0 }
    }

    /// Return the next `n` bytes without advancing
    pub fn peek(&self, n: usize) -> OsshResult<&'a [u8]> {
        if n > self.buf.len() - self.pos {
            return Err(ErrorKind::Truncated.into());
        }
        Ok(&self.buf[self.pos..self.pos + n])
    }

    /// Return the next `n` bytes and advance past them
    pub fn read(&mut self, n: usize) -> OsshResult<&'a [u8]> {
        let data = self.peek(n)?;
        self.pos += n;
        Ok(data)
    }

    pub fn skip(&mut self, n: usize) -> OsshResult<()> {
        self.read(n).map(|_| ())
    }

    /// The bytes from the current position to the end, without advancing
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }
}

/// RFC4251 data types on top of [SshReader](struct.SshReader.html)
pub trait SshReadExt<'a> {
    /// Read 32 bits unsigned integer in big endian
    fn read_uint32(&mut self) -> OsshResult<u32>;

    /// Read 64 bits unsigned integer in big endian
    fn read_uint64(&mut self) -> OsshResult<u64>;

    /// Read bytes array or string
    ///
    /// Before the binary string, there is a 32 bits unsigned integer to indicate the length of the data.
    /// The length is checked against the remaining bytes before anything is taken.
    fn read_string(&mut self) -> OsshResult<&'a [u8]>;

    /// Read UTF-8 string
    fn read_utf8(&mut self) -> OsshResult<&'a str>;

    /// Read multiple precision integer
    ///
    /// The data is a two's complement integer, most significant byte first.
    /// Integers which is longer than 16384 bits are not supported.
    fn read_mpint(&mut self) -> OsshResult<BigNum>;

    /// Read a string which itself holds a sequence of strings
    fn read_string_list(&mut self) -> OsshResult<Vec<&'a [u8]>>;
}

impl<'a> SshReadExt<'a> for SshReader<'a> {
    fn read_uint32(&mut self) -> OsshResult<u32> {
        Ok(BigEndian::read_u32(self.read(4)?))
    }
    fn read_uint64(&mut self) -> OsshResult<u64> {
        Ok(BigEndian::read_u64(self.read(8)?))
    }
    fn read_string(&mut self) -> OsshResult<&'a [u8]> {
        let mut lookahead = self.clone();
        let length = lookahead.read_uint32()?;
        let length = usize::try_from(length).map_err(|_| Error::from_kind(ErrorKind::Truncated))?;
        let data = lookahead.read(length)?;
        *self = lookahead;
        Ok(data)
    }
    fn read_utf8(&mut self) -> OsshResult<&'a str> {
        let mut lookahead = self.clone();
        let data = lookahead.read_string()?;
        let s = str::from_utf8(data).map_err(|e| Error::with_error(ErrorKind::FormatMismatch, e))?;
        *self = lookahead;
        Ok(s)
    }
    fn read_mpint(&mut self) -> OsshResult<BigNum> {
        let mut lookahead = self.clone();
        let bn = to_bignum(lookahead.read_string()?)?;
        *self = lookahead;
        Ok(bn)
    }
    fn read_string_list(&mut self) -> OsshResult<Vec<&'a [u8]>> {
        let mut lookahead = self.clone();
        let mut inner = SshReader::new(lookahead.read_string()?);
        let mut list = Vec::new();
        while !inner.is_exhausted() {
            list.push(inner.read_string()?);
        }
        *self = lookahead;
        Ok(list)
    }
}

// --------------------------
// ---- Helper Functions ----
// --------------------------
fn to_bignum(data: &[u8]) -> OsshResult<BigNum> {
    if (data.len() > MAX_BIGNUM + 1) || (data.len() == MAX_BIGNUM + 1 && data[0] != 0) {
        return Err(ErrorKind::InvalidKeySize.into());
    }
    if !data.is_empty() && data[0] & 0x80 != 0 {
        // Negative: the magnitude is the two's complement of the data
        let mut magnitude: Zeroizing<Vec<u8>> = Zeroizing::new(data.iter().map(|b| !b).collect());
        for byte in magnitude.iter_mut().rev() {
            let (sum, carry) = byte.overflowing_add(1);
            *byte = sum;
            if !carry {
                break;
            }
        }
        let mut bn = BigNum::from_slice(&magnitude)?;
        bn.set_negative(true);
        Ok(bn)
    } else {
        Ok(BigNum::from_slice(data)?)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use byteorder::{BigEndian, WriteBytesExt};

    pub fn uint32(v: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u32::<BigEndian>(v).unwrap();
        buf
    }

    pub fn uint64(v: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u64::<BigEndian>(v).unwrap();
        buf
    }

    pub fn string(data: &[u8]) -> Vec<u8> {
        let mut buf = uint32(data.len() as u32);
        buf.extend_from_slice(data);
        buf
    }
}

#[cfg(test)]
mod test {
    use super::test_utils::*;
    use super::*;
    use hex_literal::hex;

    #[test]
    fn reader_peek_read() {
        let data = hex!("01 02 03 04 05");
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.peek(2).unwrap(), &[1, 2]);
        assert_eq!(reader.read(3).unwrap(), &[1, 2, 3]);
        assert_eq!(reader.remaining(), &[4, 5]);
        assert!(!reader.is_exhausted());
        assert_eq!(reader.read(3).unwrap_err().kind(), ErrorKind::Truncated);
        // Failed read doesn't move the position
        assert_eq!(reader.remaining(), &[4, 5]);
        assert_eq!(reader.read(2).unwrap(), &[4, 5]);
        assert!(reader.is_exhausted());
        assert_eq!(reader.peek(0).unwrap(), &[] as &[u8]);
        assert_eq!(reader.peek(1).unwrap_err().kind(), ErrorKind::Truncated);
    }

    #[test]
    fn read_integers() {
        let data = hex!("ff ff ff ff 00 00 00 00 00 00 00 2a 01");
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.read_uint32().unwrap(), u32::MAX);
        assert_eq!(reader.read_uint64().unwrap(), 42);
        assert_eq!(reader.read_uint32().unwrap_err().kind(), ErrorKind::Truncated);
        assert_eq!(reader.remaining(), &[1]);
    }

    #[test]
    fn read_string_lengths() {
        let mut data = string(b"");
        data.extend(string(b"a"));
        data.extend(string(b"rest"));
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.read_string().unwrap(), b"");
        assert_eq!(reader.read_string().unwrap(), b"a");
        assert_eq!(reader.read_string().unwrap(), b"rest");
        assert!(reader.is_exhausted());
    }

    #[test]
    fn read_string_forged_length() {
        let data = hex!("ff ff ff f0 61 62 63");
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.read_string().unwrap_err().kind(), ErrorKind::Truncated);
        // The length prefix isn't consumed either
        assert_eq!(reader.remaining().len(), data.len());

        let short = hex!("00 00 00");
        let mut reader = SshReader::new(&short);
        assert_eq!(reader.read_string().unwrap_err().kind(), ErrorKind::Truncated);
    }

    #[test]
    fn read_utf8_invalid() {
        let data = string(&hex!("c3 28"));
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.read_utf8().unwrap_err().kind(), ErrorKind::FormatMismatch);
        assert_eq!(reader.remaining().len(), data.len());
    }

    #[test]
    fn read_mpint_sign() {
        let mut data = string(&hex!("00 80"));
        data.extend(string(&hex!("80")));
        data.extend(string(b""));
        data.extend(string(&hex!("ff")));
        data.extend(string(&hex!("ff 7f")));
        data.extend(string(&hex!("01 00 01")));
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.read_mpint().unwrap(), BigNum::from_u32(128).unwrap());
        assert_eq!(reader.read_mpint().unwrap(), BigNum::from_dec_str("-128").unwrap());
        assert_eq!(reader.read_mpint().unwrap(), BigNum::from_u32(0).unwrap());
        assert_eq!(reader.read_mpint().unwrap(), BigNum::from_dec_str("-1").unwrap());
        assert_eq!(reader.read_mpint().unwrap(), BigNum::from_dec_str("-129").unwrap());
        assert_eq!(reader.read_mpint().unwrap(), BigNum::from_u32(65537).unwrap());
        assert!(reader.is_exhausted());
    }

    #[test]
    fn read_mpint_too_long() {
        let mut big = vec![0x7f_u8; MAX_BIGNUM + 1];
        let data = string(&big);
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.read_mpint().unwrap_err().kind(), ErrorKind::InvalidKeySize);

        big[0] = 0;
        let data = string(&big);
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.read_mpint().unwrap().num_bits(), 16383);
    }

    #[test]
    fn read_string_list_principals() {
        let data = string(b"");
        let mut reader = SshReader::new(&data);
        assert!(reader.read_string_list().unwrap().is_empty());

        let mut inner = string(b"alice");
        inner.extend(string(b"bob"));
        let data = string(&inner);
        let mut reader = SshReader::new(&data);
        assert_eq!(
            reader.read_string_list().unwrap(),
            vec![&b"alice"[..], &b"bob"[..]]
        );
        assert!(reader.is_exhausted());
    }

    #[test]
    fn read_string_list_truncated_entry() {
        let mut inner = string(b"alice");
        inner.extend(uint32(10));
        inner.extend(b"bo");
        let data = string(&inner);
        let mut reader = SshReader::new(&data);
        assert_eq!(reader.read_string_list().unwrap_err().kind(), ErrorKind::Truncated);
        assert_eq!(reader.remaining().len(), data.len());
    }
}
