// Copyright © 2025 Denis Morel
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option) any
// later version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License and
// a copy of the GNU General Public License along with this program. If not, see
// <https://www.gnu.org/licenses/>.

//! Streaming SHA-512 digests used as content fingerprints.

use openssl::md::Md;
use openssl::md_ctx::MdCtx;
use std::io::Read;
use thiserror::Error;

pub const DIGEST_LEN: usize = 64;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct HashError(#[from] HashErrorImpl);

#[derive(Error, Debug)]
enum HashErrorImpl {
    #[error("openssl digest context error")]
    Openssl(#[from] openssl::error::ErrorStack),
    #[error("I/O error while streaming digest input")]
    Io(#[from] std::io::Error),
}

/// A streaming SHA-512 digest. Multi-field artifacts hash a newline-delimited flat
/// encoding by feeding each field's bytes through [`Sha512Digest::update`] in
/// read/write order, giving `hash(write(x)) == hash(read(write(x)))`.
pub struct Sha512Digest {
    ctx: MdCtx,
}

impl Sha512Digest {
    pub fn new() -> Result<Self, HashError> {
        let mut ctx = MdCtx::new().map_err(HashErrorImpl::from)?;
        ctx.digest_init(Md::sha512()).map_err(HashErrorImpl::from)?;
        Ok(Self { ctx })
    }

    pub fn update(&mut self, bytes: &[u8]) -> Result<&mut Self, HashError> {
        self.ctx.digest_update(bytes).map_err(HashErrorImpl::from)?;
        Ok(self)
    }

    /// Feed one flat-text field followed by its newline separator, matching the
    /// read/write order of ShuffleResult/PartialDecryption encoding.
    pub fn update_line(&mut self, field: &str) -> Result<&mut Self, HashError> {
        self.update(field.as_bytes())?;
        self.update(b"\n")?;
        Ok(self)
    }

    pub fn finish(mut self) -> Result<[u8; DIGEST_LEN], HashError> {
        let mut digest = [0u8; DIGEST_LEN];
        self.ctx
            .digest_final(&mut digest)
            .map_err(HashErrorImpl::from)?;
        Ok(digest)
    }
}

/// Hash an in-memory buffer in one call.
pub fn sha512(bytes: &[u8]) -> Result<[u8; DIGEST_LEN], HashError> {
    let mut digest = Sha512Digest::new()?;
    digest.update(bytes)?;
    digest.finish()
}

/// Hash a reader in fixed-size chunks, for large artifacts that should not be
/// buffered wholesale in memory.
pub fn sha512_stream<R: Read>(mut reader: R) -> Result<[u8; DIGEST_LEN], HashError> {
    let mut digest = Sha512Digest::new()?;
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).map_err(HashErrorImpl::from)?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n])?;
    }
    digest.finish()
}

/// Lowercase hex encoding, used to render digests into Statement fields, which
/// carry hashes as strings in canonical JSON.
pub fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sha512_known_vector() {
        let digest = sha512(b"").unwrap();
        let expected = "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3";
        assert_eq!(hex_encode(digest), expected);
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let data = b"trustee core bulletin board artifact";
        let one_shot = sha512(data).unwrap();
        let streamed = sha512_stream(std::io::Cursor::new(data)).unwrap();
        assert_eq!(one_shot, streamed);
    }

    #[test]
    fn test_update_line_is_field_plus_newline() {
        let mut a = Sha512Digest::new().unwrap();
        a.update_line("hello").unwrap();
        let a = a.finish().unwrap();

        let mut b = Sha512Digest::new().unwrap();
        b.update(b"hello\n").unwrap();
        let b = b.finish().unwrap();

        assert_eq!(a, b);
    }
}
