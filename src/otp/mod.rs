//! OTP anti-cloning protocol.
//!
//! Device and token share a 16-byte value that is replaced on every
//! legitimate use. A copied token keeps the stale value and gives itself away
//! on its next presentation.

pub mod protocol;
pub mod sim;

use std::fmt;

use rand::RngCore;

use crate::config::OTP_SIZE;

pub use protocol::{OtpOutcome, verify_and_rotate};
pub use sim::SimToken;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("authentication of block {0} failed")]
    Auth(u8),
    #[error("read of block {0} failed")]
    Read(u8),
    #[error("write of block {0} failed")]
    Write(u8),
}

/// Physical credential as seen through the reader.
pub trait Token {
    fn uid(&self) -> &[u8];

    fn authenticate(&mut self, block: u8, key: &[u8; 6]) -> Result<(), TokenError>;

    fn read_block(&mut self, block: u8) -> Result<[u8; OTP_SIZE], TokenError>;

    fn write_block(&mut self, block: u8, data: &[u8; OTP_SIZE]) -> Result<(), TokenError>;
}

/// One-time value. All zeros means "never provisioned".
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Otp([u8; OTP_SIZE]);

impl Otp {
    pub const SENTINEL: Otp = Otp([0u8; OTP_SIZE]);

    pub fn from_bytes(bytes: [u8; OTP_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; OTP_SIZE] {
        &self.0
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Fresh random value, never the sentinel.
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0u8; OTP_SIZE];
            rng.fill_bytes(&mut bytes);
            let otp = Self(bytes);
            if !otp.is_sentinel() {
                return otp;
            }
        }
    }
}

impl fmt::Display for Otp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Otp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            f.write_str("Otp(unset)")
        } else {
            f.write_str("Otp(..)")
        }
    }
}
