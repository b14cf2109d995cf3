//! In-memory MIFARE-style token for the host simulator and tests.

use super::{Otp, Token, TokenError};
use crate::config::{FACTORY_KEY, OTP_SIZE};

#[derive(Clone, Debug)]
pub struct SimToken {
    uid: Vec<u8>,
    block: [u8; OTP_SIZE],
    authenticated: bool,
    pub fail_auth: bool,
    pub fail_read: bool,
    pub fail_write: bool,
}

impl SimToken {
    /// Factory-fresh token with an all-zero data block.
    pub fn new(uid: &[u8]) -> Self {
        Self::with_block(uid, Otp::SENTINEL)
    }

    pub fn with_block(uid: &[u8], block: Otp) -> Self {
        Self {
            uid: uid.to_vec(),
            block: *block.as_bytes(),
            authenticated: false,
            fail_auth: false,
            fail_read: false,
            fail_write: false,
        }
    }

    /// Current content of the OTP block.
    pub fn block(&self) -> Otp {
        Otp::from_bytes(self.block)
    }

    /// Bit-for-bit copy as a cloner would produce it.
    pub fn duplicate(&self) -> Self {
        Self::with_block(&self.uid, self.block())
    }
}

impl Token for SimToken {
    fn uid(&self) -> &[u8] {
        &self.uid
    }

    fn authenticate(&mut self, block: u8, key: &[u8; 6]) -> Result<(), TokenError> {
        if self.fail_auth || *key != FACTORY_KEY {
            self.authenticated = false;
            return Err(TokenError::Auth(block));
        }
        self.authenticated = true;
        Ok(())
    }

    fn read_block(&mut self, block: u8) -> Result<[u8; OTP_SIZE], TokenError> {
        if self.fail_read || !self.authenticated {
            return Err(TokenError::Read(block));
        }
        Ok(self.block)
    }

    fn write_block(&mut self, block: u8, data: &[u8; OTP_SIZE]) -> Result<(), TokenError> {
        if self.fail_write || !self.authenticated {
            return Err(TokenError::Write(block));
        }
        self.block = *data;
        Ok(())
    }
}
