use rand::RngCore;

use super::{Otp, Token, TokenError};
use crate::config::{FACTORY_KEY, OTP_BLOCK};
use crate::store::UserRecord;

#[derive(Debug, PartialEq, Eq)]
pub enum OtpOutcome {
    /// The token now holds `Rotated.0`; the caller persists it.
    Rotated(Otp),
    /// The token carried a value other than the stored one.
    CloneDetected,
}

/// Runs one challenge/response round against `token` for `user`.
///
/// Any token error aborts the round; since the user record is only returned
/// to the caller, nothing has been persisted at that point. On
/// [`OtpOutcome::CloneDetected`] the token is left untouched.
pub fn verify_and_rotate<T, R>(
    token: &mut T,
    user: &UserRecord,
    rng: &mut R,
) -> Result<OtpOutcome, TokenError>
where
    T: Token + ?Sized,
    R: RngCore + ?Sized,
{
    token.authenticate(OTP_BLOCK, &FACTORY_KEY)?;

    if user.otp.is_sentinel() {
        tracing::debug!("First OTP use, skipping comparison");
    } else {
        let on_token = Otp::from_bytes(token.read_block(OTP_BLOCK)?);
        if on_token != user.otp {
            tracing::warn!("OTP mismatch, token may be cloned");
            return Ok(OtpOutcome::CloneDetected);
        }
    }

    let next = Otp::generate(rng);
    token.write_block(OTP_BLOCK, next.as_bytes())?;
    tracing::debug!(otp = %next, "OTP rotated");
    Ok(OtpOutcome::Rotated(next))
}
