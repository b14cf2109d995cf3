use std::fmt;
use std::str::FromStr;

use super::StoreError;
use crate::config::KEY_SIZE;

/// Token UID right-padded with zeros to [`KEY_SIZE`] bytes.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; KEY_SIZE]);

impl Fingerprint {
    pub const SIZE: usize = KEY_SIZE;

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Pads a UID read from a token.
    pub fn from_uid(uid: &[u8]) -> Result<Self, StoreError> {
        if uid.is_empty() || uid.len() > KEY_SIZE {
            return Err(StoreError::InvalidFingerprint(format!(
                "uid of {} bytes",
                uid.len()
            )));
        }
        let mut bytes = [0u8; KEY_SIZE];
        bytes[..uid.len()].copy_from_slice(uid);
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Parses `aa:bb:cc` style hex, one or two digits per field, at most
/// [`KEY_SIZE`] fields.
pub fn parse_uid(s: &str) -> Result<Vec<u8>, StoreError> {
    let s = s.trim();
    let fields: Vec<&str> = s.split(':').collect();
    if fields.len() > KEY_SIZE {
        return Err(StoreError::InvalidFingerprint(format!(
            "{s:?} has more than {KEY_SIZE} fields"
        )));
    }
    fields
        .iter()
        .map(|field| {
            if field.is_empty() || field.len() > 2 {
                return Err(StoreError::InvalidFingerprint(format!("bad field {field:?} in {s:?}")));
            }
            u8::from_str_radix(field, 16)
                .map_err(|e| StoreError::InvalidFingerprint(format!("{field:?}: {e}")))
        })
        .collect()
}

impl FromStr for Fingerprint {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uid(&parse_uid(s)?)
    }
}

/// Colon hex with trailing zero bytes dropped; the first byte always shows.
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.0.iter().rposition(|b| *b != 0).map_or(1, |i| i + 1);
        for (i, b) in self.0[..len].iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_uid_is_zero_padded() {
        let fp: Fingerprint = "aa:bb:cc".parse().unwrap();
        assert_eq!(fp.as_bytes(), &[0xaa, 0xbb, 0xcc, 0, 0, 0, 0, 0, 0, 0]);
        let full: Fingerprint = "aa:bb:cc:00:00:00:00:00:00:00".parse().unwrap();
        assert_eq!(fp, full);
    }

    #[test]
    fn test_display_trims_trailing_zeros() {
        let fp = Fingerprint::from_uid(&[0x04, 0x00, 0x1f]).unwrap();
        assert_eq!(fp.to_string(), "04:00:1f");
        assert_eq!(Fingerprint::default().to_string(), "00");
    }

    #[test]
    fn test_parse_accepts_single_digits_and_uppercase() {
        let fp: Fingerprint = "A:0b:FF".parse().unwrap();
        assert_eq!(&fp.as_bytes()[..3], &[0x0a, 0x0b, 0xff]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Fingerprint>().is_err());
        assert!("zz:01".parse::<Fingerprint>().is_err());
        assert!("aa::bb".parse::<Fingerprint>().is_err());
        assert!("123:45".parse::<Fingerprint>().is_err());
        assert!("1:2:3:4:5:6:7:8:9:a:b".parse::<Fingerprint>().is_err());
    }

    #[test]
    fn test_from_uid_rejects_oversized() {
        assert!(Fingerprint::from_uid(&[1u8; 11]).is_err());
        assert!(Fingerprint::from_uid(&[]).is_err());
    }
}
