//! Binary record layouts for on-chain reputation-space accounts.
//!
//! All records start with an 8-byte account discriminator. Integers are
//! little-endian, addresses are 32 raw bytes, and the single string field
//! (project metadata URI) is a u32-LE length prefix followed by UTF-8 bytes.
//!
//! Records are read-only to this layer: decode is the primary operation.
//! Encode exists for payload and fixture construction.

use solana_program::pubkey::Pubkey;

use crate::constants::MAX_METADATA_URI_BYTES;
use crate::discriminator::{account_discriminator, account_names, DISCRIMINATOR_LEN};
use crate::error::DecodeError;

/// Per-DAO space configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    pub version: u8,
    pub dao_id: Pubkey,
    pub authority: Pubkey,
    pub rep_mint: Pubkey,
    pub current_season: u16,
    pub decay_bps: u16,
    pub bump: u8,
}

/// Per-user-per-season reputation balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReputationRecord {
    pub version: u8,
    pub user: Pubkey,
    pub season: u16,
    pub points: u64,
    pub last_update_slot: u64,
    pub bump: u8,
}

/// Per-DAO project metadata pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadataRecord {
    pub version: u8,
    pub dao_id: Pubkey,
    pub metadata_uri: String,
    pub bump: u8,
}

/// Closed set of record kinds this layer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Config(ConfigRecord),
    Reputation(ReputationRecord),
    ProjectMetadata(ProjectMetadataRecord),
}

impl ConfigRecord {
    pub const LEN: usize = DISCRIMINATOR_LEN + 1 + 32 + 32 + 32 + 2 + 2 + 1;
}

impl ReputationRecord {
    pub const LEN: usize = DISCRIMINATOR_LEN + 1 + 32 + 2 + 8 + 8 + 1;
}

impl ProjectMetadataRecord {
    /// Minimum size: empty URI. The bump byte trails the string.
    pub const MIN_LEN: usize = DISCRIMINATOR_LEN + 1 + 32 + 4 + 1;
}

/// Cursor over an account data buffer. Every read is bounds-checked up
/// front by the caller's minimum-length check; string reads re-check.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::TooShort {
                got: self.data.len(),
                need: self.pos + n,
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32_le(&mut self) -> Result<u32, DecodeError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64_le(&mut self) -> Result<u64, DecodeError> {
        let b = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_le_bytes(arr))
    }

    fn pubkey(&mut self) -> Result<Pubkey, DecodeError> {
        let b = self.take(32)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(b);
        Ok(Pubkey::new_from_array(arr))
    }

    /// Length-prefixed UTF-8 string. The declared length is validated
    /// against the remaining buffer before slicing.
    fn string(&mut self) -> Result<String, DecodeError> {
        let len = self.u32_le()? as usize;
        if len > self.remaining() {
            return Err(DecodeError::StringOutOfBounds {
                declared: len,
                remaining: self.remaining(),
            });
        }
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::Utf8)
    }
}

fn check_header(
    data: &[u8],
    kind_name: &str,
    min_len: usize,
) -> Result<(), DecodeError> {
    if data.len() < min_len {
        return Err(DecodeError::TooShort { got: data.len(), need: min_len });
    }
    let expected = account_discriminator(kind_name);
    let found = &data[..DISCRIMINATOR_LEN];
    if found != expected {
        return Err(DecodeError::WrongKind {
            expected: hex::encode(expected),
            found: hex::encode(found),
        });
    }
    Ok(())
}

impl ConfigRecord {
    /// Strict decode. Trailing bytes beyond the fixed layout are tolerated
    /// as padding.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        check_header(data, account_names::CONFIG, Self::LEN)?;
        let mut c = Cursor::new(&data[DISCRIMINATOR_LEN..]);
        Ok(Self {
            version: c.u8()?,
            dao_id: c.pubkey()?,
            authority: c.pubkey()?,
            rep_mint: c.pubkey()?,
            current_season: c.u16_le()?,
            decay_bps: c.u16_le()?,
            bump: c.u8()?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(&account_discriminator(account_names::CONFIG));
        out.push(self.version);
        out.extend_from_slice(self.dao_id.as_ref());
        out.extend_from_slice(self.authority.as_ref());
        out.extend_from_slice(self.rep_mint.as_ref());
        out.extend_from_slice(&self.current_season.to_le_bytes());
        out.extend_from_slice(&self.decay_bps.to_le_bytes());
        out.push(self.bump);
        out
    }
}

impl ReputationRecord {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        check_header(data, account_names::REPUTATION, Self::LEN)?;
        let mut c = Cursor::new(&data[DISCRIMINATOR_LEN..]);
        Ok(Self {
            version: c.u8()?,
            user: c.pubkey()?,
            season: c.u16_le()?,
            points: c.u64_le()?,
            last_update_slot: c.u64_le()?,
            bump: c.u8()?,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(&account_discriminator(account_names::REPUTATION));
        out.push(self.version);
        out.extend_from_slice(self.user.as_ref());
        out.extend_from_slice(&self.season.to_le_bytes());
        out.extend_from_slice(&self.points.to_le_bytes());
        out.extend_from_slice(&self.last_update_slot.to_le_bytes());
        out.push(self.bump);
        out
    }
}

impl ProjectMetadataRecord {
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        check_header(data, account_names::PROJECT_METADATA, Self::MIN_LEN)?;
        let mut c = Cursor::new(&data[DISCRIMINATOR_LEN..]);
        let version = c.u8()?;
        let dao_id = c.pubkey()?;
        let metadata_uri = c.string()?;
        let bump = c.u8()?;
        Ok(Self { version, dao_id, metadata_uri, bump })
    }

    pub fn encode(&self) -> Vec<u8> {
        let uri = self.metadata_uri.as_bytes();
        debug_assert!(uri.len() <= MAX_METADATA_URI_BYTES);
        let mut out = Vec::with_capacity(Self::MIN_LEN + uri.len());
        out.extend_from_slice(&account_discriminator(account_names::PROJECT_METADATA));
        out.push(self.version);
        out.extend_from_slice(self.dao_id.as_ref());
        out.extend_from_slice(&(uri.len() as u32).to_le_bytes());
        out.extend_from_slice(uri);
        out.push(self.bump);
        out
    }
}

/// Lenient decode for forward-compatible scans.
///
/// Tries each known kind in turn and returns `None` for unknown
/// discriminators or malformed data instead of raising. Callers use this to
/// filter an unfiltered program-account list down to valid records.
pub fn try_decode_any(data: &[u8]) -> Option<Record> {
    if data.len() < DISCRIMINATOR_LEN {
        return None;
    }
    let disc = &data[..DISCRIMINATOR_LEN];
    if disc == account_discriminator(account_names::CONFIG) {
        return ConfigRecord::decode(data).ok().map(Record::Config);
    }
    if disc == account_discriminator(account_names::REPUTATION) {
        return ReputationRecord::decode(data).ok().map(Record::Reputation);
    }
    if disc == account_discriminator(account_names::PROJECT_METADATA) {
        return ProjectMetadataRecord::decode(data).ok().map(Record::ProjectMetadata);
    }
    None
}
