//! Revision file header and table roots.

use crate::error::{CodecError, CodecResult};
use crate::pack::{pack_uint, unpack_uint};
use crate::types::{BlockNumber, Table, TableRoots, MAX_TABLES};
use crate::version::FormatVersion;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// Magic signature at the start of every revision file.
pub const REVISION_MAGIC: [u8; 14] = *b"\x0f\x0dXapian Brass";

/// Size of the fixed header: magic, version and UUID.
pub const HEADER_SIZE: usize = 32;

/// On-disk value meaning "this table has no root".
pub const NO_ROOT: u32 = u32::MAX;

/// Longest packed encoding of a 32-bit root.
const MAX_PACKED_ROOT: usize = 5;

/// The decoded contents of one revision file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionRecord {
    /// Identity of the database lineage.
    pub uuid: Uuid,
    /// Root block of every table.
    pub roots: TableRoots,
}

impl RevisionRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(uuid: Uuid, roots: TableRoots) -> Self {
        Self { uuid, roots }
    }

    /// Encodes the record.
    ///
    /// Trailing tables without a root are left out.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + MAX_TABLES * MAX_PACKED_ROOT);

        buf.put_slice(&REVISION_MAGIC);
        buf.put_u16(FormatVersion::CURRENT.as_u16());
        buf.put_slice(self.uuid.as_bytes());

        for (_, root) in self.roots.iter().take(self.roots.encoded_len()) {
            let raw = root.map_or(NO_ROOT, BlockNumber::as_u32);
            pack_uint(&mut buf, u64::from(raw));
        }

        buf.freeze()
    }

    /// Decodes a record.
    ///
    /// # Errors
    ///
    /// - [`CodecError::TooShort`] if the fixed header is incomplete
    /// - [`CodecError::BadMagic`] if the signature does not match
    /// - [`CodecError::VersionMismatch`] if the format version differs from
    ///   [`FormatVersion::CURRENT`]
    /// - [`CodecError::BadRoot`] if a root entry is truncated or out of range
    /// - [`CodecError::TrailingJunk`] if bytes follow the last table
    pub fn decode(data: &[u8]) -> CodecResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(CodecError::TooShort { len: data.len() });
        }
        let mut buf = data;

        let mut magic = [0u8; REVISION_MAGIC.len()];
        buf.copy_to_slice(&mut magic);
        if magic != REVISION_MAGIC {
            return Err(CodecError::BadMagic);
        }

        let found = FormatVersion::from_raw(buf.get_u16());
        if found != FormatVersion::CURRENT {
            return Err(CodecError::VersionMismatch {
                found,
                expected: FormatVersion::CURRENT,
            });
        }

        let mut uuid = [0u8; 16];
        buf.copy_to_slice(&mut uuid);

        let mut roots = TableRoots::empty();
        for table in Table::ALL {
            if !buf.has_remaining() {
                break;
            }
            roots.set(table, decode_root(&mut buf, table)?);
        }

        if buf.has_remaining() {
            return Err(CodecError::TrailingJunk {
                extra: buf.remaining(),
            });
        }

        Ok(Self {
            uuid: Uuid::from_bytes(uuid),
            roots,
        })
    }
}

fn decode_root(buf: &mut &[u8], table: Table) -> CodecResult<Option<BlockNumber>> {
    let raw = unpack_uint(buf).map_err(|_| CodecError::BadRoot { table })?;
    let raw = u32::try_from(raw).map_err(|_| CodecError::BadRoot { table })?;
    Ok(BlockNumber::new(raw))
}
