//! Header constants of the kdbush buffer format.

/// First byte of every kdbush buffer.
pub(crate) const KDBUSH_MAGIC: u8 = 0xdb;

/// Format version stored in the high nibble of the second header byte.
pub(crate) const KDBUSH_VERSION: u8 = 1;

/// Byte length of the header: magic, version/type, u16 node size, u32 item count.
pub(crate) const KDBUSH_HEADER_SIZE: usize = 8;
