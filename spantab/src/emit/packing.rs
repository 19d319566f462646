//! # Table entry packing
//!
//! Each leaf table stores one `(offset, span)` pair per interval, where
//! `offset` is the interval's low bound minus the table base and `span` is
//! `high - low`. The byte layout depends on the table format:
//!
//! | format | layout |
//! |---|---|
//! | `8x8`, `16x16`, `32x32` | two little-endian values of `width / 8` bytes, offset first |
//! | `12x12` | 3 bytes: `offset & 0xFF`, `span & 0xFF`, `(offset >> 8) \| ((span >> 8) << 4)` |
//! | `10x6` | one little-endian `u16`: `offset \| (span << 10)` |
//!
//! Any other format has no layout and is rejected with
//! [`Error::UnsupportedPacking`].

use std::io::{Cursor, Read};

use crate::cost::{fits, TableFormat};
use crate::error::Error;

/// Encodes and decodes the entries of one table format.
pub trait EntryPacking {
    /// The format this packing implements.
    fn format(&self) -> TableFormat;

    /// Appends the packed bytes of one entry to `out`.
    fn encode(&self, offset: u32, span: u32, out: &mut Vec<u8>) -> Result<(), Error>;

    /// Reads one packed entry from `cursor`.
    fn decode(&self, cursor: &mut Cursor<&[u8]>) -> Result<(u32, u32), Error>;

    /// Renders one entry as an assembler data directive.
    fn directive(&self, offset: u32, span: u32) -> Result<String, Error>;

    /// Rejects values that do not fit this packing's fields.
    fn check(&self, offset: u32, span: u32) -> Result<(), Error> {
        let format = self.format();
        if !fits(offset, format.base_bits()) {
            return Err(Error::ValueOutOfRange {
                field: "offset",
                value: offset,
                bits: format.base_bits(),
            });
        }
        if !fits(span, format.span_bits()) {
            return Err(Error::ValueOutOfRange {
                field: "span",
                value: span,
                bits: format.span_bits(),
            });
        }
        Ok(())
    }
}

/// Returns the packing for `format`.
///
/// ## Errors
/// - `UnsupportedPacking` if the format has no defined byte layout
pub fn packing_for(format: TableFormat) -> Result<Box<dyn EntryPacking>, Error> {
    match (format.base_bits(), format.span_bits()) {
        (8, 8) | (16, 16) | (32, 32) => Ok(Box::new(UniformPacking { format })),
        (12, 12) => Ok(Box::new(Packed12x12 { format })),
        (10, 6) => Ok(Box::new(Packed10x6 { format })),
        _ => Err(Error::UnsupportedPacking(format)),
    }
}

/// Packs `(offset, span)` pairs into the byte layout of `format`.
pub fn pack_entries<I>(format: TableFormat, entries: I) -> Result<Vec<u8>, Error>
where
    I: IntoIterator<Item = (u32, u32)>,
{
    let packing = packing_for(format)?;
    let mut bytes = Vec::new();
    for (offset, span) in entries {
        packing.encode(offset, span, &mut bytes)?;
    }
    Ok(bytes)
}

/// Unpacks every entry in `bytes`, which must hold whole entries of `format`.
pub fn unpack_entries(format: TableFormat, bytes: &[u8]) -> Result<Vec<(u32, u32)>, Error> {
    let packing = packing_for(format)?;
    let mut cursor = Cursor::new(bytes);
    let mut entries = Vec::new();
    while (cursor.position() as usize) < bytes.len() {
        entries.push(packing.decode(&mut cursor)?);
    }
    Ok(entries)
}

fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>) -> Result<[u8; N], Error> {
    let mut buf = [0u8; N];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| Error::UnexpectedEndOfData)?;
    Ok(buf)
}

/// Offset and span stored as two equal-width byte-aligned integers.
struct UniformPacking {
    /// One of `8x8`, `16x16` or `32x32`.
    format: TableFormat,
}

impl UniformPacking {
    fn width(&self) -> u8 {
        self.format.base_bits()
    }

    fn directive_name(&self) -> &'static str {
        match self.width() {
            8 => "db",
            16 => "dw",
            _ => "dd",
        }
    }

    fn read_value(&self, cursor: &mut Cursor<&[u8]>) -> Result<u32, Error> {
        Ok(match self.width() {
            8 => u32::from(read_array::<1>(cursor)?[0]),
            16 => u32::from(u16::from_le_bytes(read_array(cursor)?)),
            _ => u32::from_le_bytes(read_array(cursor)?),
        })
    }
}

impl EntryPacking for UniformPacking {
    fn format(&self) -> TableFormat {
        self.format
    }

    fn encode(&self, offset: u32, span: u32, out: &mut Vec<u8>) -> Result<(), Error> {
        self.check(offset, span)?;
        let bytes = usize::from(self.width() / 8);
        out.extend_from_slice(&offset.to_le_bytes()[..bytes]);
        out.extend_from_slice(&span.to_le_bytes()[..bytes]);
        Ok(())
    }

    fn decode(&self, cursor: &mut Cursor<&[u8]>) -> Result<(u32, u32), Error> {
        let offset = self.read_value(cursor)?;
        let span = self.read_value(cursor)?;
        Ok((offset, span))
    }

    fn directive(&self, offset: u32, span: u32) -> Result<String, Error> {
        self.check(offset, span)?;
        Ok(format!("{} 0x{offset:X}, 0x{span:X}", self.directive_name()))
    }
}

/// Two 12-bit fields in three bytes: both low bytes, then both high nibbles.
struct Packed12x12 {
    format: TableFormat,
}

impl Packed12x12 {
    fn pack(offset: u32, span: u32) -> [u8; 3] {
        [
            (offset & 0xFF) as u8,
            (span & 0xFF) as u8,
            ((offset >> 8) | ((span >> 8) << 4)) as u8,
        ]
    }
}

impl EntryPacking for Packed12x12 {
    fn format(&self) -> TableFormat {
        self.format
    }

    fn encode(&self, offset: u32, span: u32, out: &mut Vec<u8>) -> Result<(), Error> {
        self.check(offset, span)?;
        out.extend_from_slice(&Self::pack(offset, span));
        Ok(())
    }

    fn decode(&self, cursor: &mut Cursor<&[u8]>) -> Result<(u32, u32), Error> {
        let [low_offset, low_span, high] = read_array::<3>(cursor)?;
        let offset = u32::from(low_offset) | (u32::from(high & 0x0F) << 8);
        let span = u32::from(low_span) | (u32::from(high >> 4) << 8);
        Ok((offset, span))
    }

    fn directive(&self, offset: u32, span: u32) -> Result<String, Error> {
        self.check(offset, span)?;
        let [b0, b1, b2] = Self::pack(offset, span);
        Ok(format!("db 0x{b0:02X}, 0x{b1:02X}, 0x{b2:02X}"))
    }
}

/// A 10-bit offset and a 6-bit span sharing one 16-bit word.
struct Packed10x6 {
    format: TableFormat,
}

const PACKED_10X6_SPAN_SHIFT: u32 = 10;

impl Packed10x6 {
    fn pack(offset: u32, span: u32) -> u16 {
        (offset | (span << PACKED_10X6_SPAN_SHIFT)) as u16
    }
}

impl EntryPacking for Packed10x6 {
    fn format(&self) -> TableFormat {
        self.format
    }

    fn encode(&self, offset: u32, span: u32, out: &mut Vec<u8>) -> Result<(), Error> {
        self.check(offset, span)?;
        out.extend_from_slice(&Self::pack(offset, span).to_le_bytes());
        Ok(())
    }

    fn decode(&self, cursor: &mut Cursor<&[u8]>) -> Result<(u32, u32), Error> {
        let word = u32::from(u16::from_le_bytes(read_array(cursor)?));
        let offset = word & ((1 << PACKED_10X6_SPAN_SHIFT) - 1);
        let span = word >> PACKED_10X6_SPAN_SHIFT;
        Ok((offset, span))
    }

    fn directive(&self, offset: u32, span: u32) -> Result<String, Error> {
        self.check(offset, span)?;
        Ok(format!("dw 0x{:04X}", Self::pack(offset, span)))
    }
}
