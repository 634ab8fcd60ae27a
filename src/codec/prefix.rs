use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Read;
use std::io::Write;

/// Width of a length prefix. `NIL` is the all-ones marker for an absent field.
pub trait Prefix {
    const BYTES: u64;
    const NIL: u64;
    fn put(w: &mut dyn Write, n: u64) -> std::io::Result<()>;
    fn get(r: &mut dyn Read) -> std::io::Result<u64>;

    /// Reads a prefix, mapping the nil marker and zero to `None`.
    fn length(r: &mut dyn Read) -> std::io::Result<Option<u64>> {
        match Self::get(r)? {
            n if n == Self::NIL || n == 0 => Ok(None),
            n => Ok(Some(n)),
        }
    }
}

impl Prefix for u8 {
    const BYTES: u64 = 1;
    const NIL: u64 = u8::MAX as u64;
    fn put(w: &mut dyn Write, n: u64) -> std::io::Result<()> {
        w.write_u8(n as u8)
    }
    fn get(r: &mut dyn Read) -> std::io::Result<u64> {
        r.read_u8().map(u64::from)
    }
}

impl Prefix for u16 {
    const BYTES: u64 = 2;
    const NIL: u64 = u16::MAX as u64;
    fn put(w: &mut dyn Write, n: u64) -> std::io::Result<()> {
        w.write_u16::<LE>(n as u16)
    }
    fn get(r: &mut dyn Read) -> std::io::Result<u64> {
        r.read_u16::<LE>().map(u64::from)
    }
}

impl Prefix for u32 {
    const BYTES: u64 = 4;
    const NIL: u64 = u32::MAX as u64;
    fn put(w: &mut dyn Write, n: u64) -> std::io::Result<()> {
        w.write_u32::<LE>(n as u32)
    }
    fn get(r: &mut dyn Read) -> std::io::Result<u64> {
        r.read_u32::<LE>().map(u64::from)
    }
}

impl Prefix for u64 {
    const BYTES: u64 = 8;
    const NIL: u64 = u64::MAX;
    fn put(w: &mut dyn Write, n: u64) -> std::io::Result<()> {
        w.write_u64::<LE>(n)
    }
    fn get(r: &mut dyn Read) -> std::io::Result<u64> {
        r.read_u64::<LE>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_marker_is_all_ones() {
        let mut bytes = Vec::new();
        u16::put(&mut bytes, u16::NIL).unwrap();
        assert_eq!(bytes, vec![0xFF, 0xFF]);
        assert_eq!(u16::length(&mut bytes.as_slice()).unwrap(), None);
    }

    #[test]
    fn zero_length_reads_as_nil() {
        let bytes = [0u8; 8];
        assert_eq!(u64::length(&mut bytes.as_slice()).unwrap(), None);
    }

    #[test]
    fn prefixes_are_little_endian() {
        let mut bytes = Vec::new();
        u32::put(&mut bytes, 0x0102_0304).unwrap();
        assert_eq!(bytes, vec![0x04, 0x03, 0x02, 0x01]);
        assert_eq!(u32::length(&mut bytes.as_slice()).unwrap(), Some(0x0102_0304));
    }

    #[test]
    fn short_prefix_is_truncated() {
        let bytes = [0x01u8];
        let err = u32::get(&mut bytes.as_slice()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
