use super::Counter;
use super::Prefix;
use crate::Error;
use crate::Result;
use std::io::Read;
use std::io::Write;

/// A value with a fixed-width little-endian body of known size.
pub trait Wire: Sized {
    /// Exact number of bytes `write` will produce.
    fn size(&self) -> u64;
    fn write(&self, w: &mut dyn Write) -> Result<()>;
    fn read(r: &mut dyn Read) -> Result<Self>;

    /// Whole-buffer decode that must consume every byte.
    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut r = bytes;
        let value = Self::read(&mut r)?;
        match r.len() {
            0 => Ok(value),
            n => Err(Error::Trailing(std::any::type_name::<Self>(), n as u64)),
        }
    }
    fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.size() as usize);
        self.write(&mut bytes)?;
        Ok(bytes)
    }
}

/// Bytes taken by an optional field behind a `P`-wide prefix.
pub fn sized<P: Prefix, T: Wire>(value: Option<&T>) -> u64 {
    P::BYTES + value.map(Wire::size).unwrap_or(0)
}

/// Writes `value` behind a `P`-wide length prefix, or the nil marker.
pub fn put<P: Prefix, T: Wire>(w: &mut dyn Write, value: Option<&T>) -> Result<()> {
    match value {
        None => Ok(P::put(w, P::NIL)?),
        Some(value) => {
            let size = value.size();
            if size >= P::NIL {
                return Err(Error::NilMarker(size));
            }
            P::put(w, size)?;
            let mut counter = Counter::new(w);
            value.write(&mut counter)?;
            counter.check(std::any::type_name::<T>(), size)
        }
    }
}

/// Reads an optional field behind a `P`-wide prefix. The body must
/// consume exactly the advertised length.
pub fn get<P: Prefix, T: Wire>(r: &mut dyn Read) -> Result<Option<T>> {
    match P::length(r)? {
        None => Ok(None),
        Some(n) => {
            let mut body = Read::take(&mut *r, n);
            let value = T::read(&mut body)?;
            match body.limit() {
                0 => Ok(Some(value)),
                left => Err(Error::Trailing(std::any::type_name::<T>(), left)),
            }
        }
    }
}

/// Like `get`, but absence is malformed input.
pub fn need<P: Prefix, T: Wire>(r: &mut dyn Read, what: &'static str) -> Result<T> {
    get::<P, T>(r)?.ok_or(Error::Missing(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::LE;
    use byteorder::ReadBytesExt;
    use byteorder::WriteBytesExt;

    #[derive(Debug, PartialEq)]
    struct Pair(u16, u16);

    impl Wire for Pair {
        fn size(&self) -> u64 {
            4
        }
        fn write(&self, w: &mut dyn Write) -> Result<()> {
            w.write_u16::<LE>(self.0)?;
            w.write_u16::<LE>(self.1)?;
            Ok(())
        }
        fn read(r: &mut dyn Read) -> Result<Self> {
            Ok(Self(r.read_u16::<LE>()?, r.read_u16::<LE>()?))
        }
    }

    #[test]
    fn present_field_round_trips() {
        let mut bytes = Vec::new();
        put::<u8, _>(&mut bytes, Some(&Pair(7, 9))).unwrap();
        assert_eq!(bytes.len() as u64, sized::<u8, _>(Some(&Pair(7, 9))));
        let back = get::<u8, Pair>(&mut bytes.as_slice()).unwrap();
        assert_eq!(back, Some(Pair(7, 9)));
    }

    #[test]
    fn absent_field_round_trips() {
        let mut bytes = Vec::new();
        put::<u16, Pair>(&mut bytes, None).unwrap();
        assert_eq!(bytes, vec![0xFF, 0xFF]);
        assert_eq!(get::<u16, Pair>(&mut bytes.as_slice()).unwrap(), None);
        assert!(matches!(
            need::<u16, Pair>(&mut bytes.as_slice(), "pair"),
            Err(Error::Missing("pair"))
        ));
    }

    #[test]
    fn overlong_prefix_is_rejected() {
        let bytes = [6u8, 1, 0, 2, 0, 0, 0];
        assert!(matches!(
            get::<u8, Pair>(&mut bytes.as_slice()),
            Err(Error::Trailing(_, 2))
        ));
    }

    #[test]
    fn truncated_body_is_rejected() {
        let bytes = [4u8, 1, 0];
        let err = get::<u8, Pair>(&mut bytes.as_slice()).unwrap_err();
        assert!(err.is_truncated());
    }
}
