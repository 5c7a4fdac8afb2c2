use crate::TagType;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Streaming NBT emitter.
///
/// Passing a name writes the tag byte and the u16-prefixed name first, as
/// compound children are stored; passing `None` emits the bare payload, as
/// list elements are stored. The root compound carries its (possibly
/// empty) name like any other named tag.
pub struct NbtWriter<W: Write> {
    out: W,
}

impl<W: Write> NbtWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn header(&mut self, tag_type: TagType, name: Option<&str>) -> io::Result<()> {
        if let Some(name) = name {
            self.out.write_u8(tag_type.id())?;
            self.out.write_u16::<BigEndian>(name.len() as u16)?;
            self.out.write_all(name.as_bytes())?;
        }
        Ok(())
    }

    pub fn byte(&mut self, name: Option<&str>, v: i8) -> io::Result<()> {
        self.header(TagType::Byte, name)?;
        self.out.write_i8(v)
    }

    pub fn short(&mut self, name: Option<&str>, v: i16) -> io::Result<()> {
        self.header(TagType::Short, name)?;
        self.out.write_i16::<BigEndian>(v)
    }

    pub fn int(&mut self, name: Option<&str>, v: i32) -> io::Result<()> {
        self.header(TagType::Int, name)?;
        self.out.write_i32::<BigEndian>(v)
    }

    pub fn long(&mut self, name: Option<&str>, v: i64) -> io::Result<()> {
        self.header(TagType::Long, name)?;
        self.out.write_i64::<BigEndian>(v)
    }

    pub fn float(&mut self, name: Option<&str>, v: f32) -> io::Result<()> {
        self.header(TagType::Float, name)?;
        self.out.write_u32::<BigEndian>(v.to_bits())
    }

    pub fn double(&mut self, name: Option<&str>, v: f64) -> io::Result<()> {
        self.header(TagType::Double, name)?;
        self.out.write_u64::<BigEndian>(v.to_bits())
    }

    pub fn string(&mut self, name: Option<&str>, v: &str) -> io::Result<()> {
        self.header(TagType::String, name)?;
        self.out.write_u16::<BigEndian>(v.len() as u16)?;
        self.out.write_all(v.as_bytes())
    }

    pub fn byte_array(&mut self, name: Option<&str>, v: &[i8]) -> io::Result<()> {
        self.header(TagType::ByteArray, name)?;
        self.out.write_i32::<BigEndian>(v.len() as i32)?;
        for &b in v {
            self.out.write_i8(b)?;
        }
        Ok(())
    }

    pub fn int_array(&mut self, name: Option<&str>, v: &[i32]) -> io::Result<()> {
        self.header(TagType::IntArray, name)?;
        self.out.write_i32::<BigEndian>(v.len() as i32)?;
        for &i in v {
            self.out.write_i32::<BigEndian>(i)?;
        }
        Ok(())
    }

    pub fn long_array(&mut self, name: Option<&str>, v: &[i64]) -> io::Result<()> {
        self.header(TagType::LongArray, name)?;
        self.out.write_i32::<BigEndian>(v.len() as i32)?;
        for &l in v {
            self.out.write_i64::<BigEndian>(l)?;
        }
        Ok(())
    }

    /// Opens a list; the caller emits exactly `len` payloads with the
    /// `raw_*` writers (or nested openers) afterwards.
    pub fn begin_list(&mut self, name: Option<&str>, element: TagType, len: i32) -> io::Result<()> {
        self.header(TagType::List, name)?;
        self.out.write_u8(element.id())?;
        self.out.write_i32::<BigEndian>(len)
    }

    /// Opens a compound; closed by a matching `end_compound`.
    pub fn begin_compound(&mut self, name: Option<&str>) -> io::Result<()> {
        self.header(TagType::Compound, name)
    }

    pub fn end_compound(&mut self) -> io::Result<()> {
        self.out.write_u8(TagType::End.id())
    }

    // Bare payload writers, for list elements.

    pub fn raw_byte(&mut self, v: i8) -> io::Result<()> {
        self.out.write_i8(v)
    }

    pub fn raw_short(&mut self, v: i16) -> io::Result<()> {
        self.out.write_i16::<BigEndian>(v)
    }

    pub fn raw_int(&mut self, v: i32) -> io::Result<()> {
        self.out.write_i32::<BigEndian>(v)
    }

    pub fn raw_long(&mut self, v: i64) -> io::Result<()> {
        self.out.write_i64::<BigEndian>(v)
    }

    pub fn raw_float(&mut self, v: f32) -> io::Result<()> {
        self.out.write_u32::<BigEndian>(v.to_bits())
    }

    pub fn raw_double(&mut self, v: f64) -> io::Result<()> {
        self.out.write_u64::<BigEndian>(v.to_bits())
    }

    pub fn raw_string(&mut self, v: &str) -> io::Result<()> {
        self.out.write_u16::<BigEndian>(v.len() as u16)?;
        self.out.write_all(v.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{NbtReader, Tag};

    #[test]
    fn scalar_round_trips() {
        let mut raw = Vec::new();
        let mut w = NbtWriter::new(&mut raw);
        w.begin_compound(Some("")).unwrap();
        w.byte(Some("b"), -5).unwrap();
        w.short(Some("s"), -1234).unwrap();
        w.long(Some("l"), i64::MIN).unwrap();
        w.float(Some("f"), 1.5).unwrap();
        w.end_compound().unwrap();

        let mut reader = NbtReader::new(&raw);
        assert_eq!(reader.next().unwrap().tag, Tag::Compound);
        assert_eq!(reader.next().unwrap().tag, Tag::Byte(-5));
        assert_eq!(reader.next().unwrap().tag, Tag::Short(-1234));
        assert_eq!(reader.next().unwrap().tag, Tag::Long(i64::MIN));
        assert_eq!(reader.next().unwrap().tag, Tag::Float(1.5));
        assert_eq!(reader.next().unwrap().tag, Tag::End);
    }

    #[test]
    fn float_bits_survive_exactly() {
        let odd = f64::from_bits(0x7ff8_0000_0000_0001);
        let mut raw = Vec::new();
        let mut w = NbtWriter::new(&mut raw);
        w.double(Some("nan"), odd).unwrap();

        let mut reader = NbtReader::new(&raw);
        match reader.next().unwrap().tag {
            Tag::Double(v) => assert_eq!(v.to_bits(), odd.to_bits()),
            other => panic!("expected double, got {:?}", other),
        }
    }

    #[test]
    fn list_of_strings() {
        let mut raw = Vec::new();
        let mut w = NbtWriter::new(&mut raw);
        w.begin_list(Some("names"), TagType::String, 2).unwrap();
        w.raw_string("alpha").unwrap();
        w.raw_string("beta").unwrap();

        let mut reader = NbtReader::new(&raw);
        let token = reader.next().unwrap();
        assert_eq!(
            token.tag,
            Tag::List {
                element: TagType::String,
                len: 2
            }
        );
        assert_eq!(
            reader.next_nameless(TagType::String).unwrap(),
            Tag::String("alpha")
        );
        assert_eq!(
            reader.next_nameless(TagType::String).unwrap(),
            Tag::String("beta")
        );
    }
}
