pub mod reader;
pub mod writer;

pub use reader::{ByteArrayView, IntArrayView, LongArrayView, NbtReader, Tag, Token};
pub use writer::NbtWriter;

use sculk_common::SculkError;

/// The thirteen NBT tag types, numbered as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    pub fn from_id(id: u8) -> Result<TagType, SculkError> {
        match id {
            0 => Ok(TagType::End),
            1 => Ok(TagType::Byte),
            2 => Ok(TagType::Short),
            3 => Ok(TagType::Int),
            4 => Ok(TagType::Long),
            5 => Ok(TagType::Float),
            6 => Ok(TagType::Double),
            7 => Ok(TagType::ByteArray),
            8 => Ok(TagType::String),
            9 => Ok(TagType::List),
            10 => Ok(TagType::Compound),
            11 => Ok(TagType::IntArray),
            12 => Ok(TagType::LongArray),
            other => Err(SculkError::InvalidNbtTag(other)),
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}
