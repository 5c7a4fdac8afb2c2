//! Anvil region file decoding, used once at startup to bootstrap the
//! spawn chunk.
//!
//! A region file holds up to 1024 chunks. The first 4 KiB is a location
//! table of big-endian entries: a 3-byte offset in 4 KiB sectors and a
//! 1-byte sector count. Each chunk blob starts with a 4-byte length and a
//! 1-byte compression tag; only zlib (2) is accepted here.

use crate::chunk::{Chunk, ChunkSection, GenerationStatus};
use flate2::read::ZlibDecoder;
use sculk_blocks::{block_from_name, state_from_properties, AIR};
use sculk_common::{Result, SculkError};
use sculk_logger::{log, LogSeverity::Warning};
use sculk_nbt::{NbtReader, Tag};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

const SECTOR_BYTES: u64 = 4096;
const ZLIB: u8 = 2;

/// Loads one chunk out of a region file.
pub fn load_chunk(path: &Path, chunk_x: i32, chunk_z: i32) -> Result<Chunk> {
    let mut file = File::open(path)?;

    let mut locations = [0u8; 4096];
    file.read_exact(&mut locations)?;

    let index = (chunk_x.rem_euclid(32) + chunk_z.rem_euclid(32) * 32) as usize * 4;
    let entry = &locations[index..index + 4];
    let sector_offset =
        ((entry[0] as u64) << 16) | ((entry[1] as u64) << 8) | (entry[2] as u64);
    let sector_count = entry[3];
    if sector_offset == 0 || sector_count == 0 {
        return Err(SculkError::RegionError(format!(
            "chunk ({}, {}) not present in region file",
            chunk_x, chunk_z
        )));
    }

    file.seek(SeekFrom::Start(sector_offset * SECTOR_BYTES))?;
    let mut header = [0u8; 5];
    file.read_exact(&mut header)?;
    let blob_len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
    let scheme = header[4];
    if scheme != ZLIB {
        return Err(SculkError::UnsupportedCompression(scheme));
    }
    if blob_len == 0 {
        return Err(SculkError::RegionError("empty chunk blob".to_owned()));
    }

    // The stored length counts the compression byte we already consumed.
    let mut compressed = vec![0u8; blob_len - 1];
    file.read_exact(&mut compressed)?;

    let mut nbt = Vec::new();
    ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut nbt)?;

    parse_chunk(&nbt)
}

/// Walks a decompressed chunk document into a `Chunk`.
pub fn parse_chunk(nbt: &[u8]) -> Result<Chunk> {
    let mut reader = NbtReader::new(nbt);
    let root = reader.next()?;
    if root.tag != Tag::Compound {
        return Err(SculkError::RegionError(
            "chunk NBT root is not a compound".to_owned(),
        ));
    }

    let mut data_version = 0;
    let mut x = 0;
    let mut z = 0;
    let mut status = GenerationStatus::Full;
    let mut last_update = 0;
    let mut inhabited_time = 0;
    let mut sections: Vec<(i32, ChunkSection)> = Vec::new();

    loop {
        let token = reader.next()?;
        match (token.name, token.tag) {
            ("", Tag::End) => break,
            ("DataVersion", Tag::Int(v)) => data_version = v,
            ("xPos", Tag::Int(v)) => x = v,
            ("zPos", Tag::Int(v)) => z = v,
            ("Status", Tag::String(name)) => {
                status = GenerationStatus::from_name(name).ok_or_else(|| {
                    SculkError::RegionError(format!("unknown chunk status {:?}", name))
                })?;
            }
            ("LastUpdate", Tag::Long(v)) => last_update = v,
            ("InhabitedTime", Tag::Long(v)) => inhabited_time = v,
            ("sections", Tag::List { element, len }) => {
                for _ in 0..len.max(0) {
                    let child = reader.next_nameless(element)?;
                    if child != Tag::Compound {
                        reader.skip(&child)?;
                        continue;
                    }
                    if let Some(section) = parse_section(&mut reader)? {
                        sections.push(section);
                    }
                }
            }
            (_, tag) => reader.skip(&tag)?,
        }
    }

    if sections.is_empty() {
        return Err(SculkError::RegionError(
            "chunk document has no block sections".to_owned(),
        ));
    }
    sections.sort_by_key(|&(y, _)| y);
    let min_section_y = sections[0].0;

    // Fill any gaps so the column is contiguous from its lowest section.
    let span = (sections.last().unwrap().0 - min_section_y + 1) as usize;
    let mut column = vec![ChunkSection::new(); span];
    for (y, section) in sections {
        column[(y - min_section_y) as usize] = section;
    }

    let mut chunk = Chunk::from_sections(x, z, min_section_y, column);
    chunk.data_version = data_version;
    chunk.status = status;
    chunk.last_update = last_update;
    chunk.inhabited_time = inhabited_time;
    Ok(chunk)
}

/// One entry of the `sections` list. Sections that carry no block data
/// (the light-only padding above and below the world) come back as None.
fn parse_section(reader: &mut NbtReader) -> Result<Option<(i32, ChunkSection)>> {
    let mut section_y = 0i32;
    let mut parts: Option<(Vec<u16>, Vec<u64>)> = None;

    loop {
        let token = reader.next()?;
        match (token.name, token.tag) {
            ("", Tag::End) => break,
            ("Y", Tag::Byte(v)) => section_y = v as i32,
            ("block_states", Tag::Compound) => parts = Some(parse_block_states(reader)?),
            (_, tag) => reader.skip(&tag)?,
        }
    }

    Ok(parts.map(|(palette, data)| (section_y, ChunkSection::from_parts(palette, data))))
}

fn parse_block_states(reader: &mut NbtReader) -> Result<(Vec<u16>, Vec<u64>)> {
    let mut palette = Vec::new();
    let mut data = Vec::new();

    loop {
        let token = reader.next()?;
        match (token.name, token.tag) {
            ("", Tag::End) => break,
            ("palette", Tag::List { element, len }) => {
                for _ in 0..len.max(0) {
                    let child = reader.next_nameless(element)?;
                    if child != Tag::Compound {
                        reader.skip(&child)?;
                        continue;
                    }
                    palette.push(parse_palette_entry(reader)?);
                }
            }
            ("data", Tag::LongArray(view)) => {
                data = view.to_vec().into_iter().map(|l| l as u64).collect();
            }
            (_, tag) => reader.skip(&tag)?,
        }
    }

    Ok((palette, data))
}

/// Resolves one palette compound (`Name` plus optional `Properties`) to a
/// global state id. Unknown block names fall back to air so a world saved
/// by a newer game version still loads.
fn parse_palette_entry(reader: &mut NbtReader) -> Result<u16> {
    let mut name = String::new();
    let mut properties: Vec<(String, String)> = Vec::new();

    loop {
        let token = reader.next()?;
        match (token.name, token.tag) {
            ("", Tag::End) => break,
            ("Name", Tag::String(v)) => name = v.to_owned(),
            ("Properties", Tag::Compound) => loop {
                let prop = reader.next()?;
                match prop.tag {
                    Tag::End => break,
                    Tag::String(value) => {
                        properties.push((prop.name.to_owned(), value.to_owned()))
                    }
                    other => reader.skip(&other)?,
                }
            },
            (_, tag) => reader.skip(&tag)?,
        }
    }

    let path = name.strip_prefix("minecraft:").unwrap_or(&name);
    let block = match block_from_name(path) {
        Some(block) => block,
        None => {
            log(
                format!("Unknown block {:?} in region palette, substituting air", name),
                Warning,
            );
            return Ok(AIR);
        }
    };

    let pairs: Vec<(&str, &str)> = properties
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    Ok(sculk_blocks::id_from_state(&state_from_properties(
        block, &pairs,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::DATA_VERSION;
    use byteorder::{BigEndian, WriteBytesExt};
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use sculk_blocks::{default_id, Block};
    use sculk_nbt::{NbtWriter, TagType};
    use std::io::Write;

    /// Emits a minimal 1.18 chunk document: one uniform stone section at
    /// Y = 4 and one two-state section at Y = 5.
    fn sample_chunk_nbt() -> Vec<u8> {
        let stone = default_id(Block::Stone);

        let mut raw = Vec::new();
        let mut w = NbtWriter::new(&mut raw);
        w.begin_compound(Some("")).unwrap();
        w.int(Some("DataVersion"), DATA_VERSION).unwrap();
        w.int(Some("xPos"), 3).unwrap();
        w.int(Some("zPos"), -2).unwrap();
        w.string(Some("Status"), "minecraft:full").unwrap();
        w.long(Some("LastUpdate"), 123).unwrap();
        w.long(Some("InhabitedTime"), 7).unwrap();

        w.begin_list(Some("sections"), TagType::Compound, 2).unwrap();

        // Uniform stone section.
        w.byte(Some("Y"), 4).unwrap();
        w.begin_compound(Some("block_states")).unwrap();
        w.begin_list(Some("palette"), TagType::Compound, 1).unwrap();
        w.string(Some("Name"), "minecraft:stone").unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();

        // Air/grass section with explicit data words.
        w.byte(Some("Y"), 5).unwrap();
        w.begin_compound(Some("block_states")).unwrap();
        w.begin_list(Some("palette"), TagType::Compound, 2).unwrap();
        w.string(Some("Name"), "minecraft:air").unwrap();
        w.end_compound().unwrap();
        w.string(Some("Name"), "minecraft:grass_block").unwrap();
        w.begin_compound(Some("Properties")).unwrap();
        w.string(Some("snowy"), "false").unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();
        // Cell 0 (0,0,0) holds palette index 1, everything else 0.
        let mut words = vec![0i64; 256];
        words[0] = 1;
        w.long_array(Some("data"), &words).unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();

        w.end_compound().unwrap();
        raw
    }

    fn write_region_file(nbt: &[u8], chunk_x: i32, chunk_z: i32) -> std::path::PathBuf {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(nbt).unwrap();
        let compressed = encoder.finish().unwrap();

        let mut file = vec![0u8; 8192];
        let index = (chunk_x.rem_euclid(32) + chunk_z.rem_euclid(32) * 32) as usize * 4;
        // Blob at sector 2, one sector long.
        file[index..index + 4].copy_from_slice(&[0, 0, 2, 1]);

        let mut blob = Vec::new();
        blob.write_u32::<BigEndian>(compressed.len() as u32 + 1)
            .unwrap();
        blob.push(ZLIB);
        blob.extend_from_slice(&compressed);

        file.resize(2 * 4096, 0);
        file.extend_from_slice(&blob);
        file.resize(3 * 4096, 0);

        let path = std::env::temp_dir().join(format!(
            "sculk-region-test-{}-{}.mca",
            std::process::id(),
            chunk_x
        ));
        std::fs::write(&path, file).unwrap();
        path
    }

    #[test]
    fn parses_a_chunk_document() {
        let chunk = parse_chunk(&sample_chunk_nbt()).unwrap();
        assert_eq!(chunk.x, 3);
        assert_eq!(chunk.z, -2);
        assert_eq!(chunk.data_version, DATA_VERSION);
        assert_eq!(chunk.status, GenerationStatus::Full);
        assert_eq!(chunk.last_update, 123);
        assert_eq!(chunk.min_section_y, 4);
        assert_eq!(chunk.sections().len(), 2);

        // Section at Y=4 is uniform stone.
        assert_eq!(chunk.get_block(9, 4 * 16 + 3, 9), default_id(Block::Stone));
        // Section at Y=5 holds one grass block at its origin cell.
        assert_eq!(chunk.get_block(0, 5 * 16, 0), default_id(Block::GrassBlock));
        assert_eq!(chunk.get_block(1, 5 * 16, 0), AIR);
    }

    #[test]
    fn unknown_palette_names_become_air() {
        let mut raw = Vec::new();
        let mut w = NbtWriter::new(&mut raw);
        w.begin_compound(Some("")).unwrap();
        w.int(Some("xPos"), 0).unwrap();
        w.int(Some("zPos"), 0).unwrap();
        w.begin_list(Some("sections"), TagType::Compound, 1).unwrap();
        w.byte(Some("Y"), 0).unwrap();
        w.begin_compound(Some("block_states")).unwrap();
        w.begin_list(Some("palette"), TagType::Compound, 1).unwrap();
        w.string(Some("Name"), "minecraft:sculk_catalyst").unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();

        let chunk = parse_chunk(&raw).unwrap();
        assert_eq!(chunk.get_block(0, 0, 0), AIR);
    }

    #[test]
    fn loads_from_a_region_file() {
        let path = write_region_file(&sample_chunk_nbt(), 3, -2);
        let chunk = load_chunk(&path, 3, -2).unwrap();
        assert_eq!(chunk.x, 3);
        assert_eq!(chunk.get_block(0, 5 * 16, 0), default_id(Block::GrassBlock));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn absent_chunk_is_an_error() {
        let path = write_region_file(&sample_chunk_nbt(), 0, 0);
        match load_chunk(&path, 5, 5) {
            Err(SculkError::RegionError(_)) => {}
            other => panic!("expected RegionError, got {:?}", other.map(|c| c.x)),
        }
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn non_zlib_compression_is_rejected() {
        let mut file = vec![0u8; 8192];
        file[0..4].copy_from_slice(&[0, 0, 2, 1]);
        file.resize(2 * 4096, 0);
        file.extend_from_slice(&[0, 0, 0, 2, 1, 0]); // gzip tag
        let path = std::env::temp_dir().join(format!(
            "sculk-region-test-gzip-{}.mca",
            std::process::id()
        ));
        std::fs::write(&path, file).unwrap();

        match load_chunk(&path, 0, 0) {
            Err(SculkError::UnsupportedCompression(1)) => {}
            other => panic!("expected UnsupportedCompression, got {:?}", other.map(|c| c.x)),
        }
        std::fs::remove_file(path).ok();
    }
}
