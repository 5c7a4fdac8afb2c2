use sculk_nbt::NbtWriter;

/// Entries per packed long: heights are 9 bits wide and never straddle a
/// word, so each long carries seven of them.
const ENTRIES_PER_LONG: usize = 7;
/// 256 columns at 7 per long.
const LONG_COUNT: usize = 37;

/// Packs a single surface height into the 256-column MOTION_BLOCKING
/// array. The value stored per column is the height above the world floor,
/// as clients expect.
pub fn pack_uniform(height: u64) -> Vec<i64> {
    let mut longs = vec![0i64; LONG_COUNT];
    for column in 0..256 {
        let shift = (column % ENTRIES_PER_LONG) * 9;
        longs[column / ENTRIES_PER_LONG] |= ((height & 0x1ff) as i64) << shift;
    }
    longs
}

/// The heightmaps NBT compound carried by the chunk packet, reporting one
/// flat surface height for every column.
pub fn motion_blocking_nbt(height: u64) -> Vec<u8> {
    let mut raw = Vec::new();
    let mut writer = NbtWriter::new(&mut raw);
    writer.begin_compound(Some("")).expect("heightmap nbt");
    writer
        .long_array(Some("MOTION_BLOCKING"), &pack_uniform(height))
        .expect("heightmap nbt");
    writer.end_compound().expect("heightmap nbt");
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use sculk_nbt::{NbtReader, Tag};

    #[test]
    fn packs_seven_columns_per_long() {
        let longs = pack_uniform(129);
        assert_eq!(longs.len(), LONG_COUNT);
        for column in 0..7 {
            let shift = column * 9;
            assert_eq!((longs[0] >> shift) & 0x1ff, 129);
        }
        // Bit 63 is padding.
        assert_eq!(longs[0] >> 63, 0);
        // The last long holds only the remaining four columns.
        let used = 256 % ENTRIES_PER_LONG;
        assert_eq!((longs[36] >> (used * 9)) & 0x1ff, 0);
    }

    #[test]
    fn nbt_document_shape() {
        let raw = motion_blocking_nbt(70);
        let mut reader = NbtReader::new(&raw);
        assert_eq!(reader.next().unwrap().tag, Tag::Compound);

        let token = reader.next().unwrap();
        assert_eq!(token.name, "MOTION_BLOCKING");
        match token.tag {
            Tag::LongArray(view) => {
                assert_eq!(view.len(), LONG_COUNT);
                assert_eq!(view.get(0).unwrap() & 0x1ff, 70);
            }
            other => panic!("expected long array, got {:?}", other),
        }
        assert_eq!(reader.next().unwrap().tag, Tag::End);
    }
}
