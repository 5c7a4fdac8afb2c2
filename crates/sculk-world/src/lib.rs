pub mod chunk;
pub mod heightmap;
pub mod region;

pub use chunk::{Chunk, ChunkSection, GenerationStatus};
