pub mod server;
pub mod world;

pub use server::{run, Server};
