pub mod reader;
pub mod wire;
pub mod writer;

pub use reader::{bit_at, BitReader};
pub use wire::{bits_needed, bytes_needed, from_wire, to_wire, validate_capacity};
pub use writer::BitWriter;
