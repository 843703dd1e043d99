use log::debug;

use super::header::read_header;
use super::tree::CodeTable;
use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::io::{check_cancel, read_to_end, Sink, Source, StreamOptions};
use crate::CodecStats;

#[derive(Clone, Copy, Debug)]
enum DecodeNode {
    Branch([Option<u32>; 2]),
    Leaf(u8),
}

/// Bit-walkable tree rebuilt from a code table
///
/// Isomorphic to the encoder's tree for the leaves it describes. Branches a
/// corrupt table leaves unfilled are reported when a walk reaches them.
pub struct DecodeTree {
    nodes: Vec<DecodeNode>,
}

impl DecodeTree {
    const ROOT: u32 = 0;

    /// Insert every code, rejecting tables that are not prefix-free
    pub fn from_codes(codes: &CodeTable) -> Result<Self> {
        let mut nodes = vec![DecodeNode::Branch([None; 2])];

        for (symbol, code) in codes.iter() {
            let mut current = Self::ROOT;
            for i in 0..code.len {
                let bit = code.bit(i) as usize;
                let next_free = nodes.len() as u32;
                let children = match &mut nodes[current as usize] {
                    DecodeNode::Branch(children) => children,
                    DecodeNode::Leaf(other) => {
                        return Err(Error::corrupt(format!(
                            "code of {other:#04x} is a prefix of the code of {symbol:#04x}"
                        )));
                    }
                };

                let last = i + 1 == code.len;
                match children[bit] {
                    Some(_) if last => {
                        return Err(Error::corrupt(format!(
                            "code of {symbol:#04x} collides with a longer code"
                        )));
                    }
                    Some(next) => current = next,
                    None => {
                        children[bit] = Some(next_free);
                        nodes.push(if last {
                            DecodeNode::Leaf(symbol)
                        } else {
                            DecodeNode::Branch([None; 2])
                        });
                        current = next_free;
                    }
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Follow bits from the root to the next leaf
    pub fn decode_symbol(&self, reader: &mut BitReader<'_>) -> Result<u8> {
        let mut current = Self::ROOT;
        loop {
            match self.nodes[current as usize] {
                DecodeNode::Leaf(symbol) => return Ok(symbol),
                DecodeNode::Branch(children) => {
                    let bit = reader.read_bit().map_err(|e| match e {
                        Error::UnexpectedEof => Error::corrupt("payload ended mid-symbol"),
                        other => other,
                    })?;
                    current = children[bit as usize].ok_or_else(|| {
                        Error::corrupt(format!("no code continues with bit {}", bit as u8))
                    })?;
                }
            }
        }
    }
}

/// Decode a header-prefixed stream
///
/// The stream is pulled whole; the header fixes how many symbols follow.
pub fn decode<S: Source, K: Sink>(
    options: &StreamOptions,
    mut source: S,
    mut sink: K,
) -> Result<CodecStats> {
    let input = read_to_end(&mut source, options.chunk_size, options.cancel.as_ref())?;
    let mut reader = BitReader::new(&input);
    let header = read_header(&mut reader)?;
    let tree = DecodeTree::from_codes(&header.codes)?;

    let mut stats = CodecStats { input_bytes: input.len() as u64, ..Default::default() };
    let flush_at = options.chunk_size.max(1);
    let mut out = Vec::new();
    out.try_reserve(flush_at.min(header.original_len as usize))?;

    for _ in 0..header.original_len {
        check_cancel(options.cancel.as_ref())?;
        out.push(tree.decode_symbol(&mut reader)?);
        stats.units += 1;

        if out.len() >= flush_at {
            sink.write(&out)?;
            stats.output_bytes += out.len() as u64;
            out.clear();
        }
    }

    if !out.is_empty() {
        sink.write(&out)?;
        stats.output_bytes += out.len() as u64;
    }
    sink.finish()?;

    debug!(
        "huffman decompress ({} symbols in table): {} -> {} bytes",
        header.codes.len(),
        stats.input_bytes,
        stats.output_bytes
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitWriter;
    use crate::huffman::header::write_header;
    use crate::huffman::tree::Code;
    use crate::io::{SliceSource, VecSink};

    fn table(entries: &[(u8, u64, u8)]) -> CodeTable {
        let mut codes = CodeTable::new();
        for &(symbol, bits, len) in entries {
            codes.insert(symbol, Code { bits, len });
        }
        codes
    }

    #[test]
    fn test_tree_decodes_codes() {
        let codes = table(&[(b'A', 0b0, 1), (b'C', 0b10, 2), (b'D', 0b110, 3), (b'B', 0b111, 3)]);
        let tree = DecodeTree::from_codes(&codes).unwrap();
        // A C D B A
        let data = [0b0101_1011, 0b1000_0000];
        let mut reader = BitReader::new(&data);
        let decoded: Vec<u8> =
            (0..5).map(|_| tree.decode_symbol(&mut reader).unwrap()).collect();
        assert_eq!(decoded, b"ACDBA");
    }

    #[test]
    fn test_rejects_prefix_conflict() {
        let codes = table(&[(b'a', 0b1, 1), (b'b', 0b10, 2)]);
        assert!(matches!(DecodeTree::from_codes(&codes), Err(Error::CorruptStream(_))));

        // Shorter code inserted after a longer one sharing its path
        let codes = table(&[(b'a', 0b10, 2), (b'b', 0b1, 1)]);
        assert!(matches!(DecodeTree::from_codes(&codes), Err(Error::CorruptStream(_))));
    }

    #[test]
    fn test_missing_branch_is_corrupt() {
        // Single-symbol tree only has the 0 branch
        let tree = DecodeTree::from_codes(&table(&[(b'z', 0, 1)])).unwrap();
        let mut reader = BitReader::new(&[0b1000_0000]);
        assert!(matches!(tree.decode_symbol(&mut reader), Err(Error::CorruptStream(_))));
    }

    #[test]
    fn test_payload_shorter_than_declared() {
        let codes = table(&[(b'a', 0, 1), (b'b', 1, 1)]);
        let mut writer = BitWriter::new();
        write_header(20, &codes, &mut writer);
        writer.write_byte(0b0101_0101);
        let stream = writer.finish();

        let mut sink = VecSink::new();
        let result = decode(&StreamOptions::default(), SliceSource::new(&stream), &mut sink);
        assert!(matches!(result, Err(Error::CorruptStream(_))));
        assert!(!sink.is_finished());
    }

    #[test]
    fn test_empty_stream_header_only() {
        let mut writer = BitWriter::new();
        write_header(0, &CodeTable::new(), &mut writer);
        let stream = writer.finish();
        let mut sink = VecSink::new();
        let stats = decode(&StreamOptions::default(), SliceSource::new(&stream), &mut sink).unwrap();
        assert!(sink.as_bytes().is_empty());
        assert!(sink.is_finished());
        assert_eq!(stats.units, 0);
    }

    #[test]
    fn test_missing_header_is_corrupt() {
        let mut sink = VecSink::new();
        let result = decode(&StreamOptions::default(), SliceSource::new(&[]), &mut sink);
        assert!(matches!(result, Err(Error::CorruptStream(_))));
    }
}
