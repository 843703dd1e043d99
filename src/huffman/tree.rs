use crate::collections::PriorityQueue;
use crate::error::{Error, Result};

/// Longest code the stream format and `Code` can carry
pub const MAX_CODE_BITS: u8 = 64;

/// Byte frequencies gathered in the first pass
#[derive(Clone, Debug)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self { counts: [0; 256], total: 0 }
    }

    pub fn count(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
        self.total += bytes.len() as u64;
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Bytes counted so far
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Symbols with a non-zero count, ascending
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=255u8).map(|s| (s, self.counts[s as usize])).filter(|&(_, n)| n > 0)
    }

    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&n| n > 0).count()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of a node in a `HuffmanTree` arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Leaf(u8),
    Internal { left: NodeId, right: NodeId },
}

#[derive(Clone, Debug)]
pub struct Node {
    pub weight: u64,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
}

/// Full binary tree over the symbols of one input
///
/// Nodes live in a flat arena; children and parents are indices into it, so
/// the tree can be walked from the root down or from any leaf up.
#[derive(Clone, Debug)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Greedily merge the two lightest nodes until one root remains
    ///
    /// Queue priority is `(weight, tie)` with `tie` equal to the symbol for
    /// leaves and `256 + n` for the n-th internal node, so equal inputs always
    /// build the same tree. The first node popped becomes the left child.
    /// Returns `None` when no symbol has a non-zero count.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let distinct = frequencies.distinct();
        let mut nodes: Vec<Node> = Vec::with_capacity(distinct.saturating_mul(2));
        let mut queue: PriorityQueue<(u64, u32), NodeId> = PriorityQueue::with_capacity(distinct);

        for (symbol, weight) in frequencies.symbols() {
            let id = NodeId(nodes.len() as u32);
            nodes.push(Node { weight, kind: NodeKind::Leaf(symbol), parent: None });
            queue.push((weight, symbol as u32), id);
        }

        let mut merges = 0u32;
        loop {
            let (_, left) = queue.pop_entry()?;
            let Some((_, right)) = queue.pop_entry() else {
                return Some(Self { nodes, root: left });
            };

            let id = NodeId(nodes.len() as u32);
            let weight = nodes[left.index()].weight + nodes[right.index()].weight;
            nodes.push(Node { weight, kind: NodeKind::Internal { left, right }, parent: None });
            nodes[left.index()].parent = Some(id);
            nodes[right.index()].parent = Some(id);

            queue.push((weight, 256 + merges), id);
            merges += 1;
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Leaves in arena order (ascending symbol)
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, u8)> + '_ {
        self.nodes.iter().enumerate().filter_map(|(i, node)| match node.kind {
            NodeKind::Leaf(symbol) => Some((NodeId(i as u32), symbol)),
            NodeKind::Internal { .. } => None,
        })
    }

    /// Edges between `id` and the root
    pub fn depth(&self, id: NodeId) -> u32 {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            depth += 1;
            current = parent;
        }
        depth
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A prefix code: the low `len` bits of `bits`, sent most significant first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Code {
    pub bits: u64,
    pub len: u8,
}

impl Code {
    /// Bit `i` of the code, counting from the first bit sent
    pub fn bit(&self, i: u8) -> bool {
        (self.bits >> (self.len - 1 - i)) & 1 == 1
    }

    /// Whether `self` is a proper or equal prefix of `other`
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }
}

/// Symbol to code mapping
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Option<Code>; 256],
}

impl CodeTable {
    pub fn new() -> Self {
        Self { codes: [None; 256] }
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes[symbol as usize].replace(code)
    }

    /// Present symbols in ascending order with their codes
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        (0..=255u8).filter_map(|s| self.codes[s as usize].map(|c| (s, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.iter().all(Option::is_none)
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive each leaf's code from its path to the root (left = 0, right = 1)
///
/// A tree that is a single leaf gets the one-bit code `0`.
pub fn assign_codes(tree: &HuffmanTree) -> Result<CodeTable> {
    let mut table = CodeTable::new();

    for (leaf, symbol) in tree.leaves() {
        let depth = tree.depth(leaf);
        if depth > MAX_CODE_BITS as u32 {
            return Err(Error::CodeTooLong(depth));
        }
        if depth == 0 {
            table.insert(symbol, Code { bits: 0, len: 1 });
            continue;
        }

        let mut bits = 0u64;
        let mut current = leaf;
        let mut shift = 0;
        while let Some(parent) = tree.node(current).parent {
            if let NodeKind::Internal { right, .. } = tree.node(parent).kind {
                if right == current {
                    bits |= 1 << shift;
                }
            }
            shift += 1;
            current = parent;
        }
        table.insert(symbol, Code { bits, len: depth as u8 });
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frequencies(data: &[u8]) -> FrequencyTable {
        let mut table = FrequencyTable::new();
        table.count(data);
        table
    }

    fn assert_prefix_free(table: &CodeTable) {
        let codes: Vec<(u8, Code)> = table.iter().collect();
        for (i, (_, a)) in codes.iter().enumerate() {
            for (j, (_, b)) in codes.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{a:?} is a prefix of {b:?}");
                }
            }
        }
    }

    #[test]
    fn test_empty_input_has_no_tree() {
        assert!(HuffmanTree::build(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let tree = HuffmanTree::build(&frequencies(b"zzzz")).unwrap();
        assert_eq!(tree.len(), 1);
        let codes = assign_codes(&tree).unwrap();
        assert_eq!(codes.get(b'z'), Some(Code { bits: 0, len: 1 }));
        assert_eq!(codes.len(), 1);
    }

    #[test]
    fn test_skewed_frequencies() {
        // A=8 B=4 C=5 D=2
        let tree = HuffmanTree::build(&frequencies(b"AAAAAAAABBBBCCCCCDD")).unwrap();
        assert_eq!(tree.node(tree.root()).weight, 19);
        // Full binary tree: 4 leaves, 3 internal nodes
        assert_eq!(tree.len(), 7);

        let codes = assign_codes(&tree).unwrap();
        assert_eq!(codes.get(b'A'), Some(Code { bits: 0b0, len: 1 }));
        assert_eq!(codes.get(b'C'), Some(Code { bits: 0b10, len: 2 }));
        assert_eq!(codes.get(b'D'), Some(Code { bits: 0b110, len: 3 }));
        assert_eq!(codes.get(b'B'), Some(Code { bits: 0b111, len: 3 }));
        assert_prefix_free(&codes);
    }

    #[test]
    fn test_ties_are_deterministic() {
        let data: Vec<u8> = (0..=255).collect();
        let first = assign_codes(&HuffmanTree::build(&frequencies(&data)).unwrap()).unwrap();
        let second = assign_codes(&HuffmanTree::build(&frequencies(&data)).unwrap()).unwrap();
        assert_eq!(first, second);
        // Uniform weights over 256 symbols give a perfectly balanced tree
        assert!(first.iter().all(|(_, code)| code.len == 8));
        assert_prefix_free(&first);
    }

    #[test]
    fn test_fibonacci_weights_make_deep_tree() {
        let mut table = FrequencyTable::new();
        let (mut a, mut b) = (1u64, 1u64);
        for symbol in 0..20u8 {
            table.count(&vec![symbol; a as usize]);
            (a, b) = (b, a + b);
        }
        let tree = HuffmanTree::build(&table).unwrap();
        let codes = assign_codes(&tree).unwrap();
        let longest = codes.iter().map(|(_, c)| c.len).max().unwrap();
        assert_eq!(longest, 19);
        assert_prefix_free(&codes);
    }

    #[test]
    fn test_parent_links_reach_root() {
        let tree = HuffmanTree::build(&frequencies(b"hello huffman")).unwrap();
        for (leaf, _) in tree.leaves() {
            let mut current = leaf;
            while let Some(parent) = tree.node(current).parent {
                current = parent;
            }
            assert_eq!(current, tree.root());
        }
    }

    #[test]
    fn test_code_bits() {
        let code = Code { bits: 0b110, len: 3 };
        assert!(code.bit(0));
        assert!(code.bit(1));
        assert!(!code.bit(2));
        assert!(Code { bits: 0b11, len: 2 }.is_prefix_of(&code));
        assert!(!Code { bits: 0b10, len: 2 }.is_prefix_of(&code));
    }
}
