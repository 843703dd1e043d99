use crate::error::Result;
use crate::io::Source;

/// Find the longest prefix of `lookahead` that occurs as a run inside `window`
///
/// Candidate starts are scanned left to right and the first run of maximal
/// length wins. "Earliest" is the earliest window position, so among equal
/// runs the one with the largest offset is kept, not the smallest. The match is capped at `lookahead.len() - 1` so a literal
/// always follows, and only starts less than `window_size` bytes back from
/// the end of the window are eligible. Returns `(offset, length)` where
/// `offset` is the distance back from the window end, or `(0, 0)` on a miss.
pub fn find_longest_match(window: &[u8], lookahead: &[u8], window_size: usize) -> (usize, usize) {
    let max_len = lookahead.len().saturating_sub(1);
    if max_len == 0 || window.is_empty() {
        return (0, 0);
    }

    let earliest = (window.len() + 1).saturating_sub(window_size);
    let mut best_start = 0;
    let mut best_len = 0;

    for start in earliest..window.len() {
        let limit = max_len.min(window.len() - start);
        if limit <= best_len {
            // Runs only get shorter towards the window end
            break;
        }
        if window[start] != lookahead[0] {
            continue;
        }

        let len =
            window[start..start + limit].iter().zip(lookahead).take_while(|(a, b)| a == b).count();
        if len > best_len {
            best_start = start;
            best_len = len;
            if best_len == max_len {
                break;
            }
        }
    }

    if best_len == 0 {
        (0, 0)
    } else {
        (window.len() - best_start, best_len)
    }
}

/// Encoder state: the Window of consumed bytes followed by the lookahead buffer
///
/// Both live in one contiguous buffer so the match search works on plain
/// slices. Bytes older than the window are compacted away as the cursor moves.
pub struct SearchBuffer {
    data: Vec<u8>,
    /// Start of the window in `data`
    window_start: usize,
    /// End of the window, start of the lookahead
    cursor: usize,
    window_size: usize,
    buffer_size: usize,
    /// Source offset of the next byte to pull
    source_offset: u64,
    exhausted: bool,
}

impl SearchBuffer {
    pub fn new(window_size: usize, buffer_size: usize) -> Self {
        Self {
            data: Vec::new(),
            window_start: 0,
            cursor: 0,
            window_size,
            buffer_size,
            source_offset: 0,
            exhausted: false,
        }
    }

    /// History eligible for back-references (at most `window_size` bytes)
    pub fn window(&self) -> &[u8] {
        &self.data[self.window_start..self.cursor]
    }

    /// Unconsumed input (at most `buffer_size` bytes)
    pub fn lookahead(&self) -> &[u8] {
        let end = (self.cursor + self.buffer_size).min(self.data.len());
        &self.data[self.cursor..end]
    }

    /// Total bytes pulled from the source so far
    pub fn bytes_read(&self) -> u64 {
        self.source_offset
    }

    /// Pull from the source until the lookahead is full or input runs out
    pub fn refill<S: Source>(&mut self, source: &mut S, chunk_size: usize) -> Result<()> {
        while !self.exhausted && self.data.len() - self.cursor < self.buffer_size {
            if self.window_start >= self.window_size {
                self.data.drain(..self.window_start);
                self.cursor -= self.window_start;
                self.window_start = 0;
            }

            let want = chunk_size.max(self.buffer_size);
            let start = self.data.len();
            self.data.try_reserve(want)?;
            self.data.resize(start + want, 0);
            let n = source.read(&mut self.data[start..], self.source_offset)?;
            self.data.truncate(start + n);
            self.source_offset += n as u64;
            if n < want {
                self.exhausted = true;
            }
        }
        Ok(())
    }

    /// Move `n` bytes from the lookahead into the window, evicting the oldest
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.cursor + n <= self.data.len());
        self.cursor += n;
        self.window_start = self.window_start.max(self.cursor.saturating_sub(self.window_size));
    }
}

/// Decoder history: circular buffer of the last `size` output bytes
///
/// `size` must be a power of two.
pub struct HistoryWindow {
    buffer: Box<[u8]>,
    mask: usize,
    /// Next write position
    write_pos: usize,
    /// Total bytes ever written
    total_written: u64,
}

impl HistoryWindow {
    pub fn new(size: usize) -> Result<Self> {
        debug_assert!(size.is_power_of_two());
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(size)?;
        buffer.resize(size, 0u8);
        Ok(Self { buffer: buffer.into_boxed_slice(), mask: size - 1, write_pos: 0, total_written: 0 })
    }

    /// Add a single byte to the window
    #[inline]
    pub fn push_byte(&mut self, byte: u8) {
        self.buffer[self.write_pos] = byte;
        self.write_pos = (self.write_pos + 1) & self.mask;
        self.total_written += 1;
    }

    /// Copy `length` bytes from `distance` bytes back, appending them to both
    /// `out` and the window
    ///
    /// distance=1 means the most recently written byte. Length can exceed
    /// distance, in which case the copied bytes repeat.
    pub fn copy_back(&mut self, distance: usize, length: usize, out: &mut Vec<u8>) {
        debug_assert!((1..=self.available()).contains(&distance));

        let mut read_pos = (self.write_pos + self.buffer.len() - distance) & self.mask;
        for _ in 0..length {
            let byte = self.buffer[read_pos];
            read_pos = (read_pos + 1) & self.mask;
            self.push_byte(byte);
            out.push(byte);
        }
    }

    /// Bytes of history currently addressable
    pub fn available(&self) -> usize {
        self.total_written.min(self.buffer.len() as u64) as usize
    }

    /// Get total bytes written
    pub fn total_written(&self) -> u64 {
        self.total_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SliceSource;

    #[test]
    fn test_no_match_in_empty_window() {
        assert_eq!(find_longest_match(b"", b"abc", 256), (0, 0));
    }

    #[test]
    fn test_match_leaves_room_for_literal() {
        // Whole lookahead is in the window, but one byte must stay a literal
        assert_eq!(find_longest_match(b"abcd", b"abcd", 256), (4, 3));
        assert_eq!(find_longest_match(b"abcd", b"a", 256), (0, 0));
    }

    #[test]
    fn test_longest_match_wins() {
        // "ab" at 0, "abc" at 3
        assert_eq!(find_longest_match(b"abxabc", b"abcz", 256), (3, 3));
    }

    #[test]
    fn test_tie_goes_to_leftmost_run() {
        // "ab" occurs at window positions 0 and 4
        let (offset, length) = find_longest_match(b"abxxabyy", b"abz", 256);
        assert_eq!(length, 2);
        assert_eq!(offset, 8);
    }

    #[test]
    fn test_match_stays_inside_window() {
        // Run may not extend past the window end into the lookahead
        assert_eq!(find_longest_match(b"xa", b"aaaa", 256), (1, 1));
    }

    #[test]
    fn test_offset_below_window_size() {
        // With a 4-byte window only the last 3 positions are reachable
        let window = b"abcd";
        assert_eq!(find_longest_match(window, b"abz", 4), (0, 0));
        assert_eq!(find_longest_match(window, b"bcz", 4), (3, 2));
    }

    #[test]
    fn test_search_buffer_bounds() {
        let data: Vec<u8> = (0..100).collect();
        let mut source = SliceSource::new(&data);
        let mut buffer = SearchBuffer::new(16, 8);

        buffer.refill(&mut source, 5).unwrap();
        assert_eq!(buffer.lookahead(), &data[0..8]);
        assert!(buffer.window().is_empty());

        for _ in 0..10 {
            buffer.advance(5);
            buffer.refill(&mut source, 5).unwrap();
            assert!(buffer.window().len() <= 16);
            assert!(buffer.lookahead().len() <= 8);
        }
        assert_eq!(buffer.window(), &data[34..50]);
        assert_eq!(buffer.lookahead(), &data[50..58]);
    }

    #[test]
    fn test_search_buffer_drains_at_end() {
        let mut source = SliceSource::new(b"abc");
        let mut buffer = SearchBuffer::new(4, 8);
        buffer.refill(&mut source, 2).unwrap();
        assert_eq!(buffer.lookahead(), b"abc");
        buffer.advance(3);
        buffer.refill(&mut source, 2).unwrap();
        assert!(buffer.lookahead().is_empty());
        assert_eq!(buffer.bytes_read(), 3);
    }

    #[test]
    fn test_history_copy() {
        let mut window = HistoryWindow::new(8).unwrap();
        for &b in b"ABC" {
            window.push_byte(b);
        }
        let mut out = Vec::new();
        window.copy_back(3, 3, &mut out);
        assert_eq!(out, b"ABC");
        assert_eq!(window.total_written(), 6);
    }

    #[test]
    fn test_history_overlapping_copy() {
        let mut window = HistoryWindow::new(8).unwrap();
        window.push_byte(b'A');
        window.push_byte(b'B');
        let mut out = Vec::new();
        // distance=2, length=5 -> "ABABA"
        window.copy_back(2, 5, &mut out);
        assert_eq!(out, b"ABABA");
    }

    #[test]
    fn test_history_wrap() {
        let mut window = HistoryWindow::new(16).unwrap();
        for i in 0..40u8 {
            window.push_byte(i);
        }
        assert_eq!(window.available(), 16);
        let mut out = Vec::new();
        window.copy_back(16, 2, &mut out);
        assert_eq!(out, vec![24, 25]);
    }

    #[test]
    fn test_oversized_history_is_an_error() {
        let result = HistoryWindow::new(1 << (usize::BITS - 1));
        assert!(matches!(result, Err(crate::error::Error::AllocationFailure(_))));
    }
}
