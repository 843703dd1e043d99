use crate::collections::HashTable;
use crate::error::{Error, Result};

/// Encoder phrase table: phrase bytes to code
///
/// Code 0 is the empty phrase and is never stored. Once `table_size` codes
/// exist the table is frozen and further inserts are ignored.
pub struct PhraseTable {
    codes: HashTable<u32>,
    next_code: u32,
    table_size: u32,
}

impl PhraseTable {
    pub fn new(table_size: u32) -> Result<Self> {
        Ok(Self { codes: HashTable::new(table_size as usize)?, next_code: 1, table_size })
    }

    pub fn lookup(&self, phrase: &[u8]) -> Option<u32> {
        self.codes.get(phrase).copied()
    }

    /// Assign the next code to `phrase` unless the table is full
    pub fn insert(&mut self, phrase: &[u8]) -> Option<u32> {
        if self.is_full() {
            return None;
        }
        let code = self.next_code;
        self.codes.set(phrase, code);
        self.next_code += 1;
        Some(code)
    }

    pub fn is_full(&self) -> bool {
        self.next_code >= self.table_size
    }

    /// Codes in use, counting the empty phrase
    pub fn code_count(&self) -> usize {
        self.next_code as usize
    }
}

/// Decoder phrase list indexed by code
pub struct PhraseList {
    phrases: Vec<Vec<u8>>,
    table_size: usize,
}

impl PhraseList {
    pub fn new(table_size: u32) -> Self {
        Self { phrases: vec![Vec::new()], table_size: table_size as usize }
    }

    /// Expand `(code, literal)` into `out` and record the new phrase
    pub fn expand(&mut self, code: u32, literal: u8, out: &mut Vec<u8>) -> Result<()> {
        let prefix = self.phrases.get(code as usize).ok_or_else(|| {
            Error::corrupt(format!("code {} not in dictionary of {}", code, self.phrases.len()))
        })?;

        out.try_reserve(prefix.len() + 1)?;
        out.extend_from_slice(prefix);
        out.push(literal);

        if self.phrases.len() < self.table_size {
            let mut phrase = Vec::new();
            phrase.try_reserve_exact(prefix.len() + 1)?;
            phrase.extend_from_slice(prefix);
            phrase.push(literal);
            self.phrases.try_reserve(1)?;
            self.phrases.push(phrase);
        }
        Ok(())
    }

    /// Codes in use, counting the empty phrase
    pub fn code_count(&self) -> usize {
        self.phrases.len()
    }
}
