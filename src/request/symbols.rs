//! In-memory symbol table for generated results

use super::{Dtype, GeneratedArray};
use crate::strings::SegmentedStrings;
use std::collections::BTreeMap;

/// A registered result
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Array(GeneratedArray),
    Strings(SegmentedStrings),
}

/// Generated results by name (`id_1`, `id_2`, ...)
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: BTreeMap<String, Entry>,
    next_id: u64,
}

/// `created <name> <dtype> <size> 1 (<size>) <itemsize>`
fn created_line(name: &str, dtype: Dtype, size: usize) -> String {
    format!("created {} {} {} 1 ({}) {}", name, dtype, size, size, dtype.item_size())
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry` under a fresh name and return that name
    pub fn register(&mut self, entry: Entry) -> String {
        self.next_id += 1;
        let name = format!("id_{}", self.next_id);
        self.entries.insert(name.clone(), entry);
        name
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reply text describing entry `name`
    ///
    /// Strings produce two `created` lines, offsets then bytes, joined by `+`.
    pub fn reply(&self, name: &str) -> Option<String> {
        Some(match self.get(name)? {
            Entry::Array(array) => created_line(name, array.dtype(), array.len()),
            Entry::Strings(strings) => format!(
                "{}+{}",
                created_line(&format!("{}.segs", name), Dtype::Int64, strings.len()),
                created_line(&format!("{}.vals", name), Dtype::UInt8, strings.num_bytes())
            ),
        })
    }
}
