//! Vocabulary parsing, tokenizing, and dictionary lookup.
//!
//! Grounded on the teacher's `dictionary.rs` — same binary-search-over-a-
//! sorted-entry-table shape and the same parse-buffer record layout — but
//! the V3-only key is produced by [`crate::text::dictionary_key`] instead
//! of a bespoke encoder, and lookups go through a map built once at load
//! time (per the Design Notes: "the dictionary map is built once per run
//! and thereafter read-only") rather than re-encoding on every call.

use crate::memory::MemoryImage;
use crate::text::{dictionary_key, decode_text};
use log::debug;
use std::collections::HashMap;

const WHITESPACE: [char; 3] = [' ', '\n', '\t'];

/// One token produced by the tokenizer: its text, its length in the
/// source string, and its 1-based starting byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub length: u8,
    pub offset: u8,
}

pub struct Dictionary {
    break_chars: Vec<u8>,
    entries: HashMap<String, u16>,
}

impl Dictionary {
    /// Parse the vocabulary header at `dict_addr` and decode every entry's
    /// key into a lookup map. `dict_addr == 0` means no dictionary: only
    /// whitespace then separates tokens, and no entry ever matches.
    pub fn parse(memory: &MemoryImage, dict_addr: u16, abbrev_base: u16) -> Dictionary {
        if dict_addr == 0 {
            return Dictionary {
                break_chars: Vec::new(),
                entries: HashMap::new(),
            };
        }

        let dict_addr = dict_addr as u32;
        let sep_count = memory.read_byte(dict_addr);
        let mut break_chars = Vec::with_capacity(sep_count as usize);
        for i in 0..sep_count as u32 {
            break_chars.push(memory.read_byte(dict_addr + 1 + i));
        }

        let entry_start = dict_addr + 1 + sep_count as u32;
        let entry_length = memory.read_byte(entry_start);
        let entry_count = memory.read_word_signed(entry_start + 1);
        let entries_addr = entry_start + 3;

        debug!(
            "dictionary at {:04x}: {} break chars, {} entries of {} bytes",
            dict_addr, sep_count, entry_count, entry_length
        );

        let mut entries = HashMap::new();
        if entry_count > 0 {
            for i in 0..entry_count as u32 {
                let addr = entries_addr + i * entry_length as u32;
                let (key, _) = decode_text(memory, addr, abbrev_base);
                entries.insert(key, addr as u16);
            }
        }

        Dictionary {
            break_chars,
            entries,
        }
    }

    /// Byte address of the entry whose key matches `word`'s dictionary
    /// key, or 0 if the vocabulary has no such entry.
    pub fn lookup(&self, word: &str) -> u16 {
        let key = dictionary_key(word);
        *self.entries.get(&key).unwrap_or(&0)
    }

    fn is_break(&self, ch: char) -> bool {
        ch.is_ascii() && self.break_chars.contains(&(ch as u8))
    }

    /// Tokenize `input` into break-character tokens and maximal runs of
    /// non-whitespace, non-break characters, each carrying its length and
    /// 1-based starting offset in `input`.
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut chars: Vec<(usize, char)> = input.char_indices().collect();
        chars.push((input.len(), '\0'));

        let mut i = 0;
        while i < chars.len() - 1 {
            let (offset, ch) = chars[i];
            if WHITESPACE.contains(&ch) {
                i += 1;
                continue;
            }
            if self.is_break(ch) {
                tokens.push(Token {
                    text: ch.to_string(),
                    length: 1,
                    offset: (offset + 1) as u8,
                });
                i += 1;
                continue;
            }
            let start = i;
            while i < chars.len() - 1 && !WHITESPACE.contains(&chars[i].1) && !self.is_break(chars[i].1) {
                i += 1;
            }
            let word: String = chars[start..i].iter().map(|(_, c)| *c).collect();
            tokens.push(Token {
                text: word,
                length: (i - start) as u8,
                offset: (offset + 1) as u8,
            });
        }
        tokens
    }

    /// Lowercase `raw`, truncate it to what fits in the text buffer, write
    /// it (0-terminated) at `text_buffer`, tokenize the stored text, and
    /// write the resulting parse records into `parse_buffer`, per the V3
    /// READ opcode's buffer layout.
    pub fn handle_input(&self, memory: &mut MemoryImage, text_buffer: u32, parse_buffer: u32, raw: &str) {
        let capacity = memory.read_byte(text_buffer) as usize;
        let max_len = capacity.saturating_sub(1);
        let lowered: String = raw.to_lowercase().chars().take(max_len).collect();

        for (i, b) in lowered.bytes().enumerate() {
            memory.write_byte(text_buffer + 1 + i as u32, b);
        }
        memory.write_byte(text_buffer + 1 + lowered.len() as u32, 0);

        let max_words = memory.read_byte(parse_buffer);
        let tokens = self.tokenize(&lowered);
        let word_count = tokens.len().min(max_words as usize);

        memory.write_byte(parse_buffer + 1, word_count as u8);
        for (k, token) in tokens.iter().take(word_count).enumerate() {
            let dict_addr = self.lookup(&token.text);
            let entry_offset = parse_buffer + 2 + (k as u32) * 4;
            memory.write_word(entry_offset, dict_addr);
            memory.write_byte(entry_offset + 2, token.length);
            memory.write_byte(entry_offset + 3, token.offset);
        }
    }
}
