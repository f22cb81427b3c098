//! Runtime values: fixed-width words and flat memories.

use std::collections::BTreeMap;
use std::fmt;

/// A bit-vector value masked to a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word {
    value: u64,
    width: u32,
}

impl Word {
    /// Mask covering the low `width` bits.
    pub fn mask(width: u32) -> u64 {
        if width >= 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        }
    }

    /// Construct a word, truncating `value` to `width` bits.
    pub fn new(value: u64, width: u32) -> Word {
        Word {
            value: value & Word::mask(width),
            width,
        }
    }

    pub fn value(self) -> u64 {
        self.value
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn wrapping_add(self, rhs: Word) -> Word {
        Word::new(self.value.wrapping_add(rhs.value), self.width)
    }

    pub fn wrapping_sub(self, rhs: Word) -> Word {
        Word::new(self.value.wrapping_sub(rhs.value), self.width)
    }

    pub fn and(self, rhs: Word) -> Word {
        Word::new(self.value & rhs.value, self.width)
    }

    pub fn or(self, rhs: Word) -> Word {
        Word::new(self.value | rhs.value, self.width)
    }

    pub fn xor(self, rhs: Word) -> Word {
        Word::new(self.value ^ rhs.value, self.width)
    }

    pub fn not(self) -> Word {
        Word::new(!self.value, self.width)
    }

    pub fn neg(self) -> Word {
        Word::new(self.value.wrapping_neg(), self.width)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.width.div_ceil(4) as usize;
        write!(f, "#x{:0digits$x}", self.value)
    }
}

/// A flat memory: a default word plus a sparse map of written locations.
///
/// Normalization invariant: no entry ever equals the default value, so
/// derived equality is extensional equality over the full address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemArray {
    addr_width: u32,
    elem_width: u32,
    default: u64,
    entries: BTreeMap<u64, u64>,
}

impl MemArray {
    /// A memory with every location holding `default`.
    pub fn filled(addr_width: u32, elem_width: u32, default: u64) -> MemArray {
        MemArray {
            addr_width,
            elem_width,
            default: default & Word::mask(elem_width),
            entries: BTreeMap::new(),
        }
    }

    pub fn addr_width(&self) -> u32 {
        self.addr_width
    }

    pub fn elem_width(&self) -> u32 {
        self.elem_width
    }

    /// Read the word at `addr`.
    pub fn read(&self, addr: u64) -> Word {
        let addr = addr & Word::mask(self.addr_width);
        let raw = self.entries.get(&addr).copied().unwrap_or(self.default);
        Word::new(raw, self.elem_width)
    }

    /// Functional update: a new memory with `data` stored at `addr`.
    pub fn write(&self, addr: u64, data: u64) -> MemArray {
        let addr = addr & Word::mask(self.addr_width);
        let data = data & Word::mask(self.elem_width);
        let mut next = self.clone();
        if data == next.default {
            next.entries.remove(&addr);
        } else {
            next.entries.insert(addr, data);
        }
        next
    }
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Word(Word),
    Mem(MemArray),
}

impl Value {
    pub fn word(value: u64, width: u32) -> Value {
        Value::Word(Word::new(value, width))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_word(&self) -> Option<Word> {
        match self {
            Value::Word(w) => Some(*w),
            _ => None,
        }
    }

    pub fn as_mem(&self) -> Option<&MemArray> {
        match self {
            Value::Mem(m) => Some(m),
            _ => None,
        }
    }

    /// The sort this value inhabits.
    pub fn sort(&self) -> crate::Sort {
        match self {
            Value::Bool(_) => crate::Sort::Bool,
            Value::Word(w) => crate::Sort::Bv(w.width()),
            Value::Mem(m) => crate::Sort::Mem {
                addr_width: m.addr_width(),
                elem_width: m.elem_width(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_masks_on_construction() {
        assert_eq!(Word::new(0x1ff, 8).value(), 0xff);
        assert_eq!(Word::new(u64::MAX, 64).value(), u64::MAX);
        assert_eq!(Word::new(0b101, 1).value(), 1);
    }

    #[test]
    fn word_arith_wraps_at_width() {
        let a = Word::new(0xff, 8);
        let one = Word::new(1, 8);
        assert_eq!(a.wrapping_add(one).value(), 0);
        assert_eq!(Word::new(0, 8).wrapping_sub(one).value(), 0xff);
    }

    #[test]
    fn mem_write_of_default_normalizes() {
        let m = MemArray::filled(8, 8, 0x00);
        let written = m.write(3, 5).write(3, 0);
        assert_eq!(written, m);
    }

    #[test]
    fn mem_read_back() {
        let m = MemArray::filled(8, 8, 0xaa).write(0x10, 0x55);
        assert_eq!(m.read(0x10).value(), 0x55);
        assert_eq!(m.read(0x11).value(), 0xaa);
        // Address wraps to the declared width.
        assert_eq!(m.read(0x110).value(), 0x55);
    }
}
