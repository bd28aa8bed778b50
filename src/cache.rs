use std::{
    io::{self, Write},
    ops::Not,
};

use log::{debug, trace};
use serde::Serialize;

use crate::memory::{self, Address, GeometryError, Memory, Result, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    pub offset: usize,
    pub index: usize,
    pub tag: usize,
}

#[derive(Debug)]
struct BitSection {
    shift: usize,
    mask: usize,
}

impl BitSection {
    fn apply(&self, num: usize) -> usize {
        (num >> self.shift) & self.mask
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub write_backs: u64,
    pub loads: u64,
    pub miss_rate: f64,
}

#[derive(Debug, Clone)]
pub struct CacheLine {
    /// `None` until the first block is loaded into the line.
    pub tag: Option<usize>,
    pub dirty: bool,
    pub data: Vec<Word>,
}

impl CacheLine {
    fn new(line_size: usize) -> Self {
        CacheLine {
            tag: None,
            dirty: false,
            data: vec![0; line_size],
        }
    }
}

/// The cache addresses the whole of the backing store: `capacity()` is the
/// backing store's capacity, while `size()` is the amount of data the cache
/// itself can hold.
#[derive(Debug)]
pub struct Cache<'m, M: Memory + ?Sized> {
    lines: Vec<CacheLine>,
    backing: &'m mut M,
    line_size: usize,
    n_lines: usize,
    offset_sec: BitSection,
    index_sec: BitSection,
    tag_sec: BitSection,
    report_misses: bool,
    pending_misses: Vec<(Address, usize)>,
    hits: u64,
    misses: u64,
    write_backs: u64,
    loads: u64,
}

impl<'m, M: Memory + ?Sized> Cache<'m, M> {
    pub fn new(
        cache_capacity: usize,
        line_size: usize,
        backing: &'m mut M,
    ) -> std::result::Result<Self, GeometryError> {
        memory::power_of_two("cache capacity", cache_capacity)?;
        memory::power_of_two("line size", line_size)?;
        if line_size > cache_capacity {
            return Err(GeometryError::LineTooLarge {
                what: "cache capacity",
                line_size,
                capacity: cache_capacity,
            });
        }
        if line_size > backing.capacity() {
            return Err(GeometryError::LineTooLarge {
                what: "backing store",
                line_size,
                capacity: backing.capacity(),
            });
        }
        let n_lines = cache_capacity / line_size;

        let offset_sec = BitSection {
            shift: 0,
            mask: line_size - 1,
        };
        let index_shift = line_size.ilog2() as usize;
        let index_sec = BitSection {
            shift: index_shift,
            mask: n_lines - 1,
        };
        let tag_sec = BitSection {
            shift: index_shift + n_lines.ilog2() as usize,
            mask: 0usize.not(),
        };

        Ok(Cache {
            lines: vec![CacheLine::new(line_size); n_lines],
            backing,
            line_size,
            n_lines,
            offset_sec,
            index_sec,
            tag_sec,
            report_misses: false,
            pending_misses: Vec::new(),
            hits: 0,
            misses: 0,
            write_backs: 0,
            loads: 0,
        })
    }

    /// Record a `MISS: <address> -> L<index>` line for `report` on every miss.
    pub fn report_misses(mut self, on: bool) -> Self {
        self.report_misses = on;
        self
    }

    pub fn split_addr(&self, addr: usize) -> Fields {
        Fields {
            offset: self.offset_sec.apply(addr),
            index: self.index_sec.apply(addr),
            tag: self.tag_sec.apply(addr),
        }
    }

    pub fn block_base(&self, tag: usize, index: usize) -> usize {
        (tag * self.n_lines + index) * self.line_size
    }

    pub fn line(&self, index: usize) -> &CacheLine {
        &self.lines[index]
    }

    pub fn line_size(&self) -> usize {
        self.line_size
    }

    pub fn num_lines(&self) -> usize {
        self.n_lines
    }

    pub fn size(&self) -> usize {
        self.n_lines * self.line_size
    }

    pub fn backing(&self) -> &M {
        &*self.backing
    }

    pub fn backing_mut(&mut self) -> &mut M {
        &mut *self.backing
    }

    pub fn flush(&mut self) -> Result<()> {
        for index in 0..self.n_lines {
            self.write_back(index)?;
        }
        Ok(())
    }

    pub fn make_stats(&self) -> CacheStats {
        let total = self.hits + self.misses;
        let miss_rate = if total == 0 {
            0.0
        } else {
            self.misses as f64 / total as f64
        };
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            write_backs: self.write_backs,
            loads: self.loads,
            miss_rate,
        }
    }

    fn access(&mut self, addr: Address) -> Result<Fields> {
        let fields = self.split_addr(self.check_addr(addr)?);
        if self.lines[fields.index].tag == Some(fields.tag) {
            trace!("hit {addr} in L{}", fields.index);
            self.hits += 1;
        } else {
            self.misses += 1;
            if self.report_misses {
                self.pending_misses.push((addr, fields.index));
            }
            self.write_back(fields.index)?;
            self.fill(fields.index, fields.tag)?;
        }
        Ok(fields)
    }

    fn write_back(&mut self, index: usize) -> Result<()> {
        let line = &self.lines[index];
        let tag = match line.tag {
            Some(tag) if line.dirty => tag,
            _ => return Ok(()),
        };
        let base = self.block_base(tag, index);
        debug!("write back L{index} to {base}");
        for (offset, &value) in self.lines[index].data.iter().enumerate() {
            self.backing.write((base + offset) as Address, value)?;
        }
        self.lines[index].dirty = false;
        self.write_backs += 1;
        Ok(())
    }

    fn fill(&mut self, index: usize, tag: usize) -> Result<()> {
        let base = self.block_base(tag, index);
        debug!("load {base} into L{index}");
        let line = &mut self.lines[index];
        for (offset, slot) in line.data.iter_mut().enumerate() {
            *slot = self.backing.read((base + offset) as Address)?;
        }
        line.tag = Some(tag);
        line.dirty = false;
        self.loads += 1;
        Ok(())
    }
}

impl<'m, M: Memory + ?Sized> Memory for Cache<'m, M> {
    fn capacity(&self) -> usize {
        self.backing.capacity()
    }

    fn report(&mut self, out: &mut dyn io::Write) -> io::Result<()> {
        for (addr, index) in self.pending_misses.drain(..) {
            writeln!(out, "MISS: {} -> L{}", addr, index)?;
        }
        self.backing.report(out)
    }

    fn read(&mut self, addr: Address) -> Result<Word> {
        let fields = self.access(addr)?;
        Ok(self.lines[fields.index].data[fields.offset])
    }

    fn write(&mut self, addr: Address, value: Word) -> Result<()> {
        let fields = self.access(addr)?;
        let line = &mut self.lines[fields.index];
        line.data[fields.offset] = value;
        line.dirty = true;
        Ok(())
    }
}
