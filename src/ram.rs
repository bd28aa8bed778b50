use crate::memory::{self, Address, GeometryError, Memory, MemoryError, Result, Word};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ram {
    data: Vec<Word>,
}

impl Ram {
    pub fn new(capacity: usize) -> std::result::Result<Self, GeometryError> {
        memory::power_of_two("ram capacity", capacity)?;
        Ok(Ram {
            data: vec![0; capacity],
        })
    }

    pub fn load(&mut self, base: Address, values: &[Word]) -> Result<()> {
        self.check_addr(base)?;
        for (i, &value) in values.iter().enumerate() {
            let addr = base
                .checked_add(i as Address)
                .ok_or(MemoryError::InvalidAddress(base))?;
            self.write(addr, value)?;
        }
        Ok(())
    }

    pub fn peek(&self, addr: Address) -> Result<Word> {
        let idx = self.check_addr(addr)?;
        Ok(self.data[idx])
    }
}

impl Memory for Ram {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn read(&mut self, addr: Address) -> Result<Word> {
        self.peek(addr)
    }

    fn write(&mut self, addr: Address, value: Word) -> Result<()> {
        let idx = self.check_addr(addr)?;
        self.data[idx] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let mut ram = Ram::new(64).unwrap();
        assert_eq!(ram.capacity(), 64);
        assert!((0..64).all(|a| ram.read(a) == Ok(0)));
    }

    #[test]
    fn rejects_odd_capacity() {
        assert_eq!(
            Ram::new(100),
            Err(GeometryError::NotPowerOfTwo {
                what: "ram capacity",
                value: 100
            })
        );
        assert!(Ram::new(0).is_err());
    }

    #[test]
    fn address_range() {
        let mut ram = Ram::new(32).unwrap();
        assert_eq!(ram.write(31, 5), Ok(()));
        assert_eq!(ram.read(31), Ok(5));
        assert_eq!(ram.read(32), Err(MemoryError::InvalidAddress(32)));
        assert_eq!(ram.write(32, 1), Err(MemoryError::InvalidAddress(32)));
        assert_eq!(ram.read(-1), Err(MemoryError::InvalidAddress(-1)));
        assert_eq!(ram.write(-1, 1), Err(MemoryError::InvalidAddress(-1)));
    }

    #[test]
    fn load_stops_at_first_bad_address() {
        let mut ram = Ram::new(4).unwrap();
        assert_eq!(ram.load(2, &[7, 8, 9]), Err(MemoryError::InvalidAddress(4)));
        assert_eq!(ram.peek(2), Ok(7));
        assert_eq!(ram.peek(3), Ok(8));
    }

    #[test]
    fn load_at_top_of_address_type() {
        let mut ram = Ram::new(4).unwrap();
        assert_eq!(
            ram.load(Address::MAX, &[1, 2]),
            Err(MemoryError::InvalidAddress(Address::MAX))
        );
        assert!(ram.load(0, &[]).is_ok());
    }
}
