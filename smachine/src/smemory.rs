use crate::{
    bits::SWord,
    constants::memory::{MEMORY_SIZE, WORD_SIZE},
    error::{LoadError, VmError},
};

#[derive(Debug)]
pub(crate) struct SMemory {
    bytes: Vec<u8>,
}

impl Default for SMemory {
    fn default() -> SMemory {
        SMemory { bytes: vec![0; MEMORY_SIZE] }
    }
}

impl SMemory {

    pub(crate) fn read_word(&self, idx: usize) -> Result<u16, VmError> {
        match self.bytes.get(idx..idx + WORD_SIZE) {
            Some(&[lo, hi]) => Ok(SWord::from([lo, hi]).into()),
            _ => Err(VmError::AddressOutOfRange(idx)),
        }
    }

    pub(crate) fn set_word(&mut self, idx: usize, val: u16) -> Result<(), VmError> {
        match self.bytes.get_mut(idx..idx + WORD_SIZE) {
            Some(slot) => {
                let bytes: [u8; 2] = SWord::from(val).into();
                slot.copy_from_slice(&bytes);
                Ok(())
            },
            None => Err(VmError::AddressOutOfRange(idx)),
        }
    }

    pub(crate) fn reset(&mut self, mut data: Vec<u8>) -> Result<(), LoadError> {
        if data.len() > MEMORY_SIZE {
            return Err(LoadError::ImageTooLarge(data.len()));
        }

        log::debug!("resetting memory, image is {} bytes", data.len());
        data.resize(MEMORY_SIZE, 0);
        self.bytes = data;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SMemory;
    use crate::{constants::memory::MEMORY_SIZE, error::{LoadError, VmError}};

    #[test]
    fn image_is_zero_padded() {
        let mut mem = SMemory::default();
        mem.reset(vec![0x15, 0x00, 0x00, 0x80]).unwrap();

        assert_eq!(mem.read_word(0), Ok(21));
        assert_eq!(mem.read_word(2), Ok(0x8000));
        assert_eq!(mem.read_word(MEMORY_SIZE - 2), Ok(0));
    }

    #[test]
    fn oversized_image_is_rejected() {
        let mut mem = SMemory::default();
        match mem.reset(vec![0; MEMORY_SIZE + 2]) {
            Err(LoadError::ImageTooLarge(n)) => assert_eq!(n, MEMORY_SIZE + 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn words_past_the_end_are_errors() {
        let mut mem = SMemory::default();
        assert_eq!(mem.read_word(MEMORY_SIZE - 1), Err(VmError::AddressOutOfRange(MEMORY_SIZE - 1)));
        assert_eq!(mem.set_word(MEMORY_SIZE, 1), Err(VmError::AddressOutOfRange(MEMORY_SIZE)));

        mem.set_word(10, 0x1234).unwrap();
        assert_eq!(mem.read_word(10), Ok(0x1234));
    }
}
