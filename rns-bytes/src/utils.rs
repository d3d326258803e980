//! Parsing helpers.
pub use reader::{Reader, ReaderError};

mod reader {
    use std::convert::TryFrom;

    type Result<T> = std::result::Result<T, ReaderError>;

    /// Cursor over a borrowed byte slice.
    ///
    /// Every read is bounds-checked and advances the cursor, so callers never do offset arithmetic by hand.
    pub struct Reader<'a> {
        data: &'a [u8],
        pos: usize,
    }

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct ReaderError;

    impl<'a> Reader<'a> {
        pub fn new(data: &'a [u8]) -> Self {
            Reader { data, pos: 0 }
        }

        pub fn read_u8(&mut self) -> Result<u8> {
            let bytes = self.read_bytes(1)?;
            Ok(bytes[0])
        }

        pub fn read_u16_be(&mut self) -> Result<u16> {
            let bytes = self.read_array::<2>()?;
            Ok(u16::from_be_bytes(bytes))
        }

        pub fn read_u32_be(&mut self) -> Result<u32> {
            let bytes = self.read_array::<4>()?;
            Ok(u32::from_be_bytes(bytes))
        }

        pub fn read_f64_be(&mut self) -> Result<f64> {
            let bytes = self.read_array::<8>()?;
            Ok(f64::from_be_bytes(bytes))
        }

        pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
            let bytes = self.read_bytes(N)?;
            let bytes_array = <[u8; N]>::try_from(bytes).expect("invalid slice size");
            Ok(bytes_array)
        }

        /// Looks at the next byte without consuming it.
        pub fn peek_u8(&self) -> Option<u8> {
            self.remainder().first().copied()
        }

        pub fn pick_remainder(&self) -> &'a [u8] {
            self.remainder()
        }

        pub fn read_remainder(&mut self) -> &'a [u8] {
            self.read_bytes(self.len()).expect("attempting to read data more than slice have")
        }

        pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
            if self.len() < count {
                return Err(ReaderError);
            }
            let (ret_bytes, _) = self.remainder().split_at(count);
            self.pos += count;
            Ok(ret_bytes)
        }

        /// Number of bytes consumed so far.
        pub fn position(&self) -> usize {
            self.pos
        }

        /// Number of bytes left to read.
        pub fn len(&self) -> usize {
            self.data.len() - self.pos
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn remainder(&self) -> &'a [u8] {
            &self.data[self.pos..]
        }
    }

}
