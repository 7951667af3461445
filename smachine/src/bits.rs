use typenum::{Unsigned};

use std::marker::PhantomData;

/// A machine word as it sits in memory: two bytes, low byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SWord(u16);

impl From<SWord> for [u8; 2] {
    fn from(v: SWord) -> [u8; 2] {
        v.0.to_le_bytes()
    }
}

impl From<[u8; 2]> for SWord {
    fn from(v: [u8; 2]) -> SWord {
        SWord(u16::from_le_bytes(v))
    }
}

impl From<u16> for SWord {
    fn from(v: u16) -> SWord {
        SWord(v)
    }
}

impl From<SWord> for u16 {
    fn from(v: SWord) -> u16 {
        v.0
    }
}

pub trait To<N> {
    fn to() -> N;
}

macro_rules! impl_to {
    ($n:ty, $c:ident) => {
        impl<T: Unsigned> To<$n> for T {
            fn to() -> $n {
                T::$c
            }
        }
    }
}

impl_to!(u16, U16);
impl_to!(u32, U32);

macro_rules! bitstruct {
    ($($name:ident: $numtype:ty {
        $($field:ident: $type:ident, Width = $W:ident, Offset = $O:ident),+
    }),+) => {
        use typenum::*;
        use crate::bits::BitField;
        $(
            $(
                type $type = BitField<$numtype, $W, $O, op!(((U1 << $W) - U1) << $O)>;
            )+

            #[derive(Debug)]
            pub struct $name {
                $(pub $field: $type),+
            }

            impl $name {
                pub fn new(val: $numtype) -> $name {
                    $name {
                        $($field: $type::new(val)),+
                    }
                }
            }
        )+
    };
}

#[derive(Debug)]
pub struct BitField<N, W: Unsigned, O: Unsigned, M: Unsigned> {
    val: N,
    _width: PhantomData<W>,
    _offset: PhantomData<O>,
    _mask: PhantomData<M>,
}

impl<N, W: Unsigned, O: Unsigned, M: Unsigned> BitField<N, W, O, M>
where
    N: std::ops::BitAnd<Output = N> + std::ops::Shr<Output = N> + PartialOrd + PartialEq + Eq + Copy,
    W: To<N>,
    O: To<N>,
    M: To<N> {
    pub fn new(val: N) -> BitField<N, W, O, M> {
        BitField {
            val,
            _width: PhantomData,
            _offset: PhantomData,
            _mask: PhantomData,
        }
    }

    pub fn is_set(&self) -> bool {
        self.val & M::to() == M::to()
    }

    pub fn value_of(&self) -> N {
        (self.val & M::to()) >> O::to()
    }
}

#[cfg(test)]
mod tests {
    use super::SWord;

    #[test]
    fn words_are_little_endian() {
        let word = SWord::from([0x34, 0x12]);
        assert_eq!(u16::from(word), 0x1234);

        let bytes: [u8; 2] = SWord::from(0x8002).into();
        assert_eq!(bytes, [0x02, 0x80]);
    }
}
