//! Directive records produced by the scanner.

/// Conversion character terminating a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `d`
    SignedDecimal,
    /// `i`
    Integer,
    /// `u`
    Unsigned,
    /// `o`
    Octal,
    /// `x`
    HexLower,
    /// `X`
    HexUpper,
    /// `s`
    String,
    /// `e`
    ExpLower,
    /// `E`
    ExpUpper,
    /// `f`
    Fixed,
}

impl Conversion {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'd' => Self::SignedDecimal,
            b'i' => Self::Integer,
            b'u' => Self::Unsigned,
            b'o' => Self::Octal,
            b'x' => Self::HexLower,
            b'X' => Self::HexUpper,
            b's' => Self::String,
            b'e' => Self::ExpLower,
            b'E' => Self::ExpUpper,
            b'f' => Self::Fixed,
            _ => return None,
        })
    }

    pub const fn as_byte(self) -> u8 {
        match self {
            Self::SignedDecimal => b'd',
            Self::Integer => b'i',
            Self::Unsigned => b'u',
            Self::Octal => b'o',
            Self::HexLower => b'x',
            Self::HexUpper => b'X',
            Self::String => b's',
            Self::ExpLower => b'e',
            Self::ExpUpper => b'E',
            Self::Fixed => b'f',
        }
    }

    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::SignedDecimal
                | Self::Integer
                | Self::Unsigned
                | Self::Octal
                | Self::HexLower
                | Self::HexUpper
        )
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::SignedDecimal | Self::Integer)
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::ExpLower | Self::ExpUpper | Self::Fixed)
    }

    #[inline]
    pub const fn is_uppercase(self) -> bool {
        matches!(self, Self::HexUpper | Self::ExpUpper)
    }

    /// Radix for integer conversions (10 for everything else).
    pub const fn radix(self) -> u32 {
        match self {
            Self::Octal => 8,
            Self::HexLower | Self::HexUpper => 16,
            _ => 10,
        }
    }
}

/// Size tag narrowing or widening the argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// `b` byte (8-bit)
    Byte,
    /// `h` halfword (16-bit)
    Half,
    /// `w` word (32-bit)
    Word,
    /// `l` doubleword (64-bit)
    Long,
    /// `q` quadword (128-bit)
    Quad,
}

impl Modifier {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'b' => Self::Byte,
            b'h' => Self::Half,
            b'w' => Self::Word,
            b'l' => Self::Long,
            b'q' => Self::Quad,
            _ => return None,
        })
    }

    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Byte => b'b',
            Self::Half => b'h',
            Self::Word => b'w',
            Self::Long => b'l',
            Self::Quad => b'q',
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::Half => 16,
            Self::Word => 32,
            Self::Long => 64,
            Self::Quad => 128,
        }
    }
}

/// One recognised `%...X` directive.
///
/// Only finalized records (conversion set) ever leave the scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSpecifier {
    /// Byte offset of the introducing `%`
    pub location: usize,
    /// Conversion character; `None` only while the record is open
    pub conversion: Option<Conversion>,
    /// Last size modifier seen, if any
    pub modifier: Option<Modifier>,
    /// Minimum field width, 0 when unset
    pub width: u32,
    /// Precision digits; meaningful only when `has_precision`
    pub precision: u32,
    /// A `.` was seen (`%.f` has precision 0)
    pub has_precision: bool,
    /// Width was written with a leading `0`
    pub zero_pad: bool,
    /// Template bytes occupied, `%` through the conversion character
    pub span: usize,
}

impl FormatSpecifier {
    /// Fresh record for a `%` at `location`.
    pub const fn open(location: usize) -> Self {
        Self {
            location,
            conversion: None,
            modifier: None,
            width: 0,
            precision: 0,
            has_precision: false,
            zero_pad: false,
            span: 0,
        }
    }

    /// Precision as an option, `None` when no `.` was given.
    #[inline]
    pub const fn precision(&self) -> Option<u32> {
        if self.has_precision {
            Some(self.precision)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_bytes() {
        for &b in b"diuoxXseEf" {
            let conv = Conversion::from_byte(b).unwrap();
            assert_eq!(conv.as_byte(), b);
        }
        assert_eq!(Conversion::from_byte(b'c'), None);
        assert_eq!(Conversion::from_byte(b'%'), None);
        assert_eq!(Conversion::from_byte(b'g'), None);
    }

    #[test]
    fn test_conversion_classes() {
        assert!(Conversion::Integer.is_signed());
        assert!(!Conversion::Unsigned.is_signed());
        assert!(Conversion::HexUpper.is_integer());
        assert!(Conversion::ExpUpper.is_float());
        assert!(!Conversion::String.is_integer());
        assert!(!Conversion::String.is_float());
        assert_eq!(Conversion::Octal.radix(), 8);
        assert_eq!(Conversion::HexLower.radix(), 16);
        assert_eq!(Conversion::Unsigned.radix(), 10);
    }

    #[test]
    fn test_modifier_bits() {
        let expected = [(b'b', 8), (b'h', 16), (b'w', 32), (b'l', 64), (b'q', 128)];
        for (byte, bits) in expected {
            let m = Modifier::from_byte(byte).unwrap();
            assert_eq!(m.bits(), bits);
            assert_eq!(m.as_byte(), byte);
        }
        assert_eq!(Modifier::from_byte(b'd'), None);
    }

    #[test]
    fn test_precision_accessor() {
        let mut spec = FormatSpecifier::open(4);
        assert_eq!(spec.precision(), None);
        spec.has_precision = true;
        assert_eq!(spec.precision(), Some(0));
        assert_eq!(spec.conversion, None);
        assert_eq!(FormatSpecifier::default(), FormatSpecifier::open(0));
    }
}
