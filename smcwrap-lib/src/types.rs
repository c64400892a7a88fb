//! SMC data-type tags and the encoding each one selects.
//!
//! See [AsahiLinux Docs](https://asahilinux.org/docs/hw/soc/smc) for common data types.

pub const DATATYPE_FP1F: [u8; 4] = *b"fp1f";
pub const DATATYPE_FP4C: [u8; 4] = *b"fp4c";
pub const DATATYPE_FP5B: [u8; 4] = *b"fp5b";
pub const DATATYPE_FP6A: [u8; 4] = *b"fp6a";
pub const DATATYPE_FP79: [u8; 4] = *b"fp79";
pub const DATATYPE_FP88: [u8; 4] = *b"fp88";
pub const DATATYPE_FPA6: [u8; 4] = *b"fpa6";
pub const DATATYPE_FPC4: [u8; 4] = *b"fpc4";
pub const DATATYPE_FPE2: [u8; 4] = *b"fpe2";

pub const DATATYPE_SP1E: [u8; 4] = *b"sp1e";
pub const DATATYPE_SP3C: [u8; 4] = *b"sp3c";
pub const DATATYPE_SP4B: [u8; 4] = *b"sp4b";
pub const DATATYPE_SP5A: [u8; 4] = *b"sp5a";
pub const DATATYPE_SP69: [u8; 4] = *b"sp69";
pub const DATATYPE_SP78: [u8; 4] = *b"sp78";
pub const DATATYPE_SP87: [u8; 4] = *b"sp87";
pub const DATATYPE_SP96: [u8; 4] = *b"sp96";
pub const DATATYPE_SPB4: [u8; 4] = *b"spb4";
pub const DATATYPE_SPF0: [u8; 4] = *b"spf0";

pub const DATATYPE_UINT8: [u8; 4] = *b"ui8 ";
pub const DATATYPE_UINT16: [u8; 4] = *b"ui16";
pub const DATATYPE_UINT32: [u8; 4] = *b"ui32";
pub const DATATYPE_UINT64: [u8; 4] = *b"ui64";

pub const DATATYPE_SI8: [u8; 4] = *b"si8 ";
pub const DATATYPE_SI16: [u8; 4] = *b"si16";
pub const DATATYPE_SI32: [u8; 4] = *b"si32";
pub const DATATYPE_SI64: [u8; 4] = *b"si64";

pub const DATATYPE_PWM: [u8; 4] = *b"{pwm";
pub const DATATYPE_LSO: [u8; 4] = *b"{lso";
pub const DATATYPE_ALA: [u8; 4] = *b"{ala";

pub const DATATYPE_FLAG: [u8; 4] = *b"flag";
pub const DATATYPE_CHARSTAR: [u8; 4] = *b"ch8*";
pub const DATATYPE_FLT: [u8; 4] = *b"flt ";
pub const DATATYPE_HEX: [u8; 4] = *b"hex_";

/// How the bytes of a value are laid out for a given type tag.
///
/// All integer and fixed-point payloads are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `fpXY`: 16-bit unsigned, `frac_bits` = Y
    UnsignedFixed { frac_bits: u8 },
    /// `spXY`: 16-bit two's complement, `frac_bits` = Y
    SignedFixed { frac_bits: u8 },
    /// `uiNN`, `width` in bytes
    Unsigned { width: u8 },
    /// `siNN`, `width` in bytes
    Signed { width: u8 },
    Flag,
    /// `ch8*`, NUL padded
    Chars,
    /// `{pwm`: 16-bit fraction of 65536, read as a percentage
    Pwm,
    /// `flt `: IEEE single, little-endian
    Float,
    /// `hex_`: unsigned integer of 1, 2, 4 or 8 bytes, shown in hex
    Hex,
    /// structured tags with no known field layout (`{lso`, `{ala`)
    Opaque,
}

impl Encoding {
    /// Looks up the encoding of a type tag. Returns `None` for tags outside
    /// the table.
    pub fn from_tag(tag: &[u8; 4]) -> Option<Self> {
        let encoding = match tag {
            b"ui8 " => Self::Unsigned { width: 1 },
            b"ui16" => Self::Unsigned { width: 2 },
            b"ui32" => Self::Unsigned { width: 4 },
            b"ui64" => Self::Unsigned { width: 8 },
            b"si8 " => Self::Signed { width: 1 },
            b"si16" => Self::Signed { width: 2 },
            b"si32" => Self::Signed { width: 4 },
            b"si64" => Self::Signed { width: 8 },
            b"flag" => Self::Flag,
            b"ch8*" => Self::Chars,
            b"{pwm" => Self::Pwm,
            b"flt " => Self::Float,
            b"hex_" => Self::Hex,
            b"{lso" | b"{ala" => Self::Opaque,
            [b'f', b'p', int, frac] => Self::UnsignedFixed {
                frac_bits: fixed_point_frac_bits(*int, *frac, 16)?,
            },
            [b's', b'p', int, frac] => Self::SignedFixed {
                frac_bits: fixed_point_frac_bits(*int, *frac, 15)?,
            },
            _ => return None,
        };
        Some(encoding)
    }

    /// Whether a payload of `size` bytes is valid for this encoding.
    pub fn accepts_size(self, size: u32) -> bool {
        match self {
            Self::UnsignedFixed { .. } | Self::SignedFixed { .. } | Self::Pwm => size == 2,
            Self::Unsigned { width } | Self::Signed { width } => size == u32::from(width),
            Self::Flag => size == 1,
            Self::Float => size == 4,
            Self::Hex => matches!(size, 1 | 2 | 4 | 8),
            Self::Chars => size <= crate::structs::SMC_BYTES_LEN as u32,
            Self::Opaque => (1..=crate::structs::SMC_BYTES_LEN as u32).contains(&size),
        }
    }

    /// Human description of the sizes [`Encoding::accepts_size`] allows.
    pub fn expected_size(self) -> String {
        match self {
            Self::UnsignedFixed { .. } | Self::SignedFixed { .. } | Self::Pwm => "2".into(),
            Self::Unsigned { width } | Self::Signed { width } => width.to_string(),
            Self::Flag => "1".into(),
            Self::Float => "4".into(),
            Self::Hex => "1, 2, 4 or 8".into(),
            Self::Chars => format!("0 to {}", crate::structs::SMC_BYTES_LEN),
            Self::Opaque => format!("1 to {}", crate::structs::SMC_BYTES_LEN),
        }
    }
}

/// `XY` of `fpXY`/`spXY` are hex digits giving integer and fractional bits;
/// together they must cover the 16-bit payload (15 bits plus sign for `sp`).
fn fixed_point_frac_bits(int: u8, frac: u8, total: u32) -> Option<u8> {
    let int = char::from(int).to_digit(16)?;
    let frac = char::from(frac).to_digit(16)?;
    if int + frac == total {
        u8::try_from(frac).ok()
    } else {
        None
    }
}
