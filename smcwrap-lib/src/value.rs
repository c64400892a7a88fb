use std::borrow::Cow;

use crate::{
    error::{Result, SmcError},
    structs::{SMC_BYTES_LEN, SMCBytes, SMCVal},
    types::Encoding,
};

impl std::fmt::Display for SMCVal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.data_size == 0 {
            return write!(f, "{} no data", self.key_str());
        }
        write!(
            f,
            "{} {} size: {}(bytes",
            self.key_str(),
            self.data_type_str(),
            self.data_size
        )?;
        for c in self.valid_bytes() {
            write!(f, " {:02x}", c)?;
        }
        write!(f, ")")?;
        if let Ok(val) = self.decode() {
            write!(f, " value: {}", val)?;
        }
        Ok(())
    }
}

/// Converts a key name such as `"TC0P"` to its wire form.
pub fn parse_key(key: &str) -> Result<[u8; 4]> {
    match <[u8; 4]>::try_from(key.as_bytes()) {
        Ok(code) if code.is_ascii() => Ok(code),
        _ => Err(SmcError::InvalidKey(key.to_owned())),
    }
}

/// Parses hex bytes such as `"031000"` or `"03 10 00"`, the form opaque
/// values are shown in. Whitespace between digits is ignored.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let invalid = || SmcError::InvalidHex(text.to_owned());
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.is_empty() || digits.len() % 2 != 0 || digits.len() / 2 > SMC_BYTES_LEN {
        return Err(invalid());
    }
    digits
        .chunks(2)
        .map(|pair| {
            match (
                char::from(pair[0]).to_digit(16),
                char::from(pair[1]).to_digit(16),
            ) {
                (Some(hi), Some(lo)) => Ok(((hi << 4) | lo) as u8),
                _ => Err(invalid()),
            }
        })
        .collect()
}

pub(crate) fn code_str(code: &[u8; 4]) -> String {
    String::from_utf8_lossy(code).into_owned()
}

impl SMCVal {
    /// Returns the valid portion of the byte data.
    ///
    /// SMC values have a declared size that may be less than the full 32-byte buffer.
    /// This method returns only the bytes that contain actual data.
    pub fn valid_bytes(&self) -> &[u8] {
        let size = std::cmp::min(self.data_size as usize, self.bytes.len());
        &self.bytes[..size]
    }

    /// Returns the key name as a string.
    pub fn key_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    /// Returns the data type code as a string.
    ///
    /// For type name that is shorter than 4 bytes, the string will include a tail space.
    /// This is designed intentionally, to keep the name length same.
    pub fn data_type_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data_type)
    }

    /// Parses the raw bytes into a typed value according to the data type.
    ///
    /// # Example
    ///
    /// ```
    /// use smcwrap_lib::{structs::SMCVal, value::SmcValue};
    ///
    /// let mut val = SMCVal {
    ///     key: *b"F0Ac",
    ///     data_size: 2,
    ///     data_type: *b"fpe2",
    ///     ..Default::default()
    /// };
    /// val.bytes[..2].copy_from_slice(&[0x1f, 0x40]);
    ///
    /// assert_eq!(val.decode().unwrap(), SmcValue::Float(2000.0));
    /// ```
    pub fn decode(&self) -> Result<SmcValue> {
        decode(&self.data_type, &self.bytes, self.data_size)
    }
}

/// Represents a decoded SMC value.
///
/// # Example
///
/// ```
/// use smcwrap_lib::value::{SmcNumber, SmcValue};
///
/// let val = SmcValue::Percent(50.0);
/// assert_eq!(val.to_string(), "50.0%");
/// assert_eq!(val.to_number(), Some(SmcNumber::Float(50.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SmcValue {
    /// fixed point (`fpXY`, `spXY`) or IEEE (`flt `) value
    Float(f64),
    Unsigned(u64),
    Signed(i64),
    Flag(bool),
    /// `{pwm` duty cycle in percent
    Percent(f64),
    /// `hex_` value
    Hex(u64),
    /// `ch8*` text, cut at the first NUL
    Text(String),
    /// payload of a structured type with no known layout
    Bytes(Vec<u8>),
}

impl std::fmt::Display for SmcValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmcValue::Float(v) => write!(f, "{:.2}", v),
            SmcValue::Unsigned(v) => write!(f, "{}", v),
            SmcValue::Signed(v) => write!(f, "{}", v),
            SmcValue::Flag(v) => write!(f, "{}", v),
            SmcValue::Percent(v) => write!(f, "{:.1}%", v),
            SmcValue::Hex(v) => write!(f, "{:#x}", v),
            SmcValue::Text(s) => write!(f, "{}", s),
            SmcValue::Bytes(bytes) => {
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl SmcValue {
    /// The numeric view of the value, `None` for text and opaque bytes.
    pub fn to_number(&self) -> Option<SmcNumber> {
        match *self {
            SmcValue::Float(v) | SmcValue::Percent(v) => Some(SmcNumber::Float(v)),
            SmcValue::Unsigned(v) | SmcValue::Hex(v) => Some(SmcNumber::Unsigned(v)),
            SmcValue::Signed(v) => Some(SmcNumber::Signed(v)),
            SmcValue::Flag(v) => Some(SmcNumber::Bool(v)),
            SmcValue::Text(_) | SmcValue::Bytes(_) => None,
        }
    }
}

/// A number read from the SMC, keeping the signedness of the source type.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum SmcNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl SmcNumber {
    pub fn as_f64(&self) -> f64 {
        match *self {
            SmcNumber::Unsigned(v) => v as f64,
            SmcNumber::Signed(v) => v as f64,
            SmcNumber::Float(v) => v,
            SmcNumber::Bool(v) => f64::from(u8::from(v)),
        }
    }
}

impl std::fmt::Display for SmcNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmcNumber::Unsigned(v) => write!(f, "{}", v),
            SmcNumber::Signed(v) => write!(f, "{}", v),
            SmcNumber::Float(v) => write!(f, "{}", v),
            SmcNumber::Bool(v) => write!(f, "{}", u8::from(*v)),
        }
    }
}

fn encoding_for(data_type: &[u8; 4], size: u32) -> Result<Encoding> {
    let encoding =
        Encoding::from_tag(data_type).ok_or_else(|| SmcError::UnknownType(code_str(data_type)))?;
    if !encoding.accepts_size(size) {
        return Err(SmcError::SizeMismatch {
            data_type: code_str(data_type),
            expected: encoding.expected_size(),
            actual: size,
        });
    }
    Ok(encoding)
}

fn be_unsigned(data: &[u8]) -> u64 {
    data.iter().fold(0, |acc, &b| (acc << 8) | u64::from(b))
}

fn be_signed(data: &[u8]) -> i64 {
    let shift = 64 - 8 * data.len() as u32;
    ((be_unsigned(data) << shift) as i64) >> shift
}

/// Decodes the first `size` bytes of `bytes` as a value of type `data_type`.
///
/// Fails with [`SmcError::UnknownType`] for tags outside the table and with
/// [`SmcError::SizeMismatch`] when `size` does not fit the tag.
pub fn decode(data_type: &[u8; 4], bytes: &SMCBytes, size: u32) -> Result<SmcValue> {
    let encoding = encoding_for(data_type, size)?;
    let data = &bytes[..size as usize];
    let val = match encoding {
        Encoding::UnsignedFixed { frac_bits } => {
            SmcValue::Float(be_unsigned(data) as f64 / f64::from(1_u32 << frac_bits))
        }
        Encoding::SignedFixed { frac_bits } => {
            SmcValue::Float(be_signed(data) as f64 / f64::from(1_u32 << frac_bits))
        }
        Encoding::Unsigned { .. } => SmcValue::Unsigned(be_unsigned(data)),
        Encoding::Signed { .. } => SmcValue::Signed(be_signed(data)),
        Encoding::Flag => SmcValue::Flag(data[0] != 0),
        Encoding::Chars => {
            // Treat as ASCII; trim at first NUL if present.
            let end = data.iter().position(|&c| c == 0).unwrap_or(data.len());
            SmcValue::Text(String::from_utf8_lossy(&data[..end]).into_owned())
        }
        Encoding::Pwm => SmcValue::Percent(be_unsigned(data) as f64 * 100.0 / 65536.0),
        Encoding::Float => {
            let mut b = [0u8; 4];
            b.copy_from_slice(data);
            SmcValue::Float(f64::from(f32::from_le_bytes(b)))
        }
        Encoding::Hex => SmcValue::Hex(be_unsigned(data)),
        Encoding::Opaque => SmcValue::Bytes(data.to_vec()),
    };
    Ok(val)
}

/// Encodes a number as a `size`-byte value of type `data_type`, the inverse
/// of [`decode`] for numeric types.
///
/// Fixed-point values are rounded to the nearest representable step.
/// Integers must be whole and within the width of the type.
pub fn encode(data_type: &[u8; 4], size: u32, value: f64) -> Result<SMCBytes> {
    let encoding = encoding_for(data_type, size)?;
    let out_of_range = || SmcError::OutOfRange {
        data_type: code_str(data_type),
        value: value.to_string(),
    };
    if !value.is_finite() {
        return Err(out_of_range());
    }

    let mut bytes = SMCBytes::default();
    let width = size as usize;
    match encoding {
        Encoding::UnsignedFixed { frac_bits } => {
            let raw = (value * f64::from(1_u32 << frac_bits)).round();
            if !(0.0..=f64::from(u16::MAX)).contains(&raw) {
                return Err(out_of_range());
            }
            bytes[..2].copy_from_slice(&(raw as u16).to_be_bytes());
        }
        Encoding::SignedFixed { frac_bits } => {
            let raw = (value * f64::from(1_u32 << frac_bits)).round();
            if !(f64::from(i16::MIN)..=f64::from(i16::MAX)).contains(&raw) {
                return Err(out_of_range());
            }
            bytes[..2].copy_from_slice(&(raw as i16).to_be_bytes());
        }
        Encoding::Unsigned { .. } | Encoding::Hex => {
            let limit = 2f64.powi(8 * width as i32);
            if value.fract() != 0.0 || value < 0.0 || value >= limit {
                return Err(out_of_range());
            }
            bytes[..width].copy_from_slice(&(value as u64).to_be_bytes()[8 - width..]);
        }
        Encoding::Signed { .. } => {
            let limit = 2f64.powi(8 * width as i32 - 1);
            if value.fract() != 0.0 || value < -limit || value >= limit {
                return Err(out_of_range());
            }
            bytes[..width].copy_from_slice(&(value as i64).to_be_bytes()[8 - width..]);
        }
        Encoding::Flag => bytes[0] = u8::from(value != 0.0),
        Encoding::Pwm => {
            let raw = (value * 65536.0 / 100.0).round();
            if !(0.0..=f64::from(u16::MAX)).contains(&raw) {
                return Err(out_of_range());
            }
            bytes[..2].copy_from_slice(&(raw as u16).to_be_bytes());
        }
        Encoding::Float => {
            let v = value as f32;
            if !v.is_finite() {
                return Err(out_of_range());
            }
            bytes[..4].copy_from_slice(&v.to_le_bytes());
        }
        Encoding::Chars | Encoding::Opaque => {
            return Err(SmcError::NotNumeric(code_str(data_type)));
        }
    }
    Ok(bytes)
}

/// Encodes user input for a key of type `data_type`: `ch8*` takes the text
/// as is (NUL padded), opaque types take `size` hex bytes as printed by
/// [`SmcValue::Bytes`], every numeric type parses it as a number first.
pub fn encode_str(data_type: &[u8; 4], size: u32, text: &str) -> Result<SMCBytes> {
    let encoding = encoding_for(data_type, size)?;
    match encoding {
        Encoding::Chars => {
            if text.len() > size as usize || text.len() > SMC_BYTES_LEN {
                return Err(SmcError::OutOfRange {
                    data_type: code_str(data_type),
                    value: text.to_owned(),
                });
            }
            let mut bytes = SMCBytes::default();
            bytes[..text.len()].copy_from_slice(text.as_bytes());
            Ok(bytes)
        }
        Encoding::Opaque => {
            let data = parse_hex(text)?;
            if data.len() != size as usize {
                return Err(SmcError::OutOfRange {
                    data_type: code_str(data_type),
                    value: text.to_owned(),
                });
            }
            let mut bytes = SMCBytes::default();
            bytes[..data.len()].copy_from_slice(&data);
            Ok(bytes)
        }
        _ => {
            let value = text.trim().parse::<f64>().map_err(|_| SmcError::OutOfRange {
                data_type: code_str(data_type),
                value: text.to_owned(),
            })?;
            encode(data_type, size, value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn bytes_of(data: &[u8]) -> SMCBytes {
        let mut bytes = SMCBytes::default();
        bytes[..data.len()].copy_from_slice(data);
        bytes
    }

    fn round_trip(tag: [u8; 4], size: u32, value: f64) -> SmcValue {
        let bytes = encode(&tag, size, value).unwrap();
        decode(&tag, &bytes, size).unwrap()
    }

    #[test]
    fn fp1f_one() {
        let bytes = encode(&DATATYPE_FP1F, 2, 1.0).unwrap();
        assert_eq!(&bytes[..2], &[0x80, 0x00]);
        assert_eq!(decode(&DATATYPE_FP1F, &bytes, 2).unwrap(), SmcValue::Float(1.0));
    }

    #[test]
    fn known_readings() {
        // fan speed 2000 rpm
        assert_eq!(
            decode(&DATATYPE_FPE2, &bytes_of(&[0x1f, 0x40]), 2).unwrap(),
            SmcValue::Float(2000.0)
        );
        // CPU proximity 45.5 C
        assert_eq!(
            decode(&DATATYPE_SP78, &bytes_of(&[0x2d, 0x80]), 2).unwrap(),
            SmcValue::Float(45.5)
        );
        assert_eq!(
            decode(&DATATYPE_SP78, &bytes_of(&[0xff, 0x00]), 2).unwrap(),
            SmcValue::Float(-1.0)
        );
        assert_eq!(
            decode(&DATATYPE_UINT32, &bytes_of(&[0x00, 0x00, 0x04, 0xd2]), 4).unwrap(),
            SmcValue::Unsigned(1234)
        );
        assert_eq!(
            decode(&DATATYPE_SI8, &bytes_of(&[0xfe]), 1).unwrap(),
            SmcValue::Signed(-2)
        );
        assert_eq!(
            decode(&DATATYPE_SI16, &bytes_of(&[0x80, 0x00]), 2).unwrap(),
            SmcValue::Signed(-32768)
        );
        assert_eq!(
            decode(&DATATYPE_PWM, &bytes_of(&[0x80, 0x00]), 2).unwrap(),
            SmcValue::Percent(50.0)
        );
        assert_eq!(
            decode(&DATATYPE_FLAG, &bytes_of(&[0x01]), 1).unwrap(),
            SmcValue::Flag(true)
        );
        assert_eq!(
            decode(&DATATYPE_CHARSTAR, &bytes_of(b"j314\0\0"), 6).unwrap(),
            SmcValue::Text("j314".into())
        );
        assert_eq!(
            decode(&DATATYPE_HEX, &bytes_of(&[0x12, 0x34]), 2).unwrap(),
            SmcValue::Hex(0x1234)
        );
        assert_eq!(
            decode(&DATATYPE_LSO, &bytes_of(&[0x01, 0xab, 0x00]), 3).unwrap(),
            SmcValue::Bytes(vec![0x01, 0xab, 0x00])
        );
        assert_eq!(
            decode(&DATATYPE_FLT, &bytes_of(&1.5f32.to_le_bytes()), 4).unwrap(),
            SmcValue::Float(1.5)
        );
    }

    #[test]
    fn round_trips_for_every_numeric_tag() {
        let fixed = [
            (DATATYPE_FP1F, 1.5),
            (DATATYPE_FP4C, 3.25),
            (DATATYPE_FP5B, 17.5),
            (DATATYPE_FP6A, 40.125),
            (DATATYPE_FP79, 100.5),
            (DATATYPE_FP88, 200.75),
            (DATATYPE_FPA6, 800.5),
            (DATATYPE_FPC4, 3000.0625),
            (DATATYPE_FPE2, 6200.25),
            (DATATYPE_SP1E, -1.5),
            (DATATYPE_SP3C, 3.75),
            (DATATYPE_SP4B, -12.5),
            (DATATYPE_SP5A, 15.25),
            (DATATYPE_SP69, -30.5),
            (DATATYPE_SP78, 45.5),
            (DATATYPE_SP87, -100.25),
            (DATATYPE_SP96, 250.5),
            (DATATYPE_SPB4, -1000.0625),
            (DATATYPE_SPF0, -16000.0),
        ];
        for (tag, value) in fixed {
            assert_eq!(
                round_trip(tag, 2, value),
                SmcValue::Float(value),
                "{}",
                code_str(&tag)
            );
        }

        assert_eq!(round_trip(DATATYPE_UINT8, 1, 255.0), SmcValue::Unsigned(255));
        assert_eq!(round_trip(DATATYPE_UINT16, 2, 4660.0), SmcValue::Unsigned(4660));
        assert_eq!(round_trip(DATATYPE_UINT32, 4, 70000.0), SmcValue::Unsigned(70000));
        assert_eq!(round_trip(DATATYPE_UINT64, 8, 1e12), SmcValue::Unsigned(1_000_000_000_000));
        assert_eq!(round_trip(DATATYPE_SI8, 1, -128.0), SmcValue::Signed(-128));
        assert_eq!(round_trip(DATATYPE_SI16, 2, -300.0), SmcValue::Signed(-300));
        assert_eq!(round_trip(DATATYPE_SI32, 4, -70000.0), SmcValue::Signed(-70000));
        assert_eq!(round_trip(DATATYPE_SI64, 8, -5.0), SmcValue::Signed(-5));
        assert_eq!(round_trip(DATATYPE_FLAG, 1, 1.0), SmcValue::Flag(true));
        assert_eq!(round_trip(DATATYPE_FLAG, 1, 0.0), SmcValue::Flag(false));
        assert_eq!(round_trip(DATATYPE_PWM, 2, 25.0), SmcValue::Percent(25.0));
        assert_eq!(round_trip(DATATYPE_FLT, 4, 0.25), SmcValue::Float(0.25));
        assert_eq!(round_trip(DATATYPE_HEX, 4, 65535.0), SmcValue::Hex(0xffff));
    }

    #[test]
    fn text_round_trip() {
        let bytes = encode_str(&DATATYPE_CHARSTAR, 8, "Mac-1").unwrap();
        assert_eq!(
            decode(&DATATYPE_CHARSTAR, &bytes, 8).unwrap(),
            SmcValue::Text("Mac-1".into())
        );
        assert!(matches!(
            encode_str(&DATATYPE_CHARSTAR, 4, "toolong"),
            Err(SmcError::OutOfRange { .. })
        ));

        let empty = encode_str(&DATATYPE_CHARSTAR, 0, "").unwrap();
        assert_eq!(
            decode(&DATATYPE_CHARSTAR, &empty, 0).unwrap(),
            SmcValue::Text(String::new())
        );
    }

    #[test]
    fn opaque_round_trip() {
        for tag in [DATATYPE_LSO, DATATYPE_ALA] {
            let shown = decode(&tag, &bytes_of(&[0x01, 0x02, 0xab]), 3)
                .unwrap()
                .to_string();
            assert_eq!(shown, "01 02 ab");

            let bytes = encode_str(&tag, 3, &shown).unwrap();
            assert_eq!(&bytes[..3], &[0x01, 0x02, 0xab]);
            assert_eq!(
                decode(&tag, &bytes, 3).unwrap(),
                SmcValue::Bytes(vec![0x01, 0x02, 0xab])
            );
        }
        assert!(matches!(
            encode_str(&DATATYPE_LSO, 2, "01 02 03"),
            Err(SmcError::OutOfRange { .. })
        ));
        assert_eq!(
            encode_str(&DATATYPE_LSO, 2, "01 0g"),
            Err(SmcError::InvalidHex("01 0g".into()))
        );
        assert!(matches!(
            encode(&DATATYPE_ALA, 2, 1.0),
            Err(SmcError::NotNumeric(_))
        ));
    }

    #[test]
    fn hex_input() {
        assert_eq!(parse_hex("031000").unwrap(), vec![0x03, 0x10, 0x00]);
        assert_eq!(parse_hex("03 10 00").unwrap(), vec![0x03, 0x10, 0x00]);
        assert_eq!(parse_hex("AB").unwrap(), vec![0xab]);
        assert_eq!(parse_hex("zz"), Err(SmcError::InvalidHex("zz".into())));
        assert!(parse_hex("+1").is_err());
        assert!(parse_hex("1c2").is_err());
        assert!(parse_hex("").is_err());
        assert!(parse_hex("é0").is_err());
        assert!(parse_hex(&"00".repeat(33)).is_err());
    }

    #[test]
    fn encode_str_parses_numbers() {
        let bytes = encode_str(&DATATYPE_FPE2, 2, " 1200.5 ").unwrap();
        assert_eq!(&bytes[..2], &[0x12, 0xc2]);
        assert!(matches!(
            encode_str(&DATATYPE_FPE2, 2, "fast"),
            Err(SmcError::OutOfRange { .. })
        ));
    }

    #[test]
    fn unknown_type_is_decode_failure() {
        let err = decode(b"{fds", &bytes_of(&[1, 2, 3]), 3).unwrap_err();
        assert_eq!(err, SmcError::UnknownType("{fds".into()));
        assert_eq!(err.status(), crate::error::SmcStatus::DecodeFailed);
    }

    #[test]
    fn size_mismatch_is_decode_failure() {
        let err = decode(&DATATYPE_SP78, &bytes_of(&[0x2d]), 1).unwrap_err();
        assert_eq!(
            err,
            SmcError::SizeMismatch {
                data_type: "sp78".into(),
                expected: "2".into(),
                actual: 1,
            }
        );
        assert!(decode(&DATATYPE_CHARSTAR, &SMCBytes::default(), 64).is_err());
    }

    #[test]
    fn encode_rejects_out_of_range() {
        assert!(matches!(
            encode(&DATATYPE_UINT8, 1, 256.0),
            Err(SmcError::OutOfRange { .. })
        ));
        assert!(matches!(
            encode(&DATATYPE_UINT16, 2, 1.5),
            Err(SmcError::OutOfRange { .. })
        ));
        assert!(matches!(
            encode(&DATATYPE_FPE2, 2, -1.0),
            Err(SmcError::OutOfRange { .. })
        ));
        assert!(matches!(
            encode(&DATATYPE_SI8, 1, 128.0),
            Err(SmcError::OutOfRange { .. })
        ));
        assert!(matches!(
            encode(&DATATYPE_SP78, 2, f64::NAN),
            Err(SmcError::OutOfRange { .. })
        ));
        assert!(matches!(
            encode(&DATATYPE_CHARSTAR, 4, 1.0),
            Err(SmcError::NotNumeric(_))
        ));
    }

    #[test]
    fn display() {
        assert_eq!(SmcValue::Float(45.5).to_string(), "45.50");
        assert_eq!(SmcValue::Hex(0xff).to_string(), "0xff");
        assert_eq!(SmcValue::Bytes(vec![1, 0xab]).to_string(), "01 ab");

        let mut val = SMCVal {
            key: *b"TC0P",
            data_size: 2,
            data_type: DATATYPE_SP78,
            ..Default::default()
        };
        val.bytes[..2].copy_from_slice(&[0x2d, 0x80]);
        assert_eq!(val.to_string(), "TC0P sp78 size: 2(bytes 2d 80) value: 45.50");

        val.data_type = *b"{fds";
        assert_eq!(val.to_string(), "TC0P {fds size: 2(bytes 2d 80)");
    }

    #[test]
    fn numbers() {
        assert_eq!(SmcValue::Text("x".into()).to_number(), None);
        assert_eq!(SmcValue::Flag(true).to_number(), Some(SmcNumber::Bool(true)));
        assert_eq!(SmcNumber::Signed(-3).as_f64(), -3.0);
        assert_eq!(SmcNumber::Bool(true).to_string(), "1");
    }

    #[test]
    fn keys() {
        assert_eq!(parse_key("TC0P").unwrap(), *b"TC0P");
        assert_eq!(parse_key("#KEY").unwrap(), *b"#KEY");
        assert_eq!(parse_key("TC0"), Err(SmcError::InvalidKey("TC0".into())));
        assert!(parse_key("TCé").is_err());
    }
}
