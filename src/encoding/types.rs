//! Type tags and values for the packed typed-value encoder

use std::fmt;
use serde::{Deserialize, Serialize};

/// Supported value types
///
/// Every tag knows its own encoding rule, so adding a variant forces a
/// decision in [`TypeTag::rule`] and in [`TypeTag::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    String,
    Address,
    Bool,

    // Unsigned integers
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uint128,
    Uint256,

    // Signed integers
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Int256,
}

/// How values of a tag become bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingRule {
    /// Raw UTF-8, no length prefix
    Utf8,
    /// 20 raw address bytes
    Address,
    /// One byte, 0x01 or 0x00
    Bool,
    /// Fixed-width big-endian integer
    Integer(IntegerRule),
}

/// What happens when a parsed integer does not fit its width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Keep the low `bits` bits (two's complement wrap)
    Truncate,
    /// Fail with a parse error
    Reject,
}

/// How a negative value becomes bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Negative {
    /// Two's complement of the full width
    TwosComplement,
    /// Zero-padded magnitude; the sign is dropped
    Magnitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerRule {
    pub bits: usize,
    pub signed: bool,
    pub overflow: Overflow,
    pub negative: Negative,
}

impl IntegerRule {
    const fn truncating(bits: usize, signed: bool) -> Self {
        Self {
            bits,
            signed,
            overflow: Overflow::Truncate,
            negative: Negative::TwosComplement,
        }
    }

    const fn checked(bits: usize, signed: bool) -> Self {
        Self {
            bits,
            signed,
            overflow: Overflow::Reject,
            negative: Negative::Magnitude,
        }
    }

    /// Encoded width in bytes
    pub const fn width(&self) -> usize {
        self.bits / 8
    }
}

impl TypeTag {
    pub const ALL: [TypeTag; 15] = [
        TypeTag::String,
        TypeTag::Address,
        TypeTag::Bool,
        TypeTag::Uint8,
        TypeTag::Uint16,
        TypeTag::Uint32,
        TypeTag::Uint64,
        TypeTag::Uint128,
        TypeTag::Uint256,
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::Int128,
        TypeTag::Int256,
    ];

    /// Look a tag up by its Solidity name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.name() == name)
    }

    /// Solidity name of the tag
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Address => "address",
            TypeTag::Bool => "bool",
            TypeTag::Uint8 => "uint8",
            TypeTag::Uint16 => "uint16",
            TypeTag::Uint32 => "uint32",
            TypeTag::Uint64 => "uint64",
            TypeTag::Uint128 => "uint128",
            TypeTag::Uint256 => "uint256",
            TypeTag::Int8 => "int8",
            TypeTag::Int16 => "int16",
            TypeTag::Int32 => "int32",
            TypeTag::Int64 => "int64",
            TypeTag::Int128 => "int128",
            TypeTag::Int256 => "int256",
        }
    }

    /// Encoding rule for the tag
    ///
    /// Widths up to 64 bits truncate silently and write negatives as two's
    /// complement, matching signatures already produced by other
    /// implementations. The 128 and 256-bit tags accept any magnitude that
    /// fits their width, reject anything wider, and write the zero-padded
    /// magnitude, so `int128 -1` encodes like `int128 1`.
    pub fn rule(&self) -> EncodingRule {
        match self {
            TypeTag::String => EncodingRule::Utf8,
            TypeTag::Address => EncodingRule::Address,
            TypeTag::Bool => EncodingRule::Bool,
            TypeTag::Uint8 => EncodingRule::Integer(IntegerRule::truncating(8, false)),
            TypeTag::Uint16 => EncodingRule::Integer(IntegerRule::truncating(16, false)),
            TypeTag::Uint32 => EncodingRule::Integer(IntegerRule::truncating(32, false)),
            TypeTag::Uint64 => EncodingRule::Integer(IntegerRule::truncating(64, false)),
            TypeTag::Uint128 => EncodingRule::Integer(IntegerRule::checked(128, false)),
            TypeTag::Uint256 => EncodingRule::Integer(IntegerRule::checked(256, false)),
            TypeTag::Int8 => EncodingRule::Integer(IntegerRule::truncating(8, true)),
            TypeTag::Int16 => EncodingRule::Integer(IntegerRule::truncating(16, true)),
            TypeTag::Int32 => EncodingRule::Integer(IntegerRule::truncating(32, true)),
            TypeTag::Int64 => EncodingRule::Integer(IntegerRule::truncating(64, true)),
            TypeTag::Int128 => EncodingRule::Integer(IntegerRule::checked(128, true)),
            TypeTag::Int256 => EncodingRule::Integer(IntegerRule::checked(256, true)),
        }
    }

    /// Fixed encoded width in bytes, `None` for `string`
    pub fn width(&self) -> Option<usize> {
        match self.rule() {
            EncodingRule::Utf8 => None,
            EncodingRule::Address => Some(20),
            EncodingRule::Bool => Some(1),
            EncodingRule::Integer(rule) => Some(rule.width()),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value together with the type it should be encoded as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedValue {
    pub tag: TypeTag,
    pub text: String,
}

impl TypedValue {
    pub fn new(tag: TypeTag, text: impl Into<String>) -> Self {
        Self { tag, text: text.into() }
    }

    /// Pair up parallel lists of type names and textual values
    pub fn from_parts<T, A>(types: &[T], args: &[A]) -> Result<Vec<TypedValue>, EncodingError>
    where
        T: AsRef<str>,
        A: AsRef<str>,
    {
        if types.len() != args.len() {
            return Err(EncodingError::LengthMismatch {
                types: types.len(),
                values: args.len(),
            });
        }

        types
            .iter()
            .zip(args.iter())
            .enumerate()
            .map(|(index, (name, text))| {
                let name = name.as_ref();
                TypeTag::from_name(name)
                    .map(|tag| TypedValue::new(tag, text.as_ref()))
                    .ok_or_else(|| EncodingError::UnsupportedType {
                        index,
                        name: name.to_string(),
                    })
            })
            .collect()
    }
}

/// Encoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("type and value counts differ: {types} types, {values} values")]
    LengthMismatch { types: usize, values: usize },

    #[error("value at index {index} is not a valid {tag}: {reason}")]
    ParseFailure {
        index: usize,
        tag: TypeTag,
        reason: String,
    },

    #[error("unsupported type '{name}' at index {index}")]
    UnsupportedType { index: usize, name: String },
}
