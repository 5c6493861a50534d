//! Parsing and format conversion for ICD-9 and ICD-10 codes.

pub mod convert;
pub mod parse;
pub mod parts;

pub use convert::{
    convert, convert_all, convert_str, decimal_to_short, pad_major, short_to_decimal, to_decimal,
    to_short,
};
pub use parse::{KindResolution, parse, parse_all, parse_set, resolve};
pub use parts::{
    Parts, decimal_to_parts, get_major, parts_to_code, parts_to_decimal, parts_to_short,
    short_to_parts, split_parts,
};
