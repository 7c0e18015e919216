//! Argument helpers for command handlers.
//!
//! The dispatcher hands each handler the raw text after the first field
//! delimiter. Handlers that expect comma-separated values can use [`Args`]
//! to walk the fields, or implement [`FromArgs`] and register through
//! [`TypedHandler`](super::TypedHandler).
//!
//! # Example
//!
//! ```
//! use cmdlink::handler::{Args, FromArgs};
//!
//! let mut args = Args::new("10,20,30");
//! let pitch: i32 = args.parse_next().unwrap();
//! assert_eq!(pitch, 10);
//! assert_eq!(args.remaining(), 2);
//!
//! let (pitch, roll, yaw) = <(i32, i32, i32)>::from_args("10,20,30").unwrap();
//! assert_eq!((pitch, roll, yaw), (10, 20, 30));
//! ```

use std::fmt::Display;
use std::str::{FromStr, Split};

use crate::error::{CmdlinkError, Result};

/// Separator between individual argument fields.
pub const ARG_SEPARATOR: char = ',';

/// Iterator over the fields of an argument string.
///
/// Fields are returned exactly as received, without trimming.
#[derive(Debug, Clone)]
pub struct Args<'a> {
    raw: &'a str,
    fields: Split<'a, char>,
    /// Index of the next field.
    index: usize,
}

impl<'a> Args<'a> {
    /// Split an argument string on [`ARG_SEPARATOR`].
    pub fn new(raw: &'a str) -> Self {
        Self::with_separator(raw, ARG_SEPARATOR)
    }

    /// Split an argument string on a custom separator.
    pub fn with_separator(raw: &'a str, separator: char) -> Self {
        Self {
            raw,
            fields: raw.split(separator),
            index: 0,
        }
    }

    /// Get the unsplit argument string.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Take the next field.
    pub fn next_field(&mut self) -> Option<&'a str> {
        let field = self.fields.next()?;
        self.index += 1;
        Some(field)
    }

    /// Take the next field and parse it.
    ///
    /// # Errors
    ///
    /// Returns an argument error if the field is missing or does not parse.
    pub fn parse_next<T>(&mut self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let index = self.index;
        let field = self
            .next_field()
            .ok_or_else(|| CmdlinkError::Argument(format!("missing field {}", index)))?;

        field
            .parse()
            .map_err(|e| CmdlinkError::Argument(format!("field {} ({:?}): {}", index, field, e)))
    }

    /// Number of fields not yet taken.
    pub fn remaining(&self) -> usize {
        self.fields.clone().count()
    }

    /// Ensure every field has been consumed.
    ///
    /// # Errors
    ///
    /// Returns an argument error naming the first leftover field.
    pub fn finish(mut self) -> Result<()> {
        let index = self.index;
        match self.next_field() {
            Some(extra) => Err(CmdlinkError::Argument(format!(
                "unexpected field {} ({:?})",
                index, extra
            ))),
            None => Ok(()),
        }
    }
}

impl<'a> Iterator for Args<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_field()
    }
}

/// Conversion from a raw argument string into a typed value.
pub trait FromArgs: Sized {
    /// Parse the argument string.
    fn from_args(raw: &str) -> Result<Self>;
}

impl FromArgs for String {
    fn from_args(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

/// An empty argument string yields an empty `Vec`.
impl<T> FromArgs for Vec<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn from_args(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = Args::new(raw);
        (0..args.remaining()).map(|_| args.parse_next()).collect()
    }
}

/// Tuples parse one field per element and reject extra fields.
macro_rules! tuple_from_args {
    ($($ty:ident),+) => {
        impl<$($ty),+> FromArgs for ($($ty,)+)
        where
            $($ty: FromStr, <$ty as FromStr>::Err: Display,)+
        {
            fn from_args(raw: &str) -> Result<Self> {
                let mut args = Args::new(raw);
                let value = ($(args.parse_next::<$ty>()?,)+);
                args.finish()?;
                Ok(value)
            }
        }
    };
}

tuple_from_args!(A);
tuple_from_args!(A, B);
tuple_from_args!(A, B, C);
tuple_from_args!(A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_in_order() {
        let fields: Vec<&str> = Args::new("10,20,30").collect();
        assert_eq!(fields, vec!["10", "20", "30"]);
    }

    #[test]
    fn test_fields_are_not_trimmed() {
        let fields: Vec<&str> = Args::new(" 1 ,,2").collect();
        assert_eq!(fields, vec![" 1 ", "", "2"]);
    }

    #[test]
    fn test_parse_next_errors() {
        let mut args = Args::new("12,abc");

        assert_eq!(args.parse_next::<u8>().unwrap(), 12);

        let err = args.parse_next::<u8>().unwrap_err();
        assert!(err.to_string().contains("field 1"));
        assert!(err.to_string().contains("abc"));

        let err = args.parse_next::<u8>().unwrap_err();
        assert!(err.to_string().contains("missing field 2"));
    }

    #[test]
    fn test_remaining_and_finish() {
        let mut args = Args::new("a,b");
        assert_eq!(args.remaining(), 2);

        args.next_field();
        assert_eq!(args.remaining(), 1);
        assert!(args.clone().finish().is_err());

        args.next_field();
        assert!(args.finish().is_ok());
    }

    #[test]
    fn test_custom_separator() {
        let fields: Vec<&str> = Args::with_separator("1;2,3", ';').collect();
        assert_eq!(fields, vec!["1", "2,3"]);
    }

    #[test]
    fn test_string_from_args_is_raw() {
        assert_eq!(String::from_args("a,b,c").unwrap(), "a,b,c");
    }

    #[test]
    fn test_tuple_from_args() {
        let (a, b, c) = <(i32, i32, i32)>::from_args("90,-45,180").unwrap();
        assert_eq!((a, b, c), (90, -45, 180));

        let (name, value) = <(String, f32)>::from_args("gain,0.5").unwrap();
        assert_eq!(name, "gain");
        assert_eq!(value, 0.5);
    }

    #[test]
    fn test_tuple_rejects_wrong_arity() {
        let err = <(i32, i32, i32)>::from_args("1,2").unwrap_err();
        assert!(err.to_string().contains("missing field 2"));

        let err = <(i32, i32)>::from_args("1,2,3").unwrap_err();
        assert!(err.to_string().contains("unexpected field 2"));
    }

    #[test]
    fn test_vec_from_args() {
        let values = Vec::<u16>::from_args("1,2,3,4,5").unwrap();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);

        assert!(Vec::<u16>::from_args("1,x").is_err());
    }

    #[test]
    fn test_vec_from_empty_args() {
        assert_eq!(Vec::<u16>::from_args("").unwrap(), Vec::<u16>::new());

        // A lone separator still means two empty fields.
        assert!(Vec::<u16>::from_args(",").is_err());
        assert_eq!(Vec::<String>::from_args(",").unwrap(), vec!["", ""]);
    }
}
