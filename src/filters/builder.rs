//! # Filter builders: typed constructors checked at runtime.
//!
//! Static code builds filters by calling functions like
//! [`len_eq`](super::len_eq) directly. When the stage list comes from
//! configuration instead, [`FilterBuilder`] pairs a constructor with its
//! parameter signature and validates supplied [`Param`]s before calling it.
//!
//! ## Example
//! ```rust
//! use voyeur::{len_eq, BuildError, FilterBuilder, Param, ParamKind};
//!
//! let builder = FilterBuilder::new("len_eq", [ParamKind::Int], |args| match args {
//!     [Param::Int(n)] => usize::try_from(*n).map(len_eq).map_err(|_| {
//!         BuildError::InvalidArgument {
//!             filter: "len_eq".into(),
//!             index: 0,
//!             reason: format!("length must be non-negative, got {n}"),
//!         }
//!     }),
//!     _ => Err(BuildError::UnknownFilter { name: "len_eq".into() }),
//! });
//!
//! assert!(builder.build(&[Param::Int(4)]).is_ok());
//! let err = builder.build(&[Param::Int(-1)]).err().unwrap();
//! assert_eq!(err.as_label(), "build_invalid_argument");
//!
//! let err = builder.build(&[Param::from("four")]).err().unwrap();
//! assert_eq!(err.as_label(), "build_param_mismatch");
//! ```

use std::borrow::Cow;
use std::fmt;

use super::filter::FilterRef;
use crate::error::BuildError;

/// Kind of a builder parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Text.
    Str,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Boolean flag.
    Bool,
}

impl ParamKind {
    /// Returns the short name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Str => "str",
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime argument for a [`FilterBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub enum Param {
    /// Text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean flag.
    Bool(bool),
}

impl Param {
    /// Returns the kind of this argument.
    pub fn kind(&self) -> ParamKind {
        match self {
            Param::Str(_) => ParamKind::Str,
            Param::Int(_) => ParamKind::Int,
            Param::Float(_) => ParamKind::Float,
            Param::Bool(_) => ParamKind::Bool,
        }
    }

    /// Returns the text if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Param::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Param::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Param::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the flag if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Param::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Str(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Str(s)
    }
}

impl From<i64> for Param {
    fn from(n: i64) -> Self {
        Param::Int(n)
    }
}

impl From<f64> for Param {
    fn from(x: f64) -> Self {
        Param::Float(x)
    }
}

impl From<bool> for Param {
    fn from(b: bool) -> Self {
        Param::Bool(b)
    }
}

/// Constructor signature: receives arguments already checked against the
/// builder's signature.
pub type FilterCtor = dyn Fn(&[Param]) -> Result<FilterRef, BuildError> + Send + Sync;

/// Named filter constructor with a parameter signature.
pub struct FilterBuilder {
    name: Cow<'static, str>,
    signature: Vec<ParamKind>,
    ctor: Box<FilterCtor>,
}

impl FilterBuilder {
    /// Creates a builder.
    pub fn new<F>(
        name: impl Into<Cow<'static, str>>,
        signature: impl Into<Vec<ParamKind>>,
        ctor: F,
    ) -> Self
    where
        F: Fn(&[Param]) -> Result<FilterRef, BuildError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature: signature.into(),
            ctor: Box::new(ctor),
        }
    }

    /// Returns the builder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the expected parameter kinds, in order.
    pub fn signature(&self) -> &[ParamKind] {
        &self.signature
    }

    /// Checks argument count and kinds against the signature.
    pub fn check(&self, args: &[Param]) -> Result<(), BuildError> {
        let matches = args.len() == self.signature.len()
            && args
                .iter()
                .zip(&self.signature)
                .all(|(arg, kind)| arg.kind() == *kind);
        if matches {
            Ok(())
        } else {
            Err(self.mismatch(args))
        }
    }

    /// Validates `args` and builds the filter.
    pub fn build(&self, args: &[Param]) -> Result<FilterRef, BuildError> {
        self.check(args)?;
        (self.ctor)(args)
    }

    /// The error reported when `args` does not fit the signature.
    pub fn mismatch(&self, args: &[Param]) -> BuildError {
        BuildError::ParamMismatch {
            filter: self.name.to_string(),
            expected: self.signature.clone(),
            got: args.iter().map(Param::kind).collect(),
        }
    }
}

impl fmt::Debug for FilterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBuilder")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}
