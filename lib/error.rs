//! Provides `ErrMsg`, a simple trait to associate a constant string with an
//! error type, `mkerr`, a macro to easily implement it and error traits, and
//! `PlotError`, the error type shared by all composers.

use thiserror::Error;
use matplotlib::MplError;

/// Simple trait to associate a constant string with an error type.
pub trait ErrMsg {
    fn msg(&self) -> &'static str;
}

/// Simple macro to implement `ErrMsg`, `Display`, and `Error` for an error
/// type.
#[macro_export]
macro_rules! mkerr {
    ( $name:ident : { $( $var:ident => $msg:literal ),+ $(,)? } ) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum $name {
            $( $var, )+
        }

        impl $crate::error::ErrMsg for $name {
            fn msg(&self) -> &'static str {
                return match *self {
                    $( $name::$var => $msg, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                return f.write_str($crate::error::ErrMsg::msg(self));
            }
        }

        impl std::error::Error for $name { }
    }
}

mkerr!(
    IndexError : {
        EmptyAxis => "cannot look up a value in an empty coordinate axis",
    }
);

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("index: {0}")]
    Index(#[from] IndexError),

    #[error("length mismatch for {what}: expected {expected} but got {found}")]
    LengthMismatch { what: &'static str, expected: usize, found: usize },

    #[error(
        "shape mismatch: field is {rows}x{cols} but the vertical axis has \
        {v_len} points and the horizontal axis has {h_len}"
    )]
    ShapeMismatch { rows: usize, cols: usize, v_len: usize, h_len: usize },

    #[error("range along the {axis} axis selects no samples")]
    EmptyCrop { axis: &'static str },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value for option '{key}': '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("figure has no panel with index {0}")]
    NoSuchPanel(usize),

    #[error("panel {panel} has no artist with index {index}")]
    NoSuchArtist { panel: usize, index: usize },

    #[error("artist at panel {panel}, index {index} cannot back a colorbar")]
    NotMappable { panel: usize, index: usize },

    #[error("matplotlib: {0}")]
    Mpl(#[from] MplError),

    #[cfg(feature = "config")]
    #[error("{0}")]
    Config(#[from] crate::config::ConfigError),
}

pub type PlotResult<T> = Result<T, PlotError>;

