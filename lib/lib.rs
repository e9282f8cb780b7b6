#![allow(clippy::needless_return)]

//! Pseudocolor plots of 2D arrays with optional attached 1D slices, plus a few
//! 1D line-plotting conveniences, all drawn through [`matplotlib`].
//!
//! Composers ([`Plot2D`], [`Plot1D`], [`BreakX`]/[`plot1d_break_x`],
//! [`plot_multicolored_line`], [`add_colorbar`]) build a plain [`Figure`]
//! model that can be inspected directly, turned into a Python script with
//! [`Figure::to_python`], or rendered with [`Figure::save`]/[`Figure::show`].

pub mod error;
pub mod utils;
pub mod index;
pub mod style;
pub mod config;
pub mod figure;
pub mod render;
pub mod colorbar;
pub mod one_dimensional;
pub mod two_dimensional;

pub use crate::{
    error::{ PlotError, PlotResult },
    index::{ nearest_index, Extent },
    figure::{ Figure, PanelId, ArtistRef },
    colorbar::{ add_colorbar, ColorbarOptions },
    one_dimensional::{
        Plot1D,
        Plot1DOptions,
        BreakXParams,
        BreakX,
        plot1d_break_x,
        GradientLine,
        GradientLineOptions,
        plot_multicolored_line,
    },
    two_dimensional::{ Plot2D, Plot2DOptions, SliceLayout },
};

pub use matplotlib::{
    Mpl,
    Opt,
    opt,
    PyValue,
    Run,
    Matplotlib,
    MatplotlibOpts,
    AsPy,
    commands,
};

