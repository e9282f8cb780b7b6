//! Colors, line styles, color maps, normalizations, and the small geometric
//! vocabulary (sides, sizes, alignments) used to describe panels.

use std::{ fmt, str::FromStr, sync::OnceLock };
use regex::Regex;
#[cfg(feature = "config")]
use serde::Deserialize;
use crate::error::{ PlotError, PlotResult };

/// An RGB color triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Convert from an RGB hex string.
    ///
    /// Strings can be either three or six hex digits, with or without a leading
    /// "#".
    pub fn from_hex(hex: &str) -> Result<Self, RgbParseError> {
        hex.parse()
    }

    /// Convert to an ordinary RGB hex string.
    ///
    /// Output from this function contains a leading "#".
    pub fn as_string(self) -> String { self.to_string() }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RgbParseError {
    MalformedRgb,
    IntParseError(std::num::ParseIntError),
}

impl From<std::num::ParseIntError> for RgbParseError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::IntParseError(err)
    }
}

impl FromStr for Rgb {
    type Err = RgbParseError;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return Err(RgbParseError::MalformedRgb);
        }
        match digits.len() {
            3 => {
                let r = u8::from_str_radix(&digits[0..1], 16)?;
                let g = u8::from_str_radix(&digits[1..2], 16)?;
                let b = u8::from_str_radix(&digits[2..3], 16)?;
                Ok(Rgb(r * 17, g * 17, b * 17))
            },
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16)?;
                let g = u8::from_str_radix(&digits[2..4], 16)?;
                let b = u8::from_str_radix(&digits[4..6], 16)?;
                Ok(Rgb(r, g, b))
            },
            _ => Err(RgbParseError::MalformedRgb),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// A color, either as explicit RGB or as a name understood by Matplotlib
/// (e.g. `"firebrick"`, `"k"`, `"C0"`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Deserialize), serde(from = "String"))]
pub enum Color {
    Rgb(Rgb),
    Named(String),
}

impl Color {
    /// Parse a hex string if possible, otherwise take the string as a color
    /// name.
    pub fn new(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| Self::Named(s.to_string()))
    }

    pub fn black() -> Self { Self::Named("k".to_string()) }
}

impl FromStr for Color {
    type Err = RgbParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Rgb>().map(Self::Rgb)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self { Self::Rgb(rgb) }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self { Self::new(s) }
}

impl From<String> for Color {
    fn from(s: String) -> Self { Self::new(&s) }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(rgb) => rgb.fmt(f),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Line dash pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Deserialize), serde(try_from = "String"))]
pub enum Dash {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    None,
}

impl Dash {
    /// Matplotlib's short name for the pattern.
    pub fn code(self) -> &'static str {
        match self {
            Self::Solid   => "-",
            Self::Dashed  => "--",
            Self::DashDot => "-.",
            Self::Dotted  => ":",
            Self::None    => "",
        }
    }
}

impl TryFrom<String> for Dash {
    type Error = PlotError;

    fn try_from(s: String) -> PlotResult<Self> { s.parse() }
}

impl FromStr for Dash {
    type Err = PlotError;

    fn from_str(s: &str) -> PlotResult<Self> {
        match s {
            "-" | "solid" => Ok(Self::Solid),
            "--" | "dashed" => Ok(Self::Dashed),
            "-." | "dashdot" => Ok(Self::DashDot),
            ":" | "dotted" => Ok(Self::Dotted),
            "" | " " | "none" | "None" => Ok(Self::None),
            _ => Err(PlotError::InvalidValue {
                key: "linestyle".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Styling for a single drawn line.
///
/// Unset fields fall back to Matplotlib's own defaults.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(Deserialize),
    serde(default, deny_unknown_fields),
)]
pub struct LineStyle {
    #[cfg_attr(feature = "config", serde(alias = "c"))]
    pub color: Option<Color>,
    #[cfg_attr(feature = "config", serde(alias = "linestyle", alias = "ls"))]
    pub dash: Option<Dash>,
    #[cfg_attr(feature = "config", serde(alias = "lw"))]
    pub linewidth: Option<f64>,
    pub alpha: Option<f64>,
    pub marker: Option<String>,
}

impl LineStyle {
    /// Create a new, empty `LineStyle`.
    pub fn new() -> Self { Self::default() }

    pub fn color<C>(mut self, color: C) -> Self
    where C: Into<Color>
    {
        self.color = Some(color.into());
        self
    }

    pub fn dash(mut self, dash: Dash) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn linewidth(mut self, lw: f64) -> Self {
        self.linewidth = Some(lw);
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.to_string());
        self
    }

    /// Set a single option by its Matplotlib keyword.
    ///
    /// Recognized keys are `color`/`c`, `linestyle`/`ls`, `linewidth`/`lw`,
    /// `alpha`, and `marker`; anything else is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> PlotResult<()> {
        let invalid = || PlotError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "color" | "c" => { self.color = Some(Color::new(value)); },
            "linestyle" | "ls" => { self.dash = Some(value.parse()?); },
            "linewidth" | "lw" => {
                self.linewidth = Some(value.parse().map_err(|_| invalid())?);
            },
            "alpha" => {
                self.alpha = Some(value.parse().map_err(|_| invalid())?);
            },
            "marker" => { self.marker = Some(value.to_string()); },
            _ => { return Err(PlotError::UnknownOption(key.to_string())); },
        }
        Ok(())
    }

    /// Build a `LineStyle` from keyword/value pairs; see [`Self::set`].
    pub fn from_pairs<'a, I>(pairs: I) -> PlotResult<Self>
    where I: IntoIterator<Item = (&'a str, &'a str)>
    {
        let mut style = Self::new();
        for (key, value) in pairs.into_iter() {
            style.set(key, value)?;
        }
        Ok(style)
    }

    /// Overlay every field set in `other` onto a copy of `self`.
    pub fn merged(&self, other: &LineStyle) -> Self {
        Self {
            color: other.color.clone().or_else(|| self.color.clone()),
            dash: other.dash.or(self.dash),
            linewidth: other.linewidth.or(self.linewidth),
            alpha: other.alpha.or(self.alpha),
            marker: other.marker.clone().or_else(|| self.marker.clone()),
        }
    }
}

/// A color map registered with Matplotlib, by name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Deserialize), serde(from = "String"))]
pub struct Colormap(pub String);

impl Colormap {
    pub fn new(name: &str) -> Self { Self(name.to_string()) }

    pub fn viridis() -> Self { Self::new("viridis") }

    pub fn name(&self) -> &str { &self.0 }
}

impl Default for Colormap {
    fn default() -> Self { Self::viridis() }
}

impl From<&str> for Colormap {
    fn from(name: &str) -> Self { Self::new(name) }
}

impl From<String> for Colormap {
    fn from(name: String) -> Self { Self(name) }
}

/// Mapping of data values onto the `0..1` color scale.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Norm {
    #[default]
    Linear,
    Log,
    SymLog { linthresh: f64 },
}

/// One side of a panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Self::Top    => "top",
            Self::Bottom => "bottom",
            Self::Left   => "left",
            Self::Right  => "right",
        }
    }
}

impl FromStr for Side {
    type Err = PlotError;

    fn from_str(s: &str) -> PlotResult<Self> {
        match s {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(PlotError::InvalidValue {
                key: "side".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertical   => "vertical",
            Self::Horizontal => "horizontal",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

impl HAlign {
    pub fn name(self) -> &'static str {
        match self {
            Self::Left   => "left",
            Self::Center => "center",
            Self::Right  => "right",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

impl VAlign {
    pub fn name(self) -> &'static str {
        match self {
            Self::Top    => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        }
    }
}

/// Anchor location of an inset panel within its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    UpperCenter,
    LowerCenter,
    Center,
}

impl Location {
    /// Matplotlib's numeric location code.
    pub fn code(self) -> u8 {
        match self {
            Self::UpperRight  => 1,
            Self::UpperLeft   => 2,
            Self::LowerLeft   => 3,
            Self::LowerRight  => 4,
            Self::UpperCenter => 9,
            Self::LowerCenter => 8,
            Self::Center      => 10,
        }
    }

    /// Lower-left corner, in parent fractions, of a `width` by `height` box
    /// (also in parent fractions) placed at this location.
    pub fn anchor(self, width: f64, height: f64) -> (f64, f64) {
        let (left, middle, right) = (0.0, (1.0 - width) / 2.0, 1.0 - width);
        let (bottom, center, top) = (0.0, (1.0 - height) / 2.0, 1.0 - height);
        match self {
            Self::UpperRight  => (right, top),
            Self::UpperLeft   => (left, top),
            Self::LowerLeft   => (left, bottom),
            Self::LowerRight  => (right, bottom),
            Self::UpperCenter => (middle, top),
            Self::LowerCenter => (middle, bottom),
            Self::Center      => (middle, center),
        }
    }
}

/// A size relative to a parent panel (`"5%"`) or absolute in inches (`"0.3"`).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "config", derive(Deserialize), serde(try_from = "String"))]
pub enum AxesSize {
    Percent(f64),
    Inches(f64),
}

impl TryFrom<String> for AxesSize {
    type Error = PlotError;

    fn try_from(s: String) -> PlotResult<Self> { s.parse() }
}

impl FromStr for AxesSize {
    type Err = PlotError;

    fn from_str(s: &str) -> PlotResult<Self> {
        let invalid = || PlotError::InvalidValue {
            key: "size".to_string(),
            value: s.to_string(),
        };
        static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| {
                Regex::new(r"^\s*([0-9]*\.?[0-9]+(?:[eE][+-]?[0-9]+)?)\s*(%?)\s*$")
            })
            .as_ref()
            .map_err(|_| invalid())?;
        let caps = pattern.captures(s).ok_or_else(invalid)?;
        let value: f64 = caps[1].parse().map_err(|_| invalid())?;
        if &caps[2] == "%" {
            Ok(Self::Percent(value))
        } else {
            Ok(Self::Inches(value))
        }
    }
}

impl fmt::Display for AxesSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{}%", p),
            Self::Inches(x) => write!(f, "{}", x),
        }
    }
}
