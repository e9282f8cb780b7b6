//! Named defaults for every composer, subplot margin settings, and (with the
//! `config` feature) loading of defaults from TOML or JSON files.
//!
//! Nothing here is global: each composer receives a [`PlotDefaults`] by value
//! through its options struct, so overriding a default for one call never
//! affects another.

#[cfg(feature = "config")]
use std::{ fs, path::Path };
#[cfg(feature = "config")]
use serde::Deserialize;
#[cfg(feature = "config")]
use thiserror::Error;
use crate::{
    error::{ PlotError, PlotResult },
    style::{ AxesSize, Color, Colormap, Dash, LineStyle },
};

#[cfg(feature = "config")]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config: couldn't read file '{0}': {1}")]
    FileRead(String, String),

    #[error("config: unrecognized file format for '{0}'; expected .toml or .json")]
    UnknownFormat(String),

    #[error("config: TOML error '{0}'")]
    TomlError(#[from] toml::de::Error),

    #[error("config: JSON error '{0}'")]
    JsonError(#[from] serde_json::Error),
}

#[cfg(feature = "config")]
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Geometry and styling of the colorbar drawn inside the main 2D panel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(Deserialize),
    serde(default, deny_unknown_fields),
)]
pub struct InsetColorbar {
    /// Width relative to the parent panel (default 70%).
    pub width: AxesSize,
    /// Height relative to the parent panel (default 3%).
    pub height: AxesSize,
    /// Tick label font size (default 8.0).
    pub label_size: f64,
    /// Tick mark width (default 1.5).
    pub tick_width: f64,
}

impl Default for InsetColorbar {
    fn default() -> Self {
        Self {
            width: AxesSize::Percent(70.0),
            height: AxesSize::Percent(3.0),
            label_size: 8.0,
            tick_width: 1.5,
        }
    }
}

/// Defaults shared by the composers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(Deserialize),
    serde(default, deny_unknown_fields),
)]
pub struct PlotDefaults {
    /// Figure size in inches for [`Plot2D`][crate::Plot2D] (default
    /// `(8.0, 8.0)`).
    pub figsize_2d: (f64, f64),
    /// Figure size in inches for [`Plot1D`][crate::Plot1D] (default
    /// `(6.4, 6.4)`).
    pub figsize_1d: (f64, f64),
    /// Figure size in inches for broken-axis plots (default `(8.0, 3.2)`).
    pub figsize_break_x: (f64, f64),
    /// Base style for slice lines, overlaid by per-slice styles (default
    /// solid, `#ff7f0e`, width 1.5).
    pub slice_style: LineStyle,
    /// Color of 2D annotation text and the inset colorbar (default
    /// `#ff7f0e`).
    pub accent_color: Color,
    /// Color of 1D annotation text (default `firebrick`).
    pub text_color_1d: Color,
    /// Gap between the main panel and slice strips, as a fraction of the
    /// average panel size (default 0.03).
    pub slice_spacing: f64,
    pub inset_colorbar: InsetColorbar,
    /// Gap in inches between the halves of a broken-axis plot (default 1.0).
    pub break_pad: f64,
    /// Half-length of break marks in panel-fraction units (default 0.015).
    pub break_mark_size: f64,
    /// Default color map (default `viridis`).
    pub colormap: Colormap,
}

impl Default for PlotDefaults {
    fn default() -> Self {
        Self {
            figsize_2d: (8.0, 8.0),
            figsize_1d: (6.4, 6.4),
            figsize_break_x: (8.0, 3.2),
            slice_style: LineStyle::new()
                .dash(Dash::Solid)
                .color("#ff7f0e")
                .linewidth(1.5),
            accent_color: Color::new("#ff7f0e"),
            text_color_1d: Color::new("firebrick"),
            slice_spacing: 0.03,
            inset_colorbar: InsetColorbar::default(),
            break_pad: 1.0,
            break_mark_size: 0.015,
            colormap: Colormap::viridis(),
        }
    }
}

#[cfg(feature = "config")]
impl PlotDefaults {
    /// Parse defaults from a TOML string. Missing keys keep their default
    /// values; unknown keys are an error.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse defaults from a JSON string. Missing keys keep their default
    /// values; unknown keys are an error.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load defaults from a `.toml` or `.json` file.
    pub fn load<P>(path: P) -> ConfigResult<Self>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        let pathstr = path.display().to_string();
        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_lowercase);
        let read = || {
            fs::read_to_string(path)
                .map_err(|e| ConfigError::FileRead(pathstr.clone(), e.to_string()))
        };
        match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&read()?),
            Some("json") => Self::from_json_str(&read()?),
            _ => Err(ConfigError::UnknownFormat(pathstr.clone())),
        }
    }
}

/// Subplot margin and spacing settings, passed to `Figure.subplots_adjust`.
///
/// Unset fields are left to Matplotlib.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "config",
    derive(Deserialize),
    serde(default, deny_unknown_fields),
)]
pub struct SubplotAdjust {
    /// Left side of the subplots, as a figure fraction.
    pub left: Option<f64>,
    /// Right side of the subplots, as a figure fraction.
    pub right: Option<f64>,
    /// Bottom of the subplots, as a figure fraction.
    pub bottom: Option<f64>,
    /// Top of the subplots, as a figure fraction.
    pub top: Option<f64>,
    /// Width reserved between subplots, as a fraction of the average axis
    /// width.
    pub wspace: Option<f64>,
    /// Height reserved between subplots, as a fraction of the average axis
    /// height.
    pub hspace: Option<f64>,
}

impl SubplotAdjust {
    /// No settings.
    pub fn new() -> Self { Self::default() }

    /// Matplotlib's stock values, all set.
    pub fn matplotlib_defaults() -> Self {
        Self {
            left: Some(0.125),
            right: Some(0.9),
            bottom: Some(0.1),
            top: Some(0.9),
            wspace: Some(0.2),
            hspace: Some(0.2),
        }
    }

    /// Set a single value by key, rejecting keys that are not one of `left`,
    /// `right`, `bottom`, `top`, `wspace`, or `hspace`.
    pub fn set(&mut self, key: &str, value: f64) -> PlotResult<()> {
        let slot = match key {
            "left" => &mut self.left,
            "right" => &mut self.right,
            "bottom" => &mut self.bottom,
            "top" => &mut self.top,
            "wspace" => &mut self.wspace,
            "hspace" => &mut self.hspace,
            _ => { return Err(PlotError::UnknownOption(key.to_string())); },
        };
        *slot = Some(value);
        Ok(())
    }

    /// Start from [`Self::matplotlib_defaults`] and apply keyed overrides.
    pub fn from_pairs<'a, I>(pairs: I) -> PlotResult<Self>
    where I: IntoIterator<Item = (&'a str, f64)>
    {
        let mut adjust = Self::matplotlib_defaults();
        for (key, value) in pairs.into_iter() {
            adjust.set(key, value)?;
        }
        Ok(adjust)
    }

    /// Overlay every field set in `other` onto a copy of `self`.
    pub fn merged(&self, other: &SubplotAdjust) -> Self {
        Self {
            left: other.left.or(self.left),
            right: other.right.or(self.right),
            bottom: other.bottom.or(self.bottom),
            top: other.top.or(self.top),
            wspace: other.wspace.or(self.wspace),
            hspace: other.hspace.or(self.hspace),
        }
    }

    pub fn is_empty(&self) -> bool { *self == Self::default() }

    /// Set key/value pairs, in Matplotlib's keyword order.
    pub fn items(&self) -> Vec<(&'static str, f64)> {
        [
            ("left", self.left),
            ("right", self.right),
            ("bottom", self.bottom),
            ("top", self.top),
            ("wspace", self.wspace),
            ("hspace", self.hspace),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Rgb;

    #[test]
    fn adjust_from_pairs_overrides_defaults() {
        let adj = SubplotAdjust::from_pairs([("left", 0.15), ("right", 0.98)]).unwrap();
        assert_eq!(adj.left, Some(0.15));
        assert_eq!(adj.right, Some(0.98));
        assert_eq!(adj.top, Some(0.9));
        assert_eq!(adj.items().len(), 6);
    }

    #[test]
    fn adjust_rejects_unknown_key() {
        assert!(matches!(
            SubplotAdjust::from_pairs([("left", 0.1), ("margin", 0.2)]),
            Err(PlotError::UnknownOption(k)) if k == "margin",
        ));
    }

    #[test]
    fn adjust_merge_and_items() {
        let base = SubplotAdjust { hspace: Some(0.03), ..Default::default() };
        assert!(!base.is_empty());
        assert!(SubplotAdjust::new().is_empty());
        let merged = base.merged(&SubplotAdjust { wspace: Some(0.03), ..Default::default() });
        assert_eq!(merged.items(), vec![("wspace", 0.03), ("hspace", 0.03)]);
    }

    #[test]
    fn defaults_are_explicit() {
        let d = PlotDefaults::default();
        assert_eq!(d.figsize_2d, (8.0, 8.0));
        assert_eq!(d.slice_style.color, Some(Color::Rgb(Rgb(255, 127, 14))));
        assert_eq!(d.slice_style.dash, Some(Dash::Solid));
        assert_eq!(d.inset_colorbar.width, AxesSize::Percent(70.0));
        assert_eq!(d.colormap, Colormap::viridis());
    }

    #[cfg(feature = "config")]
    #[test]
    fn defaults_from_toml() {
        let d = PlotDefaults::from_toml_str(
            r##"
            figsize_2d = [10.0, 6.0]
            accent_color = "white"
            slice_spacing = 0.05

            [slice_style]
            color = "#1f77b4"
            ls = "--"

            [inset_colorbar]
            width = "50%"
            "##,
        ).unwrap();
        assert_eq!(d.figsize_2d, (10.0, 6.0));
        assert_eq!(d.accent_color, Color::Named("white".into()));
        assert_eq!(d.slice_style.dash, Some(Dash::Dashed));
        assert_eq!(d.slice_style.linewidth, None);
        assert_eq!(d.inset_colorbar.width, AxesSize::Percent(50.0));
        assert_eq!(d.inset_colorbar.height, AxesSize::Percent(3.0));
        assert_eq!(d.figsize_1d, (6.4, 6.4));
    }

    #[cfg(feature = "config")]
    #[test]
    fn defaults_reject_unknown_keys() {
        assert!(matches!(
            PlotDefaults::from_toml_str("figure_size = [1.0, 2.0]"),
            Err(ConfigError::TomlError(_)),
        ));
        assert!(matches!(
            PlotDefaults::from_json_str(r#"{"slice_style": {"zorder": 2}}"#),
            Err(ConfigError::JsonError(_)),
        ));
    }

    #[cfg(feature = "config")]
    #[test]
    fn defaults_from_json() {
        let d = PlotDefaults::from_json_str(
            r#"{"colormap": "magma", "break_pad": 0.5}"#
        ).unwrap();
        assert_eq!(d.colormap, Colormap::new("magma"));
        assert_eq!(d.break_pad, 0.5);
    }

    #[cfg(feature = "config")]
    #[test]
    fn load_rejects_unknown_extension() {
        assert!(matches!(
            PlotDefaults::load("defaults.yaml"),
            Err(ConfigError::UnknownFormat(_)),
        ));
    }
}
