//! Turns a [`Figure`] into a sequence of [`matplotlib`] commands.
//!
//! Grid panels are created together by [`commands::InitGridSpec`] and live in
//! the Python array `AX`; divided and inset panels are bound to `ax{k}`. A
//! panel's artists are drawn after [`commands::FocusAx`] points `ax` at it.
//! Color-mapped artists are bound to `a{panel}_{index}` so colorbars can refer
//! back to them. Array data travels through the script's JSON data file, never
//! through the script text.
//!
//! The structs defined here cover what [`commands`] has no equivalent for.

use std::{
    collections::{ HashMap, HashSet },
    path::Path,
};
use matplotlib::{
    commands::{ self, Axis, Axis2 },
    serde_json::Value,
    opt,
    AsPy,
    GSPos,
    Matplotlib,
    MatplotlibOpts,
    Mpl,
    Opt,
    PyValue,
    Run,
};
use crate::{
    error::{ PlotError, PlotResult },
    figure::{ Artist, ArtistRef, Coords, Figure, Panel, PanelId, Placement },
    style::{ AxesSize, Color, LineStyle, Location, Norm, Orientation, Side },
};

/// Imports needed on top of [`commands::DefPrelude`].
pub const EXTRA_IMPORTS: &str = "\
import matplotlib.transforms as mtransforms
from mpl_toolkits.axes_grid1 import make_axes_locatable
from mpl_toolkits.axes_grid1.inset_locator import inset_axes";

/// Render a real number as a Python expression.
pub(crate) fn py_float(x: f64) -> String {
    if x.is_nan() {
        "float(\"nan\")".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "float(\"inf\")" } else { "-float(\"inf\")" }.to_string()
    } else {
        format!("{:?}", x)
    }
}

/// Escape a string for placement between double quotes.
///
/// [`commands`] quote strings without escaping them, so every string headed for
/// the script text goes through here first.
pub(crate) fn py_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Render a string as a Python string literal.
pub(crate) fn py_str(s: &str) -> String { format!("\"{}\"", py_escape(s)) }

/// A keyword-argument value for a real number.
///
/// [`PyValue::Float`] prints non-finite values as bare `NaN`/`inf`, which
/// Python does not parse.
fn py_num(x: f64) -> PyValue {
    if x.is_finite() { PyValue::Float(x) } else { PyValue::Var(py_float(x)) }
}

fn py_size(size: AxesSize) -> String {
    match size {
        AxesSize::Percent(_) => py_str(&size.to_string()),
        AxesSize::Inches(x) => py_float(x),
    }
}

fn py_color(color: &Color) -> PyValue { PyValue::Str(py_escape(&color.to_string())) }

fn finite(x: f64) -> Option<f64> { x.is_finite().then_some(x) }

fn lowercase(axis: Axis) -> String { format!("{:?}", axis).to_lowercase() }

fn line_opts(style: &LineStyle) -> Vec<Opt> {
    let mut opts = Vec::new();
    if let Some(color) = &style.color { opts.push(opt("color", py_color(color))); }
    if let Some(dash) = style.dash { opts.push(opt("linestyle", dash.code())); }
    if let Some(lw) = style.linewidth { opts.push(opt("linewidth", py_num(lw))); }
    if let Some(alpha) = style.alpha { opts.push(opt("alpha", py_num(alpha))); }
    if let Some(marker) = &style.marker { opts.push(opt("marker", py_escape(marker))); }
    opts
}

/// Transform for positions in `coords`, relative to the focused `ax`.
fn transform(coords: Coords) -> Option<PyValue> {
    let expr = match coords {
        Coords::Data => return None,
        Coords::Panel => "ax.transAxes",
        Coords::YTickData => "mtransforms.blended_transform_factory(\
            ax.get_yaxis_text1_transform(0)[0], ax.transData)",
        Coords::DataXTick => "mtransforms.blended_transform_factory(\
            ax.transData, ax.get_xaxis_text1_transform(0)[0])",
    };
    Some(PyValue::Var(expr.to_string()))
}

/// Move the ticks and tick labels of `axis` to `side`, clearing the opposite
/// side.
fn tick_side(axis: Axis2, side: Side) -> commands::TickParams {
    let sides: [Side; 2] = match axis {
        Axis2::X => [Side::Top, Side::Bottom],
        _ => [Side::Left, Side::Right],
    };
    sides.into_iter()
        .fold(commands::tick_params(axis), |params, s| {
            let on = s == side;
            params.o(s.name(), on).o(&format!("label{}", s.name()), on)
        })
}

fn mappable_name(aref: ArtistRef) -> String {
    format!("a{}_{}", aref.panel.0, aref.index)
}

/// Set the size of the figure.
///
/// ```python
/// fig.set_size_inches({width}, {height})
/// ```
///
/// Prelude: **No**
///
/// JSON data: **None**
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl Matplotlib for FigureSize {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> { None }

    fn py_cmd(&self) -> String {
        format!("fig.set_size_inches({}, {})",
            py_float(self.width), py_float(self.height))
    }
}

/// Carve a new set of axes out of one side of `parent`.
///
/// ```python
/// {divider} = make_axes_locatable({parent})  # first use of the divider only
/// {name} = {divider}.append_axes("{side}", size={size}, pad={pad}, **{opts})
/// ```
///
/// Prelude: **No**
///
/// JSON data: **None**
#[derive(Clone, Debug, PartialEq)]
pub struct AppendAxes {
    pub parent: String,
    pub divider: String,
    pub new_divider: bool,
    pub name: String,
    pub side: Side,
    pub size: AxesSize,
    pub pad: f64,
    pub opts: Vec<Opt>,
}

impl Matplotlib for AppendAxes {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> { None }

    fn py_cmd(&self) -> String {
        let mut code = String::new();
        if self.new_divider {
            code.push_str(&format!(
                "{} = make_axes_locatable({})\n", self.divider, self.parent));
        }
        code.push_str(&format!(
            "{} = {}.append_axes({}, size={}, pad={}{}{})",
            self.name,
            self.divider,
            py_str(self.side.name()),
            py_size(self.size),
            py_float(self.pad),
            if self.opts.is_empty() { "" } else { ", " },
            self.opts.as_py(),
        ));
        code
    }
}

impl MatplotlibOpts for AppendAxes {
    fn kwarg<T: Into<PyValue>>(&mut self, key: &str, val: T) -> &mut Self {
        self.opts.push((key, val).into());
        self
    }
}

/// Place a new set of axes inside `parent` with at least one size given in
/// inches.
///
/// Insets sized entirely in percentages go through [`commands::InsetAxes`]
/// instead.
///
/// ```python
/// {name} = inset_axes({parent}, width={width}, height={height}, loc={loc})
/// ```
///
/// Prelude: **No**
///
/// JSON data: **None**
#[derive(Clone, Debug, PartialEq)]
pub struct InsetLocator {
    pub parent: String,
    pub name: String,
    pub width: AxesSize,
    pub height: AxesSize,
    pub loc: Location,
}

impl Matplotlib for InsetLocator {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> { None }

    fn py_cmd(&self) -> String {
        format!("{} = inset_axes({}, width={}, height={}, loc={})",
            self.name,
            self.parent,
            py_size(self.width),
            py_size(self.height),
            self.loc.code(),
        )
    }
}

/// Share one axis of `ax` with another set of axes.
///
/// ```python
/// ax.share{axis}({target})
/// ```
///
/// Prelude: **No**
///
/// JSON data: **None**
#[derive(Clone, Debug, PartialEq)]
pub struct ShareAxis {
    pub axis: Axis,
    pub target: String,
}

impl Matplotlib for ShareAxis {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> { None }

    fn py_cmd(&self) -> String {
        format!("ax.share{}({})", lowercase(self.axis), self.target)
    }
}

/// Visibility, margins, and border lines of `ax`. Only settings that differ
/// from Matplotlib's defaults are written.
///
/// ```python
/// ax.set_visible(False)
/// ax.set_xmargin({xmargin})
/// ax.set_ymargin({ymargin})
/// ax.spines["{side}"].set_visible(False)  # for each hidden side
/// ax.xaxis.set_visible(False)
/// ax.yaxis.set_visible(False)
/// ```
///
/// Prelude: **No**
///
/// JSON data: **None**
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub visible: bool,
    pub xmargin: Option<f64>,
    pub ymargin: Option<f64>,
    pub hidden_spines: Vec<Side>,
    pub xaxis_visible: bool,
    pub yaxis_visible: bool,
}

impl Frame {
    pub fn of(panel: &Panel) -> Self {
        Self {
            visible: panel.visible,
            xmargin: panel.xmargin,
            ymargin: panel.ymargin,
            hidden_spines: panel.spines.hidden(),
            xaxis_visible: panel.xaxis_visible,
            yaxis_visible: panel.yaxis_visible,
        }
    }

    /// `true` if nothing would be written.
    pub fn is_plain(&self) -> bool {
        self.visible
            && self.xmargin.is_none()
            && self.ymargin.is_none()
            && self.hidden_spines.is_empty()
            && self.xaxis_visible
            && self.yaxis_visible
    }
}

impl Matplotlib for Frame {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> { None }

    fn py_cmd(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        if !self.visible {
            lines.push("ax.set_visible(False)".to_string());
        }
        if let Some(m) = self.xmargin {
            lines.push(format!("ax.set_xmargin({})", py_float(m)));
        }
        if let Some(m) = self.ymargin {
            lines.push(format!("ax.set_ymargin({})", py_float(m)));
        }
        for side in self.hidden_spines.iter() {
            lines.push(format!(
                "ax.spines[{}].set_visible(False)", py_str(side.name())));
        }
        if !self.xaxis_visible {
            lines.push("ax.xaxis.set_visible(False)".to_string());
        }
        if !self.yaxis_visible {
            lines.push("ax.yaxis.set_visible(False)".to_string());
        }
        lines.join("\n")
    }
}

/// Move the label of one axis of `ax` to `side`.
///
/// ```python
/// ax.{axis}axis.set_label_position("{side}")
/// ```
///
/// Prelude: **No**
///
/// JSON data: **None**
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LabelSide {
    pub axis: Axis,
    pub side: Side,
}

impl Matplotlib for LabelSide {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> { None }

    fn py_cmd(&self) -> String {
        format!("ax.{}axis.set_label_position({})",
            lowercase(self.axis), py_str(self.side.name()))
    }
}

/// Limit the number of major ticks on a colorbar.
///
/// This relies on an existing local variable `cbar` produced by e.g.
/// [`commands::Colorbar`].
///
/// ```python
/// cbar.locator = mticker.MaxNLocator(nbins={nbins})
/// cbar.update_ticks()
/// ```
///
/// Prelude: **No**
///
/// JSON data: **None**
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorbarLocator {
    pub nbins: usize,
}

impl Matplotlib for ColorbarLocator {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> { None }

    fn py_cmd(&self) -> String {
        format!("cbar.locator = mticker.MaxNLocator(nbins={})\n\
            cbar.update_ticks()",
            self.nbins,
        )
    }
}

/// Independent two-point segments colored through a colormap, bound to
/// `name`.
///
/// ```python
/// {name} = mcollections.LineCollection(
///     data[0], cmap="{cmap}", norm=mcolors.Normalize({vmin}, {vmax}),
///     linewidth={linewidth}, alpha={alpha})
/// {name}.set_array(np.array(data[1]))
/// ax.add_collection({name})
/// ```
///
/// Prelude: **No**
///
/// JSON data: `[list[[[float, float], [float, float]]], list[float]]`
#[derive(Clone, Debug, PartialEq)]
pub struct LineSegments {
    pub name: String,
    pub segments: Vec<[(f64, f64); 2]>,
    pub values: Vec<f64>,
    pub cmap: String,
    pub vmin: f64,
    pub vmax: f64,
    pub linewidth: f64,
    pub alpha: f64,
}

impl Matplotlib for LineSegments {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> {
        let segments: Vec<Value> =
            self.segments.iter()
            .map(|seg| {
                let points: Vec<Value> =
                    seg.iter()
                    .map(|(x, y)| Value::from(vec![*x, *y]))
                    .collect();
                Value::Array(points)
            })
            .collect();
        let values: Vec<Value> =
            self.values.iter().copied().map(Value::from).collect();
        Some(Value::Array(vec![segments.into(), values.into()]))
    }

    fn py_cmd(&self) -> String {
        format!("\
            {name} = mcollections.LineCollection(\
            data[0], cmap={}, norm=mcolors.Normalize({}, {}), \
            linewidth={}, alpha={})\n\
            {name}.set_array(np.array(data[1]))\n\
            ax.add_collection({name})",
            py_str(&self.cmap),
            py_float(self.vmin),
            py_float(self.vmax),
            py_float(self.linewidth),
            py_float(self.alpha),
            name = self.name,
        )
    }
}

/// Adjust the spacing around and between subplots.
///
/// ```python
/// fig.subplots_adjust(**{opts})
/// ```
///
/// Prelude: **No**
///
/// JSON data: **None**
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SubplotsAdjust {
    pub opts: Vec<Opt>,
}

impl Matplotlib for SubplotsAdjust {
    fn is_prelude(&self) -> bool { false }

    fn data(&self) -> Option<Value> { None }

    fn py_cmd(&self) -> String {
        format!("fig.subplots_adjust({})", self.opts.as_py())
    }
}

impl MatplotlibOpts for SubplotsAdjust {
    fn kwarg<T: Into<PyValue>>(&mut self, key: &str, val: T) -> &mut Self {
        self.opts.push((key, val).into());
        self
    }
}

/// Builds the command list for one figure, tracking which names are bound.
struct Emitter<'a> {
    fig: &'a Figure,
    mpl: Mpl,
    // python expression for each panel
    names: Vec<String>,
    // panel index -> position in `AX`
    grid: HashMap<usize, usize>,
    dividers: HashSet<usize>,
    mappables: HashMap<ArtistRef, String>,
}

impl<'a> Emitter<'a> {
    fn new(fig: &'a Figure) -> Self {
        Self {
            fig,
            mpl: Mpl::default(),
            names: Vec::new(),
            grid: HashMap::new(),
            dividers: HashSet::new(),
            mappables: HashMap::new(),
        }
    }

    fn init(&mut self) {
        let fig = self.fig;
        let mut positions: Vec<GSPos> = Vec::new();
        for (k, panel) in fig.panels().iter().enumerate() {
            if let Placement::Grid { rows, cols } = &panel.placement {
                self.grid.insert(k, positions.len());
                self.names.push(format!("AX[{}]", positions.len()));
                positions.push(GSPos::new(rows.clone(), cols.clone()));
            } else {
                self.names.push(format!("ax{}", k));
            }
        }
        for (k, panel) in fig.panels().iter().enumerate() {
            let Some(&g) = self.grid.get(&k) else { continue; };
            let in_grid = |id: Option<PanelId>| {
                id.and_then(|PanelId(j)| self.grid.get(&j).copied())
            };
            positions[g].sharex = in_grid(panel.share_x);
            positions[g].sharey = in_grid(panel.share_y);
        }
        if positions.is_empty() {
            self.mpl.then(commands::focus_fig("plt.figure()"));
        } else {
            let ratios = |r: &[f64]| PyValue::list(r.iter().copied().map(py_num));
            let gridspec_kw = [
                opt("nrows", fig.grid.nrows() as i32),
                opt("ncols", fig.grid.ncols() as i32),
                opt("height_ratios", ratios(&fig.grid.height_ratios)),
                opt("width_ratios", ratios(&fig.grid.width_ratios)),
            ];
            self.mpl.then(commands::init_gridspec(gridspec_kw, positions));
        }
        self.mpl.then(FigureSize { width: fig.size.0, height: fig.size.1 });
    }

    fn create_panel(&mut self, k: usize, panel: &Panel) {
        let name = self.names[k].clone();
        match &panel.placement {
            Placement::Grid { .. } => {
                self.mpl.then(commands::focus_ax(&name));
            },
            Placement::Divided { parent, side, size, pad } => {
                let mut cmd = AppendAxes {
                    parent: self.names[parent.0].clone(),
                    divider: format!("div{}", parent.0),
                    new_divider: self.dividers.insert(parent.0),
                    name: name.clone(),
                    side: *side,
                    size: *size,
                    pad: *pad,
                    opts: Vec::new(),
                };
                if let Some(PanelId(j)) = panel.share_x {
                    cmd.kwarg("sharex", PyValue::Var(self.names[j].clone()));
                }
                if let Some(PanelId(j)) = panel.share_y {
                    cmd.kwarg("sharey", PyValue::Var(self.names[j].clone()));
                }
                self.mpl.then(cmd);
                self.mpl.then(commands::focus_ax(&name));
            },
            Placement::Inset { parent, width, height, loc } => {
                if let (AxesSize::Percent(w), AxesSize::Percent(h))
                    = (*width, *height)
                {
                    let (w, h) = (w / 100.0, h / 100.0);
                    let (x, y) = loc.anchor(w, h);
                    self.mpl.then(commands::focus_ax(&self.names[parent.0]));
                    self.mpl.then(commands::inset_axes(x, y, w, h));
                    self.mpl.then(commands::raw(&format!("{} = ax", name)));
                } else {
                    self.mpl.then(InsetLocator {
                        parent: self.names[parent.0].clone(),
                        name: name.clone(),
                        width: *width,
                        height: *height,
                        loc: *loc,
                    });
                    self.mpl.then(commands::focus_ax(&name));
                }
            },
        }
        if !matches!(panel.placement, Placement::Divided { .. }) {
            let shares = [(Axis::X, panel.share_x), (Axis::Y, panel.share_y)];
            for (axis, target) in shares.into_iter() {
                let Some(PanelId(j)) = target else { continue; };
                // grid-to-grid sharing is set up by `InitGridSpec`
                if self.grid.contains_key(&k) && self.grid.contains_key(&j) {
                    continue;
                }
                self.mpl.then(ShareAxis { axis, target: self.names[j].clone() });
            }
        }
        let frame = Frame::of(panel);
        if !frame.is_plain() {
            self.mpl.then(frame);
        }
    }

    fn artist(&mut self, aref: ArtistRef, artist: &Artist) -> PlotResult<()> {
        match artist {
            Artist::Line { x, y, style, coords, clip } => {
                let mut cmd =
                    commands::plot(x.iter().copied(), y.iter().copied())
                    .oo(line_opts(style));
                if let Some(t) = transform(*coords) { cmd = cmd.o("transform", t); }
                if !*clip { cmd = cmd.o("clip_on", false); }
                self.mpl.then(cmd);
            },
            Artist::Image { data, extent, cmap, norm, vmin, vmax } => {
                let (xmin, xmax, ymin, ymax) = extent.as_tuple();
                let cmd =
                    commands::imshow(data.rows().into_iter().map(|row| row.to_vec()))
                    .o("origin", "lower")
                    .o("extent", PyValue::list([xmin, xmax, ymin, ymax].map(py_num)))
                    .o("aspect", "auto")
                    .o("interpolation", "none")
                    .o("cmap", py_escape(cmap.name()));
                let (lo, hi) = (py_float(*vmin), py_float(*vmax));
                let cmd = match norm {
                    Norm::Linear => cmd.o("vmin", py_num(*vmin)).o("vmax", py_num(*vmax)),
                    Norm::Log => cmd.o("norm", PyValue::Var(format!(
                        "mcolors.LogNorm(vmin={}, vmax={})", lo, hi))),
                    Norm::SymLog { linthresh } => cmd.o("norm", PyValue::Var(format!(
                        "mcolors.SymLogNorm(linthresh={}, vmin={}, vmax={})",
                        py_float(*linthresh), lo, hi,
                    ))),
                };
                let name = mappable_name(aref);
                self.mpl.then(cmd);
                self.mpl.then(commands::raw(&format!("{} = im", name)));
                self.mappables.insert(aref, name);
            },
            Artist::HLine { y, style } => {
                self.mpl.then(commands::axhline(*y).oo(line_opts(style)));
            },
            Artist::VLine { x, style } => {
                self.mpl.then(commands::axvline(*x).oo(line_opts(style)));
            },
            Artist::Text { x, y, text, coords, color, ha, va, vertical } => {
                let mut opts: Vec<Opt> = Vec::new();
                if let Some(c) = color { opts.push(opt("color", py_color(c))); }
                if let Some(h) = ha { opts.push(opt("ha", h.name())); }
                if let Some(v) = va { opts.push(opt("va", v.name())); }
                if *vertical { opts.push(opt("rotation", "vertical")); }
                match (coords, transform(*coords)) {
                    (Coords::Panel, _) => {
                        self.mpl.then(commands::axtext(*x, *y, text).oo(opts));
                    },
                    (_, None) => {
                        self.mpl.then(commands::text(*x, *y, text).oo(opts));
                    },
                    (_, Some(t)) => {
                        self.mpl.then(
                            commands::text(*x, *y, text).oo(opts).o("transform", t));
                    },
                }
            },
            Artist::Segments { segments, values, cmap, vmin, vmax, linewidth, alpha } => {
                let name = mappable_name(aref);
                self.mpl.then(LineSegments {
                    name: name.clone(),
                    segments: segments.clone(),
                    values: values.clone(),
                    cmap: cmap.name().to_string(),
                    vmin: *vmin,
                    vmax: *vmax,
                    linewidth: *linewidth,
                    alpha: *alpha,
                });
                self.mappables.insert(aref, name);
            },
            Artist::Colorbar {
                mappable,
                orientation,
                label,
                max_ticks,
                ticks_side,
                accent,
                tick_width,
                label_size,
            } => {
                let source = self.mappables.get(mappable).cloned()
                    .ok_or(PlotError::NotMappable {
                        panel: mappable.panel.0,
                        index: mappable.index,
                    })?;
                // the colorbar fills the focused panel
                self.mpl.then(commands::focus_im(&source));
                self.mpl.then(
                    commands::colorbar()
                    .o("cax", PyValue::Var("ax".to_string()))
                    .o("orientation", orientation.name())
                );
                if let Some(nbins) = max_ticks {
                    self.mpl.then(ColorbarLocator { nbins: *nbins });
                }
                if let Some(label) = label {
                    let mut cmd = commands::clabel(&py_escape(label));
                    if let Some(c) = accent { cmd = cmd.o("color", py_color(c)); }
                    self.mpl.then(cmd);
                }
                if let Some(side) = ticks_side {
                    let (axis, axis2) = match orientation {
                        Orientation::Horizontal => (Axis::X, Axis2::X),
                        Orientation::Vertical => (Axis::Y, Axis2::Y),
                    };
                    self.mpl.then(tick_side(axis2, *side));
                    self.mpl.then(LabelSide { axis, side: *side });
                }
                let mut opts: Vec<Opt> = Vec::new();
                if let Some(c) = accent {
                    opts.push(opt("color", py_color(c)));
                    opts.push(opt("labelcolor", py_color(c)));
                }
                if let Some(w) = tick_width { opts.push(opt("width", py_num(*w))); }
                if let Some(s) = label_size { opts.push(opt("labelsize", py_num(*s))); }
                if !opts.is_empty() {
                    self.mpl.then(commands::tick_params(Axis2::Both).oo(opts));
                }
            },
        }
        Ok(())
    }

    fn finish_panel(&mut self, panel: &Panel) {
        if let Some(label) = &panel.xlabel {
            self.mpl.then(commands::xlabel(&py_escape(label)));
        }
        if let Some(label) = &panel.ylabel {
            self.mpl.then(commands::ylabel(&py_escape(label)));
        }
        if let Some((lo, hi)) = panel.xlim {
            self.mpl.then(commands::xlim(finite(lo), finite(hi)));
        }
        if let Some((lo, hi)) = panel.ylim {
            self.mpl.then(commands::ylim(finite(lo), finite(hi)));
        }
        if let Some(side) = panel.ytick_side {
            self.mpl.then(tick_side(Axis2::Y, side));
        }
        if let Some(side) = panel.ylabel_side {
            self.mpl.then(LabelSide { axis: Axis::Y, side });
        }
        if panel.grid {
            self.mpl.then(commands::grid(true));
        }
    }

    fn adjust(&mut self) {
        let items = self.fig.adjust.items();
        if !items.is_empty() {
            let opts = items.into_iter().map(|(k, v)| opt(k, py_num(v)));
            self.mpl.then(SubplotsAdjust::default().oo(opts));
        }
    }

    fn emit(mut self) -> PlotResult<Mpl> {
        let fig = self.fig;
        self.mpl.then(commands::DefPrelude);
        self.mpl.then(commands::prelude(EXTRA_IMPORTS));
        self.init();
        for (k, panel) in fig.panels().iter().enumerate() {
            log::trace!(
                target: "sliceplots",
                "rendering panel {} with {} artists", k, panel.artists.len(),
            );
            self.create_panel(k, panel);
            for (index, artist) in panel.artists.iter().enumerate() {
                self.artist(ArtistRef { panel: PanelId(k), index }, artist)?;
            }
            self.finish_panel(panel);
        }
        self.adjust();
        if let Some(first) = self.names.first() {
            let first = first.clone();
            self.mpl.then(commands::focus_ax(&first));
        }
        Ok(self.mpl)
    }
}

impl Figure {
    /// Construct an [`Mpl`] holding every command needed to draw this figure,
    /// with `fig` bound to the figure and `ax` left on the first panel.
    pub fn mpl(&self) -> PlotResult<Mpl> {
        Emitter::new(self).emit()
    }

    /// Generate the Python script that draws this figure.
    ///
    /// Array data is read from a JSON file written next to the script when the
    /// figure is actually rendered; see [`Mpl::code`].
    pub fn to_python(&self) -> PlotResult<String> {
        let code = self.mpl()?.code(Run::Build);
        log::debug!(
            target: "sliceplots",
            "rendered {} panels into {} bytes of script",
            self.num_panels(), code.len(),
        );
        Ok(code)
    }

    /// Render the figure and save it to `path`; the image format follows the
    /// file extension.
    pub fn save<P>(&self, path: P) -> PlotResult<()>
    where P: AsRef<Path>
    {
        let path = path.as_ref();
        log::debug!(target: "sliceplots", "saving figure to {}", path.display());
        self.mpl()?.run(Run::Save(path.to_path_buf()))?;
        Ok(())
    }

    /// Render the figure in an interactive window.
    pub fn show(&self) -> PlotResult<()> {
        self.mpl()?.run(Run::Show)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matplotlib::serde_json::json;
    use ndarray::array;
    use crate::{
        figure::{ GridSpec, Panel },
        index::Extent,
        style::{ Colormap, Dash },
    };

    fn line(x: Vec<f64>, y: Vec<f64>) -> Artist {
        Artist::Line {
            x,
            y,
            style: LineStyle::new(),
            coords: Coords::Data,
            clip: true,
        }
    }

    #[test]
    fn python_literals() {
        assert_eq!(py_float(1.0), "1.0");
        assert_eq!(py_float(-0.25), "-0.25");
        assert_eq!(py_float(f64::NAN), "float(\"nan\")");
        assert_eq!(py_float(f64::NEG_INFINITY), "-float(\"inf\")");
        assert_eq!(py_str(r"$\rho$ (cm$^{-3}$)"), r#""$\\rho$ (cm$^{-3}$)""#);
        assert_eq!(py_str("say \"hi\""), r#""say \"hi\"""#);
        assert_eq!(py_size(AxesSize::Percent(5.0)), "\"5%\"");
        assert_eq!(py_size(AxesSize::Inches(0.3)), "0.3");
        assert_eq!(py_num(0.5), PyValue::Float(0.5));
        assert_eq!(py_num(f64::INFINITY).as_py(), "float(\"inf\")");
    }

    #[test]
    fn renders_panels_artists_and_colorbars() {
        let mut fig = Figure::with_grid((8.0, 8.0), GridSpec::new(&[1.0, 3.0], &[1.0]));
        let main = fig.add_panel(Panel::new(Placement::cell(1, 0))).unwrap();
        let mut strip = Panel::new(Placement::cell(0, 0));
        strip.share_x = Some(main);
        strip.spines.hide(Side::Top);
        strip.xaxis_visible = false;
        let strip = fig.add_panel(strip).unwrap();
        let image = fig.draw(main, Artist::Image {
            data: array![[0.0, 1.0], [2.0, 3.0]],
            extent: Extent::new(0.0, 1.0, 0.0, 1.0),
            cmap: Colormap::viridis(),
            norm: Norm::Linear,
            vmin: 0.0,
            vmax: 3.0,
        }).unwrap();
        fig.draw(strip, Artist::Line {
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.0],
            style: LineStyle::new().dash(Dash::Dashed).color("red"),
            coords: Coords::Data,
            clip: true,
        }).unwrap();
        let cax = fig.add_panel(Panel::new(Placement::Inset {
            parent: main,
            width: AxesSize::Percent(50.0),
            height: AxesSize::Percent(25.0),
            loc: Location::UpperCenter,
        })).unwrap();
        fig.draw(cax, Artist::Colorbar {
            mappable: image,
            orientation: Orientation::Horizontal,
            label: Some("z".to_string()),
            max_ticks: Some(4),
            ticks_side: Some(Side::Top),
            accent: None,
            tick_width: None,
            label_size: None,
        }).unwrap();
        fig.adjust.hspace = Some(0.03);

        let code = fig.to_python().unwrap();
        assert!(code.contains(
            "gs = fig.add_gridspec(nrows=2, ncols=1, height_ratios=[1, 3], width_ratios=[1])"));
        assert!(code.contains(
            "    fig.add_subplot(gs[1:2, 0:1]),\n    fig.add_subplot(gs[0:1, 0:1]),\n"));
        assert!(code.contains("AX[1].sharex(AX[0])"));
        assert!(code.contains("fig.set_size_inches(8.0, 8.0)"));
        assert!(code.contains(
            "im = ax.imshow(data, origin=\"lower\", extent=[0, 1, 0, 1], \
            aspect=\"auto\", interpolation=\"none\", cmap=\"viridis\", vmin=0, vmax=3)"));
        assert!(code.contains("a0_0 = im"));
        assert!(code.contains("ax = AX[1]\n"));
        assert!(code.contains("ax.spines[\"top\"].set_visible(False)"));
        assert!(code.contains("ax.xaxis.set_visible(False)"));
        assert!(code.contains("ax.plot(data[0], data[1], color=\"red\", linestyle=\"--\")"));
        assert!(code.contains("ax = ax.inset_axes([0.25, 0.75, 0.5, 0.25])\nax2 = ax"));
        assert!(code.contains("im = a0_0\ncbar = fig.colorbar(im, ax=ax, cax=ax, orientation=\"horizontal\")"));
        assert!(code.contains("cbar.locator = mticker.MaxNLocator(nbins=4)"));
        assert!(code.contains("cbar.set_label(\"z\")"));
        assert!(code.contains(
            "ax.tick_params(\"x\", top=True, labeltop=True, bottom=False, labelbottom=False)"));
        assert!(code.contains("ax.xaxis.set_label_position(\"top\")"));
        assert!(code.contains("fig.subplots_adjust(hspace=0.03)"));
        // `ax` ends on the first panel
        assert!(code.trim_end().ends_with("ax = AX[0]"));
    }

    #[test]
    fn array_data_stays_out_of_the_script() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        fig.draw(ax, line(vec![0.125, 0.375], vec![0.625, 0.875])).unwrap();
        let code = fig.to_python().unwrap();
        assert!(code.contains("alldata = json.loads(datafile.read())"));
        assert!(code.contains("data = alldata[0]\nax.plot(data[0], data[1])"));
        for x in ["0.125", "0.375", "0.625", "0.875"] {
            assert!(!code.contains(x));
        }
    }

    #[test]
    fn line_segments_carry_their_data() {
        let segs = LineSegments {
            name: "a0_0".to_string(),
            segments: vec![[(0.0, 1.0), (2.0, 3.0)]],
            values: vec![0.5],
            cmap: "viridis".to_string(),
            vmin: 0.0,
            vmax: 1.0,
            linewidth: 2.0,
            alpha: 1.0,
        };
        assert_eq!(segs.data(), Some(json!([[[[0.0, 1.0], [2.0, 3.0]]], [0.5]])));
        let code = segs.py_cmd();
        assert!(code.starts_with("a0_0 = mcollections.LineCollection(data[0], cmap=\"viridis\""));
        assert!(code.contains("norm=mcolors.Normalize(0.0, 1.0), linewidth=2.0, alpha=1.0)"));
        assert!(code.ends_with("ax.add_collection(a0_0)"));
    }

    #[test]
    fn log_norm_carries_color_limits() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        fig.draw(ax, Artist::Image {
            data: array![[1.0, 10.0]],
            extent: Extent::new(0.0, 1.0, 0.0, 1.0),
            cmap: Colormap::new("magma"),
            norm: Norm::Log,
            vmin: 1.0,
            vmax: 10.0,
        }).unwrap();
        let code = fig.to_python().unwrap();
        assert!(code.contains("norm=mcolors.LogNorm(vmin=1.0, vmax=10.0)"));
        assert!(!code.contains(", vmin="));
        assert!(code.contains("cmap=\"magma\""));
    }

    #[test]
    fn colorbar_needs_an_earlier_mappable() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        let plotted = fig.draw(ax, line(vec![0.0], vec![0.0])).unwrap();
        fig.draw(ax, Artist::Colorbar {
            mappable: plotted,
            orientation: Orientation::Vertical,
            label: None,
            max_ticks: None,
            ticks_side: None,
            accent: None,
            tick_width: None,
            label_size: None,
        }).unwrap();
        assert!(matches!(
            fig.to_python(),
            Err(PlotError::NotMappable { panel: 0, index: 0 }),
        ));
    }

    #[test]
    fn divided_panels_share_one_divider() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        for side in [Side::Right, Side::Top] {
            fig.add_panel(Panel::new(Placement::Divided {
                parent: ax,
                side,
                size: AxesSize::Percent(5.0),
                pad: 0.05,
            })).unwrap();
        }
        let code = fig.to_python().unwrap();
        assert_eq!(code.matches("div0 = make_axes_locatable(AX[0])").count(), 1);
        assert!(code.contains("ax1 = div0.append_axes(\"right\", size=\"5%\", pad=0.05)\nax = ax1"));
        assert!(code.contains("ax2 = div0.append_axes(\"top\", size=\"5%\", pad=0.05)\nax = ax2"));
    }

    #[test]
    fn inches_inset_uses_the_locator() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        let mut inset = Panel::new(Placement::Inset {
            parent: ax,
            width: AxesSize::Inches(0.5),
            height: AxesSize::Percent(30.0),
            loc: Location::UpperRight,
        });
        inset.share_y = Some(ax);
        fig.add_panel(inset).unwrap();
        let code = fig.to_python().unwrap();
        assert!(code.contains("ax1 = inset_axes(AX[0], width=0.5, height=\"30%\", loc=1)\nax = ax1"));
        assert!(code.contains("ax.sharey(AX[0])"));
    }

    #[test]
    fn panel_finishing() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        let panel = fig.panel_mut(ax).unwrap();
        panel.xlabel = Some(r"$\theta$".to_string());
        panel.xlim = Some((f64::NAN, 2.0));
        panel.ylim = Some((-1.0, 1.5));
        panel.ytick_side = Some(Side::Right);
        panel.ylabel_side = Some(Side::Right);
        panel.grid = true;
        let code = fig.to_python().unwrap();
        assert!(code.contains(r#"ax.set_xlabel("$\\theta$")"#));
        assert!(code.contains("ax.set_xlim(None, 2)"));
        assert!(code.contains("ax.set_ylim(-1, 1.5)"));
        assert!(code.contains(
            "ax.tick_params(\"y\", left=False, labelleft=False, right=True, labelright=True)"));
        assert!(code.contains("ax.yaxis.set_label_position(\"right\")"));
        assert!(code.contains("ax.grid(True, )"));
    }

    #[test]
    fn blended_text_and_panel_text() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        for coords in [Coords::Panel, Coords::YTickData] {
            fig.draw(ax, Artist::Text {
                x: 0.5,
                y: 0.5,
                text: "label".to_string(),
                coords,
                color: Some(Color::new("gray")),
                ha: None,
                va: None,
                vertical: coords == Coords::YTickData,
            }).unwrap();
        }
        let code = fig.to_python().unwrap();
        assert!(code.contains(
            "ax.text(data[0], data[1], data[2], transform=ax.transAxes, color=\"gray\")"));
        assert!(code.contains(
            "color=\"gray\", rotation=\"vertical\", \
            transform=mtransforms.blended_transform_factory(\
            ax.get_yaxis_text1_transform(0)[0], ax.transData))"));
    }

    #[test]
    fn empty_figure_still_builds() {
        let fig = Figure::new((4.0, 4.0));
        let code = fig.to_python().unwrap();
        assert!(code.contains("fig = plt.figure()"));
        assert!(!code.contains("add_gridspec"));
    }

    #[test]
    fn mpl_builds_for_a_valid_figure() {
        let (fig, _) = Figure::single((4.0, 4.0));
        assert!(fig.mpl().is_ok());
    }
}
