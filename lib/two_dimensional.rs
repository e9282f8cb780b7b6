//! Pseudocolor plots of a 2D field, with optional 1D slices through a row and a
//! column drawn in strips beside the main panel.
//!
//! The field is indexed `[row, column]`, with rows following the vertical axis
//! and columns the horizontal axis. Everything is cropped to the requested
//! extent before anything is drawn; see [`crate::index`] for the crop rules.

use std::fmt;
use ndarray::{ self as nd, ArrayView1, ArrayView2 };
use crate::{
    config::{ PlotDefaults, SubplotAdjust },
    error::{ PlotError, PlotResult },
    figure::{
        Artist,
        ArtistRef,
        Coords,
        Figure,
        GridSpec,
        Panel,
        PanelId,
        Placement,
    },
    index::{
        check_field_shape,
        crop_axis,
        crop_field,
        nearest_index,
        CropRange,
        Extent,
    },
    style::{
        Colormap,
        HAlign,
        LineStyle,
        Location,
        Norm,
        Orientation,
        Side,
        VAlign,
    },
    utils::FExtremum,
};

/// Arrangement of the main panel and slice strips, with the resolved slice
/// indices into the cropped field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SliceLayout {
    /// The main panel alone.
    NoSlice,
    /// A strip above the main panel showing `data[row, :]`.
    HorizontalOnly { row: usize },
    /// A strip right of the main panel showing `data[:, col]`.
    VerticalOnly { col: usize },
    /// Both strips, in a 2x2 grid with the top-right cell left empty.
    Both { row: usize, col: usize },
}

impl SliceLayout {
    pub fn select(row: Option<usize>, col: Option<usize>) -> Self {
        match (row, col) {
            (None, None) => Self::NoSlice,
            (Some(row), None) => Self::HorizontalOnly { row },
            (None, Some(col)) => Self::VerticalOnly { col },
            (Some(row), Some(col)) => Self::Both { row, col },
        }
    }

    pub fn row(&self) -> Option<usize> {
        match self {
            Self::HorizontalOnly { row } | Self::Both { row, .. } => Some(*row),
            _ => None,
        }
    }

    pub fn col(&self) -> Option<usize> {
        match self {
            Self::VerticalOnly { col } | Self::Both { col, .. } => Some(*col),
            _ => None,
        }
    }

    /// Strips get one part of height or width against three for the main
    /// panel.
    pub fn grid(&self) -> GridSpec {
        match self {
            Self::NoSlice => GridSpec::single(),
            Self::HorizontalOnly { .. } => GridSpec::new(&[1.0, 3.0], &[1.0]),
            Self::VerticalOnly { .. } => GridSpec::new(&[1.0], &[3.0, 1.0]),
            Self::Both { .. } => GridSpec::new(&[1.0, 3.0], &[3.0, 1.0]),
        }
    }

    /// Number of grid panels, not counting a colorbar.
    pub fn num_panels(&self) -> usize {
        1 + usize::from(self.row().is_some()) + usize::from(self.col().is_some())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NoSlice => "no slice",
            Self::HorizontalOnly { .. } => "horizontal only",
            Self::VerticalOnly { .. } => "vertical only",
            Self::Both { .. } => "both",
        }
    }
}

/// Options for [`Plot2D`].
#[derive(Clone, Debug)]
pub struct Plot2DOptions {
    /// Region to show; defaults to the full range of both axes.
    pub extent: Option<Extent>,
    /// Lower color limit; defaults to the minimum of the cropped field.
    pub vmin: Option<f64>,
    /// Upper color limit; defaults to the maximum of the cropped field.
    pub vmax: Option<f64>,
    /// Defaults to `defaults.colormap`.
    pub cmap: Option<Colormap>,
    pub norm: Norm,
    /// Vertical-axis value of the row to draw in a strip above the main panel.
    pub hslice_val: Option<f64>,
    /// Horizontal-axis value of the column to draw in a strip right of the
    /// main panel.
    pub vslice_val: Option<f64>,
    /// Overlaid on `defaults.slice_style` for the horizontal slice.
    pub hslice_style: LineStyle,
    /// Overlaid on `defaults.slice_style` for the vertical slice.
    pub vslice_style: LineStyle,
    /// Draw an inset colorbar in the main panel (default `true`).
    pub cbar: bool,
    /// Free text drawn in the lower-left corner of the main panel.
    pub text: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Label for field values, used on the colorbar and slice strips.
    pub zlabel: Option<String>,
    /// Defaults to `defaults.figsize_2d`.
    pub figsize: Option<(f64, f64)>,
    pub defaults: PlotDefaults,
}

impl Default for Plot2DOptions {
    fn default() -> Self {
        Self {
            extent: None,
            vmin: None,
            vmax: None,
            cmap: None,
            norm: Norm::Linear,
            hslice_val: None,
            vslice_val: None,
            hslice_style: LineStyle::new(),
            vslice_style: LineStyle::new(),
            cbar: true,
            text: None,
            xlabel: None,
            ylabel: None,
            zlabel: None,
            figsize: None,
            defaults: PlotDefaults::default(),
        }
    }
}

/// A composed 2D plot: the cropped data it shows and the figure drawing it.
#[derive(Clone, Debug)]
pub struct Plot2D {
    /// Cropped field.
    pub data: nd::Array2<f64>,
    /// Cropped horizontal axis (field columns).
    pub h_axis: nd::Array1<f64>,
    /// Cropped vertical axis (field rows).
    pub v_axis: nd::Array1<f64>,
    /// Region the image is stretched over.
    pub extent: Extent,
    pub vmin: f64,
    pub vmax: f64,
    pub layout: SliceLayout,
    pub figure: Figure,
    /// Main image panel; always the figure's first panel.
    pub main: PanelId,
    pub image: ArtistRef,
    pub hslice_ax: Option<PanelId>,
    pub vslice_ax: Option<PanelId>,
    pub cbar_ax: Option<PanelId>,
}

// resolved values shared by the per-layout drawing functions
struct Ctx<'a> {
    data: &'a nd::Array2<f64>,
    h_axis: &'a nd::Array1<f64>,
    v_axis: &'a nd::Array1<f64>,
    extent: Extent,
    vmin: f64,
    vmax: f64,
    opts: &'a Plot2DOptions,
}

struct Panels {
    main: PanelId,
    image: ArtistRef,
    hslice_ax: Option<PanelId>,
    vslice_ax: Option<PanelId>,
}

impl<'a> Ctx<'a> {
    fn main_panel(&self, fig: &mut Figure, placement: Placement)
        -> PlotResult<(PanelId, ArtistRef)>
    {
        let opts = self.opts;
        let cmap = opts.cmap.clone().unwrap_or_else(|| opts.defaults.colormap.clone());
        let mut panel = Panel::new(placement);
        panel.xlabel = opts.xlabel.clone();
        panel.ylabel = opts.ylabel.clone();
        let index = panel.draw(Artist::Image {
            data: self.data.clone(),
            extent: self.extent,
            cmap,
            norm: opts.norm,
            vmin: self.vmin,
            vmax: self.vmax,
        });
        let main = fig.add_panel(panel)?;
        Ok((main, ArtistRef { panel: main, index }))
    }

    fn hslice_style(&self) -> LineStyle {
        self.opts.defaults.slice_style.merged(&self.opts.hslice_style)
    }

    fn vslice_style(&self) -> LineStyle {
        self.opts.defaults.slice_style.merged(&self.opts.vslice_style)
    }

    fn hstrip(&self, fig: &mut Figure, main: PanelId, placement: Placement, row: usize)
        -> PlotResult<PanelId>
    {
        let mut strip = Panel::new(placement);
        strip.share_x = Some(main);
        strip.xmargin = Some(0.0);
        strip.draw(Artist::Line {
            x: self.h_axis.to_vec(),
            y: self.data.row(row).to_vec(),
            style: self.hslice_style(),
            coords: Coords::Data,
            clip: true,
        });
        strip.ylim = Some((self.vmin, self.vmax));
        strip.ylabel = self.opts.zlabel.clone();
        strip.xaxis_visible = false;
        strip.spines.hide(Side::Top);
        strip.spines.hide(Side::Bottom);
        strip.spines.hide(Side::Right);
        let strip = fig.add_panel(strip)?;

        let y = self.v_axis[row];
        let panel = fig.panel_mut(main)?;
        panel.draw(Artist::HLine { y, style: self.hslice_style() });
        panel.draw(Artist::Text {
            x: 0.0,
            y,
            text: format!("{:.1}", y),
            coords: Coords::YTickData,
            color: self.hslice_style().color,
            ha: Some(HAlign::Right),
            va: Some(VAlign::Center),
            vertical: false,
        });
        Ok(strip)
    }

    fn vstrip(&self, fig: &mut Figure, main: PanelId, placement: Placement, col: usize)
        -> PlotResult<PanelId>
    {
        let mut strip = Panel::new(placement);
        strip.share_y = Some(main);
        strip.ymargin = Some(0.0);
        strip.draw(Artist::Line {
            x: self.data.column(col).to_vec(),
            y: self.v_axis.to_vec(),
            style: self.vslice_style(),
            coords: Coords::Data,
            clip: true,
        });
        strip.xlim = Some((self.vmin, self.vmax));
        strip.xlabel = self.opts.zlabel.clone();
        strip.yaxis_visible = false;
        strip.spines.hide(Side::Top);
        strip.spines.hide(Side::Left);
        strip.spines.hide(Side::Right);
        let strip = fig.add_panel(strip)?;

        let x = self.h_axis[col];
        let panel = fig.panel_mut(main)?;
        panel.draw(Artist::VLine { x, style: self.vslice_style() });
        panel.draw(Artist::Text {
            x,
            y: 0.0,
            text: format!("{:.1}", x),
            coords: Coords::DataXTick,
            color: self.vslice_style().color,
            ha: Some(HAlign::Center),
            va: Some(VAlign::Top),
            vertical: false,
        });
        Ok(strip)
    }

    fn spacing(&self) -> Option<f64> { Some(self.opts.defaults.slice_spacing) }

    fn draw_no_slice(&self, fig: &mut Figure) -> PlotResult<Panels> {
        let (main, image) = self.main_panel(fig, Placement::cell(0, 0))?;
        Ok(Panels { main, image, hslice_ax: None, vslice_ax: None })
    }

    fn draw_horizontal_only(&self, fig: &mut Figure, row: usize)
        -> PlotResult<Panels>
    {
        let (main, image) = self.main_panel(fig, Placement::cell(1, 0))?;
        let h = self.hstrip(fig, main, Placement::cell(0, 0), row)?;
        fig.adjust = fig.adjust.merged(
            &SubplotAdjust { hspace: self.spacing(), ..Default::default() });
        Ok(Panels { main, image, hslice_ax: Some(h), vslice_ax: None })
    }

    fn draw_vertical_only(&self, fig: &mut Figure, col: usize)
        -> PlotResult<Panels>
    {
        let (main, image) = self.main_panel(fig, Placement::cell(0, 0))?;
        let v = self.vstrip(fig, main, Placement::cell(0, 1), col)?;
        fig.adjust = fig.adjust.merged(
            &SubplotAdjust { wspace: self.spacing(), ..Default::default() });
        Ok(Panels { main, image, hslice_ax: None, vslice_ax: Some(v) })
    }

    fn draw_both(&self, fig: &mut Figure, row: usize, col: usize)
        -> PlotResult<Panels>
    {
        let (main, image) = self.main_panel(fig, Placement::cell(1, 0))?;
        let h = self.hstrip(fig, main, Placement::cell(0, 0), row)?;
        let v = self.vstrip(fig, main, Placement::cell(1, 1), col)?;
        fig.adjust = fig.adjust.merged(&SubplotAdjust {
            hspace: self.spacing(),
            wspace: self.spacing(),
            ..Default::default()
        });
        Ok(Panels { main, image, hslice_ax: Some(h), vslice_ax: Some(v) })
    }

    fn inset_colorbar(&self, fig: &mut Figure, main: PanelId, image: ArtistRef)
        -> PlotResult<PanelId>
    {
        let inset = &self.opts.defaults.inset_colorbar;
        let accent = self.opts.defaults.accent_color.clone();
        let mut panel = Panel::new(Placement::Inset {
            parent: main,
            width: inset.width,
            height: inset.height,
            loc: Location::UpperCenter,
        });
        panel.draw(Artist::Colorbar {
            mappable: image,
            orientation: Orientation::Horizontal,
            label: self.opts.zlabel.clone(),
            max_ticks: None,
            ticks_side: Some(Side::Top),
            accent: Some(accent),
            tick_width: Some(inset.tick_width),
            label_size: Some(inset.label_size),
        });
        fig.add_panel(panel)
    }
}

fn slice_index(axis: &nd::Array1<f64>, value: f64, name: &str) -> PlotResult<usize> {
    if let Some((lo, hi)) = axis.frange() {
        if value < lo || value > hi {
            log::warn!(
                target: "sliceplots",
                "{} slice at {} lies outside the shown range [{}, {}]",
                name, value, lo, hi,
            );
        }
    }
    Ok(nearest_index(axis, value)?)
}

impl Plot2D {
    /// Compose a plot of `arr2d` in a new figure of size `opts.figsize`.
    pub fn new(
        arr2d: ArrayView2<f64>,
        h_axis: ArrayView1<f64>,
        v_axis: ArrayView1<f64>,
        opts: Plot2DOptions,
    ) -> PlotResult<Self>
    {
        let figsize = opts.figsize.unwrap_or(opts.defaults.figsize_2d);
        Self::new_in(Figure::new(figsize), arr2d, h_axis, v_axis, opts)
    }

    /// Compose a plot of `arr2d` in `fig`, which must have no panels yet. The
    /// figure's grid is replaced to fit the layout; its size and subplot
    /// settings are kept.
    pub fn new_in(
        mut fig: Figure,
        arr2d: ArrayView2<f64>,
        h_axis: ArrayView1<f64>,
        v_axis: ArrayView1<f64>,
        opts: Plot2DOptions,
    ) -> PlotResult<Self>
    {
        if !fig.is_empty() {
            return Err(PlotError::InvalidValue {
                key: "figure".to_string(),
                value: format!("{} existing panels", fig.num_panels()),
            });
        }
        check_field_shape(arr2d, h_axis, v_axis)?;

        let extent = match opts.extent {
            Some(ext) => ext,
            None => Extent::of_axes(h_axis, v_axis)?,
        };
        let cols = CropRange::resolve(h_axis, extent.xmin, extent.xmax, "x")?;
        let rows = CropRange::resolve(v_axis, extent.ymin, extent.ymax, "y")?;
        let data = crop_field(arr2d, rows, cols);
        let h_crop = crop_axis(h_axis, cols);
        let v_crop = crop_axis(v_axis, rows);

        let (dmin, dmax) = data.frange().unwrap_or_else(|| {
            log::warn!(target: "sliceplots", "cropped field has no finite values");
            (0.0, 1.0)
        });
        let vmin = opts.vmin.unwrap_or(dmin);
        let vmax = opts.vmax.unwrap_or(dmax);

        let row = opts.hslice_val
            .map(|y| slice_index(&v_crop, y, "horizontal"))
            .transpose()?;
        let col = opts.vslice_val
            .map(|x| slice_index(&h_crop, x, "vertical"))
            .transpose()?;
        let layout = SliceLayout::select(row, col);
        log::debug!(
            target: "sliceplots",
            "2D plot: {}x{} samples, color limits [{}, {}], layout {}",
            data.nrows(), data.ncols(), vmin, vmax, layout.name(),
        );

        fig.grid = layout.grid();
        let ctx = Ctx {
            data: &data,
            h_axis: &h_crop,
            v_axis: &v_crop,
            extent,
            vmin,
            vmax,
            opts: &opts,
        };
        let Panels { main, image, hslice_ax, vslice_ax } = match layout {
            SliceLayout::NoSlice
                => ctx.draw_no_slice(&mut fig)?,
            SliceLayout::HorizontalOnly { row }
                => ctx.draw_horizontal_only(&mut fig, row)?,
            SliceLayout::VerticalOnly { col }
                => ctx.draw_vertical_only(&mut fig, col)?,
            SliceLayout::Both { row, col }
                => ctx.draw_both(&mut fig, row, col)?,
        };
        if let Some(text) = opts.text.as_ref().filter(|t| !t.is_empty()) {
            fig.draw(main, Artist::Text {
                x: 0.02,
                y: 0.02,
                text: text.clone(),
                coords: Coords::Panel,
                color: Some(opts.defaults.accent_color.clone()),
                ha: None,
                va: None,
                vertical: false,
            })?;
        }
        let cbar_ax = if opts.cbar {
            Some(ctx.inset_colorbar(&mut fig, main, image)?)
        } else {
            None
        };

        Ok(Self {
            data,
            h_axis: h_crop,
            v_axis: v_crop,
            extent,
            vmin,
            vmax,
            layout,
            figure: fig,
            main,
            image,
            hslice_ax,
            vslice_ax,
            cbar_ax,
        })
    }

    /// Row index of the horizontal slice in the cropped field.
    pub fn hslice_idx(&self) -> Option<usize> { self.layout.row() }

    /// Column index of the vertical slice in the cropped field.
    pub fn vslice_idx(&self) -> Option<usize> { self.layout.col() }
}

impl fmt::Display for Plot2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nan = (f64::NAN, f64::NAN);
        let (hmin, hmax) = self.h_axis.frange().unwrap_or(nan);
        let (vmin, vmax) = self.v_axis.frange().unwrap_or(nan);
        let (dmin, dmax) = self.data.frange().unwrap_or(nan);
        write!(
            f,
            "extent=({:.3}, {:.3}, {:.3}, {:.3}); min, max = ({:.3}, {:.3})",
            hmin, hmax, vmin, vmax, dmin, dmax,
        )
    }
}
