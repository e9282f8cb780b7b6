//! Line plots: a cropped single-panel plot, a plot with a broken x-axis, and a
//! line colored by a third series.

use std::fmt;
use itertools::Itertools;
use ndarray::{ self as nd, ArrayView1 };
use crate::{
    colorbar::{ add_colorbar, ColorbarOptions },
    config::PlotDefaults,
    error::{ IndexError, PlotError, PlotResult },
    figure::{ Artist, ArtistRef, Coords, Figure, Panel, PanelId, Placement },
    index::{ crop_axis, CropRange },
    style::{ AxesSize, Color, Colormap, LineStyle, Side },
    utils::FExtremum,
};

fn check_len(what: &'static str, expected: usize, found: usize) -> PlotResult<()> {
    if expected != found {
        return Err(PlotError::LengthMismatch { what, expected, found });
    }
    Ok(())
}

/// Options for [`Plot1D`].
#[derive(Clone, Debug, Default)]
pub struct Plot1DOptions {
    /// Range of the horizontal axis to show; defaults to the full axis.
    pub xlim: Option<(f64, f64)>,
    /// Range of values to show; defaults to the min and max of the series.
    pub ylim: Option<(f64, f64)>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Free text drawn in the upper-left corner.
    pub text: Option<String>,
    /// Defaults to `defaults.figsize_1d`.
    pub figsize: Option<(f64, f64)>,
    pub style: LineStyle,
    pub defaults: PlotDefaults,
}

/// A series plotted against its axis, cropped to a range of the axis.
#[derive(Clone, Debug)]
pub struct Plot1D {
    /// Cropped horizontal axis.
    pub h_axis: nd::Array1<f64>,
    /// Cropped series.
    pub data: nd::Array1<f64>,
    pub xlim: (f64, f64),
    pub ylim: (f64, f64),
    pub figure: Figure,
    pub ax: PanelId,
}

impl Plot1D {
    /// Plot `v_axis` against `h_axis`, keeping only the samples in
    /// `opts.xlim` (half-open at the upper end).
    pub fn new(
        h_axis: ArrayView1<f64>,
        v_axis: ArrayView1<f64>,
        opts: Plot1DOptions,
    ) -> PlotResult<Self>
    {
        check_len("series", h_axis.len(), v_axis.len())?;
        let xlim = match opts.xlim {
            Some(lim) => lim,
            None => h_axis.frange().ok_or(IndexError::EmptyAxis)?,
        };
        let ylim = match opts.ylim {
            Some(lim) => lim,
            None => v_axis.frange().ok_or(IndexError::EmptyAxis)?,
        };
        let range = CropRange::resolve(h_axis, xlim.0, xlim.1, "x")?;
        let h_crop = crop_axis(h_axis, range);
        let data = crop_axis(v_axis, range);
        let shown = (h_crop[0], h_crop[h_crop.len() - 1]);

        let figsize = opts.figsize.unwrap_or(opts.defaults.figsize_1d);
        let (mut figure, ax) = Figure::single(figsize);
        let panel = figure.panel_mut(ax)?;
        panel.draw(Artist::Line {
            x: h_crop.to_vec(),
            y: data.to_vec(),
            style: opts.style.clone(),
            coords: Coords::Data,
            clip: true,
        });
        panel.xlim = Some(shown);
        panel.ylim = Some(ylim);
        panel.xlabel = opts.xlabel.clone();
        panel.ylabel = opts.ylabel.clone();
        panel.grid = true;
        if let Some(text) = opts.text.as_ref().filter(|t| !t.is_empty()) {
            panel.draw(Artist::Text {
                x: 0.02,
                y: 0.95,
                text: text.clone(),
                coords: Coords::Panel,
                color: Some(opts.defaults.text_color_1d.clone()),
                ha: None,
                va: None,
                vertical: false,
            });
        }
        Ok(Self { h_axis: h_crop, data, xlim: shown, ylim, figure, ax })
    }
}

impl fmt::Display for Plot1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hmin, hmax) = self.h_axis.frange().unwrap_or((f64::NAN, f64::NAN));
        let (dmin, dmax) = self.data.frange().unwrap_or((f64::NAN, f64::NAN));
        write!(
            f,
            "extent=({:.3}, {:.3}); min, max = ({:.3}, {:.3})",
            hmin, hmax, dmin, dmax,
        )
    }
}

/// Axis ranges and labels for [`plot1d_break_x`].
#[derive(Clone, Debug, PartialEq)]
pub struct BreakXParams {
    pub xlim_left: (f64, f64),
    pub xlim_right: (f64, f64),
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Gap between the two halves, in inches.
    pub pad: f64,
    /// Half-length of the break marks, in panel-fraction units.
    pub mark_size: f64,
}

impl BreakXParams {
    /// Ranges for the left and right halves, with gap and mark size taken from
    /// [`PlotDefaults`].
    pub fn new(xlim_left: (f64, f64), xlim_right: (f64, f64)) -> Self {
        Self::with_defaults(xlim_left, xlim_right, &PlotDefaults::default())
    }

    /// Like [`Self::new`], with gap and mark size taken from `defaults`.
    pub fn with_defaults(
        xlim_left: (f64, f64),
        xlim_right: (f64, f64),
        defaults: &PlotDefaults,
    ) -> Self
    {
        Self {
            xlim_left,
            xlim_right,
            xlabel: None,
            ylabel: None,
            pad: defaults.break_pad,
            mark_size: defaults.break_mark_size,
        }
    }

    pub fn labels(mut self, xlabel: &str, ylabel: &str) -> Self {
        self.xlabel = Some(xlabel.to_string());
        self.ylabel = Some(ylabel.to_string());
        self
    }
}

/// Plot the same series on `ax_left` and on a new panel appended to its right,
/// each showing its own x-range, with break marks drawn across the gap.
///
/// The series is not cropped. The ranges are expected not to overlap but this
/// is not checked. Returns the new right-hand panel.
pub fn plot1d_break_x(
    fig: &mut Figure,
    ax_left: PanelId,
    h_axis: ArrayView1<f64>,
    v_axis: ArrayView1<f64>,
    param: &BreakXParams,
    style: &LineStyle,
) -> PlotResult<PanelId>
{
    check_len("series", h_axis.len(), v_axis.len())?;
    let x = h_axis.to_vec();
    let y = v_axis.to_vec();
    let d = param.mark_size;
    let mark = |xs: (f64, f64), ys: (f64, f64)| Artist::Line {
        x: vec![xs.0, xs.1],
        y: vec![ys.0, ys.1],
        style: LineStyle::new().color(Color::black()),
        coords: Coords::Panel,
        clip: false,
    };
    let series = || Artist::Line {
        x: x.clone(),
        y: y.clone(),
        style: style.clone(),
        coords: Coords::Data,
        clip: true,
    };

    let left = fig.panel_mut(ax_left)?;
    left.draw(series());
    left.xlabel = param.xlabel.clone();
    left.ylabel = param.ylabel.clone();
    left.xlim = Some(param.xlim_left);
    left.spines.hide(Side::Right);
    left.ytick_side = Some(Side::Left);
    left.draw(mark((1.0 - d, 1.0 + d), (-d, d)));
    left.draw(mark((1.0 - d, 1.0 + d), (1.0 - d, 1.0 + d)));

    let mut right = Panel::new(Placement::Divided {
        parent: ax_left,
        side: Side::Right,
        size: AxesSize::Percent(100.0),
        pad: param.pad,
    });
    right.draw(series());
    right.xlabel = param.xlabel.clone();
    right.ylabel = param.ylabel.clone();
    right.ylabel_side = Some(Side::Right);
    right.xlim = Some(param.xlim_right);
    right.spines.hide(Side::Left);
    right.ytick_side = Some(Side::Right);
    right.draw(mark((-d, d), (1.0 - d, 1.0 + d)));
    right.draw(mark((-d, d), (-d, d)));
    fig.add_panel(right)
}

/// A standalone broken-axis figure.
#[derive(Clone, Debug)]
pub struct BreakX {
    pub figure: Figure,
    pub left: PanelId,
    pub right: PanelId,
}

impl BreakX {
    /// Draw a series with [`plot1d_break_x`] on a new single-panel figure of
    /// size `defaults.figsize_break_x`.
    pub fn new(
        h_axis: ArrayView1<f64>,
        v_axis: ArrayView1<f64>,
        param: &BreakXParams,
        style: &LineStyle,
        defaults: &PlotDefaults,
    ) -> PlotResult<Self>
    {
        let (mut figure, left) = Figure::single(defaults.figsize_break_x);
        let right = plot1d_break_x(&mut figure, left, h_axis, v_axis, param, style)?;
        log::debug!(
            target: "sliceplots",
            "broken axis: {:?} | {:?}", param.xlim_left, param.xlim_right,
        );
        Ok(Self { figure, left, right })
    }
}

/// Options for [`plot_multicolored_line`].
#[derive(Clone, Debug)]
pub struct GradientLineOptions {
    /// Default `viridis`.
    pub cmap: Colormap,
    /// Lower end of the color scale; defaults to the color series' minimum.
    pub vmin: Option<f64>,
    /// Upper end of the color scale; defaults to the color series' maximum.
    pub vmax: Option<f64>,
    /// Default 2.0.
    pub linewidth: f64,
    /// Default 1.0.
    pub alpha: f64,
    /// Colorbar to attach; `None` for no colorbar. Defaults to a vertical
    /// colorbar on the right.
    pub colorbar: Option<ColorbarOptions>,
}

impl Default for GradientLineOptions {
    fn default() -> Self {
        Self {
            cmap: Colormap::viridis(),
            vmin: None,
            vmax: None,
            linewidth: 2.0,
            alpha: 1.0,
            colorbar: Some(ColorbarOptions::default()),
        }
    }
}

/// What [`plot_multicolored_line`] drew.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GradientLine {
    pub line: ArtistRef,
    pub colorbar: Option<PanelId>,
}

/// Draw the line through `(x, y)` on `ax`, coloring each segment between
/// consecutive points by the mean of `other_y` at its two ends.
///
/// Fails if `y` and `other_y` (or `x` and `y`) differ in length.
pub fn plot_multicolored_line(
    fig: &mut Figure,
    ax: PanelId,
    x: ArrayView1<f64>,
    y: ArrayView1<f64>,
    other_y: ArrayView1<f64>,
    opts: &GradientLineOptions,
) -> PlotResult<GradientLine>
{
    check_len("color series", y.len(), other_y.len())?;
    check_len("y series", x.len(), y.len())?;
    let segments: Vec<[(f64, f64); 2]>
        = x.iter().zip(y.iter())
        .map(|(xk, yk)| (*xk, *yk))
        .tuple_windows()
        .map(|(a, b)| [a, b])
        .collect();
    let values: Vec<f64>
        = other_y.iter()
        .tuple_windows()
        .map(|(a, b)| (a + b) / 2.0)
        .collect();
    let (omin, omax) = other_y.frange().unwrap_or((0.0, 1.0));
    let vmin = opts.vmin.unwrap_or(omin);
    let vmax = opts.vmax.unwrap_or(omax);
    log::debug!(
        target: "sliceplots",
        "gradient line: {} segments, color scale [{}, {}]",
        segments.len(), vmin, vmax,
    );

    let has_segments = !segments.is_empty();
    let line = fig.draw(ax, Artist::Segments {
        segments,
        values,
        cmap: opts.cmap.clone(),
        vmin,
        vmax,
        linewidth: opts.linewidth,
        alpha: opts.alpha,
    })?;
    if has_segments {
        let panel = fig.panel_mut(ax)?;
        panel.xlim = x.frange();
        panel.ylim = y.frange();
    }
    let colorbar = match &opts.colorbar {
        Some(cb_opts) => Some(add_colorbar(fig, ax, line, cb_opts)?),
        None => None,
    };
    Ok(GradientLine { line, colorbar })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ array, Array1 };

    fn wave() -> (Array1<f64>, Array1<f64>) {
        let uu = Array1::linspace(0.0, std::f64::consts::PI, 128);
        let data = uu.mapv(|u| (u - 0.5).cos() * (1.5_f64 - 1.0).cos());
        (uu, data)
    }

    #[test]
    fn plot1d_crops_to_xlim() {
        let (uu, data) = wave();
        let opts = Plot1DOptions {
            xlim: Some((0.0, 3.0)),
            ylim: Some((-1.0, 1.0)),
            xlabel: Some("z".to_string()),
            style: LineStyle::new().color("red"),
            ..Default::default()
        };
        let p = Plot1D::new(uu.view(), data.view(), opts).unwrap();
        let end = crate::index::nearest_index(&uu, 3.0).unwrap();
        assert_eq!(p.h_axis.len(), end);
        assert_eq!(p.data, data.slice(ndarray::s![..end]));
        assert_eq!(p.xlim, (uu[0], uu[end - 1]));
        assert_eq!(p.ylim, (-1.0, 1.0));
        let panel = p.figure.panel(p.ax).unwrap();
        assert_eq!(panel.xlim, Some(p.xlim));
        assert!(panel.grid);
        assert_eq!(panel.xlabel.as_deref(), Some("z"));
        assert_eq!(panel.texts().count(), 0);
        assert_eq!(p.figure.size, (6.4, 6.4));
    }

    #[test]
    fn plot1d_defaults_to_full_ranges() {
        let h = array![0.0, 1.0, 2.0, 3.0];
        let v = array![5.0, -1.0, 2.0, 9.0];
        let opts = Plot1DOptions {
            text: Some("note".to_string()),
            ..Default::default()
        };
        let p = Plot1D::new(h.view(), v.view(), opts).unwrap();
        assert_eq!(p.data, array![5.0, -1.0, 2.0]);
        assert_eq!(p.ylim, (-1.0, 9.0));
        assert_eq!(p.xlim, (0.0, 2.0));
        assert_eq!(p.to_string(), "extent=(0.000, 2.000); min, max = (-1.000, 5.000)");
        let panel = p.figure.panel(p.ax).unwrap();
        assert!(matches!(
            &panel.artists[1],
            Artist::Text { x, y, coords: Coords::Panel, .. } if *x == 0.02 && *y == 0.95
        ));
    }

    #[test]
    fn plot1d_length_mismatch() {
        let h = array![0.0, 1.0, 2.0];
        let v = array![0.0, 1.0];
        assert!(matches!(
            Plot1D::new(h.view(), v.view(), Plot1DOptions::default()),
            Err(PlotError::LengthMismatch { expected: 3, found: 2, .. }),
        ));
    }

    #[test]
    fn break_x_uses_given_limits() {
        let (uu, data) = wave();
        let (mut fig, left) = Figure::single((8.0, 3.2));
        let param = BreakXParams::new((0.0, 1.0), (2.0, 3.0)).labels("x", "rho");
        let style = LineStyle::from_pairs([("ls", "--"), ("color", "red")]).unwrap();
        let right = plot1d_break_x(&mut fig, left, uu.view(), data.view(), &param, &style)
            .unwrap();
        assert_eq!(fig.num_panels(), 2);

        let lp = fig.panel(left).unwrap();
        let rp = fig.panel(right).unwrap();
        assert_eq!(lp.xlim, Some((0.0, 1.0)));
        assert_eq!(rp.xlim, Some((2.0, 3.0)));
        assert!(!lp.spines.right && lp.spines.left);
        assert!(!rp.spines.left && rp.spines.right);
        assert_eq!(rp.ylabel_side, Some(Side::Right));
        assert_eq!(
            rp.placement,
            Placement::Divided {
                parent: left,
                side: Side::Right,
                size: AxesSize::Percent(100.0),
                pad: 1.0,
            },
        );
        // full series on both halves, plus two break marks each
        for p in [lp, rp] {
            let lines: Vec<_> = p.lines().collect();
            assert_eq!(lines.len(), 3);
            assert_eq!(lines[0].0.len(), uu.len());
        }
        assert!(matches!(
            &rp.artists[1],
            Artist::Line { coords: Coords::Panel, clip: false, .. }
        ));
    }

    #[test]
    fn break_x_figure_follows_defaults() {
        let (uu, data) = wave();
        let defaults = PlotDefaults {
            figsize_break_x: (10.0, 2.5),
            break_pad: 0.4,
            ..Default::default()
        };
        let param = BreakXParams::with_defaults((0.0, 1.0), (2.0, 3.0), &defaults);
        assert_eq!(param.pad, 0.4);
        let b = BreakX::new(uu.view(), data.view(), &param, &LineStyle::new(), &defaults)
            .unwrap();
        assert_eq!(b.figure.size, (10.0, 2.5));
        assert_eq!(b.figure.num_panels(), 2);
        assert_eq!(b.left, PanelId(0));
        assert_eq!(b.right, PanelId(1));
        assert!(matches!(
            b.figure.panel(b.right).unwrap().placement,
            Placement::Divided { pad, .. } if pad == 0.4
        ));

        let stock = BreakX::new(
            uu.view(), data.view(),
            &BreakXParams::new((0.0, 1.0), (2.0, 3.0)),
            &LineStyle::new(),
            &PlotDefaults::default(),
        ).unwrap();
        assert_eq!(stock.figure.size, (8.0, 3.2));
    }

    #[test]
    fn gradient_line_rejects_mismatched_colors() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        let x = array![0.0, 1.0, 2.0];
        let c = array![1.0, 2.0];
        assert!(matches!(
            plot_multicolored_line(
                &mut fig, ax, x.view(), x.view(), c.view(),
                &GradientLineOptions::default(),
            ),
            Err(PlotError::LengthMismatch { what: "color series", expected: 3, found: 2 }),
        ));
    }

    #[test]
    fn gradient_line_any_matching_length() {
        for n in [0_usize, 1, 7] {
            let (mut fig, ax) = Figure::single((4.0, 4.0));
            let x = Array1::linspace(0.0, 1.0, n);
            let y = x.mapv(|v| v * v);
            let c = x.mapv(|v| 2.0 * v);
            let drawn = plot_multicolored_line(
                &mut fig, ax, x.view(), y.view(), c.view(),
                &GradientLineOptions::default(),
            ).unwrap();
            assert_eq!(fig.num_panels(), 2);
            assert!(drawn.colorbar.is_some());
            match fig.artist(drawn.line).unwrap() {
                Artist::Segments { segments, values, .. } => {
                    assert_eq!(segments.len(), n.saturating_sub(1));
                    assert_eq!(values.len(), n.saturating_sub(1));
                },
                other => panic!("unexpected artist {:?}", other),
            }
            assert!(fig.to_python().is_ok());
        }
    }

    #[test]
    fn gradient_line_segments_and_scale() {
        let (mut fig, ax) = Figure::single((4.0, 4.0));
        let x = array![0.0, 1.0, 2.0];
        let y = array![0.0, 1.0, 0.0];
        let c = array![0.0, 2.0, 4.0];
        let opts = GradientLineOptions { colorbar: None, ..Default::default() };
        let drawn = plot_multicolored_line(
            &mut fig, ax, x.view(), y.view(), c.view(), &opts,
        ).unwrap();
        assert_eq!(drawn.colorbar, None);
        assert_eq!(fig.num_panels(), 1);
        match fig.artist(drawn.line).unwrap() {
            Artist::Segments { segments, values, vmin, vmax, .. } => {
                assert_eq!(segments[0], [(0.0, 0.0), (1.0, 1.0)]);
                assert_eq!(segments[1], [(1.0, 1.0), (2.0, 0.0)]);
                assert_eq!(values, &vec![1.0, 3.0]);
                assert_eq!((*vmin, *vmax), (0.0, 4.0));
            },
            other => panic!("unexpected artist {:?}", other),
        }
        let panel = fig.panel(ax).unwrap();
        assert_eq!(panel.xlim, Some((0.0, 2.0)));
        assert_eq!(panel.ylim, Some((0.0, 1.0)));
    }
}
