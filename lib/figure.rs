//! A plain description of a figure: panels, where they sit, and what is drawn
//! in them.
//!
//! Composers only ever build this model. Nothing is handed to Matplotlib until
//! [`render`][crate::render] turns a finished `Figure` into a script, so every
//! crop, limit, and layout decision can be inspected directly.

use std::ops::Range;
use ndarray as nd;
use crate::{
    config::SubplotAdjust,
    error::{ PlotError, PlotResult },
    index::Extent,
    style::{
        AxesSize,
        Color,
        Colormap,
        HAlign,
        LineStyle,
        Location,
        Norm,
        Orientation,
        Side,
        VAlign,
    },
};

/// Index of a panel within its [`Figure`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PanelId(pub usize);

/// Location of one artist: its panel and its position in that panel's draw
/// list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArtistRef {
    pub panel: PanelId,
    pub index: usize,
}

/// A grid of cells with relative row heights and column widths.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    pub height_ratios: Vec<f64>,
    pub width_ratios: Vec<f64>,
}

impl GridSpec {
    /// A grid with the given relative heights (one per row) and widths (one per
    /// column).
    pub fn new(height_ratios: &[f64], width_ratios: &[f64]) -> Self {
        Self {
            height_ratios: height_ratios.to_vec(),
            width_ratios: width_ratios.to_vec(),
        }
    }

    pub fn single() -> Self { Self::new(&[1.0], &[1.0]) }

    pub fn nrows(&self) -> usize { self.height_ratios.len() }

    pub fn ncols(&self) -> usize { self.width_ratios.len() }
}

/// Where a panel sits on the figure.
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// A block of cells in the figure's [`GridSpec`].
    Grid { rows: Range<usize>, cols: Range<usize> },
    /// Space carved out of one side of an existing panel, which shrinks to
    /// make room.
    Divided { parent: PanelId, side: Side, size: AxesSize, pad: f64 },
    /// A region drawn inside an existing panel, which keeps its size.
    Inset {
        parent: PanelId,
        width: AxesSize,
        height: AxesSize,
        loc: Location,
    },
}

impl Placement {
    /// The single grid cell at `(row, col)`.
    pub fn cell(row: usize, col: usize) -> Self {
        Self::Grid { rows: row..row + 1, cols: col..col + 1 }
    }

    pub fn parent(&self) -> Option<PanelId> {
        match self {
            Self::Grid { .. } => None,
            Self::Divided { parent, .. } | Self::Inset { parent, .. } => {
                Some(*parent)
            },
        }
    }
}

/// Coordinate system for a drawn position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Coords {
    /// Data units of the panel.
    Data,
    /// Panel fraction: `(0, 0)` is the bottom-left corner and `(1, 1)` the
    /// top-right, whatever data range is shown.
    Panel,
    /// `x` positioned like the y-axis tick labels, `y` in data units.
    YTickData,
    /// `x` in data units, `y` positioned like the x-axis tick labels.
    DataXTick,
}

/// Something drawn in a panel.
#[derive(Clone, Debug, PartialEq)]
pub enum Artist {
    Line {
        x: Vec<f64>,
        y: Vec<f64>,
        style: LineStyle,
        coords: Coords,
        clip: bool,
    },
    /// A pseudocolor image of a 2D array, row 0 at the bottom.
    Image {
        data: nd::Array2<f64>,
        extent: Extent,
        cmap: Colormap,
        norm: Norm,
        vmin: f64,
        vmax: f64,
    },
    HLine { y: f64, style: LineStyle },
    VLine { x: f64, style: LineStyle },
    Text {
        x: f64,
        y: f64,
        text: String,
        coords: Coords,
        color: Option<Color>,
        ha: Option<HAlign>,
        va: Option<VAlign>,
        vertical: bool,
    },
    /// Independent two-point segments, each colored by one value through a
    /// linear map of `vmin..vmax` onto `cmap`.
    Segments {
        segments: Vec<[(f64, f64); 2]>,
        values: Vec<f64>,
        cmap: Colormap,
        vmin: f64,
        vmax: f64,
        linewidth: f64,
        alpha: f64,
    },
    /// A colorbar for the color-mapped artist `mappable`, drawn to fill its
    /// panel.
    Colorbar {
        mappable: ArtistRef,
        orientation: Orientation,
        label: Option<String>,
        max_ticks: Option<usize>,
        ticks_side: Option<Side>,
        accent: Option<Color>,
        tick_width: Option<f64>,
        label_size: Option<f64>,
    },
}

impl Artist {
    /// Whether the artist maps values to colors and can back a colorbar.
    pub fn is_mappable(&self) -> bool {
        matches!(self, Self::Image { .. } | Self::Segments { .. })
    }
}

/// Visibility of a panel's four border lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Spines {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for Spines {
    fn default() -> Self {
        Self { top: true, bottom: true, left: true, right: true }
    }
}

impl Spines {
    pub fn hide(&mut self, side: Side) {
        match side {
            Side::Top => { self.top = false; },
            Side::Bottom => { self.bottom = false; },
            Side::Left => { self.left = false; },
            Side::Right => { self.right = false; },
        }
    }

    pub fn is_visible(&self, side: Side) -> bool {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Hidden sides, in top, bottom, left, right order.
    pub fn hidden(&self) -> Vec<Side> {
        [Side::Top, Side::Bottom, Side::Left, Side::Right].into_iter()
            .filter(|s| !self.is_visible(*s))
            .collect()
    }
}

/// One rectangular drawable region of a figure.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    pub placement: Placement,
    pub share_x: Option<PanelId>,
    pub share_y: Option<PanelId>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub xmargin: Option<f64>,
    pub ymargin: Option<f64>,
    pub spines: Spines,
    pub xaxis_visible: bool,
    pub yaxis_visible: bool,
    pub ytick_side: Option<Side>,
    pub ylabel_side: Option<Side>,
    pub grid: bool,
    pub visible: bool,
    pub artists: Vec<Artist>,
}

impl Panel {
    /// A new, empty panel at `placement`.
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            share_x: None,
            share_y: None,
            xlabel: None,
            ylabel: None,
            xlim: None,
            ylim: None,
            xmargin: None,
            ymargin: None,
            spines: Spines::default(),
            xaxis_visible: true,
            yaxis_visible: true,
            ytick_side: None,
            ylabel_side: None,
            grid: false,
            visible: true,
            artists: Vec::new(),
        }
    }

    /// Add an artist, returning its position in the draw list.
    pub fn draw(&mut self, artist: Artist) -> usize {
        self.artists.push(artist);
        self.artists.len() - 1
    }

    /// Iterate over all drawn lines as `(x, y)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (&[f64], &[f64])> + '_ {
        self.artists.iter()
            .filter_map(|a| match a {
                Artist::Line { x, y, .. } => Some((x.as_slice(), y.as_slice())),
                _ => None,
            })
    }

    /// Iterate over all drawn text strings.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.artists.iter()
            .filter_map(|a| match a {
                Artist::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
    }
}

/// A figure: its size, an optional grid layout, and its panels in creation
/// order.
///
/// Panels placed relative to another panel always come after it.
#[derive(Clone, Debug, PartialEq)]
pub struct Figure {
    pub size: (f64, f64),
    pub grid: GridSpec,
    pub adjust: SubplotAdjust,
    panels: Vec<Panel>,
}

impl Figure {
    /// An empty figure of `size` inches with a single-cell grid.
    pub fn new(size: (f64, f64)) -> Self {
        Self {
            size,
            grid: GridSpec::single(),
            adjust: SubplotAdjust::default(),
            panels: Vec::new(),
        }
    }

    /// An empty figure with a particular grid layout.
    pub fn with_grid(size: (f64, f64), grid: GridSpec) -> Self {
        Self { grid, ..Self::new(size) }
    }

    /// An empty figure with Matplotlib's stock subplot margins, overridden by
    /// keyed values. Unknown keys are rejected.
    pub fn with_adjust<'a, I>(size: (f64, f64), adjust: I) -> PlotResult<Self>
    where I: IntoIterator<Item = (&'a str, f64)>
    {
        let adjust = SubplotAdjust::from_pairs(adjust)?;
        Ok(Self { adjust, ..Self::new(size) })
    }

    /// A figure holding a single full-size panel.
    pub fn single(size: (f64, f64)) -> (Self, PanelId) {
        let mut fig = Self::new(size);
        let id = fig.push_panel(Panel::new(Placement::cell(0, 0)));
        (fig, id)
    }

    fn push_panel(&mut self, panel: Panel) -> PanelId {
        self.panels.push(panel);
        PanelId(self.panels.len() - 1)
    }

    /// Add a panel, checking that any panel it refers to already exists and
    /// that grid cells are in range.
    pub fn add_panel(&mut self, panel: Panel) -> PlotResult<PanelId> {
        let refs = [panel.placement.parent(), panel.share_x, panel.share_y];
        for id in refs.into_iter().flatten() {
            self.panel(id)?;
        }
        if let Placement::Grid { rows, cols } = &panel.placement {
            if rows.is_empty() || rows.end > self.grid.nrows() {
                return Err(PlotError::InvalidValue {
                    key: "rows".to_string(),
                    value: format!("{:?}", rows),
                });
            }
            if cols.is_empty() || cols.end > self.grid.ncols() {
                return Err(PlotError::InvalidValue {
                    key: "cols".to_string(),
                    value: format!("{:?}", cols),
                });
            }
        }
        Ok(self.push_panel(panel))
    }

    pub fn panel(&self, id: PanelId) -> PlotResult<&Panel> {
        self.panels.get(id.0).ok_or(PlotError::NoSuchPanel(id.0))
    }

    pub fn panel_mut(&mut self, id: PanelId) -> PlotResult<&mut Panel> {
        self.panels.get_mut(id.0).ok_or(PlotError::NoSuchPanel(id.0))
    }

    pub fn panels(&self) -> &[Panel] { &self.panels }

    pub fn num_panels(&self) -> usize { self.panels.len() }

    pub fn is_empty(&self) -> bool { self.panels.is_empty() }

    /// Draw an artist in a panel.
    pub fn draw(&mut self, id: PanelId, artist: Artist) -> PlotResult<ArtistRef> {
        let index = self.panel_mut(id)?.draw(artist);
        Ok(ArtistRef { panel: id, index })
    }

    pub fn artist(&self, aref: ArtistRef) -> PlotResult<&Artist> {
        self.panel(aref.panel)?
            .artists.get(aref.index)
            .ok_or(PlotError::NoSuchArtist {
                panel: aref.panel.0,
                index: aref.index,
            })
    }
}
