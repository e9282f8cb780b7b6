//! Attaching colorbars (or same-sized invisible stand-ins) to the side of a
//! panel.

use crate::{
    error::{ PlotError, PlotResult },
    figure::{ Artist, ArtistRef, Figure, Panel, PanelId, Placement },
    style::{ AxesSize, Orientation, Side },
};

/// Options for [`add_colorbar`].
#[derive(Clone, Debug, PartialEq)]
pub struct ColorbarOptions {
    /// Side of the parent panel to take space from (default right).
    pub side: Side,
    /// Size of the new panel relative to the parent (default 5%).
    pub size: AxesSize,
    /// Gap between parent and colorbar in inches; `None` uses 0.05 for
    /// vertical and 0.15 for horizontal colorbars.
    pub pad: Option<f64>,
    /// Default vertical.
    pub orientation: Orientation,
    /// Create an invisible panel of the same size instead of a colorbar, to
    /// keep panels without a colorbar aligned with ones that have one.
    pub stub: bool,
    /// Cap on the number of colorbar ticks.
    pub max_ticks: Option<usize>,
    pub label: Option<String>,
}

impl Default for ColorbarOptions {
    fn default() -> Self {
        Self {
            side: Side::Right,
            size: AxesSize::Percent(5.0),
            pad: None,
            orientation: Orientation::Vertical,
            stub: false,
            max_ticks: None,
            label: None,
        }
    }
}

impl ColorbarOptions {
    pub fn resolved_pad(&self) -> f64 {
        self.pad.unwrap_or(match self.orientation {
            Orientation::Vertical => 0.05,
            Orientation::Horizontal => 0.15,
        })
    }
}

/// Carve a new panel out of one side of `ax` and draw a colorbar for
/// `mappable` in it, returning the new panel.
///
/// With `opts.stub` set, the new panel is left empty and hidden and
/// `mappable` is not consulted.
pub fn add_colorbar(
    fig: &mut Figure,
    ax: PanelId,
    mappable: ArtistRef,
    opts: &ColorbarOptions,
) -> PlotResult<PanelId>
{
    fig.panel(ax)?;
    if !opts.stub && !fig.artist(mappable)?.is_mappable() {
        return Err(PlotError::NotMappable {
            panel: mappable.panel.0,
            index: mappable.index,
        });
    }
    let mut panel = Panel::new(Placement::Divided {
        parent: ax,
        side: opts.side,
        size: opts.size,
        pad: opts.resolved_pad(),
    });
    if opts.stub {
        panel.visible = false;
        log::debug!(target: "sliceplots", "adding colorbar stub to panel {}", ax.0);
        return fig.add_panel(panel);
    }
    panel.draw(Artist::Colorbar {
        mappable,
        orientation: opts.orientation,
        label: opts.label.clone(),
        max_ticks: opts.max_ticks,
        ticks_side: None,
        accent: None,
        tick_width: None,
        label_size: None,
    });
    fig.add_panel(panel)
}
