use std::f64::consts::PI;
use ndarray::{ s, Array1, Array2 };
use sliceplots::{
    config::PlotDefaults,
    figure::{ Artist, Placement },
    style::{ LineStyle, Side },
    *,
};

fn cos_field(n: usize) -> (Array1<f64>, Array2<f64>) {
    let axis = Array1::linspace(0.0, PI, n);
    let field = Array2::from_shape_fn((n, n), |(i, j)| {
        (axis[j] - 0.5).cos() * (axis[i] - 1.0).cos()
    });
    (axis, field)
}

#[test]
fn both_slices_make_a_two_by_two_grid() {
    let (axis, field) = cos_field(128);
    let opts = Plot2DOptions {
        extent: Some(Extent::new(0.0, PI, 0.0, PI)),
        hslice_val: Some(0.75),
        vslice_val: Some(2.75),
        xlabel: Some("$x$".to_string()),
        ylabel: Some("$y$".to_string()),
        zlabel: Some("$f(x, y)$".to_string()),
        ..Default::default()
    };
    let p = Plot2D::new(field.view(), axis.view(), axis.view(), opts).unwrap();

    // upper crop bound is exclusive
    assert_eq!(p.h_axis.len(), 127);
    assert_eq!(p.v_axis.len(), 127);
    assert_eq!(p.figure.num_panels(), 4);
    assert_eq!(p.figure.grid.nrows(), 2);
    assert_eq!(p.figure.grid.ncols(), 2);
    assert_eq!(p.main, PanelId(0));

    let main = p.figure.panel(p.main).unwrap();
    assert_eq!(main.xlabel.as_deref(), Some("$x$"));
    assert_eq!(main.ylabel.as_deref(), Some("$y$"));

    let row = nearest_index(&axis, 0.75).unwrap();
    let col = nearest_index(&axis, 2.75).unwrap();
    assert_eq!(p.layout, SliceLayout::Both { row, col });

    let top = p.figure.panel(p.hslice_ax.unwrap()).unwrap();
    assert_eq!(top.placement, Placement::cell(0, 0));
    let (_, plotted) = top.lines().next().unwrap();
    assert_eq!(plotted, field.slice(s![row, ..127]).to_vec().as_slice());

    let right = p.figure.panel(p.vslice_ax.unwrap()).unwrap();
    assert_eq!(right.placement, Placement::cell(1, 1));
    let (plotted, _) = right.lines().next().unwrap();
    assert_eq!(plotted, field.slice(s![..127, col]).to_vec().as_slice());

    // reference lines report the axis value actually sliced
    assert!(main.artists.iter().any(|a| matches!(
        a, Artist::HLine { y, .. } if *y == axis[row]
    )));
    assert!(main.artists.iter().any(|a| matches!(
        a, Artist::VLine { x, .. } if *x == axis[col]
    )));
    assert!(main.texts().any(|t| t == "0.7" || t == "0.8"));

    let script = p.figure.to_python().unwrap();
    assert!(script.contains("    fig.add_subplot(gs[0:1, 0:1]),\n"));
    assert!(script.contains("    fig.add_subplot(gs[1:2, 1:2]),\n"));
    assert!(script.contains("AX[1].sharex(AX[0])"));
    assert!(script.contains("AX[2].sharey(AX[0])"));
    assert!(script.contains("fig.subplots_adjust(wspace=0.03, hspace=0.03)"));
}

#[test]
fn slices_index_into_the_cropped_field() {
    let axis = Array1::linspace(0.0, 10.0, 11);
    let field = Array2::from_shape_fn((11, 11), |(i, j)| (10 * i + j) as f64);
    let opts = Plot2DOptions {
        extent: Some(Extent::new(3.0, 9.0, 4.0, 9.0)),
        hslice_val: Some(6.0),
        vslice_val: Some(5.0),
        ..Default::default()
    };
    let p = Plot2D::new(field.view(), axis.view(), axis.view(), opts).unwrap();

    assert_eq!(p.h_axis, Array1::linspace(3.0, 8.0, 6));
    assert_eq!(p.v_axis, Array1::linspace(4.0, 8.0, 5));
    assert_eq!(p.layout, SliceLayout::Both { row: 2, col: 2 });

    let main = p.figure.panel(p.main).unwrap();
    assert!(main.artists.iter().any(|a| matches!(a, Artist::HLine { y, .. } if *y == 6.0)));
    assert!(main.artists.iter().any(|a| matches!(a, Artist::VLine { x, .. } if *x == 5.0)));

    let top = p.figure.panel(p.hslice_ax.unwrap()).unwrap();
    let (xs, row) = top.lines().next().unwrap();
    assert_eq!(xs, p.h_axis.to_vec().as_slice());
    assert_eq!(row, &[63.0, 64.0, 65.0, 66.0, 67.0, 68.0]);

    let right = p.figure.panel(p.vslice_ax.unwrap()).unwrap();
    let (col, ys) = right.lines().next().unwrap();
    assert_eq!(col, &[45.0, 55.0, 65.0, 75.0, 85.0]);
    assert_eq!(ys, p.v_axis.to_vec().as_slice());
}

#[test]
fn panel_count_follows_requested_slices() {
    let (axis, field) = cos_field(16);
    let cases = [
        (None, None, 1),
        (Some(1.0), None, 2),
        (None, Some(1.0), 2),
        (Some(1.0), Some(2.0), 3),
    ];
    for (h, v, expected) in cases {
        let opts = Plot2DOptions {
            hslice_val: h,
            vslice_val: v,
            cbar: false,
            ..Default::default()
        };
        let p = Plot2D::new(field.view(), axis.view(), axis.view(), opts).unwrap();
        assert_eq!(p.layout.num_panels(), expected);
        assert_eq!(p.figure.num_panels(), expected);
        assert!(p.figure.to_python().is_ok());
    }
}

#[test]
fn broken_axis_shows_both_ranges() {
    let x = Array1::linspace(0.0, 10.0, 101);
    let y = x.mapv(f64::sin);
    let defaults = PlotDefaults::default();
    let param = BreakXParams::new((0.0, 2.0), (8.0, 10.0)).labels("t", "signal");
    let BreakX { figure: fig, left, right } = BreakX::new(
        x.view(), y.view(), &param, &LineStyle::new().color("C0"), &defaults,
    ).unwrap();
    assert_eq!(fig.size, defaults.figsize_break_x);

    let lp = fig.panel(left).unwrap();
    let rp = fig.panel(right).unwrap();
    assert_eq!(lp.xlim, Some((0.0, 2.0)));
    assert_eq!(rp.xlim, Some((8.0, 10.0)));
    assert_eq!(lp.spines.hidden(), vec![Side::Right]);
    assert_eq!(rp.spines.hidden(), vec![Side::Left]);
    assert_eq!(rp.ytick_side, Some(Side::Right));

    let script = fig.to_python().unwrap();
    assert!(script.contains("div0 = make_axes_locatable(AX[0])"));
    assert!(script.contains("ax1 = div0.append_axes(\"right\", size=\"100%\", pad=1.0)"));
    assert!(script.contains("clip_on=False"));
}

#[test]
fn line_crop_and_gradient_line() {
    let x = Array1::linspace(0.0, 1.0, 11);
    let y = x.mapv(|v| v * v);
    let opts = Plot1DOptions {
        xlim: Some((0.2, 0.8)),
        text: Some("quadratic".to_string()),
        ..Default::default()
    };
    let p = Plot1D::new(x.view(), y.view(), opts).unwrap();
    assert_eq!(p.h_axis.len(), 6);
    assert_eq!(p.xlim.0, x[2]);
    assert_eq!(p.xlim.1, x[7]);

    let (mut fig, ax) = Figure::single((6.0, 4.0));
    let speed = x.mapv(|v| 2.0 * v);
    let drawn = plot_multicolored_line(
        &mut fig, ax, x.view(), y.view(), speed.view(), &GradientLineOptions::default(),
    ).unwrap();
    assert_eq!(drawn.line.panel, ax);
    assert!(drawn.colorbar.is_some());
    let script = fig.to_python().unwrap();
    assert!(script.contains("LineCollection("));
    assert!(script.contains("im = a0_0\ncbar = fig.colorbar(im, ax=ax, cax=ax"));
}

#[cfg(feature = "config")]
#[test]
fn defaults_from_file_drive_the_composer() {
    let path = std::env::temp_dir().join("sliceplots-scenario-defaults.toml");
    std::fs::write(&path, "figsize_2d = [5.0, 5.0]\nslice_spacing = 0.1\n").unwrap();
    let defaults = PlotDefaults::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let (axis, field) = cos_field(16);
    let opts = Plot2DOptions {
        hslice_val: Some(1.0),
        defaults,
        ..Default::default()
    };
    let p = Plot2D::new(field.view(), axis.view(), axis.view(), opts).unwrap();
    assert_eq!(p.figure.size, (5.0, 5.0));
    assert_eq!(p.figure.adjust.hspace, Some(0.1));
}
