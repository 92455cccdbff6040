use crate::{
    foundation::core::Vec2,
    panel::model::{GaugePanel, RowAlign},
};

/// Size of one gauge cell: the tank plus its caption band.
pub fn cell_size(panel: &GaugePanel) -> (f64, f64) {
    (
        panel.style.tank.width,
        panel.style.tank.height + panel.style.caption_band_px,
    )
}

/// Place the gauge cells in a single row across the canvas.
///
/// Returns one top-left origin per gauge, in panel order. Cells are
/// fixed-size, so the whole row is solved up front; the alignment knobs
/// position the row inside the padded canvas.
pub fn resolve_row_offsets(panel: &GaugePanel) -> Vec<Vec2> {
    let n = panel.gauges.len();
    let mut offsets = vec![Vec2::new(0.0, 0.0); n];
    if n == 0 {
        return offsets;
    }

    let (cell_w, cell_h) = cell_size(panel);
    let pad = panel.layout.padding;
    let avail_w = (f64::from(panel.canvas.width) - pad.left - pad.right).max(0.0);
    let avail_h = (f64::from(panel.canvas.height) - pad.top - pad.bottom).max(0.0);

    let total_w = cell_w * (n as f64) + panel.layout.gap_px * ((n - 1) as f64);
    let mut x = pad.left + align_offset(avail_w, total_w, panel.layout.align_x);
    let y = pad.top + align_offset(avail_h, cell_h, panel.layout.align_y);

    for offset in offsets.iter_mut() {
        *offset = Vec2::new(x, y);
        x += cell_w + panel.layout.gap_px;
    }
    offsets
}

fn align_offset(avail: f64, content: f64, align: RowAlign) -> f64 {
    match align {
        RowAlign::Start => 0.0,
        RowAlign::Center => ((avail - content) / 2.0).max(0.0),
        RowAlign::End => (avail - content).max(0.0),
    }
}
