use liquidgauge::GaugePanel;

fn parse(json: &str) -> serde_json::Result<GaugePanel> {
    serde_json::from_str(json)
}

#[test]
fn full_panel_json_parses_and_validates() {
    let json = r#"{
        "fps": { "num": 30, "den": 1 },
        "canvas": { "width": 640, "height": 320 },
        "duration": 360,
        "seed": 42,
        "gauges": [
            { "id": "rust", "label": "Rust", "level": 2.6, "unit_suffix": "years", "activate_at": 0 },
            { "id": "linux", "label": "Linux", "level": 4.0, "unit_suffix": "years", "activate_at": 45 },
            { "id": "sql", "label": "SQL", "level": 1.5 }
        ],
        "layout": {
            "gap_px": 24.0,
            "padding": { "left": 12.0, "right": 12.0 },
            "align_x": "Center",
            "align_y": "End"
        },
        "style": {
            "tank": { "width": 60.0, "height": 180.0 },
            "caption_band_px": 40.0,
            "label_size_px": 14.0,
            "fill_ease": "OutCubic"
        }
    }"#;

    let panel = parse(json).unwrap();
    panel.validate().unwrap();
    assert_eq!(panel.gauges.len(), 3);
    assert_eq!(panel.gauges[2].unit_suffix, "");
    assert!(panel.gauges[2].activate_at.is_none());
}

#[test]
fn panel_roundtrips_through_serde() {
    let json = r#"{
        "fps": { "num": 30, "den": 1 },
        "canvas": { "width": 200, "height": 260 },
        "duration": 60,
        "seed": 7,
        "gauges": [ { "id": "g0", "label": "Rust", "level": 3.0 } ]
    }"#;
    let panel = parse(json).unwrap();
    let text = serde_json::to_string_pretty(&panel).unwrap();
    let back: GaugePanel = serde_json::from_str(&text).unwrap();
    back.validate().unwrap();
    assert_eq!(back.canvas, panel.canvas);
    assert_eq!(back.gauges[0].id, "g0");
    assert_eq!(back.style, panel.style);
}

#[test]
fn missing_required_fields_fail_to_parse() {
    // No gauges array.
    let json = r#"{
        "fps": { "num": 30, "den": 1 },
        "canvas": { "width": 200, "height": 260 },
        "duration": 60,
        "seed": 7
    }"#;
    assert!(parse(json).is_err());

    // No canvas.
    let json = r#"{
        "fps": { "num": 30, "den": 1 },
        "duration": 60,
        "seed": 7,
        "gauges": []
    }"#;
    assert!(parse(json).is_err());
}

#[test]
fn parsed_panels_still_go_through_validation() {
    // Parses fine, but the duplicate id must be caught by validate().
    let json = r#"{
        "fps": { "num": 30, "den": 1 },
        "canvas": { "width": 200, "height": 260 },
        "duration": 60,
        "seed": 7,
        "gauges": [
            { "id": "g0", "label": "A", "level": 1.0 },
            { "id": "g0", "label": "B", "level": 2.0 }
        ]
    }"#;
    let panel = parse(json).unwrap();
    assert!(panel.validate().is_err());
}
