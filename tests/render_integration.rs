/*
 *  tests/render_integration.rs
 *
 *  End to end rendering through the public API
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 */

use chrono::{NaiveDate, NaiveDateTime};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use image::{GrayImage, Luma};

use wxpaper::display::fonts::default_candidates;
use wxpaper::display::planes::ink_count;
use wxpaper::display::{LayoutConfig, Planes, RenderContext, Renderer, Typeface};
use wxpaper::iconprep::IconAsset;
use wxpaper::iconstore::{MemoryIconStore, NoIcons};
use wxpaper::weather::WeatherSummary;

fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap().and_hms_opt(8, 30, 0).unwrap()
}

fn renderer() -> Renderer {
    Renderer::new(LayoutConfig::default(), Typeface::Builtin)
}

fn london() -> WeatherSummary {
    WeatherSummary::from_json_str(
        r#"{
            "location": {"city": "London", "country": "GB"},
            "temperature_c": 21.0,
            "feels_like_c": 20.4,
            "humidity_pct": 72,
            "conditions": "light rain",
            "icon": "10d"
        }"#,
    )
    .unwrap()
}

fn solid_icon(side: u32) -> IconAsset {
    IconAsset::from_image(GrayImage::from_pixel(side, side, Luma([0])))
}

#[test]
fn test_icon_lands_on_red_plane_only() {
    let icons = MemoryIconStore::new().with("10d", solid_icon(24));
    let ctx = RenderContext { country: Some("UK"), ..RenderContext::at(morning()) };
    let dash = renderer().render(&london(), &ctx, &icons);

    let slot = dash.report.icon.expect("icon placed");
    assert_eq!(slot, Rectangle::new(Point::new(186, 51), Size::new(60, 60)));
    assert_eq!(ink_count(&dash.planes.red, slot), 3600);
    assert_eq!(ink_count(&dash.planes.black, slot), 0);
    assert_eq!(dash.report.banner.location.text, "London, UK");
}

#[test]
fn test_unknown_icon_leaves_slot_empty() {
    let dash = renderer().render(&london(), &RenderContext::at(morning()), &NoIcons);
    assert_eq!(dash.report.icon, None);
    let slot = Rectangle::new(Point::new(186, 51), Size::new(60, 60));
    assert_eq!(ink_count(&dash.planes.red, slot), 0);
}

#[test]
fn test_missing_temperature_prints_placeholder() {
    let summary = WeatherSummary::from_json_str(
        r#"{"location": {"city": "Oslo"}, "temperature_c": "n/a", "conditions": "fog"}"#,
    )
    .unwrap();
    let dash = renderer().render(&summary, &RenderContext::at(morning()), &NoIcons);
    let temp = &dash.report.content.temperature;
    assert_eq!(temp.text, "--");
    assert!(ink_count(&dash.planes.black, temp.rect) > 0);
    assert_eq!(dash.report.content.feels.text, "Feels: --°C");
    assert_eq!(dash.report.content.humidity.text, "Humid: --%");
}

#[test]
fn test_content_stays_below_banner_and_inside_canvas() {
    let mut summary = london();
    summary.conditions =
        Some("thunderstorm with heavy drizzle and scattered freezing rain".to_string());
    let dash = renderer().render(&summary, &RenderContext::at(morning()), &NoIcons);

    let content = &dash.report.content;
    let banner_h = dash.report.banner.height as i32;
    assert!(content.top >= banner_h);
    assert!(content.refinements <= 1);
    let cond = content.condition.as_ref().expect("condition drawn");
    assert!(!cond.fitted);
    assert_eq!(cond.size, 10);

    // nothing in the black plane above the content block
    let gap = Rectangle::new(
        Point::new(0, banner_h),
        Size::new(250, (content.top - banner_h) as u32),
    );
    assert_eq!(ink_count(&dash.planes.black, gap), 0);
}

#[test]
fn test_saved_frame_reloads_identically() {
    let dir = tempfile::tempdir().unwrap();
    let icons = MemoryIconStore::new().with("10d", solid_icon(60));
    let dash = renderer().render(&london(), &RenderContext::at(morning()), &icons);

    let paths = dash.save(dir.path(), "wx").unwrap();
    assert!(paths.preview.is_file());
    let reloaded = Planes::load_pngs(&paths.black, &paths.red).unwrap();
    assert_eq!(reloaded, dash.planes);

    let preview = image::open(&paths.preview).unwrap().to_rgb8();
    assert_eq!(preview.dimensions(), (250, 122));
}

#[test]
fn test_custom_canvas_size() {
    let layout = LayoutConfig::for_canvas(296, 128);
    let dash = Renderer::new(layout, Typeface::Builtin).render(
        &london(),
        &RenderContext::at(morning()),
        &NoIcons,
    );
    assert_eq!(dash.planes.dimensions(), (296, 128));
    assert!(dash.report.content.top + dash.report.content.height as i32 <= 128);
}

#[test]
fn test_truetype_render_respects_regions() {
    let face = Typeface::load_first(&default_candidates());
    if !matches!(face, Typeface::TrueType { .. }) {
        eprintln!("no TrueType candidate installed, skipping");
        return;
    }
    let renderer = Renderer::new(LayoutConfig::default(), face);
    let icons = MemoryIconStore::new().with("10d", solid_icon(48));
    let mut long = london();
    long.conditions = Some("thunderstorm with heavy drizzle".to_string());

    for summary in [london(), long] {
        let dash = renderer.render(&summary, &RenderContext::at(morning()), &icons);
        let bh = dash.report.banner.height;
        let banner = Rectangle::new(Point::zero(), Size::new(250, bh));
        assert_eq!(ink_count(&dash.planes.black, banner), 0);
        assert!(ink_count(&dash.planes.red, banner) < (250 * bh) as usize);

        let content = &dash.report.content;
        assert!(content.top >= bh as i32);
        assert!(content.top + content.height as i32 <= 122);
        let canvas = Rectangle::new(Point::zero(), Size::new(250, 122));
        for p in [&content.temperature, &content.unit, &content.feels, &content.humidity] {
            assert!(!p.text.is_empty());
            assert_eq!(p.rect.intersection(&canvas), p.rect, "{:?} leaves the canvas", p.text);
        }
        let slot = dash.report.icon.expect("icon placed");
        assert_eq!(ink_count(&dash.planes.black, slot), 0);
    }
}
