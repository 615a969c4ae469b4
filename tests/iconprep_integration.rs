/*
 *  tests/iconprep_integration.rs
 *
 *  Icon set preparation against a directory of sources
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 */

use image::{Rgba, RgbaImage};

use wxpaper::iconprep::{normalize_icon, prepare_from_dir, NormalizeOptions};
use wxpaper::iconstore::{DirIconStore, IconStore};

fn write_glyph(path: &std::path::Path) {
    let img = RgbaImage::from_fn(40, 40, |x, y| {
        if (10..30).contains(&x) && (15..25).contains(&y) {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    img.save(path).unwrap();
}

#[test]
fn test_bad_source_does_not_stop_the_batch() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_glyph(&src.path().join("01d.png"));
    std::fs::write(src.path().join("02d.png"), b"definitely not a png").unwrap();
    write_glyph(&src.path().join("04d@2x.png"));

    let store = DirIconStore::new(out.path().join("icons"));
    let report = prepare_from_dir(
        src.path(),
        &store,
        &["01d", "02d", "03d", "04d"],
        &NormalizeOptions::default(),
    )
    .unwrap();

    assert_eq!(report.written.len(), 2);
    let failed: Vec<&str> = report.failed.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(failed, vec!["02d", "03d"]);
    assert!(!report.is_complete());

    let icon = store.icon("01d").expect("01d stored");
    // 20x10 ink block plus 3px padding, squared
    assert_eq!((icon.width(), icon.height()), (26, 26));
    assert!(store.icon("04d").is_some());
    assert!(store.icon("02d").is_none());
}

#[test]
fn test_stored_icons_are_stable_under_renormalisation() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_glyph(&src.path().join("10n.png"));
    let store = DirIconStore::new(out.path());
    let opts = NormalizeOptions::default();
    let report = prepare_from_dir(src.path(), &store, &["10n"], &opts).unwrap();
    assert!(report.is_complete());

    let saved = std::fs::read(&report.written[0]).unwrap();
    let first = normalize_icon(&saved, &opts).unwrap();
    let stored = store.icon("10n").unwrap();
    // trim and square reproduce their own output
    assert_eq!(first.image(), stored.image());
}

#[cfg(feature = "svg-icons")]
#[test]
fn test_svg_sources_are_rasterised() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(
        src.path().join("13d.svg"),
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="50" height="50">
             <circle cx="25" cy="25" r="20" fill="black"/>
           </svg>"#,
    )
    .unwrap();
    let store = DirIconStore::new(out.path());
    let report =
        prepare_from_dir(src.path(), &store, &["13d"], &NormalizeOptions::default()).unwrap();
    assert!(report.is_complete());
    let icon = store.icon("13d").unwrap();
    assert!(icon.is_square());
    assert!(icon.is_ink(icon.width() / 2, icon.height() / 2));
}
