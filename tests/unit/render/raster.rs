use super::*;

const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"><rect width="2" height="2" fill="#ff0000" fill-opacity="0.5"/></svg>"##;

#[test]
fn pixels_come_out_straight_alpha() {
    let img = rasterize_svg(SQUARE, 1.0).unwrap();
    assert_eq!((img.width, img.height), (4, 2));
    assert_eq!(img.data.len(), 4 * 2 * 4);
    let first = &img.data[0..4];
    assert!(first[0] >= 250);
    assert!((126..=129).contains(&first[3]));
    // Right half is untouched.
    assert_eq!(&img.data[12..16], &[0, 0, 0, 0]);
}

#[test]
fn scale_multiplies_size_and_bad_input_errors() {
    let img = rasterize_svg(SQUARE, 2.0).unwrap();
    assert_eq!((img.width, img.height), (8, 4));
    assert!(rasterize_svg(SQUARE, 0.0).is_err());
    assert!(
        rasterize_svg("<svg", 1.0)
            .unwrap_err()
            .to_string()
            .starts_with("render error:")
    );
}

#[test]
fn writes_png_file() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("target/raster_unit");
    let path = dir.join("square.png");
    let _ = std::fs::remove_file(&path);
    write_png(SQUARE, 1.0, &path).unwrap();
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (4, 2));
}
