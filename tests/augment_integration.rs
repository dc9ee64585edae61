//! Integration tests for document augmentation

use std::io::Write;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use svg_augment::{parse_path, AugmentError, Point, SvgDocument, SvgTransforms, TransformConfig};

const DRAWING: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
  <g id="body" fill="#ff0000">
    <path d="M10 10 L20 10" fill="#ff0000"/>
    <path d="M 50,50 C 100,0 100,100 150,50" stroke="#000000"/>
  </g>
  <path d="M0 0 L10 0 L10 10 Z" fill="#0000ff"/>
</svg>"##;

fn rng() -> StdRng {
    StdRng::seed_from_u64(2024)
}

fn path_data(markup: &str) -> Vec<String> {
    SvgDocument::parse(markup)
        .expect("Should parse")
        .expect("Should have an <svg> root")
        .paths()
        .map(|p| p.path.to_svg_d())
        .collect()
}

#[test]
fn test_path_data_serialization() {
    let path = parse_path("M 50,50 C 100,0 100,100 150,50").expect("Should parse");
    insta::assert_snapshot!(path.to_svg_d(), @"M50 50 C100 0 100 100 150 50");

    let closed = parse_path("m10 10 h20 v20 z").expect("Should parse");
    insta::assert_snapshot!(closed.to_svg_d(), @"M10 10 L30 10 L30 30 L10 10 Z");
}

#[test]
fn test_empty_config_preserves_geometry() {
    let mut transforms = SvgTransforms::with_noise_seed(TransformConfig::new().with_p(1.0), 1);
    let out = transforms.augment_text(DRAWING, &mut rng());
    assert_eq!(path_data(&out), path_data(DRAWING));
}

#[test]
fn test_zero_probability_preserves_geometry() {
    let config = TransformConfig::new()
        .with_rotate(-30.0, 30.0)
        .with_shift_re(-5.0, 5.0)
        .with_shift_im(-5.0, 5.0)
        .with_scale(0.5, 1.5)
        .with_noise(0.5, 1.0)
        .with_colors(["#123456"])
        .with_p(0.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 9);
    let out = transforms.augment_text(DRAWING, &mut rng());
    assert_eq!(path_data(&out), path_data(DRAWING));
    assert!(!out.contains("#123456"));
}

#[test]
fn test_zero_rotation_is_identity() {
    let config = TransformConfig::new().with_rotate(0.0, 0.0).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms.augment_text(DRAWING, &mut rng());
    assert_eq!(path_data(&out), path_data(DRAWING));
}

#[test]
fn test_half_turn_about_viewbox_center() {
    let config = TransformConfig::new().with_rotate(180.0, 180.0).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms.augment_text(
        r#"<svg viewBox="0 0 100 100"><path d="M0 0 L10 0"/></svg>"#,
        &mut rng(),
    );
    let doc = SvgDocument::parse(&out).unwrap().unwrap();
    let segment = &doc.paths().next().unwrap().path.segments[0];
    assert!(segment.start().approx_eq(Point::new(100.0, 100.0), 1e-9));
    assert!(segment.end().approx_eq(Point::new(90.0, 100.0), 1e-9));
}

#[test]
fn test_empty_config_keeps_full_precision() {
    let mut transforms = SvgTransforms::with_noise_seed(TransformConfig::new(), 1);
    let input = r#"<svg viewBox="0 0 1 1"><path d="M0.12345 0.0004 L0.9876 0.5"/></svg>"#;
    let out = transforms.augment_text(input, &mut rng());
    assert_eq!(out, r#"<svg viewBox="0 0 1 1"><path d="M0.12345 0.0004 L0.9876 0.5"/></svg>"#);
}

#[test]
fn test_overflowing_coordinate_is_dropped() {
    let mut transforms = SvgTransforms::with_noise_seed(TransformConfig::new(), 1);
    let out = transforms.augment_text(
        r#"<svg><path d="M0 0 L1e999 0"/><path d="M1 1 L2 2"/></svg>"#,
        &mut rng(),
    );
    assert_eq!(out, r#"<svg><path d="M1 1 L2 2"/></svg>"#);
    assert!(svg_augment::is_valid(&out));
}

#[test]
fn test_scale_about_origin() {
    let config = TransformConfig::new().with_scale(2.0, 2.0).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms.augment_text(DRAWING, &mut rng());
    assert_eq!(
        path_data(&out),
        vec![
            "M20 20 L40 20",
            "M100 100 C200 0 200 200 300 100",
            "M0 0 L20 0 L20 20 L0 0 Z",
        ]
    );
}

#[test]
fn test_shift_both_axes() {
    let config = TransformConfig::new()
        .with_shift_re(3.0, 3.0)
        .with_shift_im(-4.0, -4.0)
        .with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms.augment_text(r#"<svg><path d="M0 0 L10 0"/></svg>"#, &mut rng());
    assert_eq!(out, r#"<svg><path d="M3 -4 L13 -4"/></svg>"#);
}

#[test]
fn test_transforms_compose_in_order() {
    // Shift before scale: (0,0) + (1,0) then ×2
    let config = TransformConfig::new()
        .with_shift_re(1.0, 1.0)
        .with_scale(2.0, 2.0)
        .with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms.augment_text(r#"<svg><path d="M0 0 L10 0"/></svg>"#, &mut rng());
    assert_eq!(out, r#"<svg><path d="M2 0 L22 0"/></svg>"#);
}

#[test]
fn test_color_change_uses_palette() {
    let config = TransformConfig::new().with_colors(["#00ff00"]).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms.augment_text(DRAWING, &mut rng());

    let doc = SvgDocument::parse(&out).unwrap().unwrap();
    let paths: Vec<_> = doc.paths().collect();
    assert_eq!(paths[0].attributes.get("fill"), Some("#00ff00"));
    assert_eq!(paths[1].attributes.get("stroke"), Some("#00ff00"));
    assert_eq!(paths[1].attributes.get("fill"), None);
    assert_eq!(paths[2].attributes.get("fill"), Some("#00ff00"));
    // Group attributes are not recolored
    assert_eq!(doc.groups[0].attributes.get("fill"), Some("#ff0000"));
}

#[test]
fn test_groups_survive_augmentation() {
    let config = TransformConfig::new().with_scale(1.0, 1.0).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms.augment_text(DRAWING, &mut rng());
    assert_eq!(
        out,
        concat!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">"##,
            r##"<g id="body" fill="#ff0000">"##,
            r##"<path d="M10 10 L20 10" fill="#ff0000"/>"##,
            r##"<path d="M50 50 C100 0 100 100 150 50" stroke="#000000"/>"##,
            r##"</g>"##,
            r##"<path d="M0 0 L10 0 L10 10 L0 0 Z" fill="#0000ff"/>"##,
            r##"</svg>"##,
        )
    );
}

#[test]
fn test_document_without_paths_keeps_root() {
    let config = TransformConfig::new().with_scale(2.0, 2.0).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let input = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="5" height="5"/></svg>"#;
    let out = transforms.augment_text(input, &mut rng());
    assert_eq!(out, r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"></svg>"#);
}

#[test]
fn test_malformed_path_does_not_abort_siblings() {
    let config = TransformConfig::new().with_scale(2.0, 2.0).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let input = r#"<svg><path d="M0 0 L x y"/><path d="M1 1 L2 2"/></svg>"#;
    let out = transforms.augment_text(input, &mut rng());
    assert_eq!(out, r#"<svg><path d="M2 2 L4 4"/></svg>"#);
}

#[test]
fn test_noise_keeps_segment_count() {
    let config = TransformConfig::new().with_noise(0.5, 0.5).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 42);
    let out = transforms.augment_text(DRAWING, &mut rng());

    let before = SvgDocument::parse(DRAWING).unwrap().unwrap();
    let after = SvgDocument::parse(&out).unwrap().unwrap();
    assert_eq!(after.paths().count(), before.paths().count());
    let first = after.paths().next().unwrap();
    assert!(first.path.segments[0].start().approx_eq(Point::new(10.0, 10.0), 5.0));
}

#[test]
fn test_same_seeds_same_output() {
    let config = TransformConfig::new()
        .with_rotate(-10.0, 10.0)
        .with_scale(0.8, 1.2)
        .with_noise(0.1, 0.5);
    let mut a = SvgTransforms::with_noise_seed(config.clone(), 77);
    let mut b = SvgTransforms::with_noise_seed(config, 77);
    assert_eq!(
        a.augment_text(DRAWING, &mut rng()),
        b.augment_text(DRAWING, &mut rng())
    );
}

#[test]
fn test_augment_file() {
    let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
    file.write_all(br#"<svg><path d="M1 2 L3 4"/></svg>"#)
        .expect("Should write");

    let config = TransformConfig::new().with_scale(10.0, 10.0).with_p(1.0);
    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms
        .augment_file(file.path(), &mut rng())
        .expect("Should augment");
    assert_eq!(out, r#"<svg><path d="M10 20 L30 40"/></svg>"#);
}

#[test]
fn test_augment_missing_file() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let mut transforms = SvgTransforms::with_noise_seed(TransformConfig::new(), 1);
    let err = transforms
        .augment_file(&dir.path().join("missing.svg"), &mut rng())
        .unwrap_err();
    assert!(matches!(err, AugmentError::Io(_)));
}

#[test]
fn test_config_from_toml() {
    let config = TransformConfig::from_str(
        r##"
p = 1.0
color_change = true
colors = ["#abcdef"]
scale = { from = 3.0, to = 3.0 }
"##,
    )
    .expect("Should parse config");

    let mut transforms = SvgTransforms::with_noise_seed(config, 1);
    let out = transforms.augment_text(r##"<svg><path d="M1 1 L2 2" fill="red"/></svg>"##, &mut rng());
    assert_eq!(out, r##"<svg><path d="M3 3 L6 6" fill="#abcdef"/></svg>"##);
}
