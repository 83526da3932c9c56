use jobgraph_core::Error;
use jobgraph_layout::LayoutConfig;

#[test]
fn missing_fields_keep_their_defaults() {
    let config = LayoutConfig::from_json_str(r#"{ "nodeSpacing": 40 }"#).unwrap();
    assert_eq!(config.node_spacing, 40.0);
    assert_eq!(config.level_spacing, 250.0);
    assert_eq!(config.level_offset_x, 100.0);
    assert_eq!(config.level_offset_y, 300.0);
    assert_eq!(
        LayoutConfig::from_json_str("{}").unwrap(),
        LayoutConfig::default()
    );
}

#[test]
fn negative_spacing_is_rejected() {
    let err = LayoutConfig::from_json_str(r#"{ "levelSpacing": -1 }"#).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[test]
fn non_finite_values_are_rejected() {
    let config = LayoutConfig {
        level_offset_y: f64::NAN,
        ..LayoutConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid layout config: `levelOffsetY` must be a finite number"
    );
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = LayoutConfig::from_json_str("{ nodeSpacing: 1 }").unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}
