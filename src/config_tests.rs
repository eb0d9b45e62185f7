use super::*;

#[test]
fn test_defaults() {
    let config = PipelineConfig::default();
    assert_eq!(config.actor_column, "follower_id");
    assert_eq!(config.entity_column, "twitter_name");
    assert_eq!(config.label_column.as_deref(), Some("type2"));
    assert_eq!(config.n_components, 100);
    assert_eq!(config.export_dimensions, 4);
    assert_eq!(config.seed, 42);
    assert_eq!(config.svd_method, SvdMethod::Full);
    assert_eq!(config.top_k, 5);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = PipelineConfig::from_toml_str(
        r#"
        seed = 7
        svd_method = "gram"
        label_column = "category"
        "#,
    )
    .expect("valid toml");
    assert_eq!(config.seed, 7);
    assert_eq!(config.svd_method, SvdMethod::Gram);
    assert_eq!(config.label_column.as_deref(), Some("category"));
    assert_eq!(config.n_components, 100);
}

#[test]
fn test_empty_toml_is_default() {
    let config = PipelineConfig::from_toml_str("").expect("empty toml");
    assert_eq!(config, PipelineConfig::default());
}

#[test]
fn test_unknown_key_rejected() {
    let err = PipelineConfig::from_toml_str("n_compnents = 3").expect_err("typo");
    assert!(matches!(err, FollownetError::Config(_)));
}

#[test]
fn test_bad_method_rejected() {
    let err = PipelineConfig::from_toml_str(r#"svd_method = "randomized""#).expect_err("bad method");
    assert!(matches!(err, FollownetError::Config(_)));
}

#[test]
fn test_validate_ranges() {
    let cases = [
        PipelineConfig {
            n_components: 0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            export_dimensions: 0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            resolution: 0.0,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            resolution: f64::INFINITY,
            ..PipelineConfig::default()
        },
        PipelineConfig {
            actor_column: " ".into(),
            ..PipelineConfig::default()
        },
        PipelineConfig {
            entity_column: "follower_id".into(),
            ..PipelineConfig::default()
        },
        PipelineConfig {
            label_column: Some(String::new()),
            ..PipelineConfig::default()
        },
        PipelineConfig {
            delimiter: 'é',
            ..PipelineConfig::default()
        },
    ];
    for config in cases {
        assert!(
            matches!(config.validate(), Err(FollownetError::Config(_))),
            "{config:?} should be rejected"
        );
    }
}

#[test]
fn test_toml_round_trip() {
    let config = PipelineConfig {
        seed: 9,
        label_column: Some("category".into()),
        overwrite: true,
        ..PipelineConfig::default()
    };
    let text = config.to_toml_string().expect("serializable");
    let back = PipelineConfig::from_toml_str(&text).expect("parsable");
    assert_eq!(back, config);
}

#[test]
fn test_from_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("follownet.toml");
    std::fs::write(&path, "top_k = 3\nresolution = 0.5\n").expect("write config");
    let config = PipelineConfig::from_path(&path).expect("valid file");
    assert_eq!(config.top_k, 3);
    assert!((config.resolution - 0.5).abs() < 1e-12);

    let missing = PipelineConfig::from_path(dir.path().join("absent.toml"));
    assert!(matches!(missing, Err(FollownetError::Io(_))));
}

#[test]
fn test_derived_components() {
    let config = PipelineConfig {
        delimiter: ';',
        export_dimensions: 2,
        n_components: 3,
        svd_method: SvdMethod::Gram,
        ..PipelineConfig::default()
    };
    let set = config
        .relation_reader()
        .read("follower_id;twitter_name\n1;a\n".as_bytes())
        .expect("semicolon separated");
    assert_eq!(set.len(), 1);

    let ca = config.correspondence();
    assert_eq!(ca.n_components(), 3);
    assert_eq!(ca.method(), SvdMethod::Gram);

    let export = config.export_options();
    assert_eq!(export.dimensions, 2);
    assert_eq!(export.entity_column, "twitter_name");
}
