use sestring_eval::{ClientLanguage, EvaluatorConfig, RedirectRule};

#[test]
fn saved_config_loads_back() {
    let dir = std::env::temp_dir().join(format!("sestring-eval-config-{}", std::process::id()));
    let path = dir.join("nested").join("evaluator.toml");

    let config = EvaluatorConfig {
        max_depth: 12,
        default_language: ClientLanguage::French,
        redirects: vec![RedirectRule {
            sheet: "Item".to_string(),
            first_row: 100,
            last_row: 199,
            target_sheet: "EventItem".to_string(),
            row_offset: 2_000_000,
            column_offset: 0,
        }],
        ..EvaluatorConfig::default()
    };
    config.save(&path).expect("config is saved");

    let loaded = EvaluatorConfig::load(&path).expect("config is loaded");
    assert_eq!(loaded, config);

    std::fs::remove_dir_all(&dir).expect("temporary directory is removed");
}

#[test]
fn missing_file_is_an_error() {
    let path = std::env::temp_dir().join("sestring-eval-config-missing").join("evaluator.toml");
    assert!(EvaluatorConfig::load(&path).is_err());
}
