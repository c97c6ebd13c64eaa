//! Argument mini-language tests
//!
//! Converted from the original tool's NUnit argument-parser fixture: each
//! token form, its case-insensitivity, and the distinct failure kinds.

use dir2dac::config::{
    Configuration, OptionKind, OptionSchema, SqlServerVersion, UnknownOptionPolicy,
};
use dir2dac::Dir2DacError;

#[test]
fn test_parse_sql_option_bool() {
    let config = Configuration::from_args(["/do=trustworthy=true"]).unwrap();
    assert_eq!(config.model_options.get_bool("Trustworthy"), Some(true));
}

#[test]
fn test_parse_sql_option_int() {
    let config =
        Configuration::from_args(["/daTaBaseOptioN=ChangeTrackingRetentionPeriOD=123"]).unwrap();
    assert_eq!(
        config.model_options.get_int("ChangeTrackingRetentionPeriod"),
        Some(123)
    );
}

#[test]
fn test_parse_sql_option_string() {
    let config = Configuration::from_args(["/daTaBaseOptioN=Collation=EdwardRulz"]).unwrap();
    assert_eq!(config.model_options.get_str("Collation"), Some("EdwardRulz"));
}

#[test]
fn test_parse_sql_option_negative_int() {
    let config = Configuration::from_args(["/do=TwoDigitYearCutoff=-1"]).unwrap();
    assert_eq!(config.model_options.get_int("TwoDigitYearCutoff"), Some(-1));
}

#[test]
fn test_option_last_write_wins() {
    let config =
        Configuration::from_args(["/do=trustworthy=true", "/do=TRUSTWORTHY=false"]).unwrap();
    assert_eq!(config.model_options.get_bool("Trustworthy"), Some(false));
    assert_eq!(config.model_options.len(), 1);
}

#[test]
fn test_parse_source_path() {
    let config = Configuration::from_args(["/sourcePath=c:\\blah\\blah=*tSQLt*.sql"]).unwrap();

    assert_eq!(config.source_paths.len(), 1);
    assert_eq!(
        config.source_paths[0].path.to_str().unwrap(),
        "c:\\blah\\blah"
    );
    assert_eq!(config.source_paths[0].filter, "*tSQLt*.sql");
}

#[test]
fn test_source_filter_defaults_to_star_dot_sql() {
    let config = Configuration::from_args(["/sourcePath=c:\\blah\\blah"]).unwrap();

    assert_eq!(config.source_paths.len(), 1);
    assert_eq!(config.source_paths[0].filter, "*.sql");
}

#[test]
fn test_repeated_source_paths_append_in_order() {
    let config =
        Configuration::from_args(["/sourcePath=c:\\one", "/sourcePath=c:\\two=*.proc.sql"])
            .unwrap();

    assert_eq!(config.source_paths.len(), 2);
    assert_eq!(config.source_paths[0].path.to_str().unwrap(), "c:\\one");
    assert_eq!(config.source_paths[1].path.to_str().unwrap(), "c:\\two");
    assert_eq!(config.source_paths[1].filter, "*.proc.sql");
}

#[test]
fn test_parse_pre_compare_path() {
    let config = Configuration::from_args(["/PrECompare=c:\\blah\\blah\\ssss.sql"]).unwrap();
    assert_eq!(
        config.pre_compare_script.as_ref().unwrap().to_str().unwrap(),
        "c:\\blah\\blah\\ssss.sql"
    );
}

#[test]
fn test_parse_post_compare_path() {
    let config = Configuration::from_args(["/Postcompare=c:\\blah\\blah\\ssss.sql"]).unwrap();
    assert_eq!(
        config
            .post_compare_script
            .as_ref()
            .unwrap()
            .to_str()
            .unwrap(),
        "c:\\blah\\blah\\ssss.sql"
    );
}

#[test]
fn test_parse_output_path() {
    let config = Configuration::from_args(["/DP=c:\\blah\\blah\\767676\\"]).unwrap();
    assert_eq!(
        config.dacpac_path.as_ref().unwrap().to_str().unwrap(),
        "c:\\blah\\blah\\767676\\"
    );
}

#[test]
fn test_parse_sql_version() {
    let config = Configuration::from_args(["/sv=SQL100"]).unwrap();
    assert_eq!(config.sql_server_version, SqlServerVersion::Sql100);
}

#[test]
fn test_version_defaults_when_absent() {
    let config = Configuration::from_args(["/sourcePath=c:\\blah"]).unwrap();
    assert_eq!(config.sql_server_version, SqlServerVersion::Sql160);
}

#[test]
fn test_unknown_version_is_rejected() {
    let err = Configuration::from_args(["/sv=SQL42"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::UnknownServerVersionError { version } if version == "SQL42"
    ));
}

#[test]
fn test_unknown_key_is_rejected() {
    let err = Configuration::from_args(["/sorcePath=c:\\blah"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::UnknownKeyError { key } if key == "sorcePath"
    ));
}

#[test]
fn test_non_numeric_int_option_is_rejected() {
    let err = Configuration::from_args(["/do=ChangeTrackingRetentionPeriod=soon"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::OptionCoercionError { name, value, .. }
            if name == "ChangeTrackingRetentionPeriod" && value == "soon"
    ));
}

#[test]
fn test_non_boolean_bool_option_is_rejected() {
    let err = Configuration::from_args(["/do=trustworthy=yes"]).unwrap_err();
    assert!(matches!(err, Dir2DacError::OptionCoercionError { .. }));
}

#[test]
fn test_unknown_option_name_rejected_by_default() {
    let err = Configuration::from_args(["/do=Flurb=true"]).unwrap_err();
    assert!(matches!(
        err,
        Dir2DacError::UnknownModelOptionError { name } if name == "Flurb"
    ));
}

#[test]
fn test_unknown_option_name_ignored_under_ignore_policy() {
    let config = Configuration::from_args_with(
        ["/do=Flurb=true", "/do=trustworthy=true"],
        UnknownOptionPolicy::Ignore,
        dir2dac::config::default_schema(),
    )
    .unwrap();
    assert!(config.model_options.get("Flurb").is_none());
    assert_eq!(config.model_options.get_bool("Trustworthy"), Some(true));
}

#[test]
fn test_injected_schema_overrides_kinds() {
    let schema = OptionSchema::new([("Retention", OptionKind::Int)]);
    let config = Configuration::from_args_with(
        ["/do=retention=30"],
        UnknownOptionPolicy::Reject,
        &schema,
    )
    .unwrap();
    assert_eq!(config.model_options.get_int("Retention"), Some(30));
}

#[test]
fn test_malformed_token_is_rejected() {
    let err = Configuration::from_args(["sourcePath=c:\\blah"]).unwrap_err();
    assert!(matches!(err, Dir2DacError::TokenFormatError { .. }));

    let err = Configuration::from_args(["/sourcePath"]).unwrap_err();
    assert!(matches!(err, Dir2DacError::TokenFormatError { .. }));
}

#[test]
fn test_option_token_with_missing_value_is_rejected() {
    let err = Configuration::from_args(["/do=trustworthy"]).unwrap_err();
    assert!(matches!(err, Dir2DacError::TokenFormatError { .. }));
}

#[test]
fn test_coerced_values_round_trip_display() {
    let config = Configuration::from_args([
        "/do=trustworthy=TRUE",
        "/do=ChangeTrackingRetentionPeriod=123",
        "/do=Collation=Latin1_General_CI_AS",
    ])
    .unwrap();

    assert_eq!(
        config.model_options.get("Trustworthy").unwrap().to_string(),
        "true"
    );
    assert_eq!(
        config
            .model_options
            .get("ChangeTrackingRetentionPeriod")
            .unwrap()
            .to_string(),
        "123"
    );
    assert_eq!(
        config.model_options.get("Collation").unwrap().to_string(),
        "Latin1_General_CI_AS"
    );
}
