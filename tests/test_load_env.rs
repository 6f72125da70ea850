use env_loadr::{
    EnvError, Kind, LoadOptions, MapEnv, Schema, SchemaItem, Value, load_env, load_env_from,
};
use serial_test::serial;

fn fixture() -> MapEnv {
    let mut env = MapEnv::new();
    let outcome = env.merge_dotenv("./test.env", false);
    assert!(outcome.errors.is_empty());
    env
}

#[test]
fn test_missing_required_is_reported() {
    let schema = [SchemaItem::required("TEST_MISSING", Kind::String)];

    let err = load_env_from(&schema, MapEnv::new()).unwrap_err();

    assert_eq!(err.len(), 1);
    assert_eq!(err.errors()[0].name(), Some("TEST_MISSING"));
    assert!(err.to_string().contains("Missing required env var: TEST_MISSING"));
}

#[test]
fn test_missing_optional_is_explicit_absent() {
    let schema = [SchemaItem::optional("TEST_MISSING", Kind::Number)];

    let record = load_env_from(&schema, MapEnv::new()).unwrap();

    assert_eq!(record.len(), 1);
    assert!(record.is_absent("TEST_MISSING"));
}

#[test]
fn test_boolean_values() {
    let schema = [SchemaItem::required("FOO", Kind::Boolean)];

    let record = load_env_from(&schema, MapEnv::new().with("FOO", "true")).unwrap();
    assert_eq!(record.get_bool("FOO"), Some(true));

    let record = load_env_from(&schema, MapEnv::new().with("FOO", "TRUE")).unwrap();
    assert_eq!(record.get_bool("FOO"), Some(true));

    assert!(load_env_from(&schema, MapEnv::new().with("FOO", "yes")).is_err());
}

#[test]
fn test_number_values() {
    let schema = [SchemaItem::required("PORT", Kind::Number)];

    let record = load_env_from(&schema, MapEnv::new().with("PORT", "3000")).unwrap();
    assert_eq!(record.get("PORT"), Some(&Value::Number(3000.0)));
    assert_eq!(record.get_str("PORT"), None);

    assert!(load_env_from(&schema, MapEnv::new().with("PORT", "abc")).is_err());
    assert!(load_env_from(&schema, MapEnv::new().with("PORT", "Infinity")).is_err());
}

#[test]
fn test_empty_string_handling() {
    let strict = [SchemaItem::required("NAME", Kind::String)];
    let lenient = [SchemaItem::required("NAME", Kind::String).allow_empty()];
    let env = MapEnv::new().with("NAME", "");

    let err = load_env_from(&strict, &env).unwrap_err();
    assert!(err.to_string().contains("NAME must be a non-empty string"));

    let record = load_env_from(&lenient, &env).unwrap();
    assert_eq!(record.get_str("NAME"), Some(""));
}

#[test]
fn test_two_failures_in_schema_order() {
    let schema = [
        SchemaItem::required("B_FLAG", Kind::Boolean),
        SchemaItem::required("OK", Kind::String),
        SchemaItem::required("A_PORT", Kind::Number),
    ];
    let env = MapEnv::new()
        .with("B_FLAG", "maybe")
        .with("OK", "fine")
        .with("A_PORT", "eighty");

    let err = load_env_from(&schema, &env).unwrap_err();

    let names: Vec<_> = err.iter().filter_map(EnvError::name).collect();
    assert_eq!(names, vec!["B_FLAG", "A_PORT"]);
    assert_eq!(
        err.to_string(),
        "Environment validation failed:\n\
         - B_FLAG must be \"true\" or \"false\" (received: \"maybe\")\n\
         - A_PORT must be a valid number (received: \"eighty\")"
    );
}

#[test]
fn test_email_and_url() {
    let email = [SchemaItem::required("EMAIL", Kind::Email)];
    let site = [SchemaItem::required("SITE", Kind::Url)];

    assert!(load_env_from(&email, MapEnv::new().with("EMAIL", "not-an-email")).is_err());
    assert!(load_env_from(&email, MapEnv::new().with("EMAIL", "a@b.co")).is_ok());
    assert!(load_env_from(&site, MapEnv::new().with("SITE", "not a url")).is_err());
    assert!(load_env_from(&site, MapEnv::new().with("SITE", "https://example.com")).is_ok());
}

#[test]
fn test_fixture_schema() {
    let schema = Schema::new()
        .item(SchemaItem::required("TEST_PORT", Kind::Number))
        .item(SchemaItem::required("TEST_DEBUG", Kind::Boolean))
        .item(SchemaItem::required("TEST_NAME", Kind::String))
        .item(SchemaItem::required("TEST_EMPTY", Kind::String).allow_empty())
        .item(SchemaItem::required("TEST_EMAIL", Kind::Email))
        .item(SchemaItem::required("TEST_SITE", Kind::Url))
        .item(SchemaItem::optional("TEST_NOT_IN_FILE", Kind::Url));

    let record = load_env_from(&schema, fixture()).unwrap();

    assert_eq!(record.get_number("TEST_PORT"), Some(3000.0));
    assert_eq!(record.get_bool("TEST_DEBUG"), Some(true));
    assert_eq!(record.get_str("TEST_NAME"), Some("env-loadr"));
    assert_eq!(record.get_str("TEST_EMPTY"), Some(""));
    assert_eq!(record.get_str("TEST_EMAIL"), Some("ops@example.com"));
    assert_eq!(record.get_str("TEST_SITE"), Some("https://example.com/status"));
    assert!(record.is_absent("TEST_NOT_IN_FILE"));

    let order: Vec<_> = record.iter().map(|(name, _)| name).collect();
    let expected: Vec<_> = schema.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(order, expected);
}

#[test]
fn test_fixture_bad_values_reported_together() {
    let schema = [
        SchemaItem::required("TEST_BAD_PORT", Kind::Number),
        SchemaItem::required("TEST_BAD_FLAG", Kind::Boolean),
        SchemaItem::required("TEST_PORT", Kind::Number),
    ];

    let err = load_env_from(&schema, fixture()).unwrap_err();

    assert_eq!(err.len(), 2);
    assert_eq!(err.errors()[0].received(), Some("abc"));
    assert_eq!(err.errors()[1].received(), Some("yes"));
}

#[test]
#[serial]
fn test_load_env_merges_dotenv_into_process() {
    std::env::remove_var("TEST_PORT");
    std::env::remove_var("TEST_DEBUG");

    let schema = [
        SchemaItem::required("TEST_PORT", Kind::Number),
        SchemaItem::required("TEST_DEBUG", Kind::Boolean),
    ];
    let record = load_env(&schema, &LoadOptions::new().dotenv_path("./test.env")).unwrap();

    assert_eq!(record.get_number("TEST_PORT"), Some(3000.0));
    assert_eq!(std::env::var("TEST_DEBUG").unwrap(), "TRUE");

    std::env::remove_var("TEST_PORT");
    std::env::remove_var("TEST_DEBUG");
}

#[test]
#[serial]
fn test_load_env_respects_existing_values() {
    std::env::set_var("TEST_PORT", "8080");

    let schema = [SchemaItem::required("TEST_PORT", Kind::Number)];

    let kept = load_env(&schema, &LoadOptions::new().dotenv_path("./test.env")).unwrap();
    assert_eq!(kept.get_number("TEST_PORT"), Some(8080.0));

    let options = LoadOptions::new()
        .dotenv_path("./test.env")
        .override_existing(true);
    let overridden = load_env(&schema, &options).unwrap();
    assert_eq!(overridden.get_number("TEST_PORT"), Some(3000.0));

    std::env::remove_var("TEST_PORT");
}

#[test]
#[serial]
fn test_load_env_missing_dotenv_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("TEST_ONLY_IN_PROCESS", "present");

    let schema = [SchemaItem::required("TEST_ONLY_IN_PROCESS", Kind::String)];
    let options = LoadOptions::new().dotenv_path(dir.path().join(".env"));

    let record = load_env(&schema, &options).unwrap();
    assert_eq!(record.get_str("TEST_ONLY_IN_PROCESS"), Some("present"));

    std::env::remove_var("TEST_ONLY_IN_PROCESS");
}

#[test]
#[serial]
fn test_load_env_skips_malformed_dotenv_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "TEST_GOOD_LINE=1\njunk line here\n").unwrap();
    std::env::remove_var("TEST_GOOD_LINE");

    let schema = [SchemaItem::required("TEST_GOOD_LINE", Kind::Number)];
    let record = load_env(&schema, &LoadOptions::new().dotenv_path(&path)).unwrap();

    assert_eq!(record.get_number("TEST_GOOD_LINE"), Some(1.0));
    std::env::remove_var("TEST_GOOD_LINE");
}

#[test]
#[serial]
fn test_load_env_failure_lists_only_schema_items() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, "not a valid line\n").unwrap();
    std::env::remove_var("TEST_NEVER_SET");

    let schema = [SchemaItem::required("TEST_NEVER_SET", Kind::String)];
    let err = load_env(&schema, &LoadOptions::new().dotenv_path(&path)).unwrap_err();

    assert_eq!(err.len(), 1);
    assert_eq!(err.errors()[0].name(), Some("TEST_NEVER_SET"));
}
