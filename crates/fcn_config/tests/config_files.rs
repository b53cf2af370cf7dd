use fcn_config::{load_config_file, resolve_blacklist, ConfigError, GateFunction};
use fcn_common::TruthTable;

#[test]
fn blacklist_from_file_resolves_truth_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.toml");
    std::fs::write(
        &path,
        r#"
[exact]
scheme = "2DDWave"
crossings = true

[[blacklist]]
x = 2
y = 2
function = "and"

[[blacklist]]
x = 2
y = 0
function = "wire"
"#,
    )
    .unwrap();

    let config = load_config_file(&path).unwrap();
    assert!(config.exact.crossings);
    assert_eq!(config.blacklist[1].function, GateFunction::Wire);

    let resolved = resolve_blacklist(&config.blacklist);
    assert_eq!(resolved[&(2, 2)][0].function, TruthTable::and());
    assert!(resolved[&(2, 0)][0].function.is_identity());
}

#[test]
fn unknown_field_type_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[exact]\nnum_threads = \"many\"\n").unwrap();
    assert!(matches!(
        load_config_file(&path),
        Err(ConfigError::ParseError(_))
    ));
}
