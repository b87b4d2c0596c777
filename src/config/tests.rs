use {
    crate::config::{Config, ConfigError},
    std::path::{Path, PathBuf},
};

#[test]
fn defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.output_dir, Path::new("generated"));
    assert_eq!(config.runtime_dir, "..");
    assert!(config.format);
    assert_eq!(config.formatter, ["zig", "fmt"]);
    assert!(config.protocols.is_empty());
}

#[test]
fn full() {
    let config = Config::parse(
        r#"
            protocols = ["wayland.xml", "/usr/share/xdg-shell.xml"]
            output-dir = "src/protocols"
            runtime-dir = "../runtime"
            format = false
            formatter = ["zig", "fmt", "--check"]
        "#,
    )
    .unwrap();
    assert_eq!(
        config.protocols,
        [
            PathBuf::from("wayland.xml"),
            PathBuf::from("/usr/share/xdg-shell.xml")
        ]
    );
    assert_eq!(config.output_dir, Path::new("src/protocols"));
    assert_eq!(config.runtime_dir, "../runtime");
    assert!(!config.format);
    assert_eq!(config.formatter, ["zig", "fmt", "--check"]);
}

#[test]
fn unknown_key() {
    assert!(Config::parse("output_dir = \"x\"").is_err());
    assert!(Config::parse("format = \"yes\"").is_err());
}

#[test]
fn relative_paths() {
    let mut config = Config::parse(
        r#"
            protocols = ["wayland.xml", "/abs/xdg.xml"]
            output-dir = "out"
        "#,
    )
    .unwrap();
    config.resolve_paths(Path::new("/project"));
    assert_eq!(
        config.protocols,
        [
            PathBuf::from("/project/wayland.xml"),
            PathBuf::from("/abs/xdg.xml")
        ]
    );
    assert_eq!(config.output_dir, Path::new("/project/out"));
}

#[test]
fn validation() {
    let mut config = Config::parse("formatter = []").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::EmptyFormatter)));
    config.format = false;
    assert!(config.validate().is_ok());
}

#[test]
fn missing_file() {
    let path = Path::new("/nonexistent/wlzig.toml");
    assert!(matches!(
        Config::load(path),
        Err(ConfigError::Read(p, _)) if p == path
    ));
    assert!(matches!(
        Config::locate(Some(path)),
        Err(ConfigError::Read(..))
    ));
}
