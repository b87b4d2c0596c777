use {
    crate::{
        config::Config,
        driver::{DriverError, run},
        test_utils::{APP, EXT_CORE, EXT_EXTRA},
    },
    std::path::{Path, PathBuf},
    tempfile::TempDir,
};

fn config(dir: &Path, docs: &[(&str, &str)]) -> Config {
    let mut protocols = vec![];
    for (name, content) in docs {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        protocols.push(path);
    }
    Config {
        protocols,
        output_dir: dir.join("out"),
        format: false,
        ..Default::default()
    }
}

#[test]
fn writes_one_file_per_namespace() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let config = config(
        dir,
        &[
            ("ext-core.xml", EXT_CORE),
            ("ext-extra.xml", EXT_EXTRA),
            ("app.xml", APP),
        ],
    );
    let files = run(&config).unwrap();
    assert_eq!(files, [dir.join("out/ext.zig"), dir.join("out/app.zig")]);
    let app = std::fs::read_to_string(dir.join("out/app.zig")).unwrap();
    assert!(app.contains("pub const Window = enum(u32) {"));
    assert!(app.contains("const Proxy = @import(\"../proxy.zig\").Proxy;"));
    assert!(app.contains("const ext = @import(\"ext.zig\");"));
    let ext = std::fs::read_to_string(dir.join("out/ext.zig")).unwrap();
    assert!(ext.contains("pub const Seat = enum(u32) {"));
}

#[test]
fn broken_document_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let config = config(
        dir,
        &[
            ("ext-core.xml", EXT_CORE),
            ("broken.xml", "<protocol name=\"broken\"><interface"),
        ],
    );
    let res = run(&config);
    assert!(matches!(res, Err(DriverError::Parse(p, _)) if p == dir.join("broken.xml")));
    assert!(!dir.join("out").exists());
}

#[test]
fn invalid_protocol() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let config = config(dir, &[("empty.xml", "<protocol name=\"empty\"/>")]);
    assert!(matches!(run(&config), Err(DriverError::Build(..))));
}

#[test]
fn missing_document() {
    let config = Config {
        protocols: vec![PathBuf::from("/nonexistent/protocol.xml")],
        ..Default::default()
    };
    assert!(matches!(run(&config), Err(DriverError::Read(..))));
}

#[test]
fn no_documents() {
    assert!(matches!(
        run(&Config::default()),
        Err(DriverError::NoProtocols)
    ));
}

#[test]
fn missing_formatter_is_not_fatal() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let mut config = config(dir, &[("ext-core.xml", EXT_CORE)]);
    config.format = true;
    config.formatter = vec!["wlzig-formatter-that-does-not-exist".to_owned()];
    let files = run(&config).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].exists());
}
