//! Reads every protocol document, then writes one Zig file per namespace.

#[cfg(test)]
mod tests;

use {
    crate::{
        builder::BuildError,
        config::Config,
        emit::{EmitError, Emitter},
        registry::Registry,
    },
    error_reporter::Report,
    protocol_tree::TreeError,
    std::{
        io,
        path::{Path, PathBuf},
        process::Command,
    },
    thiserror::Error,
};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("No protocol documents were given")]
    NoProtocols,
    #[error("Could not read {}", .0.display())]
    Read(PathBuf, #[source] io::Error),
    #[error("Could not parse {}", .0.display())]
    Parse(PathBuf, #[source] TreeError),
    #[error("Could not process {}", .0.display())]
    Build(PathBuf, #[source] BuildError),
    #[error("Could not create the output directory {}", .0.display())]
    CreateDir(PathBuf, #[source] io::Error),
    #[error("Could not generate the bindings of namespace {0}")]
    Emit(String, #[source] EmitError),
    #[error("Could not write {}", .0.display())]
    Write(PathBuf, #[source] io::Error),
}

/// Parses and registers every document. Nothing is written if any of them fails.
pub fn load(paths: &[PathBuf]) -> Result<Registry, DriverError> {
    let mut registry = Registry::default();
    for path in paths {
        log::debug!("Reading {}", path.display());
        let content = std::fs::read(path).map_err(|e| DriverError::Read(path.clone(), e))?;
        let root =
            protocol_tree::parse(&content).map_err(|e| DriverError::Parse(path.clone(), e))?;
        registry
            .add(&root)
            .map_err(|e| DriverError::Build(path.clone(), e))?;
    }
    log::info!(
        "Loaded {} protocols in {} namespaces",
        registry.protocols().len(),
        registry.prefixes().len()
    );
    Ok(registry)
}

/// Generates the bindings described by `config` and returns the paths of the
/// generated files.
pub fn run(config: &Config) -> Result<Vec<PathBuf>, DriverError> {
    if config.protocols.is_empty() {
        return Err(DriverError::NoProtocols);
    }
    let registry = load(&config.protocols)?;
    let output_dir = &config.output_dir;
    std::fs::create_dir_all(output_dir)
        .map_err(|e| DriverError::CreateDir(output_dir.clone(), e))?;
    let emitter = Emitter::new(&registry, &config.runtime_dir);
    let mut files = vec![];
    for prefix in registry.prefixes() {
        let mut out = String::new();
        emitter
            .write_namespace(&mut out, &prefix)
            .map_err(|e| DriverError::Emit(prefix.clone(), e))?;
        let path = output_dir.join(format!("{prefix}.zig"));
        std::fs::write(&path, out).map_err(|e| DriverError::Write(path.clone(), e))?;
        log::info!("Wrote {}", path.display());
        if config.format {
            format(&config.formatter, &path);
        }
        files.push(path);
    }
    Ok(files)
}

/// Runs the formatter on `path`. Failures leave the unformatted file in place.
fn format(formatter: &[String], path: &Path) {
    let Some((program, args)) = formatter.split_first() else {
        return;
    };
    let res = Command::new(program).args(args).arg(path).status();
    match res {
        Ok(status) if status.success() => log::debug!("Formatted {}", path.display()),
        Ok(status) => log::warn!(
            "{} exited with {} while formatting {}",
            program,
            status,
            path.display()
        ),
        Err(e) => log::warn!("Could not run {}: {}", program, Report::new(e)),
    }
}
