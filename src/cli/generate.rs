use {
    crate::{
        cli::GenerateArgs,
        config::{Config, ConfigError},
        driver::{self, DriverError},
    },
    error_reporter::Report,
    thiserror::Error,
};

#[derive(Debug, Error)]
enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Driver(#[from] DriverError),
}

pub fn main(args: GenerateArgs) {
    if let Err(e) = run(args) {
        fatal!("Could not generate bindings: {}", Report::new(e));
    }
}

fn run(args: GenerateArgs) -> Result<(), GenerateError> {
    let config = Config::locate(args.config.as_deref())?;
    let config = apply(config, args);
    config.validate()?;
    let files = driver::run(&config)?;
    log::info!(
        "Generated {} files in {}",
        files.len(),
        config.output_dir.display()
    );
    Ok(())
}

/// Overrides the configuration with the command-line arguments.
fn apply(mut config: Config, args: GenerateArgs) -> Config {
    if !args.protocols.is_empty() {
        config.protocols = args.protocols;
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(dir) = args.runtime_dir {
        config.runtime_dir = dir;
    }
    if args.no_format {
        config.format = false;
    }
    config
}

#[cfg(test)]
mod tests {
    use {
        super::apply,
        crate::{cli::GenerateArgs, config::Config},
        std::path::PathBuf,
    };

    #[test]
    fn arguments_override_the_configuration() {
        let config = Config {
            protocols: vec![PathBuf::from("a.xml")],
            ..Default::default()
        };
        let args = GenerateArgs {
            protocols: vec![PathBuf::from("b.xml"), PathBuf::from("c.xml")],
            output_dir: Some(PathBuf::from("out")),
            runtime_dir: Some("rt".to_owned()),
            no_format: true,
            ..Default::default()
        };
        let config = apply(config, args);
        assert_eq!(
            config.protocols,
            [PathBuf::from("b.xml"), PathBuf::from("c.xml")]
        );
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.runtime_dir, "rt");
        assert!(!config.format);
    }

    #[test]
    fn configuration_is_kept_without_arguments() {
        let config = Config {
            protocols: vec![PathBuf::from("a.xml")],
            ..Default::default()
        };
        let applied = apply(config.clone(), GenerateArgs::default());
        assert_eq!(applied, config);
    }
}
