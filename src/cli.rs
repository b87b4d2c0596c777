mod completion;
mod generate;

use {
    crate::logger::Logger,
    ::log::Level,
    clap::{Args, Parser, Subcommand, ValueEnum},
    clap_complete::Shell,
    std::path::PathBuf,
};

/// Generates Zig bindings from Wayland protocol descriptions.
#[derive(Parser, Debug)]
pub struct Wlzig {
    #[clap(flatten)]
    global: GlobalArgs,
    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// The log level.
    #[clap(value_enum, long, default_value_t)]
    pub log_level: CliLogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Generate bindings for a set of protocol documents.
    Generate(GenerateArgs),
    /// Generate shell completion scripts for wlzig.
    GenerateCompletion(CompletionArgs),
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// The protocol documents.
    ///
    /// Documents are registered in the given order. If any are given, the protocols
    /// listed in the configuration file are ignored.
    pub protocols: Vec<PathBuf>,
    /// The configuration file.
    ///
    /// Defaults to wlzig.toml in the current directory if that file exists.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// The directory the bindings are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// The directory containing the runtime support files, relative to the output
    /// directory.
    #[arg(long)]
    pub runtime_dir: Option<String>,
    /// Do not run the formatter on the generated files.
    #[arg(long)]
    pub no_format: bool,
}

#[derive(ValueEnum, Debug, Copy, Clone, Hash, Default)]
pub enum CliLogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<CliLogLevel> for Level {
    fn from(level: CliLogLevel) -> Self {
        match level {
            CliLogLevel::Trace => Level::Trace,
            CliLogLevel::Debug => Level::Debug,
            CliLogLevel::Info => Level::Info,
            CliLogLevel::Warn => Level::Warn,
            CliLogLevel::Error => Level::Error,
        }
    }
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// The shell to generate completions for
    #[clap(value_enum)]
    shell: Shell,
}

pub fn main() {
    let cli = Wlzig::parse();
    let _logger = Logger::install_stderr(cli.global.log_level.into());
    match cli.command {
        Cmd::Generate(a) => generate::main(a),
        Cmd::GenerateCompletion(a) => completion::main(a),
    }
}
