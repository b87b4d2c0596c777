#[macro_use]
mod macros;
mod builder;
mod cli;
mod config;
mod driver;
mod emit;
mod logger;
mod model;
mod naming;
mod registry;
mod resolver;
#[cfg(test)]
mod test_utils;
mod types;
mod zig;

fn main() {
    cli::main();
}
