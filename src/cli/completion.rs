use {
    crate::cli::{CompletionArgs, Wlzig},
    clap::CommandFactory,
    std::io::stdout,
};

pub fn main(args: CompletionArgs) {
    let stdout = stdout();
    let mut stdout = stdout.lock();
    clap_complete::generate(args.shell, &mut Wlzig::command(), "wlzig", &mut stdout);
}
