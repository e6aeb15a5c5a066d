use console::style;
use env_logger::{Builder, Env, Target};
use log::Level;
use std::io::Write;

/// Default filter when `RUST_LOG` is unset.
fn default_filter(debug: bool) -> &'static str {
    if debug { "debug" } else { "warn" }
}

/// Initialize logger based on the debug flag.
///
/// Everything goes to stderr so the wrapped program owns stdout.
pub fn init_logger(debug: bool) {
    let env = Env::default().filter_or("RUST_LOG", default_filter(debug));

    Builder::from_env(env)
        .target(Target::Stderr)
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => format!("{}", style("ERROR").red().bold()),
                Level::Warn => format!("{}", style("WARN ").yellow().bold()),
                Level::Info => format!("{}", style("INFO ").green()),
                Level::Debug => format!("{}", style("DEBUG").cyan()),
                Level::Trace => format!("{}", style("TRACE").dim()),
            };
            writeln!(buf, "{} {}", level, record.args())
        })
        .init();
}
