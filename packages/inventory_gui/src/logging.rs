//! Global logging system.

use std::{
    fs::File,
    path::Path,
    sync::Arc,
    env,
    panic,
};
use backtrace::Backtrace;
use tracing_subscriber::{
    fmt::{
        self,
        time::uptime,
    },
    prelude::*,
    Registry,
    EnvFilter,
};
use anyhow::*;


/// Default logging environment filter. Our crate is debug, everything else is warn.
const DEFAULT_FILTER: &'static str = "warn,inventory_gui=debug";

/// Initializes a `tracing` logging backend which outputs to stdout and, if given a path, also a
/// log file. Accepts ecosystem-standard `RUST_LOG` env filters. Routes panics through logging.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer()
        .event_format(format);

    let log_file_log = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("unable to create log file {}", path.display()))?;
            Some(fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)))
        }
        None => None,
    };

    let filter = filter_directives(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stdout_log)
        .with(log_file_log);
    tracing::subscriber::set_global_default(subscriber)
        .context("unable to install log subscriber")?;
    info!("starting program");

    // panics and their backtraces go to the log
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
            error!("{:?}", Backtrace::new());
        }
    }));
    trace!("installed custom panic hook");
    Ok(())
}

/// Filter directives: the crate default, with any user directives appended so they take
/// precedence. Blank user directives are ignored.
fn filter_directives(user: Option<&str>) -> String {
    match user.map(str::trim).filter(|user| !user.is_empty()) {
        Some(user) => format!("{},{}", DEFAULT_FILTER, user),
        None => DEFAULT_FILTER.to_owned(),
    }
}


#[test]
fn test_filter_directives() {
    assert_eq!(filter_directives(None), DEFAULT_FILTER);
    assert_eq!(filter_directives(Some("  ")), DEFAULT_FILTER);
    assert_eq!(
        filter_directives(Some("inventory_gui::translate=trace")),
        "warn,inventory_gui=debug,inventory_gui::translate=trace",
    );
}
