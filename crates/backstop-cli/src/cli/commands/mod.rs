mod check;
mod probe;
mod watch;

pub use check::run_check;
pub use probe::run_probe;
pub use watch::run_watch;
