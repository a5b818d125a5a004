use std::sync::Mutex;

use slog::o;
use slog::Drain;
use slog::IgnoreResult;
use slog::Level;
use slog::Logger;
use slog_term::FullFormat;
use slog_term::TermDecorator;

/// Alternative implementation of slog's [`LevelFilter`] with `Ok == ()`.
///
/// The default [`LevelFilter`] implementation wraps `D::Ok` into an
/// [`Option`], which makes it impossible to wrap a filtering drain
/// into a [`Logger`].
///
/// [`LevelFilter`]: slog/struct.LevelFilter.html
/// [`Logger`]: slog/struct.Logger.html
/// [`Option`]: core/option/enum.Option.html
#[derive(Debug, Clone)]
struct LevelFilter<D: Drain>(pub D, pub Level);

impl<D: Drain> Drain for LevelFilter<D> {
    type Ok = ();
    type Err = D::Err;

    fn log(
        &self,
        record: &slog::Record,
        values: &slog::OwnedKVList,
    ) -> Result<Self::Ok, Self::Err> {
        if record.level().is_at_least(self.1) {
            self.0.log(record, values)?;
        }
        Ok(())
    }
}

/// Configure the terminal logger for the requested verbosity.
pub fn configure(verbose: bool, debug: bool) -> Logger {
    let level = if debug {
        Level::Debug
    } else if verbose {
        Level::Info
    } else {
        Level::Warning
    };
    let decorator = TermDecorator::new().stderr().build();
    let drain = FullFormat::new(decorator).build();
    let drain = Mutex::new(drain).map(IgnoreResult::new);
    let drain = LevelFilter(drain, level);
    Logger::root(drain, o!())
}
