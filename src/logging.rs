use chrono::Local;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Timestamp layout used in every log line, e.g. `10-18 14:05`.
const TIMESTAMP_FORMAT: &str = "%m-%d %H:%M";

/// Returns the level a run logs at.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Configures the process-wide logger. Call once, from the binary entry point.
///
/// `RUST_LOG` still overrides the level chosen from `verbose`. Lines look like
/// `10-18 14:05 [INFO]: src/detector.rs:42>> message`.
pub fn init(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(level_for(verbose).as_str()));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}]: {}:{}>> {}",
            Local::now().format(TIMESTAMP_FORMAT),
            record.level(),
            record.file().unwrap_or("<unknown>"),
            record.line().unwrap_or(0),
            record.args()
        )
    });
    // A second initialisation (e.g. from tests) keeps the first logger.
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_selects_debug() {
        assert_eq!(level_for(true), LevelFilter::Debug);
        assert_eq!(level_for(false), LevelFilter::Info);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
        log::info!("logger initialised");
    }
}
