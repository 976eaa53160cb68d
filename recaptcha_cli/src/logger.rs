use crate::config::{Error, Logger as Output, LoggerConfig};
use env_logger::{Builder, Target, TimestampPrecision};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::str::FromStr;

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata, Record};
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn config(output: Output, level: &str) -> LoggerConfig {
        LoggerConfig {
            output,
            level: level.to_string(),
        }
    }

    fn metadata(level: Level) -> Metadata<'static> {
        Metadata::builder().level(level).target("recaptcha").build()
    }

    #[test]
    fn configured_level_filters_records() {
        let logger = builder(&config(Output::Stderr, "info"), 0)
            .expect("stderr logger should build")
            .build();

        assert_eq!(logger.filter(), LevelFilter::Info);
        assert!(logger.enabled(&metadata(Level::Warn)));
        assert!(!logger.enabled(&metadata(Level::Debug)));
    }

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(level_filter("warn", 0).unwrap(), LevelFilter::Warn);
        assert_eq!(level_filter("warn", 1).unwrap(), LevelFilter::Debug);
        assert_eq!(level_filter("warn", 3).unwrap(), LevelFilter::Trace);
    }

    #[test]
    fn unknown_level_is_an_error() {
        match level_filter("chatty", 0) {
            Err(Error::Level(level)) => assert_eq!(level, "chatty"),
            other => panic!("expected Error::Level, got {:?}", other),
        }
    }

    #[test]
    fn file_output_appends_records() {
        let file = env::temp_dir().join(format!("recaptcha-verify-{}.log", std::process::id()));
        let logger = builder(&config(Output::File { file: file.clone() }, "warn"), 0)
            .expect("log file should open")
            .build();

        logger.log(
            &Record::builder()
                .metadata(metadata(Level::Warn))
                .args(format_args!("siteverify unreachable"))
                .build(),
        );
        logger.flush();

        let text = fs::read_to_string(&file).expect("log file should be readable");
        fs::remove_file(&file).expect("log file should be removable");
        assert!(text.contains("siteverify unreachable"));
    }

    #[test]
    fn unopenable_log_file_is_an_open_error() {
        let file: PathBuf = env::temp_dir().join("recaptcha-verify-missing-dir").join("out.log");

        match builder(&config(Output::File { file: file.clone() }, "warn"), 0) {
            Err(Error::Open(path, _)) => assert_eq!(path, file),
            Err(err) => panic!("expected Error::Open, got {:?}", err),
            Ok(_) => panic!("expected Error::Open, got a logger"),
        }
    }
}

fn level_filter(configured: &str, verbosity: u8) -> Result<LevelFilter, Error> {
    match verbosity {
        0 => LevelFilter::from_str(configured).map_err(|_| Error::Level(configured.to_string())),
        1 => Ok(LevelFilter::Debug),
        _ => Ok(LevelFilter::Trace),
    }
}

fn builder(config: &LoggerConfig, verbosity: u8) -> Result<Builder, Error> {
    let target = match &config.output {
        Output::Stdout => Target::Stdout,
        Output::Stderr => Target::Stderr,
        Output::File { file } => Target::Pipe(Box::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .map_err(|err| Error::Open(file.clone(), err))?,
        )),
    };

    let mut builder = Builder::new();
    builder
        .filter_level(level_filter(&config.level, verbosity)?)
        .format_timestamp(Some(TimestampPrecision::Millis))
        .target(target);
    Ok(builder)
}

/// Installs the global logger described by `config`. Each `-v` raises the
/// level past the configured one.
pub fn init(config: &LoggerConfig, verbosity: u8) -> Result<(), Error> {
    builder(config, verbosity)?
        .try_init()
        .map_err(|err| Error::Logger(err.to_string()))
}
