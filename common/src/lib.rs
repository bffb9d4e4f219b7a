use env_logger::{Builder, Env, Target, WriteStyle};
use log::Record;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Loads `.env` and initialises the logger.
///
/// `RUST_LOG` wins over `level`. With a `destination` the log is appended to
/// that file instead of stderr. Every record carries the source line it was
/// logged from.
pub fn setup_env(level: &str, destination: Option<&Path>) -> io::Result<()> {
    dotenvy::dotenv().ok();

    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(
            buf,
            "[{} {style}{:<5}{style:#} {}] {}",
            buf.timestamp(),
            record.level(),
            location(record),
            record.args()
        )
    });
    if let Some(path) = destination {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder
            .target(Target::Pipe(Box::new(file)))
            .write_style(WriteStyle::Never);
    }
    builder.init();
    Ok(())
}

fn location(record: &Record) -> String {
    match (record.file(), record.line()) {
        (Some(file), Some(line)) => format!("{file}:{line}"),
        (Some(file), None) => file.to_string(),
        _ => record.target().to_string(),
    }
}
