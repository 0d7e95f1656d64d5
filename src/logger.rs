use std::path::Path;

use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

const CONFIGURATION_FILE: &str = "log4rs.yaml";
const FALLBACK_PATTERN: &str = "{d(%H:%M:%S%.3f)} {l} {t} - {m}{n}";

/// Initializes logging from `log4rs.yaml` in the working directory. Without
/// that file, warnings and errors are written to stderr.
pub fn init() {
    if Path::new(CONFIGURATION_FILE).is_file() {
        if let Err(e) = log4rs::init_file(CONFIGURATION_FILE, Default::default()) {
            eprintln!("Unable to initialize logging from {}: {}", CONFIGURATION_FILE, e);
        }
        return;
    }
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(FALLBACK_PATTERN)))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn));
    match config {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("Unable to initialize logging: {}", e);
            }
        }
        Err(e) => eprintln!("Invalid fallback logging configuration: {}", e),
    }
}

fn get_byte_array(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|byte| format!("{:02X}", byte)).collect()
}

pub fn log_segment(marker: &[u8], segment_length: &[u8], content: &[u8]) {
    log::debug!(
        "{:?} {:?}\n{:?}",
        get_byte_array(marker),
        get_byte_array(segment_length),
        get_byte_array(content)
    );
}
