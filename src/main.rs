use std::env::args_os;
use std::process::ExitCode;

use baseline_jpeg_encoder::{compress_file, logger, CLIParser};

#[ctor::ctor]
fn init() {
    logger::init();
}

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match compress_file(&arguments) {
        Ok(bytes_written) => {
            println!(
                "Compression successful, wrote {} bytes to {}",
                bytes_written,
                arguments.output_file.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Compression failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
