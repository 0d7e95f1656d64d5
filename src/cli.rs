use crate::binary_stream::Padding;
use crate::cosine_transform::DctAlgorithm;
use crate::image::writer::jpeg::{EntropyCoding, Quality};
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_quality_argument(command);
        let command = Self::register_threads_argument(command);
        let command = Self::register_entropy_coding_argument(command);
        let command = Self::register_dct_argument(command);
        Self::register_padding_argument(command)
    }

    fn register_input_file_argument(command: Command) -> Command {
        command.arg(Self::create_input_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_quality_argument(command: Command) -> Command {
        command.arg(Self::create_quality_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn register_entropy_coding_argument(command: Command) -> Command {
        command.arg(Self::create_entropy_coding_argument())
    }

    fn register_dct_argument(command: Command) -> Command {
        command.arg(Self::create_dct_argument())
    }

    fn register_padding_argument(command: Command) -> Command {
        command.arg(Self::create_padding_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_file_argument() -> Arg {
        Arg::new("input_file")
            .help("Path to the input image (PNG or JPEG)")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_output_file_argument() -> Arg {
        Arg::new("output_file")
            .help("Path to JPEG output file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
    }

    fn create_quality_argument() -> Arg {
        Arg::new("quality")
            .help("Compression quality, higher values keep more detail")
            .value_parser(value_parser!(u8).range(
                Quality::MIN.value() as i64..=Quality::MAX.value() as i64,
            ))
            .default_value(Quality::DEFAULT.value().to_string())
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of Threads")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn create_entropy_coding_argument() -> Arg {
        arg!(entropy_coding: -e --entropy_coding <CODING> "Source of the huffman tables")
            .default_value("Fixed")
            .value_parser(value_parser!(EntropyCoding))
    }

    fn create_dct_argument() -> Arg {
        arg!(dct: -d --dct <ALGORITHM> "Discrete cosine transform implementation")
            .default_value("Separated")
            .value_parser(value_parser!(DctAlgorithm))
    }

    fn create_padding_argument() -> Arg {
        arg!(padding: -p --padding <BITS> "Fill bits of the last byte of the scan")
            .default_value("Ones")
            .value_parser(value_parser!(Padding))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_file: Self::extract_input_file_argument(matches),
            output_file: Self::extract_output_file_argument(matches),
            quality: Self::extract_quality_argument(matches),
            number_of_threads: Self::extract_threads_argument(matches),
            entropy_coding: Self::extract_entropy_coding_argument(matches),
            dct_algorithm: Self::extract_dct_argument(matches),
            padding: Self::extract_padding_argument(matches),
        }
    }

    fn extract_input_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("input_file")
            .expect("Required argument input_file not provided")
            .clone()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> PathBuf {
        matches
            .get_one::<PathBuf>("output_file")
            .expect("Required argument output_file not provided")
            .clone()
    }

    fn extract_quality_argument(matches: &ArgMatches) -> u8 {
        matches
            .get_one::<u8>("quality")
            .copied()
            .unwrap_or(Quality::DEFAULT.value())
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_entropy_coding_argument(matches: &ArgMatches) -> EntropyCoding {
        matches
            .get_one::<EntropyCoding>("entropy_coding")
            .expect("Entropy coding must be provided, but was unset.")
            .to_owned()
    }

    fn extract_dct_argument(matches: &ArgMatches) -> DctAlgorithm {
        matches
            .get_one::<DctAlgorithm>("dct")
            .expect("DCT algorithm must be provided, but was unset.")
            .to_owned()
    }

    fn extract_padding_argument(matches: &ArgMatches) -> Padding {
        matches
            .get_one::<Padding>("padding")
            .expect("Padding must be provided, but was unset.")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}
