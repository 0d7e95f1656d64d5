use baseline_jpeg_encoder::{
    compress_file, Arguments, DctAlgorithm, EncoderOptions, EncoderSession, EntropyCoding, Error,
    Image, Padding, RGBColorFormat,
};
use std::fs;
use std::path::{Path, PathBuf};

fn get_temporary_path(file_name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_TARGET_TMPDIR"));
    path.push(file_name);
    path
}

fn cleanup(path: &Path) {
    if path.exists() && path.is_file() {
        fs::remove_file(path).expect("Deletion of output file failed");
    }
}

fn gradient_image(width: u32, height: u32) -> Image {
    let dots = (0..width * height)
        .map(|index| {
            let column = index % width;
            let row = index / width;
            RGBColorFormat::new((column * 250 / width) as u8, (row * 250 / height) as u8, 128)
        })
        .collect();
    Image::new(width, height, dots).unwrap()
}

fn encode(image: &Image, options: EncoderOptions) -> Vec<u8> {
    let mut session = EncoderSession::open_with_options(
        image.width() as u32,
        image.height() as u32,
        options,
    )
    .unwrap();
    let mut output: Vec<u8> = Vec::new();
    let bytes_written = session.compress(image, &mut output).unwrap();
    assert_eq!(bytes_written, output.len());
    output
}

fn options_with_quality(quality: u8) -> EncoderOptions {
    EncoderOptions {
        quality: quality.try_into().unwrap(),
        ..EncoderOptions::default()
    }
}

fn mean_absolute_error(image: &Image, decoded: &image::RgbImage) -> f64 {
    let total: u64 = image
        .dots()
        .iter()
        .zip(decoded.pixels())
        .map(|(expected, actual)| {
            (expected.red as i32 - actual[0] as i32).unsigned_abs() as u64
                + (expected.green as i32 - actual[1] as i32).unsigned_abs() as u64
                + (expected.blue as i32 - actual[2] as i32).unsigned_abs() as u64
        })
        .sum();
    total as f64 / (image.dots().len() * 3) as f64
}

#[test]
fn flat_color_survives_round_trip() {
    let color = RGBColorFormat::new(200, 100, 50);
    let image = Image::filled(16, 16, color).unwrap();
    let output = encode(&image, options_with_quality(90));
    let decoded = image::load_from_memory(&output).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (16, 16));
    for pixel in decoded.pixels() {
        assert!((pixel[0] as i32 - 200).abs() <= 6, "red {}", pixel[0]);
        assert!((pixel[1] as i32 - 100).abs() <= 6, "green {}", pixel[1]);
        assert!((pixel[2] as i32 - 50).abs() <= 6, "blue {}", pixel[2]);
    }
}

#[test]
fn gradient_survives_round_trip() {
    let image = gradient_image(37, 23);
    let output = encode(&image, options_with_quality(75));
    let decoded = image::load_from_memory(&output).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (37, 23));
    let error = mean_absolute_error(&image, &decoded);
    assert!(error < 10.0, "mean absolute error {} too large", error);
}

#[test]
fn adaptive_tables_decode() {
    let image = gradient_image(64, 40);
    let options = EncoderOptions {
        entropy_coding: EntropyCoding::Adaptive,
        ..EncoderOptions::default()
    };
    let adaptive = encode(&image, options);
    let fixed = encode(&image, EncoderOptions::default());
    let decoded = image::load_from_memory(&adaptive).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (64, 40));
    assert!(mean_absolute_error(&image, &decoded) < 10.0);
    let fixed_decoded = image::load_from_memory(&fixed).unwrap().to_rgb8();
    assert_eq!(decoded, fixed_decoded, "table choice must not alter pixels");
}

#[test]
fn alternative_options_decode() {
    let image = gradient_image(21, 13);
    let options = EncoderOptions {
        dct_algorithm: DctAlgorithm::Simple,
        padding: Padding::Zeros,
        number_of_threads: 2,
        ..EncoderOptions::default()
    };
    let output = encode(&image, options);
    let decoded = image::load_from_memory(&output).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (21, 13));
    assert!(mean_absolute_error(&image, &decoded) < 10.0);
}

#[test]
fn odd_sizes_keep_their_dimensions() {
    for (width, height) in [(1, 1), (17, 9), (8, 8), (15, 33), (100, 1)] {
        let image = Image::filled(width, height, RGBColorFormat::new(30, 140, 220)).unwrap();
        let output = encode(&image, EncoderOptions::default());
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(
            (decoded.width(), decoded.height()),
            (width, height),
            "size {}x{}",
            width,
            height
        );
    }
}

#[test]
fn segments_are_well_formed() {
    let image = gradient_image(40, 24);
    let output = encode(&image, EncoderOptions::default());
    assert_eq!(&output[..2], &[0xFF, 0xD8]);
    assert_eq!(&output[output.len() - 2..], &[0xFF, 0xD9]);
    let mut markers = Vec::new();
    let mut offset = 2;
    loop {
        assert_eq!(output[offset], 0xFF, "marker expected at {}", offset);
        let marker = output[offset + 1];
        let length = u16::from_be_bytes([output[offset + 2], output[offset + 3]]) as usize;
        markers.push(marker);
        offset += 2 + length;
        if marker == 0xDA {
            break;
        }
    }
    assert_eq!(markers, vec![0xE0, 0xDB, 0xC0, 0xC4, 0xDA]);
    let scan = &output[offset..output.len() - 2];
    for pair in scan.windows(2) {
        assert!(pair[0] != 0xFF || pair[1] == 0x00, "unstuffed 0xFF in scan");
    }
}

#[test]
fn compress_png_file() {
    let input_path = get_temporary_path("compress_png_file_input.png");
    let output_path = get_temporary_path("compress_png_file_output.jpg");
    cleanup(&output_path);
    image::RgbImage::from_fn(50, 30, |x, y| image::Rgb([(x * 5) as u8, (y * 8) as u8, 90]))
        .save(&input_path)
        .expect("Writing input image failed");
    let arguments = Arguments {
        input_file: input_path.clone(),
        output_file: output_path.clone(),
        quality: 85,
        number_of_threads: 2,
        entropy_coding: EntropyCoding::Fixed,
        dct_algorithm: DctAlgorithm::Separated,
        padding: Padding::Ones,
    };
    let bytes_written = compress_file(&arguments).expect("Compression failed");
    let written = fs::read(&output_path).expect("Output file missing");
    assert_eq!(written.len(), bytes_written);
    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (50, 30));
    cleanup(&output_path);
    cleanup(&input_path);
}

#[test]
fn missing_input_file_fails() {
    let arguments = Arguments {
        input_file: get_temporary_path("does_not_exist.png"),
        output_file: get_temporary_path("never_written.jpg"),
        quality: 75,
        number_of_threads: 1,
        entropy_coding: EntropyCoding::Fixed,
        dct_algorithm: DctAlgorithm::Separated,
        padding: Padding::Ones,
    };
    assert!(matches!(
        compress_file(&arguments),
        Err(Error::UnableToOpenInputFileForReading(..))
    ));
    assert!(!arguments.output_file.exists());
}
