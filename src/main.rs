//! Doki Sprite CLI - Convert, inspect, validate and upload `.spr` files.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use doki_sprite::{
    InputSource, SpriteConfig, SpriteContainer, SpriteError, Validator,
    convert::convert_to_file,
    schema::{ConfigError, PatternKind, ResizeConfig},
    sprite::DEFAULT_MAX_SIZE,
};

/// Errors surfaced by the command-line front end.
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// Bad invocation; usage is printed alongside the message.
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Sprite(#[from] SpriteError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

type CliResult<T> = Result<T, CliError>;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("doki-sprite", String::as_str);
    let result = run(args.get(1..).unwrap_or_default());

    match &result {
        Err(CliError::Usage(msg)) => {
            eprintln!("{}", msg);
            eprintln!();
            print_usage(program);
        }
        Err(e) => eprintln!("Error: {}", e),
        Ok(()) => {}
    }
    process::exit(exit_code(&result));
}

/// Dispatch a command line, excluding the program name.
fn run(args: &[String]) -> CliResult<()> {
    let Some(command) = args.first() else {
        return Err(CliError::Usage("Missing command".into()));
    };

    let rest = &args[1..];
    match command.as_str() {
        "convert" => cmd_convert(rest),
        "validate" => cmd_validate(rest),
        "info" => cmd_info(rest),
        "upload" => cmd_upload(rest),
        "--example-config" => print_example_config(),
        "-h" | "--help" => {
            print_usage("doki-sprite");
            Ok(())
        }
        other => Err(CliError::Usage(format!("Unknown command: {}", other))),
    }
}

fn exit_code(result: &CliResult<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <command> [options]", program);
    eprintln!();
    eprintln!("Convert frame sequences into Doki OS .spr animations.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  convert <input> <output>   Encode a folder, GIF or 'test' pattern");
    eprintln!("      --fps N                Playback rate (default: source hint, else 30)");
    eprintln!("      --pattern KIND         Test pattern: {}", pattern_names());
    eprintln!("      --width W              Test pattern width (default: 64)");
    eprintln!("      --height H             Test pattern height (default: 64)");
    eprintln!("      --frames N             Test pattern frame count (default: 20)");
    eprintln!("      --resize WxH           Resize every frame before quantization");
    eprintln!("      --config FILE          Load settings from a JSON file");
    eprintln!("  validate <file>            Check magic number and size ceiling");
    eprintln!("      --max-size BYTES       Size ceiling (default: {})", DEFAULT_MAX_SIZE);
    eprintln!("      --no-size-limit        Only check the magic number");
    eprintln!("  info <file>                Print header and palette details");
    eprintln!("  upload <host> <file>       POST a validated file to a device");
    eprintln!("      --timeout SECS         Request timeout (default: 30)");
    eprintln!("      --max-size BYTES       Size ceiling (default: {})", DEFAULT_MAX_SIZE);
    eprintln!();
    eprintln!("Example configuration is generated with --example-config.");
}

fn pattern_names() -> String {
    PatternKind::ALL
        .iter()
        .map(|k| k.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split `args` into positionals and `--flag [value]` pairs.
///
/// `switches` name the flags that take no value.
fn split_args<'a>(
    args: &'a [String],
    switches: &[&str],
) -> (Vec<&'a str>, Vec<(&'a str, Option<&'a str>)>) {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            if switches.contains(&arg.as_str()) {
                flags.push((arg.as_str(), None));
            } else {
                flags.push((arg.as_str(), iter.next().map(String::as_str)));
            }
        } else {
            positional.push(arg.as_str());
        }
    }
    (positional, flags)
}

fn flag_value<T: FromStr>(flag: &str, value: Option<&str>) -> CliResult<T> {
    let value = value.ok_or_else(|| CliError::Usage(format!("Missing value for {}", flag)))?;
    value
        .parse()
        .map_err(|_| CliError::Usage(format!("Invalid value for {}: {}", flag, value)))
}

fn require_positional<'a>(
    positional: &[&'a str],
    count: usize,
    usage: &str,
) -> CliResult<Vec<&'a str>> {
    if positional.len() != count {
        return Err(CliError::Usage(format!("Usage: {}", usage)));
    }
    Ok(positional.to_vec())
}

fn unknown_option(command: &str, flag: &str) -> CliError {
    CliError::Usage(format!("Unknown option for {}: {}", command, flag))
}

/// Build the conversion config: `--config` file first, then explicit flags.
///
/// Flags override file values regardless of their position on the line.
fn load_convert_config(flags: &[(&str, Option<&str>)]) -> CliResult<SpriteConfig> {
    let mut config = match flags.iter().find(|(f, _)| *f == "--config") {
        Some(&(flag, value)) => SpriteConfig::from_file(flag_value::<String>(flag, value)?)?,
        None => SpriteConfig::default(),
    };

    for &(flag, value) in flags {
        match flag {
            "--config" => {}
            "--fps" => config.convert.fps = Some(flag_value(flag, value)?),
            "--pattern" => {
                let kind: String = flag_value(flag, value)?;
                config.convert.pattern.kind = PatternKind::from_str(&kind)?
            }
            "--width" => config.convert.pattern.width = flag_value(flag, value)?,
            "--height" => config.convert.pattern.height = flag_value(flag, value)?,
            "--frames" => config.convert.pattern.frames = flag_value(flag, value)?,
            "--resize" => {
                let spec: String = flag_value(flag, value)?;
                config.convert.resize = Some(ResizeConfig::from_str(&spec)?)
            }
            other => return Err(unknown_option("convert", other)),
        }
    }
    config.validate()?;
    Ok(config)
}

fn cmd_convert(args: &[String]) -> CliResult<()> {
    let (positional, flags) = split_args(args, &[]);
    let paths = require_positional(&positional, 2, "convert <input> <output> [options]")?;
    let (input, output) = (paths[0], PathBuf::from(paths[1]));
    let config = load_convert_config(&flags)?;

    println!("Doki Sprite Converter");
    println!("=====================");
    println!("Input: {}", input);
    println!("Output: {}", output.display());
    println!();

    let source = InputSource::from_input(input, &config.convert.pattern)?;
    let stats = convert_to_file(source, &config.convert, &output)?;

    println!("Created {}", output.display());
    println!("  {}", stats);

    match Validator::from_config(&config.validation).check_size(stats.total_bytes) {
        Ok(()) => println!("  Ready to upload"),
        Err(e) => println!("  Warning: {}", e),
    }
    Ok(())
}

fn cmd_validate(args: &[String]) -> CliResult<()> {
    let (positional, flags) = split_args(args, &["--no-size-limit"]);
    let usage = "validate <file> [--max-size BYTES | --no-size-limit]";
    let path = require_positional(&positional, 1, usage)?[0];

    let mut validator = Validator::default();
    for &(flag, value) in &flags {
        match flag {
            "--max-size" => validator = Validator::new(Some(flag_value(flag, value)?)),
            "--no-size-limit" => validator = Validator::magic_only(),
            other => return Err(unknown_option("validate", other)),
        }
    }

    let size = validator.validate_file(path)?;
    println!("Valid .spr file: {} ({} bytes)", path, size);
    Ok(())
}

fn cmd_info(args: &[String]) -> CliResult<()> {
    let (positional, _) = split_args(args, &[]);
    let path = require_positional(&positional, 1, "info <file>")?[0];

    let container = SpriteContainer::open(path)?;
    let header = container.header();

    let used: HashSet<u8> = container
        .frames()
        .iter()
        .flat_map(|f| f.indices().iter().copied())
        .collect();
    let duration = header.frame_count as f32 / header.fps.max(1) as f32;

    println!("Sprite: {}", path);
    println!("  Version: {}", header.version);
    println!("  Frames: {}", header.frame_count);
    println!("  Size: {}x{}", header.width, header.height);
    println!("  FPS: {} ({:.2}s per loop)", header.fps, duration);
    println!("  Color format: {:?}", header.color_format);
    println!("  Compression: {:?}", header.compression);
    println!("  Palette entries used: {}", used.len());
    println!("  Encoded size: {} bytes", container.encoded_len());
    Ok(())
}

#[cfg(feature = "upload")]
fn cmd_upload(args: &[String]) -> CliResult<()> {
    use doki_sprite::schema::UploadConfig;
    use doki_sprite::upload::Uploader;

    let (positional, flags) = split_args(args, &[]);
    let usage = "upload <host> <file> [--timeout SECS] [--max-size BYTES]";
    let params = require_positional(&positional, 2, usage)?;
    let (host, path) = (params[0], params[1]);

    let mut config = UploadConfig::default();
    let mut validator = Validator::default();
    for &(flag, value) in &flags {
        match flag {
            "--timeout" => config.timeout_secs = flag_value(flag, value)?,
            "--max-size" => validator = Validator::new(Some(flag_value(flag, value)?)),
            other => return Err(unknown_option("upload", other)),
        }
    }

    let uploader = Uploader::new(config)?.with_validator(validator);
    println!("Uploading {} to {}...", path, uploader.endpoint(host));

    let receipt = uploader.upload_file(host, path)?;
    println!("Upload successful (HTTP {})", receipt.status);
    println!("  Response: {}", receipt.response);
    println!("  Saved to: {}", receipt.device_path);
    Ok(())
}

#[cfg(not(feature = "upload"))]
fn cmd_upload(_args: &[String]) -> CliResult<()> {
    Err(CliError::Usage(
        "upload support not compiled in (enable the 'upload' feature)".into(),
    ))
}

fn print_example_config() -> CliResult<()> {
    let json = serde_json::to_string_pretty(&SpriteConfig::default()).map_err(ConfigError::Parse)?;
    println!("Example configuration (sprite.json):");
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flags_override_config_file_in_any_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sprite.json");
        fs::write(&path, r#"{"convert":{"fps":12,"pattern":{"width":32}}}"#).unwrap();
        let path = path.to_str().unwrap();

        let before = load_convert_config(&[("--fps", Some("24")), ("--config", Some(path))]).unwrap();
        let after = load_convert_config(&[("--config", Some(path)), ("--fps", Some("24"))]).unwrap();

        for config in [before, after] {
            assert_eq!(config.convert.fps, Some(24));
            assert_eq!(config.convert.pattern.width, 32);
            assert_eq!(config.convert.pattern.height, 64);
        }

        let file_only = load_convert_config(&[("--config", Some(path))]).unwrap();
        assert_eq!(file_only.convert.fps, Some(12));
    }

    #[test]
    fn test_bad_flags_are_usage_errors() {
        assert!(matches!(
            load_convert_config(&[("--fps", None)]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            load_convert_config(&[("--fps", Some("fast"))]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            load_convert_config(&[("--colors", Some("16"))]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            load_convert_config(&[("--width", Some("70000"))]),
            Err(CliError::Config(ConfigError::PatternTooLarge { .. }))
        ));
    }

    #[test]
    fn test_split_args() {
        let args = argv(&["in", "--no-size-limit", "out", "--fps", "12"]);
        let (positional, flags) = split_args(&args, &["--no-size-limit"]);
        assert_eq!(positional, vec!["in", "out"]);
        assert_eq!(flags, vec![("--no-size-limit", None), ("--fps", Some("12"))]);
    }

    #[test]
    fn test_exit_codes() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.spr");
        let missing = missing.to_str().unwrap();

        assert_eq!(exit_code(&run(&argv(&["validate", missing]))), 1);
        assert_eq!(exit_code(&run(&argv(&["info", missing]))), 1);
        assert_eq!(exit_code(&run(&argv(&["frobnicate"]))), 1);
        assert_eq!(exit_code(&run(&argv(&["convert", "test"]))), 1);
        assert_eq!(exit_code(&run(&[])), 1);
        assert_eq!(exit_code(&run(&argv(&["--example-config"]))), 0);
    }

    #[test]
    fn test_convert_then_validate() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.spr");
        let out = out.to_str().unwrap();

        let args = argv(&[
            "convert", "test", out, "--frames", "2", "--width", "8", "--height", "8",
        ]);
        assert_eq!(exit_code(&run(&args)), 0);
        assert_eq!(fs::metadata(out).unwrap().len(), 1088 + 2 * 8 * 8);

        assert_eq!(exit_code(&run(&argv(&["validate", out]))), 0);
        assert_eq!(exit_code(&run(&argv(&["info", out]))), 0);
    }
}
