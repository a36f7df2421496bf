use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{debug, info, LevelFilter};

use std::env;
use std::error::Error as StdError;
use std::process;

use des_ecb::stream::{self, BUFFER_SIZE};
use des_ecb::primitive::DES_KEY_SIZE;
use des_ecb::{Action, Des, Error, FixedKey, Key, KeySource, PassphraseFile, RandomKeySource, ECB};

fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn parse_hex_key(hex: &str) -> Result<Key, Error> {
    let hex = hex.trim();
    let invalid = || Error::InvalidKey {
        expected: DES_KEY_SIZE,
        actual: hex.len() / 2,
    };
    if hex.len() % 2 != 0 {
        return Err(invalid());
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let byte = hex
            .get(i..i + 2)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .ok_or_else(invalid)?;
        bytes.push(byte);
    }
    Ok(Key::new(bytes))
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

// Pick the key: a passphrase file, a hex key, or (only when encrypting)
// a freshly generated one that is shown to the user once.
fn read_key(action: Action, args: &ArgMatches, len: usize) -> Result<Key, Box<dyn StdError>> {
    if let Some(path) = args.value_of("key") {
        return Ok(PassphraseFile::new(path).key(len)?);
    }
    if let Some(hex) = args.value_of("key-hex") {
        return Ok(FixedKey(parse_hex_key(hex)?).key(len)?);
    }
    match action {
        Action::Encrypt => {
            let key = RandomKeySource.key(len)?;
            info!("generated a random {} byte key", len);
            println!("Key: {}", to_hex(key.as_bytes()));
            Ok(key)
        }
        Action::Decrypt => Err("Missing key: pass --key or --key-hex to decrypt".into()),
    }
}

fn workers(args: &ArgMatches) -> Result<usize, Box<dyn StdError>> {
    match args.value_of("workers") {
        Some(n) => Ok(n.parse::<usize>()?),
        None => Ok(num_cpus::get()),
    }
}

// Encrypt or decrypt according to arguments.
fn run(action: Action, args: &ArgMatches) -> Result<(), Box<dyn StdError>> {
    let mode = ECB::new(Des)?.with_workers(workers(args)?);
    let key = read_key(action, args, mode.key_size())?;

    let written = stream::process_file(
        &mode,
        action,
        &key,
        args.value_of("in").unwrap_or_default(),
        args.value_of("out").unwrap_or_default(),
        BUFFER_SIZE,
    )?;
    info!("{:?}: wrote {} bytes", action, written);
    Ok(())
}

fn describe(err: &(dyn StdError + 'static)) -> String {
    match err.downcast_ref::<Error>() {
        Some(Error::InvalidPadding) => {
            "Invalid padding: wrong key or corrupted ciphertext".to_string()
        }
        Some(Error::InvalidLength { .. }) => {
            format!("Invalid length: {} (truncated ciphertext?)", err)
        }
        Some(Error::InvalidKey { .. }) => format!("Invalid key: {}", err),
        Some(Error::Io(e)) => format!("I/O error: {}", e),
        _ => err.to_string(),
    }
}

fn main() -> Result<(), Box<dyn StdError>> {
    let io_args = [
        Arg::with_name("in")
            .short("i")
            .long("in")
            .required(true)
            .takes_value(true)
            .help("Input file"),
        Arg::with_name("out")
            .short("o")
            .long("out")
            .required(true)
            .takes_value(true)
            .help("Output file (must not exist)"),
        Arg::with_name("key")
            .short("k")
            .long("key")
            .takes_value(true)
            .conflicts_with("key-hex")
            .help("Passphrase file the key is derived from"),
        Arg::with_name("key-hex")
            .long("key-hex")
            .takes_value(true)
            .help("Key as 16 hex digits"),
        Arg::with_name("workers")
            .short("w")
            .long("workers")
            .takes_value(true)
            .help("Number of worker threads (default: number of CPUs)"),
    ];

    let matches = App::new("des_ecb")
        .about("DES in ECB mode with PKCS#7 padding")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable trace logging"),
        )
        .subcommand(
            SubCommand::with_name("encrypt")
                .about("Encrypt a file")
                .args(&io_args),
        )
        .subcommand(
            SubCommand::with_name("decrypt")
                .about("Decrypt a file")
                .args(&io_args),
        )
        .get_matches();

    setup_logging(matches.is_present("verbose"));

    let result = match matches.subcommand() {
        ("encrypt", Some(args)) => run(Action::Encrypt, args),
        ("decrypt", Some(args)) => run(Action::Decrypt, args),
        _ => unreachable!("clap requires a subcommand"),
    };

    match result {
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("{}", describe(e.as_ref()));
            process::exit(1);
        }
        Ok(_) => {
            println!("Success!");
            Ok(())
        }
    }
}
