use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use lzhuff::{
    compress, decompress, Algorithm, CodecConfig, CodecStats, Lz77Config, Lz78Config,
    ReaderSource, SliceSource, Source, StreamOptions, WriterSink,
};

#[derive(Parser, Debug)]
#[command(name = "lzhuff")]
#[command(about = "Compress or decompress with LZ77, LZ78 or Huffman coding")]
#[command(version)]
struct Args {
    /// Input file (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long)]
    output: PathBuf,

    /// Algorithm: LZ77, LZ78 or Huffman (other classic names are recognised but unsupported)
    #[arg(short, long, default_value = "LZ77")]
    algorithm: Algorithm,

    /// Decompress instead of compress
    #[arg(short, long)]
    decompress: bool,

    /// LZ77 window size (power of two)
    #[arg(long, default_value = "256")]
    window_size: u32,

    /// LZ77 lookahead buffer size (power of two)
    #[arg(long, default_value = "64")]
    buffer_size: u32,

    /// LZ78 dictionary size (power of two)
    #[arg(long, default_value = "4096")]
    table_size: u32,

    /// Bytes per read and write
    #[arg(long, default_value = "65536")]
    chunk_size: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Logging is best effort; a second init only happens under test harnesses
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = CodecConfig {
        lz77: Lz77Config { window_size: args.window_size, buffer_size: args.buffer_size },
        lz78: Lz78Config { table_size: args.table_size },
        stream: StreamOptions { chunk_size: args.chunk_size, ..Default::default() },
    };

    // Reject bad parameters before the output file is created
    config.validate(args.algorithm)?;

    let is_stdin = args.input.to_str() == Some("-");
    let is_stdout = args.output.to_str() == Some("-");

    let start = std::time::Instant::now();
    let stats = if is_stdin {
        // Stdin cannot be re-read, so buffer it for two-pass codecs
        let mut data = Vec::new();
        io::stdin().lock().read_to_end(&mut data)?;
        execute(args, &config, SliceSource::new(&data), is_stdout)?
    } else {
        let source = ReaderSource::new(BufReader::new(File::open(&args.input)?));
        execute(args, &config, source, is_stdout)?
    };
    let elapsed = start.elapsed();

    info!(
        "{} {} complete: {} -> {} bytes ({} units) in {:.2?}",
        args.algorithm,
        if args.decompress { "decompression" } else { "compression" },
        stats.input_bytes,
        stats.output_bytes,
        stats.units,
        elapsed
    );
    if stats.input_bytes > 0 {
        info!("ratio {:.3}", stats.output_bytes as f64 / stats.input_bytes as f64);
    }

    Ok(())
}

fn execute<S: Source>(
    args: &Args,
    config: &CodecConfig,
    source: S,
    is_stdout: bool,
) -> lzhuff::Result<CodecStats> {
    let output: Box<dyn io::Write> = if is_stdout {
        Box::new(io::stdout().lock())
    } else {
        Box::new(BufWriter::new(File::create(&args.output)?))
    };
    let sink = WriterSink::new(output);

    if args.decompress {
        decompress(args.algorithm, config, source, sink)
    } else {
        compress(args.algorithm, config, source, sink)
    }
}
