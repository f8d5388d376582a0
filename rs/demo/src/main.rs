use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use file_io::{InputFile, LocalInputFile, MonitoredInputFile, RandomAccessInput, SeekableStream};
use log::{info, LevelFilter};
use metrics::InputMetrics;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Data file to inspect
    path: String,

    /// Number of trailing bytes to read as the footer
    #[arg(short, long, default_value_t = 64)]
    footer_len: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    let stats = Arc::new(InputMetrics::default());
    let file = MonitoredInputFile::new(Box::new(LocalInputFile::new(&args.path)), stats.clone());

    let length = file.length().context("Failed to stat input file")?;
    info!(
        "{}: {} bytes, modified {:?}",
        file.location(),
        length,
        file.modification_time()?
    );

    let mut input = file.open().context("Failed to open input file")?;

    let footer = input.read_tail_vec(args.footer_len)?;
    info!("footer ({} bytes): {:02x?}", footer.len(), footer);

    let mut stream = input.stream()?;
    let mut prefix = vec![0u8; (length as usize).min(16)];
    let count = stream.read(&mut prefix)?;
    info!("prefix ({} bytes): {:02x?}", count, &prefix[..count]);
    drop(stream);

    info!(
        "reads: {} calls, {} bytes, {:.2} MB/s",
        stats.read_calls(),
        stats.bytes_read(),
        stats.bytes_per_second() / 1e6,
    );

    Ok(())
}
