//! Lyra2 Proof-of-Work CLI
//!
//! # Commands
//!
//! - `derive` - Run the general-form core on hex inputs
//! - `fixed` - Run the fixed-shape Lyra2REv2 core on a 32-byte hash
//! - `scan` - Search a header's nonce space against a target
//! - `benchmark` - Measure core throughput
//! - `selftest` - Check the built-in known-answer vectors
//! - `init-config` - Write a default config file

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lyra2::algorithm::{self, InputStride, Lyra2, Params};
use lyra2::config::{default_config_path, ScanConfig};
use lyra2::pipeline::{Pipeline, Variant};
use lyra2::scan::{scan_parallel, Header, ScanControl, Target, HEADER_BYTES};

#[derive(Parser)]
#[command(name = "lyra2")]
#[command(author = "Cyberia")]
#[command(version = "0.1.0")]
#[command(about = "Lyra2RE / Lyra2REv2 proof-of-work hashing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Custom config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive a key with the general-form core
    Derive {
        /// Password (hex)
        #[arg(long, default_value = "")]
        password: String,

        /// Salt (hex)
        #[arg(long, default_value = "")]
        salt: String,

        /// Output length in bytes
        #[arg(short = 'k', long, default_value = "32")]
        length: usize,

        /// Wandering passes
        #[arg(short, long, default_value = "1")]
        time_cost: u64,

        /// Matrix rows
        #[arg(short, long, default_value = "8")]
        rows: u16,

        /// Matrix columns
        #[arg(short, long, default_value = "8")]
        cols: u16,

        /// Read input blocks 512 bytes apart from a zero-filled staging area
        #[arg(long)]
        legacy: bool,
    },

    /// Run the fixed-shape core on a 32-byte hash (hex)
    Fixed {
        /// Input hash, used as both password and salt
        input: String,
    },

    /// Search for a nonce whose hash meets the target
    Scan {
        /// 80-byte header (hex); defaults to zeros
        #[arg(long)]
        header: Option<String>,

        /// Compact target bits, e.g. 1d00ffff (hex)
        #[arg(long)]
        bits: Option<String>,

        /// Proof-of-work variant (default: from config)
        #[arg(long, value_enum)]
        variant: Option<Variant>,

        /// Number of threads to use (default: from config, then CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// First nonce
        #[arg(long, default_value = "0")]
        start: u32,

        /// End of the nonce range (exclusive)
        #[arg(long, default_value_t = u32::MAX)]
        end: u32,

        /// Use the easy benchmark target
        #[arg(long)]
        benchmark: bool,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of core invocations
        #[arg(short, long, default_value = "1000")]
        count: u32,

        /// Core variant to measure
        #[arg(long, value_enum, default_value_t = Variant::Lyra2re)]
        variant: Variant,

        /// Number of threads to use (default: number of CPU cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Check the known-answer vectors
    Selftest,

    /// Write a config file with default settings
    InitConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Derive {
            password,
            salt,
            length,
            time_cost,
            rows,
            cols,
            legacy,
        } => cmd_derive(&password, &salt, length, time_cost, rows, cols, legacy),
        Commands::Fixed { input } => cmd_fixed(&input),
        Commands::Scan {
            header,
            bits,
            variant,
            threads,
            start,
            end,
            benchmark,
        } => load_config(cli.config).and_then(|config| {
            cmd_scan(
                config,
                header.as_deref(),
                bits.as_deref(),
                variant,
                threads,
                start..end,
                benchmark,
            )
        }),
        Commands::Benchmark {
            count,
            variant,
            threads,
        } => cmd_benchmark(count, variant, threads),
        Commands::Selftest => cmd_selftest(),
        Commands::InitConfig => cmd_init_config(cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ScanConfig> {
    ScanConfig::load_or_default(path.as_deref()).context("Failed to load config")
}

fn cmd_derive(
    password: &str,
    salt: &str,
    length: usize,
    time_cost: u64,
    rows: u16,
    cols: u16,
    legacy: bool,
) -> anyhow::Result<()> {
    let password = hex::decode(password).context("Invalid password hex")?;
    let salt = hex::decode(salt).context("Invalid salt hex")?;

    let mut params = Params::new(time_cost, rows, cols);
    if legacy {
        params = params.with_stride(InputStride::Legacy);
    }

    let mut hasher = Lyra2::new(params)?;
    let mut key = vec![0u8; length];
    hasher.derive(&mut key, &password, &salt)?;

    println!("{}", hex::encode(key));
    Ok(())
}

fn cmd_fixed(input: &str) -> anyhow::Result<()> {
    let bytes = hex::decode(input).context("Invalid input hex")?;
    let hash: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("Input must be 32 bytes, got {}", bytes.len()))?;

    println!("{}", hex::encode(algorithm::lyra2v2(&hash)));
    Ok(())
}

fn cmd_scan(
    config: ScanConfig,
    header_hex: Option<&str>,
    bits: Option<&str>,
    variant: Option<Variant>,
    threads: Option<usize>,
    nonces: std::ops::Range<u32>,
    benchmark: bool,
) -> anyhow::Result<()> {
    let header = match header_hex {
        Some(h) => {
            let bytes = hex::decode(h).context("Invalid header hex")?;
            let bytes: [u8; HEADER_BYTES] = bytes.as_slice().try_into().map_err(|_| {
                anyhow::anyhow!("Header must be {} bytes, got {}", HEADER_BYTES, bytes.len())
            })?;
            Header::from_bytes(&bytes)
        }
        None => Header {
            words: [0; lyra2::scan::HEADER_WORDS],
        },
    };

    let target = if benchmark || config.benchmark {
        Target::benchmark()
    } else {
        let bits = bits.context("Either --bits or --benchmark is required")?;
        let bits = u32::from_str_radix(bits.trim_start_matches("0x"), 16)
            .context("Invalid compact bits")?;
        Target::from_compact(bits).context("Compact bits encode a negative or oversized target")?
    };

    let variant = variant.unwrap_or(config.variant);
    let num_threads = threads.or(config.threads).unwrap_or_else(num_cpus::get);
    let report_every = Duration::from_secs(config.report_interval_secs.max(1));

    println!("\n=== Lyra2 Scan ===");
    println!("Variant: {}", variant);
    println!("Threads: {}", num_threads);
    println!("Nonces:  {}..{}", nonces.start, nonces.end);
    println!("Target:  {}", format_target(&target));
    println!("==================\n");

    warn!("surrounding hashes are Keccak-256 stand-ins; digests differ from the real chain");
    let pipeline = Pipeline::keccak_stand_in(variant)?;
    let control = ScanControl::new();
    let start = Instant::now();

    let outcome = std::thread::scope(|s| {
        let worker = s.spawn(|| {
            scan_parallel(
                &pipeline,
                &header,
                &target,
                nonces.start,
                nonces.end,
                num_threads,
                &control,
            )
        });

        // Monitor progress while threads work
        let mut last_report = Instant::now();
        while !worker.is_finished() {
            std::thread::sleep(Duration::from_millis(100));
            if last_report.elapsed() >= report_every {
                let hashes = control.hashes();
                let elapsed = start.elapsed().as_secs_f64();
                info!(
                    "Hashrate: {:.0} H/s | Hashes: {} | Time: {:.0}s",
                    hashes as f64 / elapsed,
                    hashes,
                    elapsed
                );
                last_report = Instant::now();
            }
        }

        worker
            .join()
            .map_err(|_| anyhow::anyhow!("Scan thread panicked"))
    })??;

    let elapsed = start.elapsed().as_secs_f64();
    match outcome.solution {
        Some(solution) => {
            println!("\nFound valid nonce!");
            println!("  Nonce:  {}", solution.nonce);
            println!("  Hash:   {}", hex::encode(solution.hash));
        }
        None => println!("\nNo nonce in range meets the target."),
    }
    println!(
        "  Hashes: {} ({:.0} H/s)",
        outcome.hashes_done,
        outcome.hashes_done as f64 / elapsed
    );

    Ok(())
}

fn format_target(target: &Target) -> String {
    target
        .words
        .iter()
        .rev()
        .map(|w| format!("{:08x}", w))
        .collect()
}

fn cmd_benchmark(count: u32, variant: Variant, threads: Option<usize>) -> anyhow::Result<()> {
    let num_threads = threads.unwrap_or_else(num_cpus::get).max(1);
    let params = variant.params();

    println!(
        "Running {} benchmark with {} invocations on {} threads...",
        variant, count, num_threads
    );

    let start = Instant::now();
    match variant {
        Variant::Lyra2re => {
            let per_thread = count.div_ceil(num_threads as u32);
            std::thread::scope(|s| -> anyhow::Result<()> {
                let handles: Vec<_> = (0..num_threads as u32)
                    .map(|thread_id| {
                        s.spawn(move || -> anyhow::Result<()> {
                            let mut hasher = Lyra2::new(params)?;
                            let mut key = [0u8; 32];
                            let first = thread_id.saturating_mul(per_thread);
                            for i in first..first.saturating_add(per_thread).min(count) {
                                let mut input = [0u8; 32];
                                input[..4].copy_from_slice(&i.to_le_bytes());
                                hasher.derive(&mut key, &input, &input)?;
                            }
                            Ok(())
                        })
                    })
                    .collect();
                for handle in handles {
                    handle
                        .join()
                        .map_err(|_| anyhow::anyhow!("Benchmark thread panicked"))??;
                }
                Ok(())
            })?;
        }
        Variant::Lyra2rev2 => {
            let mut lanes: Vec<[u8; 32]> = (0..count)
                .map(|i| {
                    let mut lane = [0u8; 32];
                    lane[..4].copy_from_slice(&i.to_le_bytes());
                    lane
                })
                .collect();
            algorithm::lyra2v2_batch(&mut lanes);
        }
    }

    let elapsed = start.elapsed();
    let hashrate = count as f64 / elapsed.as_secs_f64();

    println!("\nResults:");
    println!("  Total invocations: {}", count);
    println!("  Time elapsed: {:.2}s", elapsed.as_secs_f64());
    println!("  Hashrate: {:.2} H/s", hashrate);

    println!("\nAlgorithm parameters:");
    println!("  Rows: {}", params.rows);
    println!("  Columns: {}", params.cols);
    println!("  Time cost: {}", params.time_cost);
    println!("  Matrix: {} KB", params.matrix_bytes() / 1024);

    Ok(())
}

/// (output length, password, salt, time cost, rows, cols, expected hex)
const VECTORS: &[(usize, &[u8], &[u8], u64, u16, u16, &str)] = &[
    (
        32,
        &[0u8; 32],
        &[0u8; 32],
        1,
        8,
        8,
        "8a4aed60fd4b60338a003a2fb850438777f144c2877d499e5916a27ebb2b1623",
    ),
    (
        32,
        &[0u8; 32],
        &[0u8; 32],
        1,
        4,
        4,
        "a7e79103b9c0bb08bbd13d8ceb3bca62e3efef67e35868d320379b00a4458a67",
    ),
    (
        32,
        b"password",
        b"salt",
        2,
        6,
        3,
        "8bfd295a852bbef68223898e6c549f79cad874524f0f4a1f87aa7cd0ce3c597b",
    ),
    (
        32,
        b"password",
        b"salt",
        3,
        5,
        4,
        "018adf359d66b1f48ffe487f04d49c92bbcbbdd04000f6e1f4d6c73e218042b6",
    ),
];

fn cmd_selftest() -> anyhow::Result<()> {
    let mut failures = 0;

    for (i, (k, pwd, salt, t, r, c, expected)) in VECTORS.iter().enumerate() {
        let mut out = vec![0u8; *k];
        algorithm::derive(&mut out, pwd, salt, *t, *r, *c)?;
        let ok = hex::encode(&out) == *expected;
        println!(
            "  general #{} (T={}, R={}, C={}): {}",
            i,
            t,
            r,
            c,
            if ok { "ok" } else { "FAILED" }
        );
        if !ok {
            failures += 1;
        }
    }

    let fixed = algorithm::lyra2v2(&[0u8; 32]);
    let ok = hex::encode(fixed) == VECTORS[1].6;
    println!("  fixed 4x4: {}", if ok { "ok" } else { "FAILED" });
    if !ok {
        failures += 1;
    }

    if failures > 0 {
        anyhow::bail!("{} known-answer vector(s) failed", failures);
    }
    println!("\nAll vectors passed.");
    Ok(())
}

fn cmd_init_config(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path
        .or_else(default_config_path)
        .context("Could not determine a config directory; pass --config")?;

    if path.exists() {
        anyhow::bail!("Config already exists at {}", path.display());
    }

    ScanConfig::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
