use clap::{crate_version, Parser};
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use shardsolve::config::SolverConfig;
use shardsolve::constants::{DEFAULT_CONFIG_DIR, DEFAULT_RADIX};
use shardsolve::input::SharePolicy;
use shardsolve::share::{BaseToken, Share};
use shardsolve::solver::solve_files;

#[derive(Debug, Parser)]
#[command(name = "shardsolve")]
#[command(version = crate_version!())]
#[command(
    about = "SHARDSOLVE - exact Shamir secret reconstruction",
    long_about = "SHARDSOLVE reads JSON share files, each holding a \"keys\" record with the threshold k and share records keyed by their decimal x, with values written in any base from 2 to 36. The k shares with the smallest x are interpolated at zero using exact rational arithmetic. A result that is not an integer is reported as an error rather than rounded. Files are solved concurrently, and a bad file never stops the others from being solved."
)]
enum CliArgument {
    /// Reconstruct the secret of every given share file.
    Solve {
        /// Share files to solve. Defaults to the `inputs` of the config.
        files: Vec<PathBuf>,

        /// Drop shares that do not decode instead of failing their file.
        #[clap(long)]
        skip_invalid: bool,

        /// Radix to print the secrets in.
        #[clap(long, short, value_parser = clap::value_parser!(u32).range(2..=36))]
        radix: Option<u32>,

        /// Verbose mode displays the shares
        #[clap(long, short)]
        verbose: bool,
    },
    /// Decode a single share and print its coordinates.
    Decode {
        /// Decimal share identifier.
        #[clap(long, short)]
        x: String,

        /// Base the value is written in.
        #[clap(long, short)]
        base: String,

        /// Share value.
        #[clap(long)]
        value: String,

        /// Radix to print the value in.
        #[clap(long, short, value_parser = clap::value_parser!(u32).range(2..=36))]
        radix: Option<u32>,
    },
}

#[derive(Parser, Debug)]
#[clap(name = "shardsolve")]
struct Opt {
    /// Directory holding conf.toml.
    #[clap(long, short, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[clap(subcommand)]
    argument: CliArgument,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let opt = Opt::parse();

    match opt.argument {
        CliArgument::Solve {
            files,
            skip_invalid,
            radix,
            verbose,
        } => {
            let config_dir = opt.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));
            let config = SolverConfig::new(&config_dir)?;
            debug!("Using config: {:?}", config);

            let files = if files.is_empty() { config.inputs.clone() } else { files };
            let policy = if skip_invalid {
                SharePolicy::Skip
            } else {
                config.on_invalid_share
            };
            let radix = radix.unwrap_or(config.radix);

            println!("--- Shamir's Secret Sharing Solver ---");
            let reports = solve_files(files, policy).await;

            let mut failures = 0;
            for report in &reports {
                match &report.result {
                    Ok(solved) => {
                        if verbose {
                            println!("🐛 shares for {}:", report.path.display());
                            let mut shares: Vec<_> = solved.document.problem.shares.iter().collect();
                            shares.sort_by(|a, b| a.x.cmp(&b.x));
                            for share in shares {
                                println!("  {share}");
                            }
                            for (id, reason) in &solved.document.skipped {
                                println!("  ⚠️  skipped {id}: {reason}");
                            }
                        }
                        println!(
                            "🔑 secret for {}: {}",
                            report.path.display(),
                            solved.secret.to_str_radix(radix)?
                        );
                    }
                    Err(e) => {
                        failures += 1;
                        println!("⚠️  error for {}: {}", report.path.display(), e);
                    }
                }
            }

            if !reports.is_empty() && failures == reports.len() {
                error!("No share file could be solved");
                return Err(format!("all {failures} share files failed").into());
            }
        }

        CliArgument::Decode {
            x,
            base,
            value,
            radix,
        } => {
            let share = Share::decode(&x, &BaseToken::Text(base), &value)?;
            let radix = radix.unwrap_or(DEFAULT_RADIX);
            println!("({}, {})", share.x, share.encode_value(radix)?);
        }
    }

    Ok(())
}
