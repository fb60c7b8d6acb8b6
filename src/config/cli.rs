//! CLI argument parsing using clap

use crate::request::{Dtype, LengthDistribution, RandomArrayRequest, RandomStringsRequest, Request};
use crate::strings::CharClass;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// distrand - Distributed random array generator
#[derive(Parser, Debug)]
#[command(name = "distrand")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Number of locales to partition arrays over
    #[arg(short = 'l', long, env = "DISTRAND_LOCALES")]
    pub locales: Option<usize>,

    /// Threads in the locale task pool (default: number of CPUs)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Elements per random stream within a locale
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Fixed seed for reproducible output
    #[arg(long, env = "DISTRAND_SEED")]
    pub seed: Option<u64>,

    /// Enable debug output (timing, partitioning, collective totals)
    #[arg(long)]
    pub debug: bool,

    /// Write a JSON report to this file
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Number of leading elements shown in the summary
    #[arg(long)]
    pub preview: Option<usize>,

    /// Only print the reply line
    #[arg(short = 'q', long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Generation command
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Random values of a dtype, optionally remapped into [low, high)
    Randint {
        /// Number of elements
        #[arg(short = 's', long, allow_hyphen_values = true)]
        size: i64,
        /// Element kind
        #[arg(long, value_enum, default_value = "int64")]
        dtype: DtypeArg,
        /// Low bound (inclusive)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        low: String,
        /// High bound (exclusive); equal to low means raw draws
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        high: String,
    },
    /// Uniform float64 values in [low, high)
    Uniform {
        /// Number of elements
        #[arg(short = 's', long, allow_hyphen_values = true)]
        size: i64,
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        low: f64,
        #[arg(long, default_value = "1.0", allow_hyphen_values = true)]
        high: f64,
    },
    /// Standard normal float64 values
    Normal {
        /// Number of elements
        #[arg(short = 's', long, allow_hyphen_values = true)]
        size: i64,
    },
    /// Random strings with uniformly distributed lengths
    Strings {
        /// Number of strings
        #[arg(short = 's', long, allow_hyphen_values = true)]
        size: i64,
        /// Minimum length
        #[arg(long, allow_hyphen_values = true)]
        min_len: i64,
        /// Maximum length
        #[arg(long, allow_hyphen_values = true)]
        max_len: i64,
        /// Character set to draw from
        #[arg(long, value_enum, default_value = "uppercase")]
        charset: CharsetArg,
    },
    /// Random strings with log-normally distributed lengths
    StringsLognormal {
        /// Number of strings
        #[arg(short = 's', long, allow_hyphen_values = true)]
        size: i64,
        /// Log-mean of the length distribution
        #[arg(long, allow_hyphen_values = true)]
        log_mean: f64,
        /// Log-standard-deviation of the length distribution
        #[arg(long, allow_hyphen_values = true)]
        log_std: f64,
        /// Character set to draw from
        #[arg(long, value_enum, default_value = "uppercase")]
        charset: CharsetArg,
    },
}

/// Element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DtypeArg {
    Int64,
    Uint64,
    Float64,
    Bool,
    Uint8,
}

/// Character set
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CharsetArg {
    /// A-Z
    Uppercase,
    /// a-z
    Lowercase,
    /// 0-9
    Numeric,
    /// Space through tilde
    Printable,
    /// Unconstrained bytes
    Binary,
}

impl From<DtypeArg> for Dtype {
    fn from(arg: DtypeArg) -> Self {
        match arg {
            DtypeArg::Int64 => Dtype::Int64,
            DtypeArg::Uint64 => Dtype::UInt64,
            DtypeArg::Float64 => Dtype::Float64,
            DtypeArg::Bool => Dtype::Bool,
            DtypeArg::Uint8 => Dtype::UInt8,
        }
    }
}

impl From<CharsetArg> for CharClass {
    fn from(arg: CharsetArg) -> Self {
        match arg {
            CharsetArg::Uppercase => CharClass::Uppercase,
            CharsetArg::Lowercase => CharClass::Lowercase,
            CharsetArg::Numeric => CharClass::Numeric,
            CharsetArg::Printable => CharClass::Printable,
            CharsetArg::Binary => CharClass::Binary,
        }
    }
}

impl Command {
    /// Translate into a boundary request
    pub fn to_request(&self) -> Request {
        match self {
            Command::Randint { size, dtype, low, high } => Request::RandomArray(RandomArrayRequest {
                size: *size,
                dtype: (*dtype).into(),
                low: low.clone(),
                high: high.clone(),
            }),
            Command::Uniform { size, low, high } => Request::Uniform {
                size: *size,
                low: *low,
                high: *high,
            },
            Command::Normal { size } => Request::StandardNormal { size: *size },
            Command::Strings { size, min_len, max_len, charset } => {
                Request::RandomStrings(RandomStringsRequest {
                    size: *size,
                    lengths: LengthDistribution::Uniform {
                        min_len: *min_len,
                        max_len: *max_len,
                    },
                    char_class: (*charset).into(),
                })
            }
            Command::StringsLognormal { size, log_mean, log_std, charset } => {
                Request::RandomStrings(RandomStringsRequest {
                    size: *size,
                    lengths: LengthDistribution::LogNormal {
                        log_mean: *log_mean,
                        log_std: *log_std,
                    },
                    char_class: (*charset).into(),
                })
            }
        }
    }
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    ///
    /// Request arguments (sizes, bounds) are validated by the request boundary.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.locales == Some(0) {
            anyhow::bail!("locales must be at least 1");
        }
        if self.threads == Some(0) {
            anyhow::bail!("threads must be at least 1");
        }
        if self.chunk_size == Some(0) {
            anyhow::bail!("chunk_size must be at least 1");
        }
        Ok(())
    }
}
