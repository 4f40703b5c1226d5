use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use seqloom::{DEFAULT_EPOCH, OdometerConfig, PackedConfig};


/// One segment of the printed value.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// A bit-packed 64-bit ID, printed in decimal.
    Packed,
    /// An odometer code prefixed with its millisecond timestamp.
    Odometer,
    /// A placeholder filled on every line from a separate odometer built
    /// from `--slot-length` and `--slot-alphabet`.
    Slot,
}

/// Runtime configuration for the `seqloom` binary.
///
/// Every flag can also be set through the environment variable named next
/// to it; a `.env` file in the working directory is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seqloom",
    version,
    about = "Prints Snowflake-style IDs, odometer codes, or a composition of both"
)]
pub struct CliArgs {
    /// Number of values to print, one per line.
    ///
    /// Environment variable: `SEQLOOM_COUNT`
    #[arg(short = 'n', long, env = "SEQLOOM_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Comma-separated segments making up each value, in order.
    ///
    /// Environment variable: `SEQLOOM_PARTS`
    #[arg(
        short,
        long,
        env = "SEQLOOM_PARTS",
        value_enum,
        value_delimiter = ',',
        default_value = "packed"
    )]
    pub parts: Vec<Part>,

    /// String placed between segments.
    ///
    /// Environment variable: `SEQLOOM_SEPARATOR`
    #[arg(short, long, env = "SEQLOOM_SEPARATOR", default_value_t = String::from("-"))]
    pub separator: String,

    /// Epoch of the packed timestamp, in Unix milliseconds.
    ///
    /// Environment variable: `SEQLOOM_EPOCH`
    #[arg(long, env = "SEQLOOM_EPOCH", default_value_t = DEFAULT_EPOCH)]
    pub epoch: u64,

    /// Environment variable: `SEQLOOM_TIMESTAMP_BITS`
    #[arg(long, env = "SEQLOOM_TIMESTAMP_BITS", default_value_t = 41)]
    pub timestamp_bits: u8,

    /// Environment variable: `SEQLOOM_DATACENTER_BITS`
    #[arg(long, env = "SEQLOOM_DATACENTER_BITS", default_value_t = 5)]
    pub datacenter_bits: u8,

    /// Environment variable: `SEQLOOM_WORKER_BITS`
    #[arg(long, env = "SEQLOOM_WORKER_BITS", default_value_t = 5)]
    pub worker_bits: u8,

    /// Environment variable: `SEQLOOM_SEQUENCE_BITS`
    #[arg(long, env = "SEQLOOM_SEQUENCE_BITS", default_value_t = 12)]
    pub sequence_bits: u8,

    /// Must fit in `--datacenter-bits`.
    ///
    /// Environment variable: `SEQLOOM_DATACENTER_ID`
    #[arg(long, env = "SEQLOOM_DATACENTER_ID", default_value_t = 0)]
    pub datacenter_id: u64,

    /// Must fit in `--worker-bits`.
    ///
    /// Environment variable: `SEQLOOM_WORKER_ID`
    #[arg(long, env = "SEQLOOM_WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Sequence value at the start of every millisecond.
    ///
    /// Environment variable: `SEQLOOM_SEQUENCE_DEFAULT`
    #[arg(long, env = "SEQLOOM_SEQUENCE_DEFAULT", default_value_t = 0)]
    pub sequence_default: u64,

    /// Characters per odometer code.
    ///
    /// Environment variable: `SEQLOOM_LENGTH`
    #[arg(long, env = "SEQLOOM_LENGTH", default_value_t = 5)]
    pub length: usize,

    /// Odometer characters, lowest first.
    ///
    /// Environment variable: `SEQLOOM_ALPHABET`
    #[arg(long, env = "SEQLOOM_ALPHABET", default_value_t = String::from("0123456789"))]
    pub alphabet: String,

    /// Characters per code of the `slot` filler.
    ///
    /// Environment variable: `SEQLOOM_SLOT_LENGTH`
    #[arg(long, env = "SEQLOOM_SLOT_LENGTH", default_value_t = 4)]
    pub slot_length: usize,

    /// Alphabet of the `slot` filler.
    ///
    /// Environment variable: `SEQLOOM_SLOT_ALPHABET`
    #[arg(
        long,
        env = "SEQLOOM_SLOT_ALPHABET",
        default_value_t = String::from("ABCDEFGHJKMNPQRSTVWXYZ")
    )]
    pub slot_alphabet: String,
}

/// Validated configuration. Only the generators named in `parts` are
/// checked, so an unused alphabet may be left empty.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub count: usize,
    pub parts: Vec<Part>,
    pub separator: String,
    pub packed: PackedConfig,
    pub odometer: OdometerConfig,
    pub slot: OdometerConfig,
}

impl ToolConfig {
    pub fn uses(&self, part: Part) -> bool {
        self.parts.contains(&part)
    }
}

impl TryFrom<CliArgs> for ToolConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("SEQLOOM_COUNT must be greater than 0");
        }

        if args.parts.is_empty() {
            bail!("SEQLOOM_PARTS must name at least one of: packed, odometer, slot");
        }

        let config = Self {
            count: args.count,
            parts: args.parts,
            separator: args.separator,
            packed: PackedConfig::default()
                .with_epoch(args.epoch)
                .with_bits(
                    args.timestamp_bits,
                    args.datacenter_bits,
                    args.worker_bits,
                    args.sequence_bits,
                )
                .with_datacenter_id(args.datacenter_id)
                .with_worker_id(args.worker_id)
                .with_sequence_default(args.sequence_default),
            odometer: OdometerConfig::new(args.length, &args.alphabet),
            slot: OdometerConfig::new(args.slot_length, &args.slot_alphabet),
        };

        if config.uses(Part::Packed) {
            config
                .packed
                .validate()
                .context("invalid packed layout")?;
        }
        if config.uses(Part::Odometer) {
            config
                .odometer
                .validate()
                .context("invalid odometer configuration")?;
        }
        if config.uses(Part::Slot) {
            config
                .slot
                .validate()
                .context("invalid slot configuration")?;
        }

        Ok(config)
    }
}
