// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use san_types::VolumeFormat;

#[derive(Debug, Parser)]
#[command(name = "san-console")]
#[command(version)]
#[command(about = "Plan DS8000 volume ranges against an exported volume inventory")]
pub struct Cli {
    /// TOML config file (defaults to ./san-console.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Committed volume snapshot (JSON)
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// In-project volume snapshot overlaid on the committed one (JSON)
    #[arg(long, global = true)]
    pub project_registry: Option<PathBuf>,

    #[arg(long, global = true)]
    pub storage_system: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a volume range creation request
    Validate {
        #[arg(long)]
        lss: String,
        #[arg(long)]
        start: String,
        /// Omit for a single volume
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_enum)]
        format: FormatArg,
        /// Capacity per volume, e.g. "16 GB" or a byte count
        #[arg(long)]
        capacity: String,
        #[arg(long)]
        pool: Option<String>,
        /// Take format and pool from the LSS lock instead of the arguments
        #[arg(long)]
        follow_policy: bool,
    },
    /// Allocated ranges of an LSS
    Ranges {
        #[arg(long)]
        lss: String,
    },
    /// Unallocated gaps of an LSS
    Free {
        #[arg(long)]
        lss: String,
        /// Also report the first start volume with this many free volumes
        #[arg(long)]
        count: Option<u32>,
    },
    /// Pool/format lock of an LSS
    Policy {
        #[arg(long)]
        lss: String,
    },
    /// Already-allocated addresses inside a range
    Conflicts {
        #[arg(long)]
        lss: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Fb,
    Ckd,
}

impl From<FormatArg> for VolumeFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Fb => VolumeFormat::Fb,
            FormatArg::Ckd => VolumeFormat::Ckd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_validate_with_global_flags() {
        let cli = Cli::try_parse_from([
            "san-console",
            "validate",
            "--registry",
            "volumes.json",
            "--lss",
            "10",
            "--start",
            "00",
            "--end",
            "0F",
            "--format",
            "ckd",
            "--capacity",
            "16 GB",
        ])
        .expect("parse");

        assert_eq!(cli.registry, Some(PathBuf::from("volumes.json")));
        match cli.command {
            Command::Validate {
                lss,
                end,
                format,
                follow_policy,
                ..
            } => {
                assert_eq!(lss, "10");
                assert_eq!(end.as_deref(), Some("0F"));
                assert_eq!(VolumeFormat::from(format), VolumeFormat::Ckd);
                assert!(!follow_policy);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
