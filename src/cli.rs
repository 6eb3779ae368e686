use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harbor")]
#[command(about = "Harbormaster - translate compose descriptors into deployment specs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that a descriptor parses against the supported subset
    Validate {
        /// Compose descriptor file
        file: PathBuf,
    },
    /// Translate one descriptor into a deployment batch (JSON on stdout)
    Parse {
        /// Compose descriptor file
        file: PathBuf,

        #[command(flatten)]
        target: TargetArgs,

        /// Read declared env files from disk and expand them into each
        /// service's env before rewriting
        #[arg(long)]
        load_env_files: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Translate several descriptors and merge `extends` across them
    Merge {
        /// Compose descriptor files, in precedence order (later files
        /// extend/override earlier ones)
        files: Vec<PathBuf>,

        #[command(flatten)]
        target: TargetArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Deployment-target coordinates shared by the translating subcommands.
#[derive(Args)]
pub struct TargetArgs {
    /// Repository name; prefixes every instance name
    #[arg(short, long)]
    pub repository: String,

    /// Organization owning the deployment; embedded in hostnames
    #[arg(short, long)]
    pub owner: String,

    /// DNS zone for synthesized hostnames
    #[arg(short, long)]
    pub domain: String,

    /// Domain substring marking a build context as a remote checkout
    #[arg(long, default_value = "github.com")]
    pub scm_domain: String,

    /// Image for the placeholder main service
    #[arg(long, default_value = "busybox")]
    pub missing_main_image: String,

    /// Don't synthesize a placeholder when no service is buildable
    #[arg(long)]
    pub skip_missing_main: bool,
}
