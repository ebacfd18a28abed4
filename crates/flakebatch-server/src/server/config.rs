use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use flakebatch::SnowflakeId;

/// Runtime configuration for the `flakebatch-server` binary.
///
/// All values are parsed from CLI arguments or environment variables, with
/// defaults that reproduce the public contract of the service (port 8080,
/// batches of at most 1000 identifiers).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakebatch-server",
    version,
    about = "An HTTP service for issuing batches of unique identifiers"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Machine ID embedded in every identifier issued by this instance.
    ///
    /// Must be unique across all instances sharing an identifier namespace
    /// and must fit the 10-bit machine field (0..=1023).
    ///
    /// Environment variable: `MACHINE_ID`
    #[arg(long, env = "MACHINE_ID", default_value_t = 0)]
    pub machine_id: u64,

    /// Largest `count` a single `/ids` request may ask for.
    ///
    /// Environment variable: `MAX_COUNT`
    #[arg(long, env = "MAX_COUNT", default_value_t = 1000)]
    pub max_count: usize,

    /// How many times the generator may report "pending" for a single
    /// identifier before the request fails with a 500.
    ///
    /// Environment variable: `MAX_ATTEMPTS`
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = flakebatch::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Seconds to wait for in-flight requests after a shutdown signal.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT`
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 5)]
    pub shutdown_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub machine_id: u64,
    pub max_count: usize,
    pub max_attempts: usize,
    pub shutdown_timeout: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let max_machine_id = SnowflakeId::max_machine_id();

        if args.machine_id > max_machine_id {
            bail!(
                "MACHINE_ID ({}) exceeds available Snowflake machine ID space (max = {})",
                args.machine_id,
                max_machine_id
            );
        }

        if args.max_count == 0 {
            bail!("MAX_COUNT must be greater than 0");
        }

        if args.max_attempts == 0 {
            bail!("MAX_ATTEMPTS must be greater than 0");
        }

        Ok(Self {
            server_addr: args.server_addr,
            machine_id: args.machine_id,
            max_count: args.max_count,
            max_attempts: args.max_attempts,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
        })
    }
}
