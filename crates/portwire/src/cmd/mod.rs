use clap::{Args, Subcommand};
use portwire::exit::{frame_error, WorkerResult};
use portwire::frame::{FrameConfig, HeaderWidth, DEFAULT_HEADER_WIDTH};

pub mod run;
pub mod version;

#[derive(Subcommand, Debug, Default)]
pub enum Command {
    /// Serve requests on stdin/stdout until the channel fails (default).
    #[default]
    Run,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, channel: &ChannelArgs) -> WorkerResult<i32> {
    match command {
        Command::Run => run::run(channel),
        Command::Version(args) => version::run(args, channel),
    }
}

#[derive(Args, Debug)]
pub struct ChannelArgs {
    /// Length header width in bytes; must match the host's `{packet, N}`.
    #[arg(
        long,
        env = "PORTWIRE_PACKET",
        default_value_t = DEFAULT_HEADER_WIDTH.bytes() as u8,
        global = true
    )]
    pub packet: u8,

    /// Largest accepted packet in bytes. Default: the header width maximum.
    #[arg(long, env = "PORTWIRE_MAX_PACKET_SIZE", value_name = "BYTES", global = true)]
    pub max_packet_size: Option<u64>,
}

impl ChannelArgs {
    pub fn frame_config(&self) -> WorkerResult<FrameConfig> {
        let width = HeaderWidth::try_from(self.packet)
            .map_err(|err| frame_error("invalid channel configuration", err))?;
        let config = FrameConfig::new(width);
        Ok(match self.max_packet_size {
            Some(max) => config.with_max_packet_size(max),
            None => config,
        })
    }
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build and channel details.
    #[arg(long)]
    pub extended: bool,
}
