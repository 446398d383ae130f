use portwire::exit::{ExitStatus, WorkerResult};

use crate::cmd::{ChannelArgs, VersionArgs};

pub fn run(args: VersionArgs, channel: &ChannelArgs) -> WorkerResult<i32> {
    if !args.extended {
        println!("portwire {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitStatus::Success.code());
    }

    let config = channel.frame_config()?;
    println!("name: portwire");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("PORTWIRE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("header_width: {}", config.header_width);
    println!("max_packet_size: {}", config.max_packet_size);

    Ok(ExitStatus::Success.code())
}
