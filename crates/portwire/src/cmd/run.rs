use portwire::exit::WorkerResult;
use portwire::{startup, StubHandler, Worker};

use crate::cmd::ChannelArgs;

pub fn run(channel: &ChannelArgs) -> WorkerResult<i32> {
    let config = channel.frame_config()?;
    let stream = startup::init(&config)?;
    let mut worker = Worker::new(stream, config, StubHandler);
    Err(worker.run())
}
