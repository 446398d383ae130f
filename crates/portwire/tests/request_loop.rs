use std::io::Cursor;

use bytes::BytesMut;
use portwire::exit::ExitStatus;
use portwire::frame::{decode_frame, encode_frame, Frame, FrameConfig, HeaderWidth};
use portwire::handler::{error_reply, ok_reply, HandlerError};
use portwire::term::{decode_term, encode_term, Term};
use portwire::transport::Duplex;
use portwire::{LoopOutcome, StubHandler, Worker};

type TestStream = Duplex<Cursor<Vec<u8>>, Vec<u8>>;

fn requests(config: &FrameConfig, payloads: &[&[u8]]) -> Vec<u8> {
    let mut wire = BytesMut::new();
    for payload in payloads {
        encode_frame(config, payload, &mut wire).expect("request should encode");
    }
    wire.to_vec()
}

fn stream(input: Vec<u8>) -> TestStream {
    Duplex::new(Cursor::new(input), Vec::new())
}

fn replies(config: &FrameConfig, written: &[u8]) -> Vec<Frame> {
    let mut wire = BytesMut::from(written);
    let mut frames = Vec::new();
    while let Some(frame) = decode_frame(config, &mut wire).expect("reply should be well framed") {
        frames.push(frame);
    }
    assert!(wire.is_empty(), "partial reply left on the wire");
    frames
}

#[test]
fn three_byte_request_gets_ok_done() {
    let config = FrameConfig::default();
    let mut worker = Worker::new(stream(requests(&config, &[b"abc"])), config, StubHandler);

    assert!(matches!(worker.step(), LoopOutcome::Continue));

    let (_, written) = worker.into_inner().into_parts();
    let frames = replies(&config, &written);
    assert_eq!(frames.len(), 1);
    assert_eq!(decode_term(&frames[0].payload).unwrap(), ok_reply());
}

#[test]
fn thousand_requests_answered_in_order() {
    let config = FrameConfig::default();
    let payloads: Vec<Vec<u8>> = (0..1000u32).map(|i| i.to_be_bytes().to_vec()).collect();
    let refs: Vec<&[u8]> = payloads.iter().map(Vec::as_slice).collect();

    let echo_index = |request: &[u8]| -> Result<Term, HandlerError> {
        Ok(Term::tuple([Term::atom("ok"), Term::str(request)]))
    };
    let mut worker = Worker::new(stream(requests(&config, &refs)), config, echo_index);

    let fatal = worker.run();
    assert_eq!(fatal.status, ExitStatus::Header);
    assert_eq!(worker.served(), 1000);

    let (_, written) = worker.into_inner().into_parts();
    let frames = replies(&config, &written);
    assert_eq!(frames.len(), 1000);
    for (i, frame) in frames.iter().enumerate() {
        let reply = decode_term(&frame.payload).unwrap();
        let elements = reply.as_tuple().unwrap();
        assert_eq!(elements[1].as_str_bytes(), Some(&(i as u32).to_be_bytes()[..]));
    }
}

#[test]
fn stub_replies_are_identical_across_requests() {
    let config = FrameConfig::new(HeaderWidth::Two);
    let input = requests(&config, &[b"a", b"bb", b"ccc"]);
    let mut worker = Worker::new(stream(input), config, StubHandler);
    worker.run();

    let (_, written) = worker.into_inner().into_parts();
    let frames = replies(&config, &written);
    let expected = encode_term(&ok_reply()).unwrap();
    assert_eq!(frames.len(), 3);
    assert!(frames.iter().all(|frame| frame.payload == expected));
}

#[test]
fn failed_request_replies_error_and_loop_continues() {
    let config = FrameConfig::default();
    let input = requests(&config, &[b"bad", b"good"]);
    let handler = |request: &[u8]| -> Result<Term, HandlerError> {
        if request == b"bad" {
            Err(HandlerError::Failed("bad input".to_string()))
        } else {
            Ok(ok_reply())
        }
    };
    let mut worker = Worker::new(stream(input), config, handler);

    assert!(matches!(worker.step(), LoopOutcome::Continue));
    assert!(matches!(worker.step(), LoopOutcome::Continue));

    let (_, written) = worker.into_inner().into_parts();
    let frames = replies(&config, &written);
    let first = decode_term(&frames[0].payload).unwrap();
    assert_eq!(first, error_reply("bad input"));
    assert_eq!(first.as_tuple().unwrap()[1].as_str_bytes(), Some(&b"bad input"[..]));
    assert_eq!(decode_term(&frames[1].payload).unwrap(), ok_reply());
}

#[test]
fn fatal_statuses_for_broken_framing() {
    let cases: [(Vec<u8>, ExitStatus); 4] = [
        (vec![0, 0], ExitStatus::Header),
        (vec![], ExitStatus::Header),
        (vec![0, 0, 0, 0], ExitStatus::PacketSize),
        (vec![0, 0, 0, 4, 1, 2], ExitStatus::Body),
    ];
    for (input, expected) in cases {
        let mut worker = Worker::new(stream(input), FrameConfig::default(), StubHandler);
        let fatal = worker.run();
        assert_eq!(fatal.status, expected, "{fatal}");
        assert_eq!(worker.served(), 0);
        assert!(worker.get_ref().writer().is_empty());
    }
}

#[test]
fn declared_length_over_limit_is_packet_size_failure() {
    let config = FrameConfig::default().with_max_packet_size(255);
    let mut worker = Worker::new(stream(vec![0, 0, 1, 0]), config, StubHandler);
    assert_eq!(worker.run().status, ExitStatus::PacketSize);
}
