use ember_status::codec::{self, CodecError};
use ember_status::config::{ConfigError, PublisherConfig, load_config};
use ember_status::publisher::{JsonLineSink, StatusSink, forward};
use ember_status::sample::{SampleJob, print_job_feed};
use ember_status::{PrinterState, PrinterStatus, PublishError, StatusError, StatusPublisher};
use std::io::Write;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_forward_writes_every_snapshot_as_a_line() {
    let feed = print_job_feed(&SampleJob::new("gear", 2));
    let publisher = StatusPublisher::new(&PublisherConfig { capacity: feed.len(), strict: true });
    let receiver = publisher.subscribe();
    let sink = JsonLineSink::new(Vec::new());

    for status in feed.iter().cloned() {
        publisher.publish(status).unwrap();
    }
    drop(publisher);

    let forwarded = forward(receiver, &sink).await.unwrap();
    assert_eq!(forwarded, feed.len());
    let written = sink.into_inner();
    let decoded: Vec<PrinterStatus> = codec::decode_lines(written.as_slice())
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(decoded, feed);
}

#[tokio::test]
async fn test_lagging_subscriber_keeps_newest() {
    let publisher = StatusPublisher::new(&PublisherConfig { capacity: 2, strict: false });
    let receiver = publisher.subscribe();
    for layer in 1..=5 {
        publisher
            .publish(PrinterStatus::steady(PrinterState::Printing).with_progress(layer, 5))
            .unwrap();
    }
    drop(publisher);
    let sink = JsonLineSink::new(Vec::new());
    let forwarded = forward(receiver, &sink).await.unwrap();
    assert_eq!(forwarded, 2);
    let last = codec::decode_lines(sink.into_inner().as_slice()).last().unwrap().unwrap();
    assert_eq!(last.current_layer, 5);
}

#[tokio::test]
async fn test_json_line_sink_output() {
    let status = PrinterStatus::entering(PrinterState::Homing);
    let expected = codec::encode_line(&status).unwrap();
    let mock = tokio_test::io::Builder::new().write(expected.as_bytes()).build();
    let sink = JsonLineSink::new(mock);
    sink.send_status(&status).await.unwrap();
}

#[tokio::test]
async fn test_json_line_sink_refuses_non_finite_temperature() {
    let sink = JsonLineSink::new(Vec::new());
    let status = PrinterStatus::steady(PrinterState::Idle).with_temperature(f32::NAN);
    let err = sink.send_status(&status).await.unwrap_err();
    assert!(matches!(
        err,
        PublishError::Codec(CodecError::Invalid(StatusError::NonFiniteTemperature(_)))
    ));
    assert!(sink.into_inner().is_empty());
}

#[tokio::test]
async fn test_publisher_chains_into_publisher() {
    let upstream = StatusPublisher::new(&PublisherConfig::default());
    let downstream = StatusPublisher::new(&PublisherConfig::default());
    let mut consumer = downstream.subscribe();
    let receiver = upstream.subscribe();
    upstream.publish(PrinterStatus::leaving(PrinterState::Idle)).unwrap();
    drop(upstream);
    assert_eq!(forward(receiver, &downstream).await.unwrap(), 1);
    assert_eq!(consumer.recv().await.unwrap(), PrinterStatus::leaving(PrinterState::Idle));
    assert_eq!(downstream.latest().state, Some(PrinterState::Idle));
}

#[test]
fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[publisher]\ncapacity = 64\nstrict = true\n\n[logging]\nlevel = \"debug\""
    )
    .unwrap();
    let config = load_config(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.publisher.capacity, 64);
    assert!(config.publisher.strict);
    assert_eq!(config.logging.max_level().unwrap(), tracing::Level::DEBUG);
}

#[test]
fn test_load_config_errors() {
    assert!(matches!(load_config("/nonexistent/ember-status.toml"), Err(ConfigError::Io(_))));
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[publisher\ncapacity = ").unwrap();
    assert!(matches!(load_config(file.path().to_str().unwrap()), Err(ConfigError::Toml(_))));
}
