// src/main.rs - status vocabulary tool and sample feed
use clap::{Parser, Subcommand};
use ember_status::codec;
use ember_status::config::{self, ConfigError, PublisherConfig, StatusConfig};
use ember_status::keys;
use ember_status::publisher::{self, JsonLineSink, StatusPublisher};
use ember_status::sample::{self, SampleJob};
use ember_status::{PrinterState, PrinterStatus};
use std::io::BufRead;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Parser, Debug)]
#[command(name = "ember-status", version, about = "Print engine status snapshots")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the printer state names
    States,
    /// List the status key names
    Keys,
    /// Decode and check newline-framed snapshots from a file or stdin
    Decode { file: Option<String> },
    /// Publish a scripted print job feed to stdout
    Sample {
        #[arg(long, default_value = "sample_job")]
        job: String,
        #[arg(long, default_value_t = 10)]
        layers: u32,
        #[arg(long, default_value_t = 10)]
        seconds_per_layer: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let cli = Cli::parse();

    let config = load_startup_config(cli.config.as_deref(), std::io::stderr)?;

    tracing_subscriber::fmt()
        .with_max_level(config.logging.max_level()?)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::States => {
            for state in PrinterState::ALL {
                println!("{}", state);
            }
        }
        Command::Keys => {
            println!("{}", keys::PRINTER_STATUS_KEY);
            for key in keys::ALL_FIELD_KEYS {
                println!("  {}", key);
            }
        }
        Command::Decode { file } => {
            let reader: Box<dyn BufRead> = match &file {
                Some(path) => Box::new(std::io::BufReader::new(std::fs::File::open(path)?)),
                None => Box::new(std::io::stdin().lock()),
            };
            let bad = decode_all(reader);
            if bad > 0 {
                return Err(format!("{} bad status line(s)", bad).into());
            }
        }
        Command::Sample { job, layers, seconds_per_layer } => {
            let job = SampleJob {
                seconds_per_layer,
                ..SampleJob::new(job, layers)
            };
            run_sample(&config, &job).await?;
        }
    }
    Ok(())
}

/// Loads the config under a temporary subscriber, since the real one needs the
/// configured log level and load failures would otherwise go unreported.
fn load_startup_config<W>(path: Option<&str>, make_writer: W) -> Result<StatusConfig, ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let Some(path) = path else {
        return Ok(StatusConfig::default());
    };
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(make_writer)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(bootstrap, || config::load_config(path))
}

fn decode_all<R: BufRead>(reader: R) -> usize {
    let mut bad = 0;
    for (index, result) in codec::decode_lines(reader).enumerate() {
        match result.and_then(|status| status.validate().map(|_| status).map_err(Into::into)) {
            Ok(status) => println!("{}", summarize(&status)),
            Err(e) => {
                tracing::error!("Status {}: {}", index + 1, e);
                bad += 1;
            }
        }
    }
    bad
}

fn summarize(status: &PrinterStatus) -> String {
    let mut line = format!("{:<22} {:<8}", status.state_label(), status.change.as_str());
    if status.num_layers > 0 {
        line.push_str(&format!(
            " layer {}/{} ({}s left)",
            status.current_layer, status.num_layers, status.estimated_seconds_remaining
        ));
    }
    if !status.job_name.is_empty() {
        line.push_str(&format!(" job={}", status.job_name));
    }
    line.push_str(&format!(" temp={:.1}", status.temperature));
    if !status.ui_sub_state.is_none() {
        line.push_str(&format!(" ui={}", status.ui_sub_state));
    }
    if status.is_error {
        line.push_str(&format!(" ERROR {}: {}", status.error_code, status.error_message));
    }
    line
}

async fn run_sample(
    config: &StatusConfig,
    job: &SampleJob,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let feed = sample::print_job_feed(job);
    // Size the channel for the whole script so the stdout writer never lags.
    let publisher_config = PublisherConfig {
        capacity: config.publisher.capacity.max(feed.len()),
        ..config.publisher.clone()
    };
    let status_publisher = StatusPublisher::new(&publisher_config);
    let receiver = status_publisher.subscribe();
    let writer = tokio::spawn(async move {
        let sink = JsonLineSink::new(tokio::io::stdout());
        publisher::forward(receiver, &sink).await
    });

    for status in feed {
        status_publisher.publish(status)?;
        tokio::task::yield_now().await;
    }
    drop(status_publisher);

    let forwarded = writer.await??;
    tracing::info!("Sample feed for '{}' done, {} snapshots written", job.job_name, forwarded);
    Ok(())
}
