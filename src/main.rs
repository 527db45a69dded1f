pub(crate) mod config;
pub(crate) mod slack;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "false")]
    #[arg(help = "Log to stderr")]
    log_to_console: bool,

    #[arg(long)]
    #[arg(help = "Also write json logs to a daily rotated file in this directory")]
    log_dir: Option<std::path::PathBuf>,

    #[arg(short, long, default_value = "false")]
    #[arg(help = "Exit with a non-zero status when the message could not be sent")]
    fail_on_error: bool,
}

#[derive(Debug, thiserror::Error)]
enum NotifyError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("Error sending message to Slack: {0}")]
    Send(#[from] slack::SendError),
}

async fn run(
    client: &reqwest::Client,
    load_config: impl FnOnce() -> Result<config::Config, config::ConfigError>,
) -> Result<(), NotifyError> {
    let config = load_config()?;
    tracing::info!(config =? config, "Loaded configuration");

    slack::send_message(client, &config.webhook_url, &config.channel, &config.message).await?;

    Ok(())
}

fn init_tracing(
    args: &Args,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::layer::Layer;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    // An unusable log dir only loses the file layer, the notification still goes out.
    let (file_appender, file_appender_error) = match &args.log_dir {
        Some(dir) => match tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("slack_notifier.log")
            .build(dir)
        {
            Ok(file_appender) => (Some(file_appender), None),
            Err(e) => (None, Some((dir.clone(), e))),
        },
        None => (None, None),
    };

    let (file_layer, guard) = match file_appender {
        Some(file_appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .json()
                .with_filter(tracing::level_filters::LevelFilter::INFO)
                .boxed();

            (Some(file_layer), Some(guard))
        }
        None => (None, None),
    };

    // stdout is reserved for the diagnostic lines.
    let console_layer = args.log_to_console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .with_filter(tracing::level_filters::LevelFilter::INFO)
            .boxed()
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    if let Some((dir, error)) = file_appender_error {
        tracing::warn!(
            log_dir =? dir,
            error =? error,
            "Failed to open log file, not logging to file"
        );
    }

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<std::process::ExitCode> {
    use clap::Parser;
    let args = Args::parse();

    let _guard = init_tracing(&args)?;

    tracing::info!(args =? args, "Starting Slack notifier");

    let client = reqwest::Client::new();

    match run(&client, config::Config::from_env).await {
        Ok(()) => {
            tracing::info!("Slack notifier finished");
            Ok(std::process::ExitCode::SUCCESS)
        }
        Err(e) => {
            match &e {
                NotifyError::Config(error) => {
                    tracing::error!(error =? error, "Missing configuration")
                }
                NotifyError::Send(error) => {
                    tracing::error!(error =? error, "Error sending message to Slack")
                }
            }
            println!("{e}");

            // Best effort by default, a failed notification must not fail the caller.
            if args.fail_on_error {
                Ok(std::process::ExitCode::FAILURE)
            } else {
                Ok(std::process::ExitCode::SUCCESS)
            }
        }
    }
}
