use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vidnotes_core::{
    ChatClient, Config, Pipeline, PipelineEvent, PipelineOutput, Provider, Services,
    WhisperModel, WhisperRecognizer, YtDlpAudio, YtDlpCaptions, save_thumbnail,
    thumbnail_file_stem,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Gemini,
    Grok,
    Openai,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => Provider::Gemini,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Openai => Provider::Openai,
        }
    }
}

#[derive(Clone, Default, ValueEnum)]
enum CliModel {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
}

impl From<CliModel> for WhisperModel {
    fn from(cli: CliModel) -> Self {
        match cli {
            CliModel::Tiny => WhisperModel::Tiny,
            CliModel::Base => WhisperModel::Base,
            CliModel::Small => WhisperModel::Small,
            CliModel::Medium => WhisperModel::Medium,
        }
    }
}

#[derive(Parser)]
#[command(name = "vidnotes")]
#[command(about = "Turn a YouTube video into structured study notes and a PDF")]
struct Cli {
    /// Video URL
    url: String,

    /// AI provider for report generation
    #[arg(short, long, default_value = "gemini")]
    provider: CliProvider,

    /// Transcripts longer than this many characters are summarized in chunks
    #[arg(short = 'w', long, default_value_t = 2000)]
    chunk_width: usize,

    /// Whisper model used when the video has no captions
    #[arg(short, long, default_value = "base")]
    model: CliModel,

    /// Caption languages to look for (yt-dlp --sub-langs pattern)
    #[arg(short, long, default_value = "en.*")]
    lang: String,

    /// Directory the PDF and thumbnail are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip downloading the video thumbnail
    #[arg(long)]
    no_thumbnail: bool,
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

extern "C" fn whisper_log_callback(
    _level: u32,
    _message: *const std::ffi::c_char,
    _user_data: *mut std::ffi::c_void,
) {
    // silent
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env(cli.provider.clone().into())?;
    config.chunk_width = cli.chunk_width;
    config.whisper_model = cli.model.clone().into();
    config.caption_langs = cli.lang.clone();
    config.output_dir = cli.output_dir.clone();
    config.validate()?;
    Ok(config)
}

fn print_video_info(output: &PipelineOutput) {
    println!("\n{}", style("Video Info").bold().underlined());
    println!("{} {}", style("Title:").dim(), output.metadata.title);
    println!("{} {}", style("Channel:").dim(), output.metadata.channel);
    if !output.metadata.description.is_empty() {
        println!("{} {}", style("Description:").dim(), output.metadata.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    }

    // Validate configuration and API key early
    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    println!(
        "\n{}  {}\n",
        style("vidnotes").cyan().bold(),
        style("Video Notes").dim()
    );

    println!("{}", style("─".repeat(60)).dim());

    let captions = YtDlpCaptions::new(config.caption_langs.clone());
    let media = YtDlpAudio;
    let recognizer = WhisperRecognizer::new(config.cache_dir.clone(), config.whisper_model);
    let generator = ChatClient::new(config.provider, config.api_key.clone());
    let pipeline = match Pipeline::new(
        &config,
        Services {
            captions: &captions,
            media: &media,
            recognizer: &recognizer,
            generator: &generator,
        },
    ) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    let total_start = Instant::now();
    let mut step_start = Instant::now();
    let mut spinner: Option<ProgressBar> = None;

    let result = pipeline
        .run_with_progress(&cli.url, |event| match event {
            PipelineEvent::Started(stage) => {
                step_start = Instant::now();
                spinner = Some(create_spinner(&format!("{}...", stage)));
            }
            PipelineEvent::Finished { stage, detail } => {
                if let Some(pb) = spinner.take() {
                    pb.finish_with_message(format!(
                        "{} {}: {} {}",
                        style("✓").green().bold(),
                        stage,
                        style(detail).dim(),
                        style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
                    ));
                }
            }
            PipelineEvent::CaptionsUnavailable => {
                if let Some(pb) = spinner.take() {
                    pb.finish_with_message(format!(
                        "{} No transcript found, using Whisper {} model",
                        style("!").yellow().bold(),
                        config.whisper_model
                    ));
                }
            }
        })
        .await;

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    print_video_info(&output);

    if !cli.no_thumbnail {
        if let Some(url) = &output.metadata.thumbnail_url {
            let stem = thumbnail_file_stem(&output.metadata.title, &output.video);
            match save_thumbnail(url, &config.output_dir, &stem).await {
                Ok(path) => println!(
                    "{} {}",
                    style("Thumbnail:").dim(),
                    style(path.display()).cyan()
                ),
                Err(e) => {
                    tracing::warn!(error = %e, "thumbnail download failed");
                    println!("{}", style("Could not load thumbnail.").yellow());
                }
            }
        }
    }

    println!(
        "\n{} {} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold(),
        style(format!(
            "(transcript from {}, {})",
            output.transcript_origin,
            if output.report.is_chunked() {
                format!("{} chunks", output.report.chunk_count)
            } else {
                "single pass".to_string()
            }
        ))
        .dim()
    );
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", output.report.text);
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(output.pdf_path.display()).cyan()
    );

    Ok(())
}
