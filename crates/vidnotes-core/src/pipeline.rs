use std::{fmt, path::PathBuf};

use crate::{
    audio::MediaSource,
    cache::create_run_dir,
    captions::{CaptionSource, resolve},
    config::Config,
    error::{Result, VidnotesError},
    format::summary_file_name,
    pdf::export_pdf,
    provider::Generator,
    summarize::ReportGenerator,
    transcribe::Recognizer,
    types::{Report, Transcript, TranscriptOrigin, VideoMetadata, VideoReference},
    video::extract_video_id,
};

/// External collaborators of a run.
pub struct Services<'a> {
    pub captions: &'a dyn CaptionSource,
    pub media: &'a dyn MediaSource,
    pub recognizer: &'a dyn Recognizer,
    pub generator: &'a dyn Generator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Captions,
    Download,
    Transcribe,
    Summarize,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Stage::Captions => "Fetching transcript",
            Stage::Download => "Downloading audio",
            Stage::Transcribe => "Transcribing with Whisper",
            Stage::Summarize => "Summarizing",
            Stage::Export => "Rendering PDF",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Started(Stage),
    Finished { stage: Stage, detail: String },
    /// No captions; the run continues with audio download and recognition.
    CaptionsUnavailable,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub video: VideoReference,
    pub metadata: VideoMetadata,
    pub transcript_origin: TranscriptOrigin,
    pub report: Report,
    pub pdf_path: PathBuf,
}

/// One video end to end: transcript (captions, else download + Whisper),
/// report, PDF. Steps run strictly in sequence.
pub struct Pipeline<'a> {
    config: &'a Config,
    services: Services<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, services: Services<'a>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, services })
    }

    pub async fn run(&self, url: &str) -> Result<PipelineOutput> {
        self.run_with_progress(url, |_| {}).await
    }

    pub async fn run_with_progress<F>(&self, url: &str, mut on_event: F) -> Result<PipelineOutput>
    where
        F: FnMut(PipelineEvent),
    {
        let video = extract_video_id(url)?;
        let run_dir = create_run_dir(&video)?;
        tracing::info!(video = %video, run_dir = %run_dir.path().display(), "pipeline started");

        on_event(PipelineEvent::Started(Stage::Captions));
        let (metadata, transcript) =
            match resolve(self.services.captions, &video, run_dir.path()).await {
                Some(transcript) => {
                    on_event(PipelineEvent::Finished {
                        stage: Stage::Captions,
                        detail: format!("{} caption lines", transcript.segments.len()),
                    });
                    (VideoMetadata::for_reference(&video), transcript)
                }
                None => {
                    on_event(PipelineEvent::CaptionsUnavailable);
                    self.transcribe_audio(url, run_dir.path(), &mut on_event)
                        .await?
                }
            };

        on_event(PipelineEvent::Started(Stage::Summarize));
        let generator = ReportGenerator::new(self.services.generator, self.config.chunk_width)?;
        let report = generator.summarize(&transcript.text()).await?;
        let detail = if report.is_chunked() {
            format!("{} chunks combined", report.chunk_count)
        } else {
            "single pass".to_string()
        };
        on_event(PipelineEvent::Finished {
            stage: Stage::Summarize,
            detail,
        });

        on_event(PipelineEvent::Started(Stage::Export));
        let pdf_path = self
            .config
            .output_dir
            .join(summary_file_name(&metadata.title, &video));
        let pdf_path = export_pdf(&metadata.title, &report.text, &pdf_path)?;
        on_event(PipelineEvent::Finished {
            stage: Stage::Export,
            detail: pdf_path.display().to_string(),
        });

        Ok(PipelineOutput {
            video,
            transcript_origin: transcript.origin,
            metadata,
            report,
            pdf_path,
        })
    }

    async fn transcribe_audio<F>(
        &self,
        url: &str,
        run_dir: &std::path::Path,
        on_event: &mut F,
    ) -> Result<(VideoMetadata, Transcript)>
    where
        F: FnMut(PipelineEvent),
    {
        on_event(PipelineEvent::Started(Stage::Download));
        let metadata = self.services.media.acquire(url, run_dir).await?;
        let audio_path = metadata
            .audio_path
            .clone()
            .ok_or_else(|| VidnotesError::DownloadFailed {
                url: url.to_string(),
                reason: "no audio file in download result".to_string(),
            })?;
        on_event(PipelineEvent::Finished {
            stage: Stage::Download,
            detail: metadata.title.clone(),
        });

        on_event(PipelineEvent::Started(Stage::Transcribe));
        let transcript = self.services.recognizer.transcribe(&audio_path).await?;
        on_event(PipelineEvent::Finished {
            stage: Stage::Transcribe,
            detail: format!("{} segments", transcript.segments.len()),
        });

        Ok((metadata, transcript))
    }
}
