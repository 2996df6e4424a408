//! Report generation with a chunk-and-combine strategy for long transcripts.
//!
//! Transcripts up to `chunk_width` characters go to the model in one request.
//! Longer ones are word-wrapped into chunks, each chunk is condensed to a few
//! bullet points, and a final request merges the bullets into one report.

use crate::{
    error::{GenerationError, Result, VidnotesError},
    format::strip_timestamps,
    provider::Generator,
    types::Report,
    wrap::wrap_words,
};

/// Contribution of a chunk whose summary request failed.
pub const CHUNK_PLACEHOLDER: &str = "Error summarizing this chunk.";

fn direct_prompt(transcript: &str) -> String {
    format!(
        r#"Summarize the following transcript into a single well-structured report for the entire video:

- Combine all details into ONE report.
- Do NOT include timestamps.
- Use sections: Introduction, Main Points (with subheadings), and Key Takeaways.
- Make it concise, clear, and professional for note-taking or study purposes.

Transcript:
{transcript}"#
    )
}

fn chunk_prompt(chunk: &str) -> String {
    format!(
        r#"Summarize this part of the transcript into short, clear bullet points (max 5):

{chunk}"#
    )
}

fn combine_prompt(notes: &str) -> String {
    format!(
        r#"Combine the following notes into a single well-structured report:

- Sections: Introduction, Main Points (with subheadings), Key Takeaways
- Remove repetition
- Do NOT include timestamps

Notes:
{notes}"#
    )
}

/// Outcome of summarizing one chunk.
#[derive(Debug)]
pub enum ChunkSummary {
    Summarized(String),
    Failed(GenerationError),
}

impl ChunkSummary {
    fn from_result(result: std::result::Result<String, GenerationError>) -> Self {
        match result {
            Ok(text) => ChunkSummary::Summarized(text.trim().to_string()),
            Err(e) => ChunkSummary::Failed(e),
        }
    }

    /// Text this chunk contributes to the combination request.
    pub fn as_notes(&self) -> &str {
        match self {
            ChunkSummary::Summarized(text) => text,
            ChunkSummary::Failed(_) => CHUNK_PLACEHOLDER,
        }
    }
}

/// Split a transcript into word-wrapped chunks of at most `width` characters.
/// A word longer than `width` forms a chunk of its own.
pub fn split_chunks(text: &str, width: usize) -> Vec<String> {
    wrap_words(text, width)
}

pub struct ReportGenerator<'a> {
    generator: &'a dyn Generator,
    chunk_width: usize,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(generator: &'a dyn Generator, chunk_width: usize) -> Result<Self> {
        if chunk_width == 0 {
            return Err(VidnotesError::InvalidChunkWidth);
        }
        Ok(Self {
            generator,
            chunk_width,
        })
    }

    pub async fn summarize(&self, transcript: &str) -> Result<Report> {
        if transcript.chars().count() <= self.chunk_width {
            let body = self.generator.generate(&direct_prompt(transcript)).await?;
            return Ok(Report::new(&strip_timestamps(&body), 0));
        }

        let chunks = split_chunks(transcript, self.chunk_width);
        let summaries = self.summarize_chunks(&chunks).await;
        let notes = summaries
            .iter()
            .map(ChunkSummary::as_notes)
            .collect::<Vec<_>>()
            .join("\n");

        let body = self.generator.generate(&combine_prompt(&notes)).await?;
        Ok(Report::new(&strip_timestamps(&body), chunks.len()))
    }

    /// Summarize chunks in order. A failed chunk never aborts the batch.
    pub async fn summarize_chunks(&self, chunks: &[String]) -> Vec<ChunkSummary> {
        let mut summaries = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let summary =
                ChunkSummary::from_result(self.generator.generate(&chunk_prompt(chunk)).await);
            if let ChunkSummary::Failed(e) = &summary {
                tracing::warn!(chunk = i + 1, total = chunks.len(), error = %e, "chunk summary failed");
            } else {
                tracing::debug!(chunk = i + 1, total = chunks.len(), "chunk summarized");
            }
            summaries.push(summary);
        }
        summaries
    }
}
