mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{FakeGenerator, REPORT_BODY, has_timestamp, is_chunk_prompt};
use vidnotes_core::{
    CHUNK_PLACEHOLDER, GenerationError, Report, ReportGenerator, VidnotesError, split_chunks,
};

fn is_combine_prompt(prompt: &str) -> bool {
    prompt.starts_with("Combine the following notes")
}

fn prompt_payload(prompt: &str) -> &str {
    prompt.split_once("\n\n").unwrap().1
}

fn normalized(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[tokio::test]
async fn test_short_transcript_uses_single_request() {
    let generator = FakeGenerator::echoing();
    let reports = ReportGenerator::new(&generator, 2000).unwrap();

    let report = reports.summarize("A short talk about Rust.").await.unwrap();

    assert_eq!(generator.calls(), 1);
    let prompt = &generator.prompts()[0];
    assert!(prompt.starts_with("Summarize the following transcript"));
    assert!(prompt.ends_with("A short talk about Rust."));
    assert!(report.text.starts_with(Report::HEADER));
    assert!(!report.is_chunked());
}

#[tokio::test]
async fn test_transcript_at_width_is_not_chunked() {
    let generator = FakeGenerator::echoing();
    let reports = ReportGenerator::new(&generator, 10).unwrap();

    let report = reports.summarize("ééééé éééé").await.unwrap();

    assert_eq!(generator.calls(), 1);
    assert_eq!(report.chunk_count, 0);
}

#[tokio::test]
async fn test_empty_transcript_still_calls_generator() {
    let generator = FakeGenerator::new(|_| Ok("Nothing was said.".to_string()));
    let reports = ReportGenerator::new(&generator, 2000).unwrap();

    let report = reports.summarize("").await.unwrap();

    assert_eq!(generator.calls(), 1);
    assert_eq!(report.text, "### Video Summary Report\n\nNothing was said.");
}

#[test]
fn test_zero_width_rejected() {
    let generator = FakeGenerator::echoing();
    assert!(matches!(
        ReportGenerator::new(&generator, 0),
        Err(VidnotesError::InvalidChunkWidth)
    ));
}

#[tokio::test]
async fn test_direct_failure_is_typed_error() {
    let generator = FakeGenerator::new(|_| {
        Err(GenerationError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        })
    });
    let reports = ReportGenerator::new(&generator, 2000).unwrap();

    let err = reports.summarize("short").await.unwrap_err();

    assert!(matches!(
        err,
        VidnotesError::GenerationFailed(GenerationError::Api { status: 429, .. })
    ));
    assert!(err.to_string().contains("quota exceeded"));
}

#[tokio::test]
async fn test_long_transcript_is_chunked_and_combined() {
    let text = "Hello world. ".repeat(1000);
    let generator = FakeGenerator::echoing();
    let reports = ReportGenerator::new(&generator, 2000).unwrap();

    let report = reports.summarize(&text).await.unwrap();

    let chunks = split_chunks(&text, 2000);
    assert_eq!(chunks.len(), 7);
    assert_eq!(report.chunk_count, 7);
    assert_eq!(generator.calls(), 8);

    let prompts = generator.prompts();
    assert!(prompts[..7].iter().all(|p| is_chunk_prompt(p)));
    assert!(is_combine_prompt(&prompts[7]));

    for heading in ["Introduction", "Main Points", "Key Takeaways"] {
        assert!(report.text.contains(heading), "missing {heading}");
    }
    assert!(report.text.starts_with("### Video Summary Report\n\n"));
    assert!(!has_timestamp(&report.text));
    assert!(!report.text.contains(REPORT_BODY));
}

#[tokio::test]
async fn test_only_bracketed_timestamps_are_removed() {
    let generator = FakeGenerator::new(|_| {
        Ok("## Main Points\n- [00:05] John 3:16 is quoted\n- The meeting starts at 10:30 sharp".to_string())
    });
    let reports = ReportGenerator::new(&generator, 2000).unwrap();

    let report = reports.summarize("short").await.unwrap();

    assert_eq!(
        report.text,
        "### Video Summary Report\n\n## Main Points\n- John 3:16 is quoted\n- The meeting starts at 10:30 sharp"
    );
}

#[tokio::test]
async fn test_chunks_never_split_words() {
    let text = "Ownership borrowing lifetimes; traits,  generics\nand macros. ".repeat(300);
    let generator = FakeGenerator::echoing();
    let reports = ReportGenerator::new(&generator, 500).unwrap();

    reports.summarize(&text).await.unwrap();

    let chunks: Vec<String> = generator
        .prompts()
        .iter()
        .filter(|p| is_chunk_prompt(p))
        .map(|p| prompt_payload(p).to_string())
        .collect();
    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.chars().count() <= 500));
    assert_eq!(chunks.join(" "), normalized(&text));
}

#[tokio::test]
async fn test_failed_chunk_is_replaced_with_placeholder() {
    let counter = AtomicUsize::new(0);
    let generator = FakeGenerator::new(move |prompt| {
        if is_chunk_prompt(prompt) {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n == 1 {
                return Err(GenerationError::EmptyResponse);
            }
            Ok(format!("- summary {n}"))
        } else {
            Ok(REPORT_BODY.to_string())
        }
    });
    let reports = ReportGenerator::new(&generator, 100).unwrap();
    let text = "word ".repeat(60);

    let report = reports.summarize(&text).await.unwrap();

    assert_eq!(report.chunk_count, 3);
    let prompts = generator.prompts();
    let combine = prompts.last().unwrap();
    assert!(is_combine_prompt(combine));
    assert_eq!(
        prompt_payload(combine).rsplit_once("Notes:\n").unwrap().1,
        format!("- summary 0\n{CHUNK_PLACEHOLDER}\n- summary 2")
    );
}

#[tokio::test]
async fn test_all_chunks_failing_still_produces_report() {
    let generator = FakeGenerator::new(|prompt| {
        if is_chunk_prompt(prompt) {
            Err(GenerationError::InvalidResponse("{}".to_string()))
        } else {
            Ok(REPORT_BODY.to_string())
        }
    });
    let reports = ReportGenerator::new(&generator, 50).unwrap();

    let report = reports.summarize(&"token ".repeat(30)).await.unwrap();

    assert_eq!(report.chunk_count, 4);
    let combine = generator.prompts().pop().unwrap();
    assert_eq!(combine.matches(CHUNK_PLACEHOLDER).count(), 4);
}

#[tokio::test]
async fn test_combination_failure_is_typed_error() {
    let generator = FakeGenerator::new(|prompt| {
        if is_chunk_prompt(prompt) {
            Ok("- fine".to_string())
        } else {
            Err(GenerationError::EmptyResponse)
        }
    });
    let reports = ReportGenerator::new(&generator, 50).unwrap();

    let err = reports.summarize(&"token ".repeat(30)).await.unwrap_err();

    assert!(matches!(
        err,
        VidnotesError::GenerationFailed(GenerationError::EmptyResponse)
    ));
}
