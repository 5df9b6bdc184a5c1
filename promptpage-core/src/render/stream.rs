//! Simulated streaming of an already complete result.
//!
//! The text is split on whitespace and emitted in fixed size word groups with a delay between
//! them, bracketed by the page header and footer. Nothing is generated incrementally.
use std::pin::Pin;
use std::time::Duration;

use anyhow::Result;
use futures_util::stream::{self, Stream, StreamExt as _};

use crate::{InferenceResult, RenderedOutput, normalize::extract_primary_text};

/// A finite stream of response fragments, consumed once
pub type ResponseStream = Pin<Box<dyn Stream<Item = RenderedOutput> + Send>>;

/// Pacing of a simulated stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Number of words per fragment
    pub chunk_words: usize,
    /// Delay after each text fragment
    pub chunk_delay: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_words: 5,
            chunk_delay: Duration::from_millis(100),
        }
    }
}

impl StreamOptions {
    /// Total time the stream spends waiting for a text of `word_count` words
    pub fn pacing_for(&self, word_count: usize) -> Duration {
        let chunks = word_count.div_ceil(self.chunk_words.max(1));
        self.chunk_delay
            .saturating_mul(u32::try_from(chunks).unwrap_or(u32::MAX))
    }
}

/// Renders a result as a paced sequence of html fragments
///
/// Yields the page header, then one fragment per `chunk_words` words (joined by spaces, with a
/// trailing space), then the page footer. Every text fragment is followed by `chunk_delay`.
///
/// # Errors
///
/// Errors if the header or footer fail to render
pub fn render_stream(result: &InferenceResult, options: StreamOptions) -> Result<ResponseStream> {
    let text = extract_primary_text(result.raw());
    let words = text.split_whitespace().collect::<Vec<_>>();

    tracing::debug!(
        words = words.len(),
        pacing_ms = options.pacing_for(words.len()).as_millis(),
        "Streaming response"
    );

    let mut fragments = Vec::with_capacity(words.len() / options.chunk_words.max(1) + 3);
    fragments.push((super::render_stream_header()?, Duration::ZERO));

    let mut delay = Duration::ZERO;
    for chunk in words.chunks(options.chunk_words.max(1)) {
        fragments.push((format!("{} ", chunk.join(" ")), delay));
        delay = options.chunk_delay;
    }

    fragments.push((super::render_stream_footer()?, delay));

    Ok(stream::iter(fragments)
        .then(|(body, delay)| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            RenderedOutput::html(200, body)
        })
        .boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt as _;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::time::Instant;

    const TWELVE_WORDS: &str = "one two three four five six seven eight nine ten eleven twelve";

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_twelve_words_yield_five_fragments() {
        let result = InferenceResult::new(json!({ "outputText": TWELVE_WORDS }));

        let fragments = render_stream(&result, StreamOptions::default())
            .unwrap()
            .collect::<Vec<_>>()
            .await;

        assert_eq!(fragments.len(), 5);
        assert!(fragments[0].body.starts_with("<!DOCTYPE html>"));
        assert_eq!(fragments[1].body, "one two three four five ");
        assert_eq!(fragments[2].body, "six seven eight nine ten ");
        assert_eq!(fragments[3].body, "eleven twelve ");
        assert!(fragments[4].body.contains("</html>"));

        let word_counts = fragments[1..4]
            .iter()
            .map(|f| f.body.split_whitespace().count())
            .collect::<Vec<_>>();
        assert_eq!(word_counts, vec![5, 5, 2]);

        assert!(
            fragments
                .iter()
                .all(|f| f.status_code == 200 && f.content_type() == "text/html")
        );
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_delay_follows_every_text_fragment() {
        let result = InferenceResult::new(json!({ "generation": TWELVE_WORDS }));
        let options = StreamOptions::default();

        let start = Instant::now();
        let fragments = render_stream(&result, options)
            .unwrap()
            .collect::<Vec<_>>()
            .await;

        assert_eq!(fragments.len(), 5);
        assert_eq!(start.elapsed(), Duration::from_millis(300));
        assert_eq!(options.pacing_for(12), Duration::from_millis(300));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_stream_is_lazy() {
        let result = InferenceResult::new(json!({ "outputText": TWELVE_WORDS }));
        let start = Instant::now();

        let mut stream = render_stream(&result, StreamOptions::default()).unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        let header = stream.next().await.unwrap();
        let first = stream.next().await.unwrap();
        assert!(header.body.contains("<h1>AI Generated Response</h1>"));
        assert_eq!(first.body, "one two three four five ");
        assert_eq!(start.elapsed(), Duration::ZERO);

        stream.next().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(100));
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_empty_text_yields_header_and_footer() {
        let result = InferenceResult::new(json!({ "outputText": "   " }));

        let fragments = render_stream(&result, StreamOptions::default())
            .unwrap()
            .collect::<Vec<_>>()
            .await;

        assert_eq!(fragments.len(), 2);
    }

    #[test_log::test(tokio::test(start_paused = true))]
    async fn test_custom_chunk_size() {
        let result = InferenceResult::new(json!({ "completion": "a b c d e" }));
        let options = StreamOptions {
            chunk_words: 2,
            chunk_delay: Duration::from_millis(10),
        };

        let bodies = render_stream(&result, options)
            .unwrap()
            .map(|f| f.body)
            .collect::<Vec<_>>()
            .await;

        assert_eq!(bodies[1..4], ["a b ", "c d ", "e "]);
    }
}
