//! Generating several prompts into one fresh buffer.
use crate::buffer::ImageBuffer;
use crate::error::{AppError, AppResult};
use crate::generation::{ImageClient, Prompt};

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub buffer: ImageBuffer,
    /// Inputs that produced no image, with the reason, in input order.
    pub failures: Vec<(String, AppError)>,
}

impl BatchOutcome {
    /// The buffer, or `NothingGenerated` when every input failed.
    pub fn into_nonempty(self) -> AppResult<ImageBuffer> {
        if self.buffer.is_empty() {
            return Err(AppError::NothingGenerated);
        }
        Ok(self.buffer)
    }
}

/// Generate one image per input, in order. Blank inputs never reach the
/// provider; failed inputs are recorded and skipped.
pub async fn generate_batch<I, S>(client: &ImageClient, inputs: I) -> BatchOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = BatchOutcome::default();
    for input in inputs {
        let input = input.as_ref();
        let result = match Prompt::parse(input) {
            Ok(prompt) => client.generate(&prompt).await.map_err(AppError::from),
            Err(e) => Err(AppError::from(e)),
        };
        match result {
            Ok(image) => {
                outcome.buffer.append(image);
                tracing::info!(
                    file = %ImageBuffer::file_name(outcome.buffer.len() - 1),
                    "generated \"{}\"",
                    input.trim()
                );
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), "skipped \"{}\": {}", input, e);
                outcome.failures.push((input.to_string(), e));
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn blank_inputs_never_reach_the_provider() {
        // Nothing listens on port 9: any request would be a network failure.
        let config = Config { openai_api_url: "http://127.0.0.1:9".to_string(), ..Config::default() };
        let client = ImageClient::new(&config).unwrap();

        let outcome = generate_batch(&client, ["", "   "]).await;
        assert!(outcome.buffer.is_empty());
        let kinds: Vec<&str> = outcome.failures.iter().map(|(_, e)| e.kind()).collect();
        assert_eq!(kinds, ["validation", "validation"]);

        let err = outcome.into_nonempty().unwrap_err();
        assert_eq!(err.kind(), "nothing_generated");
        assert_eq!(err.to_string(), "No images generated.");
    }

    #[test]
    fn nonempty_outcome_yields_its_buffer() {
        let outcome = BatchOutcome { buffer: ImageBuffer::with_placeholders(), failures: Vec::new() };
        assert_eq!(outcome.into_nonempty().unwrap().len(), 2);
    }
}
