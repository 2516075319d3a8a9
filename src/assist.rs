//! Seam for an AI collaborator that describes drawings and paints backgrounds.
//!
//! No network client ships with the crate. Hosts implement [`Assistant`]
//! against their provider and feed generated images back through
//! [`InputState::set_background_image`].

use crate::draw::SurfaceError;
use crate::input::InputState;
use async_trait::async_trait;
use thiserror::Error;

/// Prompt used when the user asks for an analysis without typing one.
pub const DEFAULT_ANALYSIS_PROMPT: &str = "Describe what is drawn in this image in detail.";

/// Answer reported when the collaborator returns nothing.
pub const EMPTY_ANALYSIS: &str = "No analysis available.";

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("a prompt is required to generate an image")]
    EmptyPrompt,

    #[error("no image data found in response")]
    NoImage,

    #[error("failed to export the drawing: {0}")]
    Export(#[from] SurfaceError),

    #[error("assistant request failed: {0}")]
    Request(String),
}

/// An image-understanding and image-generation collaborator.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Answers `prompt` about a PNG image.
    async fn analyze(&self, image_png: &[u8], prompt: &str) -> Result<String, AssistError>;

    /// Generates an image (any format the `image` crate decodes) from `prompt`.
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, AssistError>;
}

/// Asks the assistant about a drawing, substituting the default prompt and
/// the empty-answer text.
pub async fn analyze_drawing(
    assistant: &dyn Assistant,
    image_png: &[u8],
    prompt: &str,
) -> Result<String, AssistError> {
    let prompt = match prompt.trim() {
        "" => DEFAULT_ANALYSIS_PROMPT,
        trimmed => trimmed,
    };
    log::debug!("Requesting analysis ({} bytes): {}", image_png.len(), prompt);
    let answer = assistant.analyze(image_png, prompt).await?;
    if answer.trim().is_empty() {
        return Ok(EMPTY_ANALYSIS.to_string());
    }
    Ok(answer)
}

/// Generates a background image. Blank prompts are rejected without a request.
pub async fn generate_background(
    assistant: &dyn Assistant,
    prompt: &str,
) -> Result<Vec<u8>, AssistError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AssistError::EmptyPrompt);
    }
    let image = assistant.generate(prompt).await?;
    if image.is_empty() {
        return Err(AssistError::NoImage);
    }
    log::info!("Generated background image ({} bytes)", image.len());
    Ok(image)
}

/// Exports the committed drawing and asks the assistant about it.
pub async fn analyze_current_frame(
    state: &mut InputState,
    assistant: &dyn Assistant,
    prompt: &str,
) -> Result<String, AssistError> {
    let png = state.export_current_frame()?;
    analyze_drawing(assistant, &png, prompt).await
}

/// Generates a background and applies it to the engine.
pub async fn apply_generated_background(
    state: &mut InputState,
    assistant: &dyn Assistant,
    prompt: &str,
) -> Result<(), AssistError> {
    let image = generate_background(assistant, prompt).await?;
    state.set_background_image(Some(&image))?;
    Ok(())
}
