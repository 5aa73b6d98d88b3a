//! Prompt sent to the model

use crate::locator::ScreenshotFile;

pub const FILENAME_PROMPT: &str = "\
You name screenshot files. Propose filenames that:
- Describe the main subject or purpose of the screenshot.
- Use only lowercase letters, digits and hyphens (\"-\") between words.
- Are short: 3-5 words, at most 30 characters.
- Have no file extension and no special characters.
Give at least two and at most four options.
Reply with JSON only, no explanations, in exactly this shape:
{\"filenames\": [\"login-page\", \"login-new-user\"]}";

/// Full prompt text for a screenshot.
///
/// Without the image attached the model only sees file metadata.
pub fn build_prompt(shot: &ScreenshotFile, with_image: bool) -> String {
    if with_image {
        return FILENAME_PROMPT.to_string();
    }

    let mut context = format!(
        "\n\nThe image is not attached. Base the names on this file: {} (taken {}",
        shot.file_name(),
        shot.modified_local()
    );
    if let Some((width, height)) = shot.dimensions {
        context.push_str(&format!(", {}x{} pixels", width, height));
    }
    context.push_str(").");
    format!("{}{}", FILENAME_PROMPT, context)
}
