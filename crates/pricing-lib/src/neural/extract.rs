//! Locating the result object inside free-form child output
//!
//! The child prints arbitrary text (training metrics, warnings) and then one
//! JSON object. The candidate spans the first `{` to the last `}` of the whole
//! output, so pretty-printed objects over several lines are fine. Braces in the
//! leading text or a second object widen the span; that is accepted as-is.

use super::error::InvocationError;

/// The JSON candidate and the text printed before it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFragment {
    pub json_candidate: String,
    /// Everything before the first `{`, trimmed
    pub preamble_text: String,
}

/// Split output into preamble and JSON candidate
pub fn extract_fragment(output: &str) -> Result<ExtractedFragment, InvocationError> {
    let span = output
        .find('{')
        .zip(output.rfind('}'))
        .filter(|(start, end)| end > start);

    let Some((start, end)) = span else {
        return Err(InvocationError::FragmentNotFound {
            raw: output.to_string(),
        });
    };

    Ok(ExtractedFragment {
        json_candidate: output[start..=end].to_string(),
        preamble_text: output[..start].trim().to_string(),
    })
}
