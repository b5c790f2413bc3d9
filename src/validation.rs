//! Argument checks that must pass before any work starts.

use crate::error::{Result, SubtextError};
use crate::transcription::ModelSelector;

/// Reject an English-only model paired with a non-English language.
///
/// No language means auto-detect, which every model accepts.
pub fn check_model_language(model: ModelSelector, language: Option<&str>) -> Result<()> {
    let Some(language) = language else {
        return Ok(());
    };

    if model.is_english_only() && !is_english(language) {
        return Err(SubtextError::ModelLanguageMismatch {
            model: model.to_string(),
            language: language.to_string(),
        });
    }

    Ok(())
}

fn is_english(language: &str) -> bool {
    matches!(language.to_lowercase().as_str(), "en" | "english")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multilingual_models_accept_anything() {
        for model in ModelSelector::ALL.iter().filter(|m| !m.is_english_only()) {
            for language in [None, Some("en"), Some("es"), Some("German")] {
                assert!(check_model_language(*model, language).is_ok(), "{model} {language:?}");
            }
        }
    }

    #[test]
    fn test_english_models_accept_english_or_nothing() {
        for model in ModelSelector::ALL.iter().filter(|m| m.is_english_only()) {
            for language in [None, Some("en"), Some("EN"), Some("English"), Some("english")] {
                assert!(check_model_language(*model, language).is_ok(), "{model} {language:?}");
            }
        }
    }

    #[test]
    fn test_english_models_reject_other_languages() {
        for model in ModelSelector::ALL.iter().filter(|m| m.is_english_only()) {
            for language in ["es", "fr", "eng", "en-US", ""] {
                let err = check_model_language(*model, Some(language)).unwrap_err();
                assert!(matches!(err, SubtextError::ModelLanguageMismatch { .. }));
            }
        }
    }

    #[test]
    fn test_error_message_names_model_and_language() {
        let err = check_model_language(ModelSelector::BaseEn, Some("de")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("base.en"));
        assert!(msg.contains("'de'"));
    }
}
