use anyhow::{bail, Result};
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::messages;

/// One finished text-overlay prompt, paired with the reference image it
/// points at, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    pub image: Option<String>,
    pub prompt: String,
}

/// Build a tattoo/text-overlay prompt: the simpler assembly path that
/// skips the refiner entirely.
///
/// A non-empty `manual_word` beats the word bank; otherwise one word is
/// drawn at random from the bank. When reference images are given, one
/// is picked at random and URL-encoded onto `image_base_url` as a leading
/// fragment.
pub fn build_text_prompt<R: Rng + ?Sized>(
    rng: &mut R,
    word_bank: &[String],
    manual_word: Option<&str>,
    images: &[String],
    image_base_url: &str,
) -> Result<TextPrompt> {
    let word = match manual_word.map(str::trim).filter(|w| !w.is_empty()) {
        Some(word) => word.to_string(),
        None => match word_bank.choose(rng) {
            Some(word) => word.clone(),
            None => bail!(messages::WORD_BANK_EMPTY),
        },
    };

    let image = images.choose(rng).cloned();
    let url_part = image
        .as_deref()
        .map(|img| format!("{image_base_url}{} ", urlencoding::encode(img)))
        .unwrap_or_default();

    Ok(TextPrompt {
        image,
        prompt: format!(
            "{url_part}Tattoo design of the word '{word}', clean white background, high contrast --iw 2"
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn manual_word_wins_over_bank() {
        let mut rng = StdRng::seed_from_u64(7);
        let bank = vec!["LOVE".to_string()];
        let out = build_text_prompt(&mut rng, &bank, Some(" HOPE "), &[], "").unwrap();
        assert!(out.prompt.contains("'HOPE'"));
        assert!(out.image.is_none());
    }

    #[test]
    fn empty_bank_without_manual_word_is_blocked() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(build_text_prompt(&mut rng, &[], None, &[], "").is_err());
        assert!(build_text_prompt(&mut rng, &[], Some("   "), &[], "").is_err());
    }

    #[test]
    fn image_is_url_encoded_into_prompt() {
        let mut rng = StdRng::seed_from_u64(7);
        let images = vec!["my logo.png".to_string()];
        let out = build_text_prompt(
            &mut rng,
            &[],
            Some("X"),
            &images,
            "https://raw.example.com/images/",
        )
        .unwrap();
        assert_eq!(out.image.as_deref(), Some("my logo.png"));
        assert!(out
            .prompt
            .starts_with("https://raw.example.com/images/my%20logo.png "));
    }
}
