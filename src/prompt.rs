use crate::models::GenerationParameters;

/// Builds the natural-language instruction sent for each variation.
///
/// Pure and deterministic: the same parameters and index always produce the same text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        params: &GenerationParameters,
        variation_index: usize,
        variation_count: usize,
    ) -> String {
        let base = self.base_prompt(params);
        if variation_count > 1 {
            format!(
                "{} This is variation {} of {}. Please try a different layout, color scheme, or composition to provide a unique alternative.",
                base,
                variation_index + 1,
                variation_count
            )
        } else {
            base
        }
    }

    /// One prompt per variation, in variation order.
    pub fn build_all(&self, params: &GenerationParameters) -> Vec<String> {
        let count = params.variation_count as usize;
        (0..count).map(|i| self.build(params, i, count)).collect()
    }

    fn base_prompt(&self, params: &GenerationParameters) -> String {
        let ratio = params.aspect_ratio.token();
        let style = params.style.token();
        format!(
            "Create a highly engaging, click-worthy YouTube thumbnail with a {ratio} aspect ratio. \
             The video title is: \"{title}\". \
             The desired style is \"{style}\". \
             This thumbnail should be vibrant, high-contrast, and eye-catching. \
             Incorporate the provided headshots of the YouTuber, making them the focal point with expressive looks. \
             Arrange the headshots creatively if there are multiple. \
             The background should be dynamic and relevant to the video's topic. \
             Add the video title as large, bold, and easily readable text on the image. \
             The overall style should look professional and designed to maximize click-through rates, \
             adhering to the \"{style}\" aesthetic.",
            ratio = ratio,
            title = params.title,
            style = style,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectRatio, ThumbnailStyle};

    fn params() -> GenerationParameters {
        GenerationParameters::new("My Trip")
            .with_aspect_ratio(AspectRatio::Widescreen)
            .with_style(ThumbnailStyle::Vibrant)
    }

    #[test]
    fn test_single_variation_has_no_clause() {
        let prompt = PromptBuilder::new().build(&params(), 0, 1);
        assert!(prompt.contains("16:9"));
        assert!(prompt.contains("\"My Trip\""));
        assert!(prompt.contains("Vibrant"));
        assert!(prompt.contains("bold"));
        assert!(!prompt.contains("variation"));
    }

    #[test]
    fn test_variations_are_pairwise_distinct() {
        let params = params().with_variation_count(3);
        let prompts = PromptBuilder::new().build_all(&params);
        assert_eq!(prompts.len(), 3);
        for (i, prompt) in prompts.iter().enumerate() {
            assert!(prompt.contains(&format!("variation {} of 3", i + 1)));
        }
        assert_ne!(prompts[0], prompts[1]);
        assert_ne!(prompts[0], prompts[2]);
        assert_ne!(prompts[1], prompts[2]);
    }

    #[test]
    fn test_deterministic() {
        let builder = PromptBuilder::new();
        let params = params().with_style(ThumbnailStyle::Cinematic);
        assert_eq!(builder.build(&params, 1, 2), builder.build(&params, 1, 2));
        assert!(builder.build(&params, 1, 2).contains("\"Cinematic\" aesthetic"));
    }
}
