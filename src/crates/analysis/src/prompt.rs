//! The instruction prompt both backends send.
//!
//! Keeping one prompt means both sides are asked for the same JSON schema,
//! so [`crate::payload::parse_specification`] works on either's output.

/// Builds the dataset-specification instruction for one analysis run.
///
/// The prompt pins down everything the document model expects: the schema
/// field names, the exact per-batch image count, the batch count range, and
/// the trailing `--sref` marker. It also demands bare JSON, though
/// [`crate::payload::extract_json`] copes when a model fences it anyway.
pub fn build_analysis_prompt(style_code: &str, image_count: usize) -> String {
    format!(
        r#"You are an expert LoRA training dataset generator for Midjourney style reference (SREF) codes.

Analyze the {image_count} provided style reference images for SREF code: {style_code}

Based on these images, generate a complete LoRA training dataset specification. Follow these requirements:

1. **Style Analysis**: Identify visual characteristics, color palette, composition patterns, texture, line quality, and subject affinity

2. **Permutation Batches**: Create 8-10 batches where EACH batch generates EXACTLY 40 images using Midjourney's permutation syntax {{option1, option2, ...}}

3. **Batch Requirements**:
   - Format: {{subjects}} with {{modifiers}} --sref {style_code}
   - Valid calculations: 8x5=40, 5x8=40, 10x4=40, 4x10=40
   - Keep prompts simple (3-8 words before modifiers)
   - Let the SREF handle styling - avoid style descriptors

4. **Output Format**: Return ONLY valid JSON matching this schema (no markdown, no code blocks):

{{
  "sref_code": "{style_code}",
  "style_analysis": {{
    "primary_style": "string",
    "era_influence": "string",
    "color_palette": ["color1", "color2"],
    "key_characteristics": ["trait1", "trait2"],
    "best_subjects": ["subject1", "subject2"],
    "avoid_subjects": ["subject1", "subject2"]
  }},
  "training_recommendations": {{
    "recommended_dataset_size": 100,
    "optimal_subject_distribution": {{
      "category": 25.0
    }}
  }},
  "permutation_batches": [
    {{
      "batch_number": 1,
      "batch_name": "string",
      "category": "string",
      "image_count": 40,
      "prompt": "{{subject1, subject2, ...}} with {{modifier1, modifier2, ...}} --sref {style_code}",
      "priority": "high|medium|low",
      "notes": "optional guidance"
    }}
  ],
  "prompt_guidelines": {{
    "keep_simple": true,
    "avoid_style_keywords": ["keyword1"],
    "recommended_additions": ["element1"]
  }}
}}

CRITICAL:
- Each batch MUST generate exactly 40 images
- Include the SREF code in every prompt
- Return ONLY JSON, no additional text or markdown
- Ensure all batches have valid permutation syntax"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_code_and_count() {
        let prompt = build_analysis_prompt("2847561923", 5);
        assert!(prompt.contains("SREF code: 2847561923"));
        assert!(prompt.contains("the 5 provided style reference images"));
        assert!(prompt.contains("--sref 2847561923"));
    }

    #[test]
    fn prompt_pins_the_schema_fields() {
        let prompt = build_analysis_prompt("1234567890", 3);
        for field in [
            "\"sref_code\"",
            "\"style_analysis\"",
            "\"training_recommendations\"",
            "\"permutation_batches\"",
            "\"prompt_guidelines\"",
            "\"batch_number\"",
            "\"image_count\"",
        ] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn literal_braces_survive_formatting() {
        let prompt = build_analysis_prompt("1234567890", 1);
        assert!(prompt.contains("{option1, option2, ...}"));
        assert!(prompt.contains("{subjects} with {modifiers}"));
    }
}
