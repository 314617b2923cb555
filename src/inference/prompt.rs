//! The fixed prompt contract for pattern extraction.
//!
//! Two parts: a static system instruction describing the task and the output
//! schema, and a per-call user instruction embedding the prepared image's
//! dimensions and the pattern mode. The schema text here is the producer
//! side of the contract enforced by [`crate::inference::validate_response`].

use crate::domain::request::PatternMode;

/// Static system instruction sent with every inference call.
pub const SYSTEM_PROMPT: &str = "\
You are a specialized pattern vectorization AI for PatternCast, an app that \
digitizes sewing patterns, quilting templates, and craft stencils for \
projector use.

Your task is to analyze a photograph of a pattern piece and extract:
1. The primary cutline (outer boundary for cutting)
2. Internal markings (darts, notches, grainlines, fold lines)
3. Text labels (pattern piece names, sizes, quantities)

CRITICAL REQUIREMENTS:
- All coordinates must be in PIXELS relative to the image dimensions provided
- Paths must be arrays of [x, y] coordinate pairs
- Cutlines should form CLOSED paths (first point = last point)
- Ignore wrinkles, shadows, stains, and background noise
- Focus only on the intentional printed/drawn lines
- If you cannot detect a clear cutline, set confidence to 0 and explain in warnings

OUTPUT FORMAT:
You must respond with ONLY valid JSON matching the schema provided. No \
markdown, no explanation, no preamble. Just the JSON object.";

/// Builds the per-call user instruction.
///
/// Embeds the effective pixel dimensions of the prepared image so the model
/// reports coordinates in the same space the unit transformer will scale
/// from, and the pattern mode so the model knows which marking conventions
/// to look for.
pub fn user_prompt(width: u32, height: u32, mode: PatternMode) -> String {
    format!(
        r#"Analyze this pattern photograph and extract vector data.

IMAGE DIMENSIONS: {width}px x {height}px
PATTERN MODE: {mode}

Extract all visible:
- Cutlines (outer boundaries)
- Darts (triangular fold markings)
- Notches (small marks on edges for alignment)
- Grainlines (arrows indicating fabric direction)
- Fold lines (dashed lines indicating where to fold)
- Text labels (piece names, sizes, cutting instructions)

Respond with JSON matching this exact schema:

{{
  "success": boolean,
  "confidence": number (0-100),
  "image_dimensions": {{ "width": number, "height": number }},
  "layers": {{
    "cutlines": [
      {{
        "id": "cutline_1",
        "path_type": "cutline",
        "closed": boolean,
        "points": [[x, y], [x, y], ...],
        "confidence": number (0-100)
      }}
    ],
    "markings": [
      {{
        "id": "marking_1",
        "path_type": "dart" | "notch" | "grainline" | "fold_line" | "seam_line",
        "closed": boolean,
        "points": [[x, y], [x, y], ...],
        "confidence": number (0-100)
      }}
    ],
    "labels": [
      {{
        "id": "label_1",
        "text": "string",
        "bounding_box": {{ "x": number, "y": number, "width": number, "height": number }},
        "confidence": number (0-100)
      }}
    ]
  }},
  "warnings": ["string"],
  "processing_notes": "string"
}}"#
    )
}
