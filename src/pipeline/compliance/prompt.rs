use crate::models::{BatConclusion, BrefScope};

/// Permit texts are sent whole; beyond this they are truncated with a note
/// so the request stays within model context limits.
const MAX_PERMIT_CHARS: usize = 60_000;

pub const APPLICABILITY_SYSTEM_PROMPT: &str = "\
You are an expert in EU environmental regulations, specifically the Industrial \
Emissions Directive and its BREF documents for industrial activities. You assess \
whether a BREF's scope covers the activities described in a permit. You answer \
with a single JSON object and nothing else.";

pub const COMPLIANCE_SYSTEM_PROMPT: &str = "\
You are an expert in EU environmental regulations and industrial permits. You \
meticulously compare the conditions in an industrial permit against a specific \
Best Available Technique (BAT) conclusion, citing permit text where possible. \
Permits and BAT conclusions may be written in Dutch; report your findings in \
English. You answer with a single JSON object and nothing else.";

/// Prompt for classifying one BREF's applicability to a permit's activities.
pub fn build_applicability_prompt(activity_description: &str, scope: &BrefScope) -> String {
    format!(
        r#"An industrial permit describes the following activities:
"{activity}"

A BREF document (ID: {bref_id}) has the following scope:
"{scope}"

Based on this information, is this BREF document applicable to the described permit activities?
Classify the applicability as one of: 'Likely Applicable', 'Potentially Applicable', or 'Not Applicable'.
Provide a brief justification, referencing specific parts of the permit activities and the BREF scope where possible.

Return your answer as a JSON object with the keys "bref_id", "applicability", "justification":
{{
  "bref_id": "{bref_id}",
  "applicability": "Likely Applicable",
  "justification": "The permit activities fall directly within the scope of this BREF because..."
}}"#,
        activity = activity_description,
        bref_id = scope.bref_id,
        scope = scope.scope_description,
    )
}

/// Prompt for verifying the permit against one BAT conclusion.
pub fn build_compliance_prompt(permit_text: &str, bat: &BatConclusion) -> String {
    let permit_text = truncate_permit(permit_text);
    format!(
        r#"The BAT conclusion (ID: {bat_id}) is as follows:
{bat_text}
(Source: BREF {bref_id}, page {page})

The full text of the industrial permit is provided below:
--- PERMIT START ---
{permit_text}
--- PERMIT END ---

Analyze the permit text and determine the compliance status with the given BAT conclusion. Report on:
1. Compliance: is the permit fully compliant with this BAT conclusion? Cite permit text.
2. Partial compliance or discrepancies: detail each, citing permit text and the relevant part of the BAT.
3. Non-compliance or missing elements: list any clear non-compliances or elements the permit lacks.
4. Ambiguity: name any parts of the BAT that cannot be verified from the permit, and what information is missing.

Determine an overall compliance status: 'Compliant', 'Partially Compliant', 'Non-Compliant', or 'Ambiguous/Insufficient Information'.

Return your answer as a JSON object with the keys "bat_id", "compliance_status", "detailed_findings":
{{
  "bat_id": "{bat_id}",
  "compliance_status": "Partially Compliant",
  "detailed_findings": "The permit addresses aspect X (permit section 3.1: '...'). However, aspect Y is not mentioned."
}}"#,
        bat_id = bat.bat_id,
        bat_text = bat.full_text,
        bref_id = bat.bref_id,
        page = bat.page,
        permit_text = permit_text,
    )
}

fn truncate_permit(text: &str) -> std::borrow::Cow<'_, str> {
    if text.len() <= MAX_PERMIT_CHARS {
        return text.into();
    }
    let mut end = MAX_PERMIT_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    tracing::warn!(
        original_len = text.len(),
        "permit text truncated for LLM prompt"
    );
    format!("{}\n[... permit text truncated ...]", &text[..end]).into()
}
