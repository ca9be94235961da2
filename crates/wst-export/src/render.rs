use serde::Serialize;
use tera::{Context, Tera};

use wst_core::models::roster::PatientRoster;
use wst_instruments::Instrument;
use wst_instruments::scoring::Score;

use crate::error::ExportError;

const SCORESHEET_TEMPLATE: &str = "scoresheet.md";

const SCORESHEET: &str = r#"# {{ instrument }} scoresheet
{% for patient in patients %}
## Patient {{ patient.position }}{% if patient.name %}: {{ patient.name }}{% endif %}
- **Record:** {% if patient.identifier %}{{ patient.identifier }}{% else %}(not set){% endif %}
{% for score in patient.scores -%}
- **{{ score.name }}:** {{ score.value }}
{% endfor -%}
{% if patient.invalid > 0 %}- **Unrecognised ratings:** {{ patient.invalid }}
{% endif -%}
{% endfor %}"#;

#[derive(Serialize)]
struct ScoresheetContext<'a> {
    instrument: &'a str,
    patients: Vec<PatientContext<'a>>,
}

#[derive(Serialize)]
struct PatientContext<'a> {
    position: usize,
    name: &'a str,
    identifier: &'a str,
    scores: Vec<ScoreContext<'a>>,
    invalid: usize,
}

#[derive(Serialize)]
struct ScoreContext<'a> {
    name: &'a str,
    value: String,
}

/// `66.67%`, or `N/D` on its own.
pub fn format_score(score: Score) -> String {
    match score {
        Score::Percent(_) => format!("{score}%"),
        Score::NotDetermined => score.to_string(),
    }
}

/// Render the roster's sub-scale scores as line-oriented text, one
/// section per patient. The output feeds [`crate::docx::generate_docx`]
/// or is printed as-is.
pub fn render_scoresheet(
    instrument: &dyn Instrument,
    roster: &PatientRoster,
) -> Result<String, ExportError> {
    let patients = roster
        .patients()
        .iter()
        .enumerate()
        .map(|(index, patient)| PatientContext {
            position: index + 1,
            name: patient.name(),
            identifier: patient.identifier(),
            scores: instrument
                .score_patient(patient)
                .into_iter()
                .map(|(subscale, score)| ScoreContext {
                    name: &subscale.name,
                    value: format_score(score),
                })
                .collect(),
            invalid: instrument.validate_ratings(patient).len(),
        })
        .collect();

    let context = ScoresheetContext {
        instrument: instrument.name(),
        patients,
    };

    let mut tera = Tera::default();
    tera.add_raw_template(SCORESHEET_TEMPLATE, SCORESHEET)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let context = Context::from_serialize(&context)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    Ok(tera.render(SCORESHEET_TEMPLATE, &context)?)
}
