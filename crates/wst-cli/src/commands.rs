//! Command bodies. Output goes to the writer passed in so tests can read it.

use std::io::Write;
use std::path::Path;

use wst_core::file_names;
use wst_core::models::rating::UNRATED;
use wst_core::models::report::ReportKind;
use wst_core::models::roster::PatientRoster;
use wst_export::docx::generate_docx;
use wst_export::fill::check_template;
use wst_export::render::{format_score, render_scoresheet};
use wst_export::output::write_atomic;
use wst_instruments::Instrument;
use wst_instruments::payload::payload_keys;
use wst_instruments::scoring::compute_score;

use crate::session::Session;

const LABEL_WIDTH: usize = 44;
const COLUMN_WIDTH: usize = 12;

/// Convert a 1-based number typed by the user into an index.
pub fn to_index(number: usize, what: &str) -> eyre::Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| eyre::eyre!("{what} numbers start at 1"))
}

/// `-` stands for "no rating" on the command line.
pub fn parse_code(code: &str) -> &str {
    if code == "-" { UNRATED } else { code }
}

pub fn set_name(session: &Session, patient: usize, name: &str) -> eyre::Result<()> {
    let index = to_index(patient, "patient")?;
    session.edit(|roster| roster.set_name(index, name))?;
    Ok(())
}

pub fn set_identifier(session: &Session, patient: usize, identifier: &str) -> eyre::Result<()> {
    let index = to_index(patient, "patient")?;
    session.edit(|roster| roster.set_identifier(index, identifier))?;
    Ok(())
}

pub fn rate(session: &Session, patient: usize, skill: usize, code: &str) -> eyre::Result<()> {
    let index = to_index(patient, "patient")?;
    let skill = to_index(skill, "skill")?;
    session.edit(|roster| roster.set_rating(index, skill, parse_code(code)))?;
    Ok(())
}

fn header(out: &mut impl Write, roster: &PatientRoster) -> std::io::Result<()> {
    write!(out, "{:<LABEL_WIDTH$}", "")?;
    for (index, patient) in roster.patients().iter().enumerate() {
        let label = if patient.identifier().is_empty() {
            format!("P{}", index + 1)
        } else {
            patient.identifier().to_string()
        };
        write!(out, "{label:>COLUMN_WIDTH$}")?;
    }
    writeln!(out)
}

/// The scoresheet as a table: one column per patient, optional per-skill
/// rows, then one row per sub-scale.
pub fn write_scores(
    out: &mut impl Write,
    instrument: &dyn Instrument,
    roster: &PatientRoster,
    with_skills: bool,
) -> std::io::Result<()> {
    header(out, roster)?;

    if with_skills {
        for (skill, name) in instrument.skills().iter().enumerate() {
            let label = format!("{:>2}. {name}", skill + 1);
            write!(out, "{label:<LABEL_WIDTH$}")?;
            for patient in roster.patients() {
                let code = patient.ratings().get(skill).map(String::as_str).unwrap_or(UNRATED);
                let code = if code.is_empty() { "-" } else { code };
                write!(out, "{code:>COLUMN_WIDTH$}")?;
            }
            writeln!(out)?;
        }
    }

    for subscale in instrument.subscales() {
        write!(out, "{:<LABEL_WIDTH$}", subscale.name)?;
        for patient in roster.patients() {
            let score = compute_score(patient.ratings(), subscale.start, subscale.end);
            write!(out, "{:>COLUMN_WIDTH$}", format_score(score))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// List ratings the instrument does not offer. Returns how many were found.
pub fn write_validation(
    out: &mut impl Write,
    instrument: &dyn Instrument,
    roster: &PatientRoster,
) -> std::io::Result<usize> {
    let mut found = 0;
    for (index, patient) in roster.patients().iter().enumerate() {
        for error in instrument.validate_ratings(patient) {
            writeln!(out, "patient {}, skill {}: {}", index + 1, error.skill_index + 1, error)?;
            found += 1;
        }
    }
    if found == 0 {
        writeln!(out, "all ratings are valid")?;
    }
    Ok(found)
}

pub fn write_skills(out: &mut impl Write, instrument: &dyn Instrument) -> std::io::Result<()> {
    writeln!(out, "{}", instrument.name())?;
    for (index, skill) in instrument.skills().iter().enumerate() {
        writeln!(out, "{:>2}. {skill}", index + 1)?;
    }
    writeln!(out)?;
    for subscale in instrument.subscales() {
        writeln!(
            out,
            "{}: skills {}–{}",
            subscale.name,
            subscale.start + 1,
            subscale.end.min(instrument.skills().len())
        )?;
    }
    writeln!(out, "ratings: {}", instrument.rating_codes().join(", "))
}

/// Generate one report. A failure is reported with its user-facing message
/// first and the underlying cause after it.
pub async fn report(
    out: &mut impl Write,
    session: &Session,
    patient: usize,
    kind: ReportKind,
) -> eyre::Result<()> {
    let index = to_index(patient, "patient")?;
    let roster = session.load_roster()?;
    let record = roster.patient(index)?;

    match session.report_generator().generate(record, kind).await {
        Ok(artifact) => {
            writeln!(out, "saved {}", artifact.path.display())?;
            Ok(())
        }
        Err(err) => {
            let message = err.user_message();
            Err(eyre::Report::new(err).wrap_err(message))
        }
    }
}

/// Print the scoresheet, or export it as docx when `output` is given.
pub async fn summary(
    out: &mut impl Write,
    session: &Session,
    output: Option<&Path>,
) -> eyre::Result<()> {
    let roster = session.load_roster()?;
    let rendered = render_scoresheet(session.instrument(), &roster)?;

    match output {
        None => write!(out, "{rendered}")?,
        Some(path) => {
            let path = if path.is_dir() {
                path.join(file_names::scoresheet_docx())
            } else {
                path.to_path_buf()
            };
            let bytes = generate_docx(&rendered, &session.config.styles)?;
            write_atomic(path.clone(), bytes).await?;
            tracing::info!(path = %path.display(), "scoresheet exported");
            writeln!(out, "saved {}", path.display())?;
        }
    }
    Ok(())
}

/// Compare a template's tags with the payload keys. Returns whether they
/// match exactly.
pub async fn check(out: &mut impl Write, session: &Session, kind: ReportKind) -> eyre::Result<bool> {
    let source = session.template_source();
    let location = source.locate(kind);
    let template = source
        .fetch(kind)
        .await
        .map_err(|e| eyre::Report::new(e).wrap_err(format!("could not load {location}")))?;

    let result = check_template(&template, &payload_keys(session.skill_count()))?;
    if result.is_complete() {
        writeln!(out, "{location}: all placeholders present")?;
    } else {
        if !result.missing.is_empty() {
            writeln!(out, "{location}: missing {}", result.missing.join(", "))?;
        }
        if !result.unknown.is_empty() {
            writeln!(out, "{location}: unknown {}", result.unknown.join(", "))?;
        }
    }
    Ok(result.is_complete())
}
