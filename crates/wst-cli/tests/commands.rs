use std::io::Cursor;
use std::path::Path;

use docx_rs::{Docx, Paragraph, Run};

use wst_cli::commands;
use wst_cli::config::{TemplateLocation, WstConfig};
use wst_cli::session::Session;
use wst_core::models::report::ReportKind;

fn session_in(dir: &Path) -> Session {
    let mut config = WstConfig::default();
    config.patient_count = 2;
    config.templates.location = TemplateLocation::Directory {
        path: dir.join("templates"),
    };
    config.output_dir = dir.join("out");
    Session::new(config, dir.join("roster.json")).unwrap()
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

fn write_template(dir: &Path, name: &str, body: &str) {
    let docx = Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(body)));
    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).unwrap();
    std::fs::create_dir_all(dir.join("templates")).unwrap();
    std::fs::write(dir.join("templates").join(name), buf.into_inner()).unwrap();
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());

    let roster = session.init_roster(false).unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster.patient(0).unwrap().ratings().len(), 30);

    assert!(session.init_roster(false).is_err());
    assert!(session.init_roster(true).is_ok());
}

#[test]
fn edits_use_one_based_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    session.init_roster(false).unwrap();

    commands::set_name(&session, 1, "Maria Silva").unwrap();
    commands::set_identifier(&session, 2, "ab-12").unwrap();
    commands::rate(&session, 1, 30, "NP").unwrap();

    let roster = session.load_roster().unwrap();
    assert_eq!(roster.patient(0).unwrap().name(), "MARIA SILVA");
    assert_eq!(roster.patient(1).unwrap().identifier(), "AB-12");
    assert_eq!(roster.patient(0).unwrap().ratings()[29], "NP");
}

#[test]
fn dash_clears_a_rating() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    session.init_roster(false).unwrap();

    commands::rate(&session, 1, 1, "3").unwrap();
    commands::rate(&session, 1, 1, "-").unwrap();

    let roster = session.load_roster().unwrap();
    assert_eq!(roster.patient(0).unwrap().ratings()[0], "");
}

#[test]
fn bad_edits_leave_the_roster_alone() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    session.init_roster(false).unwrap();
    let before = std::fs::read_to_string(&session.roster_path).unwrap();

    assert!(commands::rate(&session, 0, 1, "3").is_err());
    assert!(commands::rate(&session, 3, 1, "3").is_err());
    assert!(commands::rate(&session, 1, 31, "3").is_err());
    assert!(commands::rate(&session, 1, 1, "4").is_err());

    assert_eq!(std::fs::read_to_string(&session.roster_path).unwrap(), before);
}

#[test]
fn roster_saves_leave_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    session.init_roster(false).unwrap();
    commands::set_name(&session, 1, "ana").unwrap();
    commands::rate(&session, 2, 5, "1").unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["roster.json"]);
    assert_eq!(session.load_roster().unwrap().patient(1).unwrap().ratings()[4], "1");
}

#[test]
fn to_index_rejects_zero() {
    assert_eq!(commands::to_index(1, "patient").unwrap(), 0);
    let err = commands::to_index(0, "skill").unwrap_err();
    assert!(err.to_string().contains("skill numbers start at 1"));
}

#[test]
fn scores_table_shows_each_subscale() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    session.init_roster(false).unwrap();
    commands::set_identifier(&session, 1, "mrn1").unwrap();
    for skill in 1..=11 {
        commands::rate(&session, 1, skill, "3").unwrap();
    }
    for skill in 1..=30 {
        commands::rate(&session, 2, skill, "NP").unwrap();
    }

    let roster = session.load_roster().unwrap();
    let mut buf = Vec::new();
    commands::write_scores(&mut buf, session.instrument(), &roster, true).unwrap();
    let text = output(buf);

    assert!(text.contains("MRN1"));
    assert!(text.contains("P2"));
    assert!(text.contains(" 1. "));

    let home = text.lines().find(|l| l.starts_with("Home")).unwrap();
    assert!(home.contains("100.00%"));
    assert!(home.contains("N/D"));
    let community = text.lines().find(|l| l.starts_with("Community")).unwrap();
    assert!(community.contains("52.38%"));
}

#[test]
fn validation_counts_unknown_codes() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    session.init_roster(false).unwrap();

    let mut buf = Vec::new();
    let roster = session.load_roster().unwrap();
    assert_eq!(
        commands::write_validation(&mut buf, session.instrument(), &roster).unwrap(),
        0
    );
    assert!(output(buf).contains("all ratings are valid"));

    // Hand-edited roster files can carry codes the CLI would refuse.
    let mut json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&session.roster_path).unwrap()).unwrap();
    json["patients"][1]["ratings"][4] = serde_json::json!("X");
    std::fs::write(&session.roster_path, json.to_string()).unwrap();

    let roster = session.load_roster().unwrap();
    let mut buf = Vec::new();
    assert_eq!(
        commands::write_validation(&mut buf, session.instrument(), &roster).unwrap(),
        1
    );
    assert!(output(buf).contains("patient 2, skill 5"));
}

#[test]
fn skills_listing_includes_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());

    let mut buf = Vec::new();
    commands::write_skills(&mut buf, session.instrument()).unwrap();
    let text = output(buf);
    assert!(text.starts_with("WST 5.4.2"));
    assert!(text.contains("Home: skills 1–11"));
    assert!(text.contains("Advanced: skills 1–30"));
    assert!(text.contains("ratings: 0, 1, 2, 3, NP, TE"));
}

#[tokio::test]
async fn summary_prints_or_exports() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    session.init_roster(false).unwrap();
    commands::set_name(&session, 1, "ana").unwrap();

    let mut buf = Vec::new();
    commands::summary(&mut buf, &session, None).await.unwrap();
    assert!(output(buf).contains("ANA"));

    let export_dir = dir.path().join("exports");
    std::fs::create_dir_all(&export_dir).unwrap();
    let mut buf = Vec::new();
    commands::summary(&mut buf, &session, Some(&export_dir))
        .await
        .unwrap();
    assert!(export_dir.join("Scoresheet.docx").exists());
    assert!(output(buf).starts_with("saved "));
}

#[tokio::test]
async fn report_writes_filled_docx() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    write_template(dir.path(), "modelo_alta.docx", "{patient}: {home_score}");
    session.init_roster(false).unwrap();
    commands::set_name(&session, 1, "ana").unwrap();
    commands::set_identifier(&session, 1, "r7").unwrap();

    let mut buf = Vec::new();
    commands::report(&mut buf, &session, 1, ReportKind::Discharge)
        .await
        .unwrap();

    let path = dir.path().join("out").join("Relatorio_R7_discharge.docx");
    let text = wst_export::fill::document_text(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(text.trim(), "R7: 0.00");
    assert!(output(buf).contains("Relatorio_R7_discharge.docx"));
}

#[tokio::test]
async fn report_failure_leads_with_user_message() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    session.init_roster(false).unwrap();

    let mut buf = Vec::new();
    let err = commands::report(&mut buf, &session, 1, ReportKind::Admission)
        .await
        .unwrap_err();
    assert!(!err.to_string().is_empty());
    assert!(buf.is_empty());
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn check_reports_missing_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let session = session_in(dir.path());
    write_template(dir.path(), "modelo_admissao.docx", "{patient} {home_score} {bogus}");

    let mut buf = Vec::new();
    let complete = commands::check(&mut buf, &session, ReportKind::Admission)
        .await
        .unwrap();
    assert!(!complete);
    let text = output(buf);
    assert!(text.contains("missing community_score"));
    assert!(text.contains("unknown bogus"));
}
