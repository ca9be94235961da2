//! The roster file: the scoresheet as it stands between commands.

use std::path::PathBuf;

use wst_core::error::CoreError;
use wst_core::models::roster::PatientRoster;
use wst_export::output::write_atomic_sync;
use wst_export::report::ReportGenerator;
use wst_export::template::{DirectoryTemplateSource, HttpTemplateSource, TemplateSource};
use wst_instruments::Instrument;
use wst_instruments::instruments::wst::Wst;

use crate::config::{TemplateLocation, WstConfig};

/// Everything a command needs: settings, the instrument they describe, and
/// where the roster lives.
pub struct Session {
    pub config: WstConfig,
    pub roster_path: PathBuf,
    instrument: Wst,
}

impl Session {
    pub fn new(config: WstConfig, roster_path: impl Into<PathBuf>) -> eyre::Result<Self> {
        let instrument = match &config.skills {
            Some(skills) => Wst::with_skills(skills.clone())?,
            None => Wst::new(),
        };
        Ok(Self {
            config,
            roster_path: roster_path.into(),
            instrument,
        })
    }

    pub fn instrument(&self) -> &Wst {
        &self.instrument
    }

    pub fn skill_count(&self) -> usize {
        self.instrument.skills().len()
    }

    /// Write a blank roster. Refuses to overwrite unless `force`.
    pub fn init_roster(&self, force: bool) -> eyre::Result<PatientRoster> {
        if self.roster_path.exists() && !force {
            return Err(eyre::eyre!(
                "{} already exists (pass --force to start over)",
                self.roster_path.display()
            ));
        }
        let roster = PatientRoster::new(self.config.patient_count, self.skill_count());
        self.save_roster(&roster)?;
        Ok(roster)
    }

    pub fn load_roster(&self) -> eyre::Result<PatientRoster> {
        let contents = std::fs::read_to_string(&self.roster_path).map_err(|e| {
            eyre::eyre!(
                "failed to read roster at {}: {e} (run `wst init` first)",
                self.roster_path.display()
            )
        })?;
        Ok(PatientRoster::from_json(&contents, self.skill_count())?)
    }

    pub fn save_roster(&self, roster: &PatientRoster) -> eyre::Result<()> {
        let json = roster.to_json()?;
        write_atomic_sync(&self.roster_path, json.as_bytes())?;
        tracing::debug!(path = %self.roster_path.display(), "roster saved");
        Ok(())
    }

    /// Load, apply one change, save. Nothing is written if the change fails.
    pub fn edit(
        &self,
        change: impl FnOnce(&mut PatientRoster) -> Result<(), CoreError>,
    ) -> eyre::Result<PatientRoster> {
        let mut roster = self.load_roster()?;
        change(&mut roster)?;
        self.save_roster(&roster)?;
        Ok(roster)
    }

    pub fn template_source(&self) -> Box<dyn TemplateSource> {
        let names = self.config.templates.names.clone();
        match &self.config.templates.location {
            TemplateLocation::Directory { path } => {
                Box::new(DirectoryTemplateSource::new(path.clone(), names))
            }
            TemplateLocation::Http { base_url } => {
                Box::new(HttpTemplateSource::new(base_url.clone(), names))
            }
        }
    }

    pub fn report_generator(&self) -> ReportGenerator {
        ReportGenerator::new(self.template_source(), self.config.output_dir.clone())
    }
}
