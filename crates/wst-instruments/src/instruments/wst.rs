use crate::error::InstrumentError;
use crate::scoring::Subscale;
use crate::Instrument;

/// WST 5.4.2: Wheelchair Skills Test, manual wheelchair, wheelchair user.
/// 30 skills, each rated 0–3 (or NP / TE). Three cumulative sub-scales:
/// home (skills 1–11), community (1–21) and advanced (1–30).
pub struct Wst {
    skills: Vec<String>,
}

pub const DEFAULT_SKILLS: [&str; 30] = [
    "Rolls forward short distance",
    "Rolls backward short distance",
    "Turns in place",
    "Turns while moving forward",
    "Turns while moving backward",
    "Maneuvers sideways",
    "Gets through hinged door",
    "Reaches high object",
    "Picks object from floor",
    "Relieves weight",
    "Transfers from wheelchair to bench and back",
    "Folds and unfolds wheelchair",
    "Rolls 100 m",
    "Avoids moving obstacles",
    "Ascends slight incline",
    "Descends slight incline",
    "Ascends steep incline",
    "Descends steep incline",
    "Rolls across side-slope",
    "Rolls on soft surface",
    "Gets over threshold",
    "Gets over gap",
    "Ascends low curb",
    "Descends low curb",
    "Performs stationary wheelie",
    "Turns in place in wheelie position",
    "Ascends high curb",
    "Descends high curb",
    "Gets from ground into wheelchair",
    "Ascends stairs",
];

pub const HOME_SCORE_KEY: &str = "home_score";
pub const COMMUNITY_SCORE_KEY: &str = "community_score";
pub const ADVANCED_SCORE_KEY: &str = "advanced_score";

impl Wst {
    pub fn new() -> Self {
        Self {
            skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// A WST with a site-specific skill list. Sub-scale ranges are kept;
    /// a shorter list simply scores fewer items.
    pub fn with_skills(skills: Vec<String>) -> Result<Self, InstrumentError> {
        if skills.is_empty() {
            return Err(InstrumentError::EmptySkillList);
        }
        if let Some(index) = skills.iter().position(|s| s.trim().is_empty()) {
            return Err(InstrumentError::BlankSkillName(index + 1));
        }
        Ok(Self { skills })
    }
}

impl Default for Wst {
    fn default() -> Self {
        Self::new()
    }
}

/// The three WST sub-scales.
pub fn standard_subscales() -> &'static [Subscale] {
    static SUBSCALES: std::sync::LazyLock<Vec<Subscale>> = std::sync::LazyLock::new(|| {
        vec![
            Subscale {
                id: "home".to_string(),
                name: "Home".to_string(),
                payload_key: HOME_SCORE_KEY.to_string(),
                start: 0,
                end: 11,
                description: Some("Skills needed inside the home".to_string()),
            },
            Subscale {
                id: "community".to_string(),
                name: "Community".to_string(),
                payload_key: COMMUNITY_SCORE_KEY.to_string(),
                start: 0,
                end: 21,
                description: Some("Home skills plus outdoor and community mobility".to_string()),
            },
            Subscale {
                id: "advanced".to_string(),
                name: "Advanced".to_string(),
                payload_key: ADVANCED_SCORE_KEY.to_string(),
                start: 0,
                end: 30,
                description: Some("Every skill, including curbs, wheelies and stairs".to_string()),
            },
        ]
    });
    &SUBSCALES
}

impl Instrument for Wst {
    fn id(&self) -> &str {
        "wst"
    }

    fn name(&self) -> &str {
        "WST 5.4.2"
    }

    fn skills(&self) -> &[String] {
        &self.skills
    }

    fn subscales(&self) -> &[Subscale] {
        standard_subscales()
    }
}
