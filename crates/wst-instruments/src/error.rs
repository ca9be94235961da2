use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("instrument needs at least one skill item")]
    EmptySkillList,

    #[error("skill item {0} has an empty name")]
    BlankSkillName(usize),
}
