/// Reasons an evaluation is rejected. None of these leave a partial result behind; callers are
/// expected to correct their input and evaluate again.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("empty input: no {0} supplied")]
    EmptyInput(&'static str),

    #[error("unknown criterion: {0}")]
    UnknownCriterion(String),

    #[error("criterion {0} appears more than once in the priority order")]
    DuplicateCriterion(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid raw value {value} for criterion {criterion} on item {item}")]
    InvalidValue {
        item: String,
        criterion: String,
        value: f64,
    },
}
