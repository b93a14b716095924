use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoxError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoxError {
    #[error("dimensions don't match: {message}")]
    InvalidDimensions { message: String },

    #[error("empty input: {what} has no samples")]
    EmptyInput { what: String },

    #[error("bad parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    #[error("numerical issues: {message}")]
    NumericalError { message: String },

    #[error("survival data is broken: {message}")]
    InvalidSurvivalData { message: String },

    #[error("can't compare groups: {message}")]
    DegenerateGroups { message: String },
}

impl CoxError {
    pub fn invalid_dimensions(message: impl Into<String>) -> Self {
        Self::InvalidDimensions { message: message.into() }
    }

    pub fn empty_input(what: impl Into<String>) -> Self {
        Self::EmptyInput { what: what.into() }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    pub fn numerical_error(message: impl Into<String>) -> Self {
        Self::NumericalError { message: message.into() }
    }

    pub fn invalid_survival_data(message: impl Into<String>) -> Self {
        Self::InvalidSurvivalData { message: message.into() }
    }

    pub fn degenerate_groups(message: impl Into<String>) -> Self {
        Self::DegenerateGroups { message: message.into() }
    }
}

/// fail fast when index-aligned inputs disagree on length
pub(crate) fn ensure_same_len(context: &str, lens: &[(&str, usize)]) -> Result<usize> {
    let Some(&(_, n)) = lens.first() else {
        return Err(CoxError::empty_input(context));
    };
    if let Some(&(name, len)) = lens.iter().find(|(_, len)| *len != n) {
        return Err(CoxError::invalid_dimensions(format!(
            "{}: {} len ({}) != {} len ({})",
            context, lens[0].0, n, name, len
        )));
    }
    Ok(n)
}
