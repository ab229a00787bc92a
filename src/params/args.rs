use super::{ParameterProvider, RunParameters};
use crate::error::FrequencyError;

/// Parameters given as command-line values.
#[derive(Debug, Clone, Default)]
pub struct ArgsProvider {
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ArgsProvider {
    pub fn new(date: Option<String>, start: Option<String>, end: Option<String>) -> Self {
        Self { date, start, end }
    }

    /// True when none of the values were given.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.start.is_none() && self.end.is_none()
    }
}

impl ParameterProvider for ArgsProvider {
    fn parameters(&mut self) -> Result<RunParameters, FrequencyError> {
        let date = self
            .date
            .as_deref()
            .ok_or(FrequencyError::MissingParameter("--date"))?;
        let start = self
            .start
            .as_deref()
            .ok_or(FrequencyError::MissingParameter("--start"))?;
        let end = self
            .end
            .as_deref()
            .ok_or(FrequencyError::MissingParameter("--end"))?;
        RunParameters::parse(date, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(date: Option<&str>, start: Option<&str>, end: Option<&str>) -> ArgsProvider {
        ArgsProvider::new(
            date.map(String::from),
            start.map(String::from),
            end.map(String::from),
        )
    }

    #[test]
    fn test_all_values_given() {
        let mut p = provider(Some("20231013"), Some("06:00:00"), Some("27:00:00"));
        let params = p.parameters().unwrap();
        assert_eq!(params.date.to_string(), "2023-10-13");
        assert_eq!(params.window.end().seconds(), 97_200);
    }

    #[test]
    fn test_missing_value() {
        let mut p = provider(Some("20231013"), None, Some("21:00:00"));
        assert_eq!(
            p.parameters(),
            Err(FrequencyError::MissingParameter("--start"))
        );
        assert!(!p.is_empty());
        assert!(provider(None, None, None).is_empty());
    }
}
