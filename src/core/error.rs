use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid configuration: {}", .0.join("; "))]
    Config(Vec<String>),
    #[error("Cost Explorer request failed: {0}")]
    Billing(String),
    #[error("Malformed Cost Explorer response: {0}")]
    MalformedResponse(String),
    #[error("Failed to send report email: {0}")]
    Email(String),
}

pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_lists_every_issue() {
        let err = ReportError::Config(vec!["empty sender".into(), "no recipients".into()]);
        assert_eq!(
            err.to_string(),
            "Invalid configuration: empty sender; no recipients"
        );
    }

    #[test]
    fn malformed_response_names_the_problem() {
        let err = ReportError::MalformedResponse("missing UnblendedCost".into());
        assert!(err.to_string().contains("missing UnblendedCost"));
    }
}
