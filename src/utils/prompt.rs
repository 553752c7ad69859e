use crate::utils::error::Result;
use crate::utils::validation::validate_date;
use inquire::validator::Validation;
use inquire::{CustomUserError, Text};

/// Trims an answer and checks it. Blank means no date.
pub fn parse_start_date(answer: &str) -> Result<Option<String>> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(None);
    }

    validate_date("start_date", answer)?;
    Ok(Some(answer.to_string()))
}

/// A blank answer keeps whatever start date was already configured.
pub fn start_date_from_answer(answer: &str, configured: Option<String>) -> Result<Option<String>> {
    Ok(parse_start_date(answer)?.or(configured))
}

/// Asks for the start date on the terminal.
pub fn prompt_start_date(configured: Option<String>) -> Result<Option<String>> {
    let help = match &configured {
        Some(date) => format!("Blank keeps {}", date),
        None => "Blank for no start date".to_string(),
    };

    let answer = Text::new("Start date (YYYY-MM-DD):")
        .with_help_message(&help)
        .with_validator(|input: &str| -> std::result::Result<Validation, CustomUserError> {
            Ok(match parse_start_date(input) {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()?;

    start_date_from_answer(&answer, configured)
}
