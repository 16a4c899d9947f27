use chrono::{Local, NaiveDate};

use crate::error::{Result, TaskError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// Blank input means "no due date". Anything other than `YYYY-MM-DD` is
// rejected with `TaskError::Date`.
pub fn parse_due_date(input: &str) -> Result<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    parse_date(input).map(Some)
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    let date = NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|e| TaskError::Date(format!("'{}' is not in YYYY-MM-DD form: {}", input, e)))?;
    // chrono also takes unpadded or space-padded fields ("2099-1-1", "2099-01- 1").
    if date.format(DATE_FORMAT).to_string() != input {
        return Err(TaskError::Date(format!("'{}' is not in YYYY-MM-DD form", input)));
    }
    Ok(date)
}

pub fn days_between(today: NaiveDate, date: NaiveDate) -> i64 {
    (date - today).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_due_date() {
        assert_eq!(parse_due_date("").unwrap(), None);
        assert_eq!(parse_due_date("   ").unwrap(), None);
        assert_eq!(
            parse_due_date(" 2099-01-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2099, 1, 1)
        );
    }

    #[test]
    fn test_parse_date_rejects_other_forms() {
        for bad in [
            "2099/01/01",
            "01-01-2099",
            "tomorrow",
            "2099-1-1",
            "2099-02-30",
            "2099-01- 1",
            "2099- 1-01",
            "+2099-01-01",
        ] {
            assert!(
                matches!(parse_date(bad), Err(TaskError::Date(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_days_between() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
        let march_1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(days_between(today, march_1), 3);
        assert_eq!(days_between(march_1, today), -3);
        assert_eq!(days_between(today, today), 0);
    }
}
