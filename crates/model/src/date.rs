use chrono::NaiveDate;

const ISO_FORMAT: &str = "%Y-%m-%d";
const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

/// Stored form of activity dates; range filters compare it as a string.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_FORMAT).ok()
}

/// Parses `YYYY-MM-DD`, falling back to `DD/MM/YYYY`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, ISO_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, DAY_FIRST_FORMAT))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date("2024-03-05"), expected);
        assert_eq!(parse_date(" 2024-03-05 "), expected);
        assert_eq!(parse_date("05/03/2024"), expected);
        assert_eq!(parse_date("2024/03/05"), None);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2024-03-05"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(parse_iso_date("05/03/2024"), None);
    }
}
