use super::validator::ValidationResult;

/// "строка" agreeing with `count` under Russian numeral rules
pub fn row_noun(count: usize) -> &'static str {
    let last_two = count % 100;
    let last = count % 10;

    if last == 1 && last_two != 11 {
        "строка"
    } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
        "строки"
    } else {
        "строк"
    }
}

/// One-sentence summary of the report used as the email body
pub fn describe_report(row_count: usize, status: ValidationResult) -> String {
    format!("В отчете {} {}. {}", row_count, row_noun(row_count), status.message())
}
