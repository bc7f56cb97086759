// Shared fixtures for integration tests

/// A MOEX currency-rate page holding `rows` of (date, main clearing rate)
pub fn rate_page(rows: &[(&str, &str)]) -> String {
    let mut body = String::from(
        r#"<html><body>
<table class="tablels">
<tr><th>Дата</th><th>Время</th><th>Курс основного клиринга</th><th>Время</th><th>Курс промклиринга</th></tr>
"#,
    );
    for (i, (date, rate)) in rows.iter().enumerate() {
        body.push_str(&format!(
            r#"<tr class="tr{}"><td>{}</td><td>13:45</td><td>{}</td><td>18:30</td><td>{}</td></tr>
"#,
            i % 2,
            date,
            rate,
            rate
        ));
    }
    body.push_str("</table></body></html>");
    body
}

pub const USD_ROWS: [(&str, &str); 5] = [
    ("25.11.2020", "76,00"),
    ("24.11.2020", "75,50"),
    ("23.11.2020", "75,00"),
    ("30.10.2020", "79,50"),
    ("29.10.2020", "79,00"),
];

pub const EUR_ROWS: [(&str, &str); 5] = [
    ("25.11.2020", "90,00"),
    ("24.11.2020", "89,25"),
    ("23.11.2020", "89,00"),
    ("21.11.2020", "-"),
    ("30.10.2020", "92,00"),
];
