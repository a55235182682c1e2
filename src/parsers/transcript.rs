use std::sync::LazyLock;

use regex::Regex;

use crate::domain::transcript::{CourseStatus, TranscriptCourse};

static COURSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-ZÇĞİÖŞÜ0-9]{5,9}$").expect("valid course code regex"));
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid parenthesis regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Extract course rows from the plain text of a transcript.
///
/// Parenthesised remarks (usually English course titles) are dropped and a
/// new row starts at every token that looks like a course code. Rows that
/// do not carry a compulsory/elective marker are ignored.
pub fn parse_transcript(raw_text: &str) -> Vec<TranscriptCourse> {
    let cleaned = PARENTHESIZED.replace_all(raw_text, " ");
    let cleaned = WHITESPACE.replace_all(&cleaned, " ");

    split_rows(cleaned.trim())
        .into_iter()
        .filter_map(|row| parse_row(&row))
        .collect()
}

/// Group tokens into rows, starting a new row before each course code.
///
/// A code only opens a row when more text follows it.
fn split_rows(text: &str) -> Vec<Vec<&str>> {
    let tokens: Vec<&str> = text.split(' ').filter(|token| !token.is_empty()).collect();
    let mut rows: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (index, &token) in tokens.iter().enumerate() {
        let opens_row = index + 1 < tokens.len() && COURSE_CODE.is_match(token);
        if opens_row && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
        }
        current.push(token);
    }

    if !current.is_empty() {
        rows.push(current);
    }

    rows
}

fn parse_row(tokens: &[&str]) -> Option<TranscriptCourse> {
    let (&code, rest) = tokens.split_first()?;
    if !COURSE_CODE.is_match(code) {
        return None;
    }

    let status_at = rest.iter().position(|token| parse_status(token).is_some())?;
    let name = rest[..status_at].join(" ");
    let status = parse_status(rest[status_at])?;

    let mut columns = rest[status_at + 1..].iter().copied();
    let language = columns.next().map(str::to_string);
    let theory = columns.next().and_then(parse_number);
    let practice = columns.next().and_then(parse_number);
    let national_credit = columns.next().and_then(parse_number);
    let ects = columns.next().and_then(parse_number);
    let points = columns.next().and_then(parse_number);
    let grade = columns
        .next()
        .filter(|token| *token != "--")
        .map(str::to_string);
    let comments = columns.map(str::to_string).collect();

    Some(TranscriptCourse {
        code: code.to_string(),
        name,
        status,
        language,
        theory,
        practice,
        national_credit,
        ects,
        points,
        grade,
        comments,
    })
}

fn parse_status(token: &str) -> Option<CourseStatus> {
    match token {
        "Z" => Some(CourseStatus::Compulsory),
        "S" => Some(CourseStatus::Elective),
        _ => None,
    }
}

/// Transcript numbers use a decimal comma; `-` marks an empty cell.
fn parse_number(token: &str) -> Option<f64> {
    if token.is_empty() || token == "-" {
        return None;
    }
    token
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{parse_number, parse_transcript};
    use crate::domain::transcript::CourseStatus;

    #[test]
    fn parses_consecutive_rows() {
        let text = "BIL101 Programlamaya Giriş (Introduction to Programming) Z Tr 3 0 3 5 12,0 AA \
                    BIL102 Veri   Yapıları S En 3 2 4 6,5 - -- Tekrar";

        let courses = parse_transcript(text);

        assert_eq!(courses.len(), 2);

        let first = &courses[0];
        assert_eq!(first.code, "BIL101");
        assert_eq!(first.name, "Programlamaya Giriş");
        assert_eq!(first.status, CourseStatus::Compulsory);
        assert_eq!(first.language.as_deref(), Some("Tr"));
        assert_eq!(first.theory, Some(3.0));
        assert_eq!(first.practice, Some(0.0));
        assert_eq!(first.national_credit, Some(3.0));
        assert_eq!(first.ects, Some(5.0));
        assert_eq!(first.points, Some(12.0));
        assert_eq!(first.grade.as_deref(), Some("AA"));
        assert!(first.comments.is_empty());

        let second = &courses[1];
        assert_eq!(second.code, "BIL102");
        assert_eq!(second.name, "Veri Yapıları");
        assert_eq!(second.status, CourseStatus::Elective);
        assert_eq!(second.ects, Some(6.5));
        assert_eq!(second.points, None);
        assert_eq!(second.grade, None);
        assert_eq!(second.comments, vec!["Tekrar".to_string()]);
    }

    #[test]
    fn skips_rows_without_status() {
        let courses = parse_transcript("Transkript Belgesi MAT101 Matematik dersi notu");

        assert!(courses.is_empty());
    }

    #[test]
    fn skips_text_before_first_code() {
        let courses = parse_transcript("Öğrenci Bilgileri FIZ101 Fizik I Z Tr 4 0 4 6 16 BA");

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].code, "FIZ101");
        assert_eq!(courses[0].name, "Fizik I");
    }

    #[test]
    fn missing_trailing_columns_are_none() {
        let courses = parse_transcript("BIL201 Algoritmalar Z");

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].language, None);
        assert_eq!(courses[0].theory, None);
        assert_eq!(courses[0].grade, None);
    }

    #[test]
    fn numbers_accept_decimal_comma() {
        assert_eq!(parse_number("3,5"), Some(3.5));
        assert_eq!(parse_number("4"), Some(4.0));
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn non_finite_numbers_are_empty_cells() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(parse_transcript("   ").is_empty());
    }
}
