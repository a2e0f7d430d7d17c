//! # Delimited Text Codec
//!
//! Converts between decoded text and [`Record`]s. The format is CSV-like but
//! uses a fixed `;` delimiter, which is what spreadsheet tools emit in locales
//! where `,` is the decimal separator.
//!
//! ## Parsing
//!
//! Parsing is best effort and never fails. Rows that cannot be turned into a
//! record (fewer than two columns, or an empty prompt/response after
//! trimming) are dropped silently, so a malformed file yields fewer records
//! rather than an error.
//!
//! A leading byte-order mark is stripped, and a first row that looks like a
//! `question;answer` header (in either column order, English or Turkish) is
//! skipped.
//!
//! ## Quoting
//!
//! A field that starts with `"` is quoted until the next lone `"`. Inside a
//! quoted field `""` stands for one `"`, and delimiters and line breaks are
//! literal. [`serialize`] quotes a field only when it has to.

use crate::model::Record;
use std::borrow::Cow;

pub const DELIMITER: char = ';';
pub const QUOTE: char = '"';

/// Header written by [`serialize`].
pub const HEADER_PROMPT: &str = "Soru";
pub const HEADER_RESPONSE: &str = "Cevap";

const BOM: char = '\u{feff}';

const PROMPT_WORDS: &[&str] = &["question", "prompt", "q", "soru"];
const RESPONSE_WORDS: &[&str] = &["answer", "a", "cevap"];

type Row = Vec<String>;

/// Parse delimited text into records, preserving row order.
pub fn parse(text: &str) -> Vec<Record> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let rows: Vec<Row> = tokenize(text)
        .into_iter()
        .filter(|row| !is_blank(row))
        .collect();

    let skip_header = rows.first().is_some_and(is_header);

    rows.iter()
        .skip(usize::from(skip_header))
        .filter_map(row_to_record)
        .collect()
}

/// Serialize records, header first. The output has no byte-order mark and
/// ends every line with `\n`.
pub fn serialize(records: &[Record]) -> String {
    let mut out = String::new();
    push_line(&mut out, HEADER_PROMPT, HEADER_RESPONSE);
    for record in records {
        push_line(&mut out, &escape(&record.prompt), &escape(&record.response));
    }
    out
}

/// Quote a field if it contains the delimiter, a quote or a line break.
pub fn escape(field: &str) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\n' || c == '\r');

    if !needs_quotes {
        return Cow::Borrowed(field);
    }

    let doubled = field.replace(QUOTE, "\"\"");
    Cow::Owned(format!("{QUOTE}{doubled}{QUOTE}"))
}

fn push_line(out: &mut String, prompt: &str, response: &str) {
    out.push_str(prompt);
    out.push(DELIMITER);
    out.push_str(response);
    out.push('\n');
}

fn tokenize(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row = Row::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_quoted = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            QUOTE if field.is_empty() && !field_quoted => {
                in_quotes = true;
                field_quoted = true;
            }
            DELIMITER => {
                row.push(std::mem::take(&mut field));
                field_quoted = false;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                field_quoted = false;
            }
            _ => field.push(c),
        }
    }

    if !row.is_empty() || !field.is_empty() || field_quoted {
        row.push(field);
        rows.push(row);
    }

    rows
}

fn is_blank(row: &Row) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

fn is_header(row: &Row) -> bool {
    if row.len() < 2 {
        return false;
    }
    let first = row[0].trim().to_lowercase();
    let second = row[1].trim().to_lowercase();

    let in_order = matches_vocabulary(&first, PROMPT_WORDS)
        && matches_vocabulary(&second, RESPONSE_WORDS);
    let reversed = matches_vocabulary(&first, RESPONSE_WORDS)
        && matches_vocabulary(&second, PROMPT_WORDS);

    in_order || reversed
}

// Single-letter words ("q", "a") only match a whole field; otherwise any
// field containing an "a" would read as a response header.
fn matches_vocabulary(field: &str, words: &[&str]) -> bool {
    words
        .iter()
        .any(|word| field == *word || (word.chars().count() > 1 && field.contains(word)))
}

fn row_to_record(row: &Row) -> Option<Record> {
    if row.len() < 2 {
        return None;
    }
    let prompt = row[0].trim();
    let response = row[1].trim();
    if prompt.is_empty() || response.is_empty() {
        return None;
    }
    Some(Record::new(prompt, response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(p: &str, r: &str) -> Record {
        Record::new(p, r)
    }

    #[test]
    fn parses_simple_rows() {
        let records = parse("Capital of France;Paris\n2+2;4\n");
        assert_eq!(
            records,
            vec![rec("Capital of France", "Paris"), rec("2+2", "4")]
        );
    }

    #[test]
    fn skips_english_header() {
        let records = parse("Question;Answer\nkedi;cat\n");
        assert_eq!(records, vec![rec("kedi", "cat")]);
    }

    #[test]
    fn skips_quoted_header_in_any_case() {
        let records = parse("\"QUESTION\";\"answer\"\nkedi;cat\n");
        assert_eq!(records, vec![rec("kedi", "cat")]);
    }

    #[test]
    fn skips_turkish_and_reversed_headers() {
        assert_eq!(parse("Soru;Cevap\nx;y"), vec![rec("x", "y")]);
        assert_eq!(parse("Answer;Question\nx;y"), vec![rec("x", "y")]);
        assert_eq!(parse("cevap;soru\nx;y"), vec![rec("x", "y")]);
        assert_eq!(parse("Q;A\nx;y"), vec![rec("x", "y")]);
        assert_eq!(parse("Prompt text;Answer text\nx;y"), vec![rec("x", "y")]);
    }

    #[test]
    fn keeps_non_header_first_row() {
        let records = parse("Capital;Paris\nRed;Kırmızı");
        assert_eq!(records, vec![rec("Capital", "Paris"), rec("Red", "Kırmızı")]);
    }

    #[test]
    fn header_check_only_applies_to_first_row() {
        let records = parse("x;y\nQuestion;Answer\n");
        assert_eq!(records, vec![rec("x", "y"), rec("Question", "Answer")]);
    }

    #[test]
    fn handles_all_line_endings() {
        let records = parse("a1;b1\r\na2;b2\ra3;b3\na4;b4");
        assert_eq!(
            records,
            vec![rec("a1", "b1"), rec("a2", "b2"), rec("a3", "b3"), rec("a4", "b4")]
        );
    }

    #[test]
    fn crlf_is_a_single_break() {
        let rows = tokenize("x;y\r\nz;w\r\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn quoted_fields_keep_delimiters_newlines_and_quotes() {
        let text = "\"one;two\";\"line1\nline2\"\n\"say \"\"hi\"\"\";ok\n";
        let records = parse(text);
        assert_eq!(
            records,
            vec![rec("one;two", "line1\nline2"), rec("say \"hi\"", "ok")]
        );
    }

    #[test]
    fn quote_inside_unquoted_field_is_literal() {
        assert_eq!(parse("5\" floppy;disk"), vec![rec("5\" floppy", "disk")]);
    }

    #[test]
    fn unterminated_quote_keeps_remaining_text() {
        let records = parse("x;\"open\nstill open");
        assert_eq!(records, vec![rec("x", "open\nstill open")]);
    }

    #[test]
    fn blank_and_delimiter_only_rows_are_skipped() {
        let records = parse("\n   \n;;\n x ; y \n ; \n");
        assert_eq!(records, vec![rec("x", "y")]);
    }

    #[test]
    fn blank_rows_do_not_hide_the_header() {
        let records = parse("\n\nQuestion;Answer\nx;y\n");
        assert_eq!(records, vec![rec("x", "y")]);
    }

    #[test]
    fn short_and_half_empty_rows_are_skipped() {
        let records = parse("only one column\nprompt without answer;\n;answer only\nok;fine");
        assert_eq!(records, vec![rec("ok", "fine")]);
    }

    #[test]
    fn extra_columns_are_ignored() {
        assert_eq!(parse("a;b;c;d"), vec![rec("a", "b")]);
    }

    #[test]
    fn bom_is_stripped() {
        let plain = "Question;Answer\nx;y\n";
        let with_bom = format!("\u{feff}{plain}");
        assert_eq!(parse(&with_bom), parse(plain));
        assert_eq!(parse("\u{feff}x;y"), vec![rec("x", "y")]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("\u{feff}").is_empty());
    }

    #[test]
    fn escape_only_when_needed() {
        assert_eq!(escape("plain text"), "plain text");
        assert_eq!(escape("a;b"), "\"a;b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape("cr\rhere"), "\"cr\rhere\"");
    }

    #[test]
    fn serialize_writes_header_and_rows() {
        let text = serialize(&[rec("kedi", "cat"), rec("a;b", "c")]);
        assert_eq!(text, "Soru;Cevap\nkedi;cat\n\"a;b\";c\n");
        assert!(!text.starts_with('\u{feff}'));
    }

    #[test]
    fn serialize_empty_is_just_the_header() {
        assert_eq!(serialize(&[]), "Soru;Cevap\n");
        assert!(parse(&serialize(&[])).is_empty());
    }

    #[test]
    fn round_trip_preserves_tricky_records() {
        let records = vec![
            rec("What is 1;2?", "Two numbers"),
            rec("Quote \"this\"", "\"quoted\" answer"),
            rec("multi\nline", "windows\r\nbreak"),
            rec("ünicode ğüşıöç", "日本語"),
            rec("q", "a"),
            rec("Question", "Answer"),
            rec("\"", ";"),
        ];
        assert_eq!(parse(&serialize(&records)), records);
    }
}
