//! Reader for the plain-text G25 panel format.
//!
//! Each line is `label,c1,c2,...,cN` with `.` as the decimal point. Lines that are
//! blank, carry no comma, or have an empty label are treated as headers and skipped.
//! Tokens that do not parse become `NaN`; the line itself is kept. Comma decimals are
//! not normalized here (see [`crate::geo::parse_locale_number`] for the tabular path).

use crate::config::{Number, G25_DIMENSIONS};
use crate::vector_entry::LabeledVector;
use tracing::{debug, warn};

pub fn parse(text: &str) -> Vec<LabeledVector> {
    let mut skipped = 0usize;
    let vectors: Vec<LabeledVector> = text
        .lines()
        .filter_map(|line| {
            let entry = parse_line(line);
            if entry.is_none() {
                skipped += 1;
            }
            entry
        })
        .collect();

    debug!(parsed = vectors.len(), skipped, "parsed G25 panel");
    vectors
}

pub fn parse_line(line: &str) -> Option<LabeledVector> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (label, rest) = line.split_once(',')?;
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    Some(LabeledVector::new(label, parse_tokens(rest)))
}

/// Decodes a bare comma-joined coordinate string such as a single uploaded vector.
pub fn parse_vector(text: &str) -> Vec<Number> {
    parse_tokens(text.trim())
}

/// [`parse_vector`] gated on a minimum length; shorter vectors are rejected.
pub fn parse_vector_checked(text: &str, min_dimensions: usize) -> Option<Vec<Number>> {
    let coordinates = parse_vector(text);
    if coordinates.len() < min_dimensions {
        warn!(
            got = coordinates.len(),
            expected = min_dimensions,
            "rejecting vector shorter than the acceptance gate"
        );
        return None;
    }
    Some(coordinates)
}

pub fn parse_g25_vector(text: &str) -> Option<Vec<Number>> {
    parse_vector_checked(text, G25_DIMENSIONS)
}

fn parse_tokens(text: &str) -> Vec<Number> {
    text.split(',').map(parse_number).collect()
}

fn parse_number(token: &str) -> Number {
    token.trim().parse::<Number>().unwrap_or(Number::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_labeled_rows_and_skips_noise() {
        let text = concat!(
            "\n  \n",
            "Population header without commas\n",
            "Yamnaya,0.10,0.20\n",
            " ,0.1,0.2\n",
            "  Corded_Ware , 0.12 ,0.19 \n",
        );
        let vectors = parse(text);
        assert_eq!(
            vectors,
            vec![
                LabeledVector::new("Yamnaya", vec![0.10, 0.20]),
                LabeledVector::new("Corded_Ware", vec![0.12, 0.19]),
            ]
        );
    }

    #[test]
    fn accepts_variable_length_vectors() {
        let vectors = parse("A,1\nB,1,2,3\n");
        assert_eq!(vectors[0].dimensions(), 1);
        assert_eq!(vectors[1].dimensions(), 3);
    }

    #[test]
    fn bad_tokens_become_nan_without_dropping_the_line() {
        let vectors = parse("Bad_Row,notanumber,0.2");
        assert_eq!(vectors.len(), 1);
        assert!(vectors[0].coordinates[0].is_nan());
        assert_eq!(vectors[0].coordinates[1], 0.2);
    }

    #[test]
    fn trailing_comma_yields_trailing_nan() {
        let vectors = parse("A,0.1,");
        assert_eq!(vectors[0].dimensions(), 2);
        assert!(vectors[0].coordinates[1].is_nan());
    }

    #[test]
    fn comma_decimals_are_not_normalized() {
        // "0,5" splits into two tokens rather than reading as 0.5.
        let vectors = parse("A,0,5");
        assert_eq!(vectors[0].coordinates, vec![0.0, 5.0]);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let vectors = parse("A,0.1,0.2\r\nB,0.3,0.4\r\n");
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1].coordinates, vec![0.3, 0.4]);
    }

    #[test]
    fn rejoined_coordinates_reparse_to_the_same_values() {
        let original = parse("Sample,0.0123,-0.04567,0.1,1e-3");
        let joined = original[0]
            .coordinates
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let reparsed = parse(&format!("Sample,{joined}"));
        assert_eq!(original, reparsed);
    }

    #[test]
    fn single_vector_gate() {
        let short = "0.1,0.2,0.3";
        assert_eq!(parse_vector(short), vec![0.1, 0.2, 0.3]);
        assert_eq!(parse_g25_vector(short), None);

        let full = vec!["0.01"; 25].join(",");
        let parsed = parse_g25_vector(&full).unwrap();
        assert_eq!(parsed.len(), 25);
        assert!(parsed.iter().all(|&c| c == 0.01));

        assert!(parse_vector_checked(short, 3).is_some());
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }
}
