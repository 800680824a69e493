use std::fmt;
use std::str::FromStr;

use crate::common::{RegistrarError, Result, UNGRADED_SYMBOL};

/// A letter grade on the 4.0 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    D,
    F,
}

/// Symbol and grade points for every grade, best first.
static GRADE_TABLE: [(Grade, &str, f64); 10] = [
    (Grade::A, "A", 4.00),
    (Grade::AMinus, "A-", 3.70),
    (Grade::BPlus, "B+", 3.30),
    (Grade::B, "B", 3.00),
    (Grade::BMinus, "B-", 2.70),
    (Grade::CPlus, "C+", 2.30),
    (Grade::C, "C", 2.00),
    (Grade::CMinus, "C-", 1.70),
    (Grade::D, "D", 1.00),
    (Grade::F, "F", 0.00),
];

impl Grade {
    /// All grades, best first.
    pub fn all() -> impl Iterator<Item = Grade> {
        GRADE_TABLE.iter().map(|(grade, _, _)| *grade)
    }

    fn entry(&self) -> &'static (Grade, &'static str, f64) {
        // GRADE_TABLE is ordered by discriminant
        &GRADE_TABLE[*self as usize]
    }

    pub fn symbol(&self) -> &'static str {
        self.entry().1
    }

    pub fn points(&self) -> f64 {
        self.entry().2
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Grade {
    type Err = RegistrarError;

    /// Parses an exact grade symbol. The ungraded sentinel is not a grade.
    fn from_str(symbol: &str) -> Result<Self> {
        GRADE_TABLE
            .iter()
            .find(|(_, s, _)| *s == symbol)
            .map(|(grade, _, _)| *grade)
            .ok_or_else(|| RegistrarError::InvalidGrade(symbol.to_string()))
    }
}

/// Maps a grade symbol to its points. `NA` and unknown symbols are `InvalidGrade`,
/// which keeps them distinct from a valid 0.00 for `F`.
pub fn grade_to_points(symbol: &str) -> Result<f64> {
    symbol.parse::<Grade>().map(|grade| grade.points())
}

/// Parses user-entered grade text: trimmed, upper-cased, `NA` meaning "reset to ungraded".
pub fn parse_grade_input(raw: &str) -> Result<Option<Grade>> {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol == UNGRADED_SYMBOL {
        return Ok(None);
    }
    symbol.parse::<Grade>().map(Some)
}

/// Display symbol for an optional grade.
pub fn grade_symbol(grade: Option<Grade>) -> &'static str {
    grade.map_or(UNGRADED_SYMBOL, |g| g.symbol())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_points_table() {
        assert_eq!(grade_to_points("A").unwrap(), 4.00);
        assert_eq!(grade_to_points("A-").unwrap(), 3.70);
        assert_eq!(grade_to_points("B+").unwrap(), 3.30);
        assert_eq!(grade_to_points("B").unwrap(), 3.00);
        assert_eq!(grade_to_points("B-").unwrap(), 2.70);
        assert_eq!(grade_to_points("C+").unwrap(), 2.30);
        assert_eq!(grade_to_points("C").unwrap(), 2.00);
        assert_eq!(grade_to_points("C-").unwrap(), 1.70);
        assert_eq!(grade_to_points("D").unwrap(), 1.00);
        assert_eq!(grade_to_points("F").unwrap(), 0.00);
    }

    #[test]
    fn test_invalid_symbols() {
        assert!(matches!(
            grade_to_points("NA"),
            Err(RegistrarError::InvalidGrade(_))
        ));
        assert!(matches!(
            grade_to_points("Z"),
            Err(RegistrarError::InvalidGrade(_))
        ));
        assert!(grade_to_points("a").is_err());
        assert!(grade_to_points("").is_err());
    }

    #[test]
    fn test_table_order_matches_discriminants() {
        for grade in Grade::all() {
            assert_eq!(grade.symbol().parse::<Grade>().unwrap(), grade);
        }
        assert_eq!(Grade::all().count(), 10);
    }

    #[test]
    fn test_parse_grade_input() {
        assert_eq!(parse_grade_input(" b+ ").unwrap(), Some(Grade::BPlus));
        assert_eq!(parse_grade_input("na").unwrap(), None);
        assert!(parse_grade_input("E").is_err());
    }

    #[test]
    fn test_grade_symbol() {
        assert_eq!(grade_symbol(Some(Grade::AMinus)), "A-");
        assert_eq!(grade_symbol(None), "NA");
    }
}
