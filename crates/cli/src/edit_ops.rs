// Grid edits given on the command line as `--edit OP`
//
// Grammar (indices are 0-based, ROW is the absolute row of the working grid):
//   set:ROW:COL:VALUE   add-row   del-row:ROW   add-col   del-col:COL

use std::fmt;
use std::str::FromStr;

use datashelf_engine::{EditError, EditSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Set { row: usize, col: usize, value: String },
    AddRow,
    DelRow(usize),
    AddCol,
    DelCol(usize),
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = match s.split_once(':') {
            Some((verb, rest)) => (verb, Some(rest)),
            None => (s, None),
        };

        match (verb, rest) {
            ("set", Some(rest)) => {
                // VALUE may itself contain ':'
                let mut parts = rest.splitn(3, ':');
                let row = parse_index(parts.next(), "ROW", s)?;
                let col = parse_index(parts.next(), "COL", s)?;
                let value = parts
                    .next()
                    .ok_or_else(|| format!("'{}': expected set:ROW:COL:VALUE", s))?;
                Ok(EditOp::Set { row, col, value: value.to_string() })
            }
            ("add-row", None) => Ok(EditOp::AddRow),
            ("add-col", None) => Ok(EditOp::AddCol),
            ("del-row", Some(rest)) => Ok(EditOp::DelRow(parse_index(Some(rest), "ROW", s)?)),
            ("del-col", Some(rest)) => Ok(EditOp::DelCol(parse_index(Some(rest), "COL", s)?)),
            _ => Err(format!(
                "unknown edit '{}' (expected set:ROW:COL:VALUE, add-row, del-row:ROW, add-col or del-col:COL)",
                s
            )),
        }
    }
}

fn parse_index(part: Option<&str>, what: &str, op: &str) -> Result<usize, String> {
    let part = part.ok_or_else(|| format!("'{}': missing {}", op, what))?;
    part.trim()
        .parse()
        .map_err(|_| format!("'{}': {} must be a non-negative integer, got '{}'", op, what, part))
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Set { row, col, value } => write!(f, "set:{}:{}:{}", row, col, value),
            EditOp::AddRow => write!(f, "add-row"),
            EditOp::DelRow(row) => write!(f, "del-row:{}", row),
            EditOp::AddCol => write!(f, "add-col"),
            EditOp::DelCol(col) => write!(f, "del-col:{}", col),
        }
    }
}

impl EditOp {
    /// Apply to the session. `Ok(false)` means the grid refused the edit
    /// (deleting its last row or column) and is unchanged.
    pub fn apply(&self, session: &mut EditSession) -> Result<bool, EditError> {
        match self {
            EditOp::Set { row, col, value } => session.set_cell(*row, *col, value.clone()).map(|_| true),
            EditOp::AddRow => session.insert_row().map(|_| true),
            EditOp::DelRow(row) => session.delete_row(*row),
            EditOp::AddCol => session.insert_column().map(|_| true),
            EditOp::DelCol(col) => session.delete_column(*col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datashelf_engine::{Grid, Workbook};
    use proptest::prelude::*;

    fn session() -> EditSession {
        let rows = vec![
            vec!["h1".to_string(), "h2".to_string()],
            vec!["1".to_string(), "2".to_string()],
        ];
        EditSession::with_workbook(Workbook::from_csv(Grid::from_rows(rows)))
    }

    #[test]
    fn test_parse_ops() {
        assert_eq!(
            "set:1:0:hello".parse::<EditOp>(),
            Ok(EditOp::Set { row: 1, col: 0, value: "hello".into() })
        );
        assert_eq!("add-row".parse::<EditOp>(), Ok(EditOp::AddRow));
        assert_eq!("del-row:3".parse::<EditOp>(), Ok(EditOp::DelRow(3)));
        assert_eq!("add-col".parse::<EditOp>(), Ok(EditOp::AddCol));
        assert_eq!("del-col:0".parse::<EditOp>(), Ok(EditOp::DelCol(0)));
    }

    #[test]
    fn test_set_value_keeps_colons_and_empty() {
        assert_eq!(
            "set:0:1:12:30:00".parse::<EditOp>(),
            Ok(EditOp::Set { row: 0, col: 1, value: "12:30:00".into() })
        );
        assert_eq!(
            "set:0:1:".parse::<EditOp>(),
            Ok(EditOp::Set { row: 0, col: 1, value: String::new() })
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("set:1:2".parse::<EditOp>().is_err());
        assert!("set:x:2:v".parse::<EditOp>().is_err());
        assert!("del-row".parse::<EditOp>().is_err());
        assert!("del-row:-1".parse::<EditOp>().is_err());
        assert!("add-row:1".parse::<EditOp>().is_err());
        assert!("rename:1".parse::<EditOp>().is_err());
    }

    #[test]
    fn test_apply_edits() {
        let mut s = session();
        assert!(EditOp::Set { row: 1, col: 1, value: "x".into() }.apply(&mut s).unwrap());
        assert!(EditOp::AddCol.apply(&mut s).unwrap());
        assert_eq!(s.grid().unwrap().width(), 3);
        assert!(EditOp::DelRow(0).apply(&mut s).unwrap());
        assert_eq!(s.grid().unwrap().cell(0, 1), Some("x"));
    }

    #[test]
    fn test_apply_refusal_and_errors() {
        let mut s = session();
        assert!(EditOp::DelRow(0).apply(&mut s).unwrap());
        // one row left
        assert!(!EditOp::DelRow(0).apply(&mut s).unwrap());
        assert!(EditOp::DelCol(9).apply(&mut s).unwrap_err().is_out_of_bounds());
        assert_eq!(EditOp::AddRow.apply(&mut EditSession::new()), Err(EditError::NoFileLoaded));
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(row in 0usize..1000, col in 0usize..100, value in "[a-z0-9:, ]{0,12}") {
            let op = EditOp::Set { row, col, value };
            prop_assert_eq!(op.to_string().parse::<EditOp>(), Ok(op));
        }
    }
}
