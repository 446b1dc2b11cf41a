//! Color record and the fixed column schema of an upload row

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::RowError;

/// A stored color. `id` is supplied by the uploader, never generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Color {
    pub id: i64,
    pub name: String,
    pub hex: String,
    pub red: i64,
    pub green: i64,
    pub blue: i64,
    pub decimal: i64,
}

/// Declared type of an upload column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Text,
}

/// A coerced column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Text(String),
}

impl ColumnType {
    /// Coerce a raw column into its declared type.
    ///
    /// Integers tolerate surrounding ASCII whitespace and a leading sign.
    /// Text is taken verbatim and never fails.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        match self {
            Self::Integer => raw
                .trim_matches(|c: char| c.is_ascii_whitespace())
                .parse::<i64>()
                .ok()
                .map(Value::Integer),
            Self::Text => Some(Value::Text(raw.to_owned())),
        }
    }
}

/// One entry of the row schema
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub index: usize,
    pub name: &'static str,
    pub ty: ColumnType,
}

/// Column layout of every upload row: `id;name;hex;red;green;blue;decimal`
pub const COLOR_SCHEMA: [Column; 7] = [
    Column { index: 0, name: "id", ty: ColumnType::Integer },
    Column { index: 1, name: "name", ty: ColumnType::Text },
    Column { index: 2, name: "hex", ty: ColumnType::Text },
    Column { index: 3, name: "red", ty: ColumnType::Integer },
    Column { index: 4, name: "green", ty: ColumnType::Integer },
    Column { index: 5, name: "blue", ty: ColumnType::Integer },
    Column { index: 6, name: "decimal", ty: ColumnType::Integer },
];

impl Color {
    /// Build a color from the raw columns of one row.
    ///
    /// Checks arity first, then coerces each column in schema order and
    /// stops at the first column that fails.
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Result<Self, RowError> {
        if columns.len() != COLOR_SCHEMA.len() {
            return Err(RowError::Arity {
                expected: COLOR_SCHEMA.len(),
                found: columns.len(),
            });
        }

        let mut values = Vec::with_capacity(COLOR_SCHEMA.len());
        for column in &COLOR_SCHEMA {
            let raw = columns[column.index].as_ref();
            let value = column.ty.coerce(raw).ok_or_else(|| RowError::Coercion {
                column: column.name,
                value: raw.to_owned(),
            })?;
            values.push(value);
        }

        match values.as_slice() {
            [
                Value::Integer(id),
                Value::Text(name),
                Value::Text(hex),
                Value::Integer(red),
                Value::Integer(green),
                Value::Integer(blue),
                Value::Integer(decimal),
            ] => Ok(Self {
                id: *id,
                name: name.clone(),
                hex: hex.clone(),
                red: *red,
                green: *green,
                blue: *blue,
                decimal: *decimal,
            }),
            _ => unreachable!("COLOR_SCHEMA disagrees with Color fields"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_row() {
        let color = Color::from_columns(&["1", "Red", "FF0000", "255", "0", "0", "16711680"])
            .unwrap();

        assert_eq!(
            color,
            Color {
                id: 1,
                name: "Red".into(),
                hex: "FF0000".into(),
                red: 255,
                green: 0,
                blue: 0,
                decimal: 16711680,
            }
        );
    }

    #[test]
    fn rejects_short_row() {
        let err = Color::from_columns(&["1", "Red", "FF0000", "255", "0"]).unwrap_err();
        assert_eq!(err, RowError::Arity { expected: 7, found: 5 });
    }

    #[test]
    fn rejects_long_row() {
        let err = Color::from_columns(&["1", "Red", "FF0000", "255", "0", "0", "1", "extra"])
            .unwrap_err();
        assert_eq!(err, RowError::Arity { expected: 7, found: 8 });
    }

    #[test]
    fn reports_first_bad_column() {
        let err = Color::from_columns(&["1", "Red", "FF0000", "x", "y", "0", "1"]).unwrap_err();
        assert_eq!(
            err,
            RowError::Coercion {
                column: "red",
                value: "x".into()
            }
        );
    }

    #[test]
    fn integer_columns_tolerate_padding_and_sign() {
        let color = Color::from_columns(&[" 7 ", "Teal", "008080", "+0", "128", "128", "32896"])
            .unwrap();
        assert_eq!(color.id, 7);
        assert_eq!(color.red, 0);
    }

    #[test]
    fn integer_padding_is_ascii_only() {
        assert_eq!(ColumnType::Integer.coerce("\t42\r"), Some(Value::Integer(42)));
        assert_eq!(ColumnType::Integer.coerce("\u{a0}42"), None);
        assert_eq!(ColumnType::Integer.coerce("4\u{2003}"), None);
    }

    #[test]
    fn text_columns_are_not_normalized() {
        let color = Color::from_columns(&["3", " Navy ", "80", "-1", "0", "300", "0"]).unwrap();
        assert_eq!(color.name, " Navy ");
        assert_eq!(color.hex, "80");
        assert_eq!(color.red, -1);
        assert_eq!(color.blue, 300);
    }

    #[test]
    fn serializes_with_plain_field_names() {
        let color = Color::from_columns(&["2", "Lime", "00FF00", "0", "255", "0", "65280"]).unwrap();
        let json = serde_json::to_value(&color).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 2, "name": "Lime", "hex": "00FF00",
                "red": 0, "green": 255, "blue": 0, "decimal": 65280
            })
        );
    }
}
