// Parser for the `Type` column of SHOW COLUMNS:
//   int(11) unsigned, varchar(255), decimal(10,2), enum('a','b'), set('x','it''s'), datetime

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{anychar, char, digit1, multispace0, none_of},
    combinator::{map, map_res, opt, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded},
    IResult,
};
use crate::core::{Length, SqlType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub sql_type: SqlType,
    pub length: Option<Length>,
    /// Members of an enum or set, unescaped.
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Arg {
    Number(u32),
    Quoted(String),
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn type_name(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

// 'it''s' and 'back\\slash'
fn quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(
            char('\''),
            many0(alt((
                value('\'', tag("''")),
                preceded(char('\\'), anychar),
                none_of("'\\"),
            ))),
            char('\''),
        ),
        |chars: Vec<char>| chars.into_iter().collect(),
    )(input)
}

fn number(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>)(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<Arg>> {
    delimited(
        ws(char('(')),
        separated_list0(
            ws(char(',')),
            alt((map(quoted, Arg::Quoted), map(number, Arg::Number))),
        ),
        ws(char(')')),
    )(input)
}

fn descriptor(input: &str) -> IResult<&str, (&str, Option<Vec<Arg>>)> {
    pair(ws(type_name), opt(arguments))(input)
}

/// Parses a column type descriptor. Never fails: an unrecognized name becomes
/// [`SqlType::Other`] and malformed parenthesized metadata is ignored.
#[must_use]
pub fn parse_column_type(descriptor_text: &str) -> ColumnType {
    let Ok((_, (name, args))) = descriptor(descriptor_text) else {
        return ColumnType {
            sql_type: SqlType::from_name(descriptor_text.trim()),
            length: None,
            values: None,
        };
    };

    let sql_type = SqlType::from_name(name);
    let args = args.unwrap_or_default();

    if matches!(sql_type, SqlType::Enum | SqlType::Set) {
        let values = args
            .into_iter()
            .filter_map(|arg| match arg {
                Arg::Quoted(s) => Some(s),
                Arg::Number(n) => Some(n.to_string()),
            })
            .collect();
        return ColumnType { sql_type, length: None, values: Some(values) };
    }

    let numbers: Vec<u32> = args
        .iter()
        .filter_map(|arg| match arg {
            Arg::Number(n) => Some(*n),
            Arg::Quoted(_) => None,
        })
        .collect();

    let length = match (&sql_type, numbers.as_slice()) {
        (_, []) => None,
        (SqlType::Decimal, [precision, scale, ..]) => Some(Length::Precision { precision: *precision, scale: *scale }),
        (SqlType::Decimal, [precision]) => Some(Length::Precision { precision: *precision, scale: 0 }),
        (_, [size, ..]) => Some(Length::Size(*size)),
    };

    ColumnType { sql_type, length, values: None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_types() {
        let t = parse_column_type("datetime");
        assert_eq!(t.sql_type, SqlType::DateTime);
        assert_eq!(t.length, None);
        assert_eq!(t.values, None);

        assert_eq!(parse_column_type("INT").sql_type, SqlType::Int);
    }

    #[test]
    fn test_sized_types() {
        assert_eq!(parse_column_type("varchar(255)").length, Some(Length::Size(255)));
        let t = parse_column_type("int(11) unsigned");
        assert_eq!(t.sql_type, SqlType::Int);
        assert_eq!(t.length, Some(Length::Size(11)));
    }

    #[test]
    fn test_decimal_precision() {
        let t = parse_column_type("decimal(10,2)");
        assert_eq!(t.sql_type, SqlType::Decimal);
        assert_eq!(t.length, Some(Length::Precision { precision: 10, scale: 2 }));
        assert_eq!(
            parse_column_type("decimal(8)").length,
            Some(Length::Precision { precision: 8, scale: 0 })
        );
    }

    #[test]
    fn test_enum_and_set_members() {
        let t = parse_column_type("set('a','b')");
        assert_eq!(t.sql_type, SqlType::Set);
        assert_eq!(t.values, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(t.length, None);

        let t = parse_column_type("enum('it''s', 'x,y', 'back\\\\slash')");
        assert_eq!(
            t.values,
            Some(vec!["it's".to_string(), "x,y".to_string(), "back\\slash".to_string()])
        );
    }

    #[test]
    fn test_malformed_metadata_is_ignored() {
        let t = parse_column_type("varchar(");
        assert_eq!(t.sql_type, SqlType::Varchar);
        assert_eq!(t.length, None);

        assert_eq!(parse_column_type("geometry").sql_type, SqlType::Other("geometry".to_string()));
    }
}
