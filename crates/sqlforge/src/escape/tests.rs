use super::*;

/// Reverse of `quote_str` as the server reads a quoted literal.
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('\0'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('Z') => out.push('\x1a'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[test]
fn protect_identifier_cases() {
    assert_eq!(protect_identifier("*"), "*");
    assert_eq!(protect_identifier("foo"), "`foo`");
    assert_eq!(protect_identifier("`foo`"), "```foo```");
    assert_eq!(protect_identifier("foo `bar"), "`foo ``bar`");
    assert_eq!(protect_identifier("foo.bar"), "`foo`.`bar`");
    assert_eq!(protect_identifier("foo.*"), "`foo`.*");
    assert_eq!(protect_identifier("`foo`.*"), "```foo```.*");
    assert_eq!(protect_identifier("db.table.*"), "`db`.`table`.*");
}

#[test]
fn protect_identifier_doubles_quote_count() {
    for name in ["a`b", "``", "x`y`z", "`"] {
        let original = name.matches('`').count();
        let quoted = protect_identifier(name);
        assert_eq!(quoted.matches('`').count(), original * 2 + 2, "{name}");
    }
}

#[test]
fn quote_scalars() {
    assert_eq!(quote(&Value::Int(0)).unwrap(), "0");
    assert_eq!(quote(&Value::Int(1)).unwrap(), "1");
    assert_eq!(quote(&Value::Int(-1)).unwrap(), "-1");
    assert_eq!(quote(&Value::UInt(18446744073709551615)).unwrap(), "18446744073709551615");
    assert_eq!(quote(&Value::Float(1.1)).unwrap(), "1.1");
    assert_eq!(quote(&Value::Float(-1.1)).unwrap(), "-1.1");
    assert_eq!(quote(&Value::Null).unwrap(), "NULL");
    assert_eq!(quote(&Value::Bool(true)).unwrap(), "TRUE");
    assert_eq!(quote(&Value::Bool(false)).unwrap(), "FALSE");
}

#[test]
fn quote_strings() {
    assert_eq!(quote(&Value::from("0")).unwrap(), "'0'");
    assert_eq!(quote(&Value::from("ab'c")).unwrap(), r"'ab\'c'");
    assert_eq!(quote(&Value::from("ab\"cd\"\"")).unwrap(), r#"'ab\"cd\"\"'"#);
    assert_eq!(quote(&Value::from(r"a\b")).unwrap(), r"'a\\b'");
}

#[test]
fn quote_rejects_unsupported_types() {
    let err = quote(&Value::List(vec![Value::Int(1)])).unwrap_err();
    assert!(matches!(err, DbError::Type(_)));
    assert!(err.to_string().contains("list"));

    let err = quote(&Value::Bytes(vec![1, 2])).unwrap_err();
    assert!(matches!(err, DbError::Type(_)));

    let err = quote(&Value::Float(f64::NAN)).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn quoted_strings_round_trip() {
    let samples = [
        "",
        "plain",
        "it's",
        "back\\slash",
        "quote\"d",
        "nul\0byte",
        "line\nbreak\r\n",
        "ctrl\x1az",
        "ünïcödé ✓",
        "\\'\\\"",
    ];
    for s in samples {
        assert_eq!(unescape(&quote_str(s)), s, "{s:?}");
    }
}
