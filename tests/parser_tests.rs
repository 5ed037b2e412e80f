mod common;

use common::{literal, node};
use jsonx::generators::GeneratorKind;
use jsonx::{parse, parse_str, Node, ParseError};
use serde::Serialize;
use serde_json::json;

#[test]
fn escapes() {
    assert_eq!(parse_str("$$").unwrap(), Node::from("$"));
    assert_eq!(
        parse_str("$$$$").unwrap(),
        Node::Concatenation(vec![Node::from("$"), Node::from("$")])
    );
    assert_eq!(
        parse_str("$$$someVar").unwrap(),
        Node::Concatenation(vec![Node::from("$"), Node::VarExpansion("someVar".into())])
    );
}

#[test]
fn single_placeholder_is_not_wrapped() {
    assert_eq!(parse_str("${aVar}").unwrap(), Node::VarExpansion("aVar".into()));
    assert_eq!(parse_str("$(aVar)").unwrap(), Node::Extractor("aVar".into()));
    assert_eq!(
        parse_str("${:random.email}").unwrap(),
        Node::RandomValue {
            bind: None,
            kind: GeneratorKind::Email,
            config: String::new(),
        }
    );
}

#[test]
fn fragments_keep_source_order() {
    assert_eq!(
        parse_str("prefix ${aVar} middle $(other) suffix").unwrap(),
        Node::Concatenation(vec![
            Node::from("prefix "),
            Node::VarExpansion("aVar".into()),
            Node::from(" middle "),
            Node::Extractor("other".into()),
            Node::from(" suffix"),
        ])
    );
}

#[test]
fn nested_documents() {
    let parsed = node(json!({
        "user": {"name": "${:random.name}", "age": 33, "admin": false},
        "tags": ["a", "$tag", null],
    }));
    let expected = Node::map([
        (
            "user",
            Node::map([
                (
                    "name",
                    Node::RandomValue {
                        bind: None,
                        kind: GeneratorKind::Name,
                        config: String::new(),
                    },
                ),
                ("age", Node::Int(33)),
                ("admin", Node::Bool(false)),
            ]),
        ),
        (
            "tags",
            Node::Array(vec![Node::from("a"), Node::VarExpansion("tag".into()), Node::Null]),
        ),
    ]);
    assert_eq!(parsed, expected);
}

#[test]
fn rust_structs_are_host_values() {
    #[derive(Serialize)]
    struct Request<'a> {
        url: &'a str,
        retries: u8,
        headers: Vec<(&'a str, &'a str)>,
        body: Option<&'a str>,
    }

    let parsed = parse(&Request {
        url: "/users/$id",
        retries: 3,
        headers: vec![("Authorization", "Bearer ${token}")],
        body: None,
    })
    .unwrap();

    let map = parsed.as_map().unwrap();
    assert!(matches!(map["url"], Node::Concatenation(_)));
    assert_eq!(map["retries"], Node::Int(3));
    assert_eq!(map["body"], Node::Null);
    let header = &map["headers"].as_array().unwrap()[0];
    assert_eq!(header.as_array().unwrap()[0], Node::from("Authorization"));
}

#[test]
fn reparsing_a_node_is_identity() {
    let parsed = node(json!({
        "greeting": "Hi ${name}, you owe $$5",
        "id": "${id:random.regex:/[a-f0-9]{8}/}",
        "capture": "$(token)",
        "plain": "no placeholders",
    }));
    assert_eq!(parse(&parsed).unwrap(), parsed);
    assert_eq!(
        parse(&vec![parsed.clone(), parsed.clone()]).unwrap(),
        Node::Array(vec![parsed.clone(), parsed])
    );
}

#[test]
fn literal_values_are_not_scanned() {
    assert_eq!(literal(json!("${x}")), Node::from("${x}"));
}

#[test]
fn errors_carry_position() {
    let err = parse_str("abc ${oops").unwrap_err();
    assert!(matches!(err, ParseError::Unterminated { .. }));
    assert_eq!(err.position(), Some(4));
    assert!(err.to_string().contains("abc ${oops"));

    let err = parse_str("${x:random.nope}").unwrap_err();
    assert!(matches!(err, ParseError::UnknownGenerator { .. }));
}

#[test]
fn non_integral_numbers_are_rejected() {
    assert!(matches!(
        parse(&json!({"price": 9.99})).unwrap_err(),
        ParseError::Unsupported { .. }
    ));
}
