mod common;

use common::{eval_json, node, seeded};
use jsonx::{eval, eval_str, parse_str, Binding, Context, Error, EvalError, Node};
use serde_json::json;

#[test]
fn variable_substitution() {
    let mut ctx = seeded();
    ctx.set("aVar", "sample-value");
    assert_eq!(
        eval_str("prefix ${aVar} middle ${aVar} suffix", &mut ctx).unwrap(),
        "prefix sample-value middle sample-value suffix"
    );
}

#[test]
fn missing_variable_sentinel() {
    let mut ctx = Context::with_seed(1);
    assert_eq!(eval_str("${aVar}", &mut ctx).unwrap(), "<nil>");
}

#[test]
fn escaped_dollar_next_to_expansion() {
    let mut ctx = seeded();
    ctx.set("someInt", 987i64);
    ctx.set("result", "I don't know");
    assert_eq!(
        eval_str("The sum of $someInt plus '$$${someInt}' is ${result}", &mut ctx).unwrap(),
        "The sum of 987 plus '$987' is I don't know"
    );
}

#[test]
fn literal_round_trip() {
    let fixture = json!({
        "name": "Chrisjen",
        "ranks": [1, 2, 3],
        "active": true,
        "nothing": null,
        "nested": {"deep": [{"x": "y"}]},
    });
    for seed in [1, 2, 3] {
        let mut ctx = Context::with_seed(seed);
        assert_eq!(eval_json(fixture.clone(), &mut ctx), node(fixture.clone()));
    }
}

#[test]
fn composite_context_values_expand_structurally() {
    let mut ctx = seeded();
    ctx.set("address", json!({"city": "${city}", "zip": 1234}));
    ctx.set("city", "Ceres");
    let out = eval_json(json!({"to": "$address", "label": "to: ${city}"}), &mut ctx);
    assert_eq!(
        out,
        Node::map([
            (
                "to",
                Node::map([("city", Node::from("Ceres")), ("zip", Node::Int(1234))])
            ),
            ("label", Node::from("to: Ceres")),
        ])
    );
}

#[test]
fn composite_values_render_as_json_inside_text() {
    let mut ctx = seeded();
    ctx.set("ids", json!([1, 2]));
    ctx.set("meta", json!({"b": true, "a": null}));
    assert_eq!(
        eval_str("ids=$ids meta=$meta", &mut ctx).unwrap(),
        r#"ids=[1,2] meta={"a":null,"b":true}"#
    );
}

#[test]
fn output_is_always_literal() {
    let mut ctx = seeded();
    ctx.set("who", "Amos");
    let out = eval_json(
        json!({
            "a": "${who}",
            "b": ["x-$who", "${:random.phone}", "${id:random.string}"],
            "c": {"d": "$id"},
        }),
        &mut ctx,
    );
    assert!(out.is_literal());
    let map = out.as_map().unwrap();
    let generated = map["b"].as_array().unwrap()[2].clone();
    assert_eq!(map["c"].as_map().unwrap()["d"], generated);
}

#[test]
fn bound_random_values_are_stored_as_nodes() {
    let mut ctx = seeded();
    let value = eval(&parse_str("${email:random.email}").unwrap(), &mut ctx).unwrap();
    assert_eq!(ctx.get("email"), Some(&Binding::Node(value)));
}

#[test]
fn extractor_evaluation_fails_loudly() {
    let mut ctx = seeded();
    let err = eval_str("$(name)", &mut ctx).unwrap_err();
    assert!(matches!(err, Error::Eval(EvalError::Extractor { .. })));
}

#[test]
fn same_seed_same_generated_values() {
    let render = |seed| {
        let mut ctx = Context::with_seed(seed);
        eval_str("${:random.name} / ${:random.companyName} / ${:random.address}", &mut ctx).unwrap()
    };
    assert_eq!(render(11), render(11));
    assert_ne!(render(11), render(12));
}
