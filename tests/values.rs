use hython::{
    diagnostics::DiagnosticKind,
    format::format_float,
    stdlib::invoke,
    value::{Dict, Value},
};

fn call(name: &str, args: &[Value]) -> Value {
    invoke(name, args, &mut std::io::sink())
        .unwrap_or_else(|err| panic!("{name} should succeed: {err}"))
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::int).collect())
}

#[test]
fn numeric_equality_crosses_variants() {
    assert_eq!(Value::int(1), Value::float(1.0));
    assert_eq!(Value::bool(true), Value::int(1));
    assert_eq!(Value::bool(false), Value::float(0.0));
    assert_ne!(Value::int(1), Value::float(1.5));
    assert_ne!(Value::float(f64::NAN), Value::float(f64::NAN));
    assert_ne!(Value::int(1), Value::string("1"));
    assert_ne!(Value::none(), Value::int(0));
    assert_eq!(Value::none(), Value::none());
    // 2^53 + 1 is not representable as a float, so the two differ.
    assert_ne!(Value::int(9_007_199_254_740_993), Value::float(9_007_199_254_740_992.0));
}

#[test]
fn container_equality_is_structural() {
    assert_eq!(ints(&[1, 2]), Value::list(vec![Value::float(1.0), Value::int(2)]));
    assert_ne!(ints(&[1, 2]), Value::tuple(vec![Value::int(1), Value::int(2)]));

    let mut left = Dict::new();
    left.insert(Value::string("a"), Value::int(1)).unwrap();
    left.insert(Value::string("b"), Value::int(2)).unwrap();
    let mut right = Dict::new();
    right.insert(Value::string("b"), Value::float(2.0)).unwrap();
    right.insert(Value::string("a"), Value::int(1)).unwrap();
    assert_eq!(Value::dict(left), Value::dict(right));

    let five = call("range", &[Value::int(5)]);
    assert_eq!(five, call("range", &[Value::int(0), Value::int(5), Value::int(1)]));
    assert_eq!(
        call("range", &[Value::int(0)]),
        call("range", &[Value::int(3), Value::int(1)])
    );
    assert_ne!(five, ints(&[0, 1, 2, 3, 4]));
}

#[test]
fn lazy_wrappers_compare_by_identity() {
    let source = ints(&[1, 2]);
    let first = call("enumerate", &[source.clone()]);
    let second = call("enumerate", &[source]);
    assert_ne!(first, second);
    assert_eq!(first, first.clone());
}

#[test]
fn cloning_a_list_aliases_it() {
    let list = ints(&[1]);
    let alias = list.clone();
    alias.append(Value::int(2)).unwrap();
    assert!(list.is_same(&alias));
    assert_eq!(list.to_string(), "[1, 2]");

    let copy = call("list", &[list.clone()]);
    copy.append(Value::int(3)).unwrap();
    assert_eq!(list.to_string(), "[1, 2]");
    assert_eq!(copy.to_string(), "[1, 2, 3]");
}

#[test]
fn nested_lists_share_inner_objects() {
    let inner = ints(&[1]);
    let outer = Value::list(vec![inner.clone(), inner.clone()]);
    inner.append(Value::int(2)).unwrap();
    assert_eq!(outer.to_string(), "[[1, 2], [1, 2]]");
}

#[test]
fn self_referencing_containers_render_and_compare() {
    let list = ints(&[1]);
    list.append(list.clone()).unwrap();
    assert_eq!(call("str", &[list.clone()]).to_string(), "[1, [...]]");
    assert_eq!(list.repr(), "[1, [...]]");

    let wrapper = Value::list(vec![list.clone(), list.clone()]);
    assert_eq!(wrapper.to_string(), "[[1, [...]], [1, [...]]]");

    let dict = Value::dict(Dict::new());
    dict.set_item(&Value::string("self"), dict.clone()).unwrap();
    dict.set_item(&Value::string("items"), list.clone()).unwrap();
    assert_eq!(dict.to_string(), "{'self': {...}, 'items': [1, [...]]}");

    let twin = ints(&[1]);
    twin.append(twin.clone()).unwrap();
    assert_eq!(list, twin);
    assert_eq!(twin.to_string(), "[1, [...]]");

    let other = ints(&[2]);
    other.append(other.clone()).unwrap();
    assert_ne!(list, other);
    assert_eq!(list.compare(&other).unwrap(), std::cmp::Ordering::Less);

    // Cycles that only differ past the cycle never settle.
    let left = Value::list(Vec::new());
    left.append(left.clone()).unwrap();
    left.append(Value::int(1)).unwrap();
    let right = Value::list(Vec::new());
    right.append(right.clone()).unwrap();
    right.append(Value::int(2)).unwrap();
    assert_eq!(left.compare(&right).unwrap_err().kind(), Some(DiagnosticKind::Value));
}

#[test]
fn dict_keys_unify_equal_numbers() {
    let mut entries = Dict::new();
    entries.insert(Value::int(1), Value::string("int")).unwrap();
    let previous = entries.insert(Value::float(1.0), Value::string("float")).unwrap();
    assert_eq!(previous, Some(Value::string("int")));
    entries.insert(Value::bool(true), Value::string("bool")).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(Value::dict(entries).to_string(), "{1: 'bool'}");

    let mut entries = Dict::new();
    let key = Value::tuple(vec![Value::int(1), Value::string("x")]);
    entries.insert(key.clone(), Value::none()).unwrap();
    assert!(entries.contains_key(&key).unwrap());
    let err = entries.insert(ints(&[1]), Value::none()).unwrap_err();
    assert_eq!(err.kind(), Some(DiagnosticKind::TypeMismatch));
}

#[test]
fn item_access() {
    let list = ints(&[10, 20, 30]);
    assert_eq!(list.get_item(&Value::int(-1)).unwrap(), Value::int(30));
    assert_eq!(list.get_item(&Value::bool(true)).unwrap(), Value::int(20));
    assert_eq!(
        list.get_item(&Value::int(3)).unwrap_err().kind(),
        Some(DiagnosticKind::Value)
    );
    assert_eq!(
        list.get_item(&Value::string("0")).unwrap_err().kind(),
        Some(DiagnosticKind::TypeMismatch)
    );
    list.set_item(&Value::int(0), Value::string("x")).unwrap();
    assert_eq!(list.to_string(), "['x', 20, 30]");

    assert_eq!(Value::string("héllo").get_item(&Value::int(1)).unwrap(), Value::string("é"));

    let dict = Value::dict(Dict::new());
    dict.set_item(&Value::string("k"), Value::int(1)).unwrap();
    assert_eq!(dict.get_item(&Value::string("k")).unwrap(), Value::int(1));
    assert_eq!(
        dict.get_item(&Value::string("missing")).unwrap_err().kind(),
        Some(DiagnosticKind::Value)
    );
    assert_eq!(
        Value::int(1).get_item(&Value::int(0)).unwrap_err().kind(),
        Some(DiagnosticKind::TypeMismatch)
    );
}

#[test]
fn addition_and_membership() {
    assert_eq!(Value::int(2).add(&Value::float(0.5)).unwrap(), Value::float(2.5));
    assert_eq!(
        Value::string("Hy").add(&Value::string("thon")).unwrap(),
        Value::string("Hython")
    );
    assert_eq!(ints(&[1]).add(&ints(&[2])).unwrap(), ints(&[1, 2]));
    assert_eq!(
        Value::int(i64::MAX).add(&Value::int(1)).unwrap_err().kind(),
        Some(DiagnosticKind::Value)
    );
    assert_eq!(
        Value::string("a").add(&Value::int(1)).unwrap_err().kind(),
        Some(DiagnosticKind::TypeMismatch)
    );

    assert!(Value::string("python").contains(&Value::string("yth")).unwrap());
    assert!(ints(&[1, 2]).contains(&Value::float(2.0)).unwrap());
    assert!(call("range", &[Value::int(10)]).contains(&Value::int(9)).unwrap());
    assert!(!call("range", &[Value::int(10)]).contains(&Value::int(10)).unwrap());
    assert!(Value::int(3).contains(&Value::int(3)).is_err());
}

#[test]
fn str_of_floats() {
    let render = |f: f64| call("str", &[Value::float(f)]).to_string();
    assert_eq!(render(123456789.0), "123456789.0");
    assert_eq!(render(0.5e-4), "5e-05");
    assert_eq!(format_float(2.0 / 3.0), "0.6666666666666666");
}

#[test]
fn debug_output_is_the_repr() {
    let value = Value::list(vec![Value::string("a"), Value::none()]);
    assert_eq!(format!("{value:?}"), "['a', None]");
}
