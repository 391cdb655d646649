use hython::{stdlib::invoke, value::Value};
use proptest::prelude::*;

fn call(name: &str, args: &[Value]) -> Value {
    invoke(name, args, &mut std::io::sink())
        .unwrap_or_else(|err| panic!("{name} should succeed: {err}"))
}

fn list_of(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::int).collect())
}

fn ints_of(value: &Value) -> Vec<i64> {
    call("list", &[value.clone()])
        .to_vec()
        .expect("list")
        .iter()
        .map(|item| item.as_int().expect("integer element"))
        .collect()
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::none()),
        any::<bool>().prop_map(Value::bool),
        any::<i64>().prop_map(Value::int),
        (-1e6f64..1e6).prop_map(Value::float),
        "[a-z]{0,4}".prop_map(Value::string),
    ]
}

proptest! {
    #[test]
    fn prop_sorted_is_an_ordered_permutation(values in prop::collection::vec(any::<i64>(), 0..32)) {
        let sorted = ints_of(&call("sorted", &[list_of(&values)]));
        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn prop_sorted_never_panics_on_nan(
        values in prop::collection::vec(prop::option::weighted(0.9, -100i64..100), 0..320)
    ) {
        let items: Vec<Value> = values
            .iter()
            .map(|v| v.map_or_else(|| Value::float(f64::NAN), Value::int))
            .collect();
        let sorted = call("sorted", &[Value::list(items)]).to_vec().expect("list");
        let mut expected: Vec<i64> = values.iter().flatten().copied().collect();
        expected.sort();
        let mut seen: Vec<i64> = sorted.iter().filter_map(Value::as_int).collect();
        seen.sort();
        prop_assert_eq!(sorted.len(), values.len());
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_sorted_is_idempotent(values in prop::collection::vec(-50i64..50, 0..32)) {
        let once = call("sorted", &[list_of(&values)]);
        let twice = call("sorted", &[once.clone()]);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_reversed_twice_is_identity(values in prop::collection::vec(any::<i64>(), 0..32)) {
        let source = list_of(&values);
        let back = call("reversed", &[call("reversed", &[source])]);
        prop_assert_eq!(ints_of(&back), values);
    }

    #[test]
    fn prop_reversed_range_matches_reversed_list(
        start in -20i64..20,
        stop in -20i64..20,
        step in prop_oneof![-5i64..0, 1i64..6]
    ) {
        let range = call("range", &[Value::int(start), Value::int(stop), Value::int(step)]);
        let mut forward = ints_of(&range);
        forward.reverse();
        prop_assert_eq!(ints_of(&call("reversed", &[range])), forward);
    }

    #[test]
    fn prop_min_and_max_bound_every_element(values in prop::collection::vec(any::<i64>(), 1..32)) {
        let list = list_of(&values);
        let low = call("min", &[list.clone()]).as_int().expect("int");
        let high = call("max", &[list]).as_int().expect("int");
        prop_assert!(values.iter().all(|v| low <= *v && *v <= high));
        prop_assert!(values.contains(&low) && values.contains(&high));
    }

    #[test]
    fn prop_sum_matches_fold(
        values in prop::collection::vec(-1_000_000i64..1_000_000, 0..32),
        start in -1000i64..1000
    ) {
        let total = call("sum", &[list_of(&values), Value::int(start)]);
        prop_assert_eq!(total, Value::int(start + values.iter().sum::<i64>()));
    }

    #[test]
    fn prop_sum_is_associative(
        left in prop::collection::vec(-1000i64..1000, 0..16),
        right in prop::collection::vec(-1000i64..1000, 0..16)
    ) {
        let whole: Vec<i64> = left.iter().chain(&right).copied().collect();
        let head = call("sum", &[list_of(&left)]);
        let split = call("sum", &[list_of(&right), head]);
        prop_assert_eq!(call("sum", &[list_of(&whole)]), split);
    }

    #[test]
    fn prop_singleton_any_all_follow_truthiness(value in arb_scalar()) {
        let truthy = call("bool", &[value.clone()]);
        let single = Value::list(vec![value]);
        prop_assert_eq!(call("any", &[single.clone()]), truthy.clone());
        prop_assert_eq!(call("all", &[single]), truthy);
    }

    #[test]
    fn prop_range_counts_up_from_zero(stop in -10i64..200) {
        let expected: Vec<i64> = (0..stop.max(0)).collect();
        prop_assert_eq!(ints_of(&call("range", &[Value::int(stop)])), expected);
    }

    #[test]
    fn prop_enumerate_pairs_with_offsets(
        values in prop::collection::vec(any::<i64>(), 0..16),
        start in -100i64..100
    ) {
        let pairs = call("list", &[call("enumerate", &[list_of(&values), Value::int(start)])]);
        let pairs = pairs.to_vec().expect("list");
        prop_assert_eq!(pairs.len(), values.len());
        for (offset, (pair, value)) in pairs.iter().zip(&values).enumerate() {
            let expected = Value::pair(Value::int(start + offset as i64), Value::int(*value));
            prop_assert_eq!(pair, &expected);
        }
    }

    #[test]
    fn prop_zip_stops_at_the_shortest(
        left in prop::collection::vec(any::<i64>(), 0..16),
        right in "[a-z]{0,16}"
    ) {
        let zipped = call("list", &[call("zip", &[list_of(&left), Value::string(right.clone())])]);
        let len = zipped.to_vec().expect("list").len();
        prop_assert_eq!(len, left.len().min(right.chars().count()));
    }

    #[test]
    fn prop_int_str_round_trip(n in any::<i64>()) {
        let text = call("str", &[Value::int(n)]);
        prop_assert_eq!(call("int", &[text]), Value::int(n));
    }

    #[test]
    fn prop_float_str_round_trip(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let text = call("str", &[Value::float(f)]);
        let parsed = call("float", &[text]);
        prop_assert_eq!(parsed.to_string(), Value::float(f).to_string());
    }
}
