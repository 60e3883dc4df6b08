use pillar_citools::report::ReportRenderer;
use pillar_citools::{ConfigTree, ConfigValue, Delta, KeyPath, Scalar, diff};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("common"),
        Just("ghar"),
        Just("salt"),
        Just("lookup"),
        Just("token"),
        Just("demo_key01"),
        Just("demo_key02"),
    ]
    .prop_map(String::from)
}

fn scalar_strategy() -> impl Strategy<Value = ConfigValue> {
    prop_oneof![
        Just(ConfigValue::Scalar(Scalar::Null)),
        any::<bool>().prop_map(ConfigValue::from),
        (-3_i64..3).prop_map(ConfigValue::from),
        // Same small numbers as floats, so int/float pairs meet.
        (-3_i64..3).prop_map(|n| ConfigValue::from(n as f64)),
        any::<f64>().prop_map(ConfigValue::from),
        Just(ConfigValue::from(f64::NAN)),
        Just(ConfigValue::from(f64::INFINITY)),
        any::<u64>().prop_map(ConfigValue::from),
        (u64::MAX - 2..=u64::MAX).prop_map(ConfigValue::from),
        "[a-z]{0,6}".prop_map(ConfigValue::from),
    ]
}

fn value_strategy() -> impl Strategy<Value = ConfigValue> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        proptest::collection::btree_map(key_strategy(), inner, 0..4)
            .prop_map(|map| ConfigValue::from(ConfigTree::from(map)))
    })
}

fn tree_strategy() -> impl Strategy<Value = ConfigTree> {
    proptest::collection::btree_map(key_strategy(), value_strategy(), 0..5).prop_map(ConfigTree::from)
}

proptest! {
    #[test]
    fn identical_trees_have_no_deltas(tree in tree_strategy()) {
        prop_assert!(diff(&tree, &tree).expect("diff").is_empty());
        prop_assert!(diff(&tree, &tree.clone()).expect("diff").is_empty());
    }

    #[test]
    fn scalar_equality_is_symmetric(a in scalar_strategy(), b in scalar_strategy()) {
        prop_assert_eq!(a == b, b == a);
        prop_assert!(a == a.clone());
    }

    #[test]
    fn diff_is_deterministic(base in tree_strategy(), incoming in tree_strategy()) {
        let first = diff(&base, &incoming).expect("diff");
        let second = diff(&base, &incoming).expect("diff");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn swapping_sides_inverts_every_delta(base in tree_strategy(), incoming in tree_strategy()) {
        let forward: Vec<Delta> = diff(&base, &incoming)
            .expect("diff")
            .into_iter()
            .map(Delta::inverted)
            .collect();
        let backward = diff(&incoming, &base).expect("diff");
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn unrelated_key_appends_one_added_delta(
        base in tree_strategy(),
        incoming in tree_strategy(),
        extra in value_strategy(),
    ) {
        let mut expected = diff(&base, &incoming).expect("diff");
        let widened = incoming.with("zz_unrelated", extra.clone());
        expected.push(Delta::Added {
            path: KeyPath::from(&["zz_unrelated"][..]),
            value: extra,
        });

        prop_assert_eq!(diff(&base, &widened).expect("diff"), expected);
    }

    #[test]
    fn changes_stay_inside_their_namespace(
        base in tree_strategy(),
        old in value_strategy(),
        new in value_strategy(),
    ) {
        let before = base.clone().with("zz_changed", old);
        let after = base.with("zz_changed", new);

        for delta in diff(&before, &after).expect("diff") {
            prop_assert_eq!(delta.path().namespace(), Some("zz_changed"));
        }
    }

    #[test]
    fn clean_hosts_never_reach_the_report(tree in tree_strategy()) {
        let deltas = diff(&tree, &tree).expect("diff");
        let rendered = ReportRenderer::new().render(vec![("clean.local", deltas)]);

        prop_assert!(rendered.text.is_empty());
        prop_assert!(rendered.structured.changes.is_empty());
    }

    #[test]
    fn rendering_is_deterministic(base in tree_strategy(), incoming in tree_strategy()) {
        let deltas = diff(&base, &incoming).expect("diff");
        let renderer = ReportRenderer::new();

        let first = renderer.render(vec![("web01.local", deltas.clone())]);
        let second = renderer.render(vec![("web01.local", deltas)]);
        prop_assert_eq!(first, second);
    }
}
