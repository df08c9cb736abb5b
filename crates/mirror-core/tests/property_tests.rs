//! Mirror invariant over randomly generated source and replica trees.

use std::sync::Arc;

use mirror_core::{MemoryLog, Reconciler};
use mirror_test_utils::MirrorFixture;
use proptest::prelude::*;

const DIRS: &[&str] = &["a", "b", "a/c"];
const FILES: &[&str] = &["x.txt", "y.txt", "z.bin"];

fn tree_strategy() -> impl Strategy<Value = Vec<(Option<&'static str>, &'static str, Vec<u8>)>> {
    prop::collection::vec(
        (
            prop::option::of(prop::sample::select(DIRS)),
            prop::sample::select(FILES),
            prop::collection::vec(any::<u8>(), 0..32),
        ),
        0..10,
    )
}

fn rel(dir: Option<&str>, file: &str) -> String {
    match dir {
        Some(dir) => format!("{dir}/{file}"),
        None => file.to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_one_pass_mirrors_and_second_is_idle(
        source in tree_strategy(),
        replica in tree_strategy(),
    ) {
        let fx = MirrorFixture::new();
        for (dir, file, content) in &source {
            fx.write_source(&rel(*dir, file), content);
        }
        for (dir, file, content) in &replica {
            fx.write_replica(&rel(*dir, file), content);
        }

        let log = Arc::new(MemoryLog::new());
        let reconciler = Reconciler::new(fx.source(), fx.replica(), log.clone());

        let first = reconciler.reconcile().unwrap();
        prop_assert!(first.is_clean());
        fx.assert_mirrored();

        log.clear();
        let second = reconciler.reconcile().unwrap();
        prop_assert_eq!(second.actions(), 0);
        prop_assert!(log.records().is_empty());
    }
}
