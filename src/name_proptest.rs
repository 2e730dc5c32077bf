//! Property-based tests for names, enable state, paths and line joining.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::config::logical_expressions;
    use crate::directory::DirectoryPath;
    use crate::enable::EnableState;
    use crate::name::PackageName;
    use crate::path::normalize;
    use crate::registry::Registry;
    use proptest::prelude::*;
    use std::path::{Component, Path, PathBuf};

    fn name_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,6}([/-][a-z0-9_]{1,6}){0,2}"
    }

    // ============================================================================
    // PackageName
    // ============================================================================

    proptest! {
        /// Property: canonicalization is idempotent
        #[test]
        fn package_name_is_idempotent(input in name_strategy()) {
            let once = PackageName::new(&input);
            let twice = PackageName::new(once.as_str());
            prop_assert_eq!(once, twice);
        }

        /// Property: `/` and `-` spellings name the same package
        #[test]
        fn package_name_separator_symmetry(input in name_strategy()) {
            let slashed = input.replace('-', "/");
            let hyphenated = input.replace('/', "-");
            prop_assert_eq!(PackageName::new(&slashed), PackageName::new(&hyphenated));
        }

        /// Property: the canonical spelling never contains `/`
        #[test]
        fn package_name_has_no_slash(input in name_strategy()) {
            prop_assert!(!PackageName::new(&input).as_str().contains('/'));
        }
    }

    // ============================================================================
    // EnableState
    // ============================================================================

    #[derive(Debug, Clone)]
    enum Op {
        Enable(String),
        Disable(String),
        EnableAll,
        DisableAll,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-d]".prop_map(Op::Enable),
            "[a-d]".prop_map(Op::Disable),
            Just(Op::EnableAll),
            Just(Op::DisableAll),
        ]
    }

    proptest! {
        /// Property: no name is ever both enabled and disabled
        #[test]
        fn enable_sets_stay_disjoint(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut state = EnableState::new();
            for op in ops {
                match op {
                    Op::Enable(name) => state.enable(PackageName::new(&name)),
                    Op::Disable(name) => state.disable(PackageName::new(&name)),
                    Op::EnableAll => state.enable_all(),
                    Op::DisableAll => state.disable_all(),
                }
                for name in state.enabled_names() {
                    prop_assert!(!state.disabled_names().contains(name));
                }
            }
        }

        /// Property: the last per-name operation decides should-attempt
        #[test]
        fn last_name_operation_wins(ops in prop::collection::vec(op_strategy(), 0..40), name in "[a-d]") {
            let mut state = EnableState::new();
            let target = PackageName::new(&name);
            for op in ops {
                match op {
                    Op::Enable(name) => state.enable(PackageName::new(&name)),
                    Op::Disable(name) => state.disable(PackageName::new(&name)),
                    Op::EnableAll => state.enable_all(),
                    Op::DisableAll => state.disable_all(),
                }
            }
            state.enable(target.clone());
            prop_assert!(state.should_attempt(&target));
            state.disable(target.clone());
            prop_assert!(!state.should_attempt(&target));
        }
    }

    // ============================================================================
    // Paths and directories
    // ============================================================================

    fn segments_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop_oneof!["[a-z]{1,5}", Just(".".to_string()), Just("..".to_string())], 0..8)
    }

    proptest! {
        /// Property: normalizing an absolute path leaves no `.` or `..`
        #[test]
        fn normalize_removes_dot_components(segments in segments_strategy()) {
            let path = PathBuf::from(format!("/{}", segments.join("/")));
            let normalized = normalize(&path);
            prop_assert!(normalized.is_absolute());
            prop_assert!(normalized
                .components()
                .all(|c| !matches!(c, Component::CurDir | Component::ParentDir)));
            prop_assert_eq!(normalize(&normalized), normalized.clone());
        }

        /// Property: a relative directory always follows its base
        #[test]
        fn relative_directory_is_live(
            first in "[a-z]{1,6}",
            second in "[a-z]{1,6}",
            rest in "[a-z]{1,6}(/[a-z]{1,6}){0,2}",
        ) {
            let mut registry = Registry::new();
            registry.directory("base", DirectoryPath::absolute(format!("/{}", first))).unwrap();
            registry.directory("child", DirectoryPath::relative("base", &rest)).unwrap();
            prop_assert_eq!(
                registry.directory_path("child"),
                Some(Path::new("/").join(&first).join(&rest))
            );

            registry.directory("base", DirectoryPath::absolute(format!("/{}", second))).unwrap();
            prop_assert_eq!(
                registry.directory_path("child"),
                Some(Path::new("/").join(&second).join(&rest))
            );
        }
    }

    // ============================================================================
    // Line joining
    // ============================================================================

    fn line_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z+=@!~/ ,-]{0,12}",
            "  [a-z, ]{1,10}",
            "# [a-z ]{0,10}",
            Just(String::new()),
        ]
    }

    proptest! {
        /// Property: every logical expression starts on a line that is
        /// neither blank nor a comment, and lines only grow in order
        #[test]
        fn logical_expressions_start_on_content_lines(lines in prop::collection::vec(line_strategy(), 0..20)) {
            let source = lines.join("\n");
            let expressions = logical_expressions(&source);
            let mut previous = 0;
            for expression in &expressions {
                prop_assert!(expression.line > previous);
                previous = expression.line;
                let line = &lines[expression.line - 1];
                let trimmed = line.trim();
                prop_assert!(!trimmed.is_empty());
                prop_assert!(!trimmed.starts_with('#'));
                prop_assert!(expression.text.starts_with(trimmed));
                prop_assert!(!expression.text.contains('\n'));
            }
        }
    }
}
