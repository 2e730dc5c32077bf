//! Configuration parsing tests using datatest-stable for test data discovery
//!
//! Every `.devroute` file in the testdata directory is parsed and applied to
//! a fresh registry over an in-memory filesystem. A file containing a
//! `# expect-error-line: N` comment must fail on line N; every other file
//! must load cleanly.

use devroute::config::{self, ParseOptions};
use devroute::expression::Expression;
use devroute::filesystem::MemoryFS;
use devroute::registry::Registry;
use std::path::Path;

const EXPECT_ERROR: &str = "# expect-error-line:";

fn expected_error_line(content: &str) -> Option<usize> {
    content
        .lines()
        .find_map(|line| line.trim().strip_prefix(EXPECT_ERROR))
        .and_then(|number| number.trim().parse().ok())
}

fn test_config_parsing(path: &Path) -> datatest_stable::Result<()> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read test file {}: {}", path.display(), e))?;

    let mut registry = Registry::new();
    let result = config::load(
        &mut registry,
        &MemoryFS::new(),
        &content,
        ParseOptions::default(),
    );

    if let Some(line) = expected_error_line(&content) {
        let err = match result {
            Ok(_) => return Err(format!("{} should fail on line {}", path.display(), line).into()),
            Err(err) => err,
        };
        assert_eq!(
            err.line(),
            Some(line),
            "{}: wrong error line for \"{}\"",
            path.display(),
            err
        );
        return Ok(());
    }

    let applied =
        result.map_err(|e| format!("Failed to load config from {}: {}", path.display(), e))?;
    assert!(
        applied > 0,
        "Config in {} should contain at least one expression",
        path.display()
    );

    // applying and parsing agree on what the file contains
    let schema = config::parse(&content)?;
    assert_eq!(schema.len(), applied);
    for parsed in &schema {
        if let Expression::Location { directory, .. } = &parsed.expression {
            assert!(
                registry.get_directory(directory).is_some(),
                "{}: line {} binds to undeclared directory {}",
                path.display(),
                parsed.line,
                directory
            );
        }
    }
    Ok(())
}

datatest_stable::harness!(test_config_parsing, "tests/testdata", r".*\.devroute$");
