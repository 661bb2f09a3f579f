use haystack_core::zinc::{read_grid, write_grid};
use haystack_core::{Grid, JsonCodec};
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .canonicalize()
        .expect("workspace root should be resolvable")
}

fn fixture_files() -> Vec<PathBuf> {
    let fixture_dir = workspace_root().join("fixtures/golden");
    let mut files = fs::read_dir(&fixture_dir)
        .expect("fixtures directory should exist")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "zinc"))
        .collect::<Vec<_>>();
    files.sort();
    assert!(
        !files.is_empty(),
        "expected at least one zinc fixture in {}",
        fixture_dir.display()
    );
    files
}

fn read_fixture(path: &Path) -> (String, Grid) {
    let text = fs::read_to_string(path).expect("fixture must be readable");
    let grid = read_grid(&text)
        .unwrap_or_else(|e| panic!("fixture {} failed to parse: {e}", path.display()));
    (text, grid)
}

#[test]
fn golden_fixtures_round_trip_byte_for_byte() {
    for fixture in fixture_files() {
        let (text, grid) = read_fixture(&fixture);
        assert_eq!(
            write_grid(&grid),
            text,
            "fixture {} did not re-encode identically",
            fixture.display()
        );
    }
}

#[test]
fn golden_fixtures_round_trip_through_json() {
    for fixture in fixture_files() {
        let (_, grid) = read_fixture(&fixture);
        let json = grid.to_json();
        let back = Grid::from_json(&json)
            .unwrap_or_else(|e| panic!("fixture {} failed JSON decode: {e}", fixture.display()));
        assert_eq!(back, grid, "fixture {}", fixture.display());
    }
}

#[test]
fn golden_fixtures_declare_version() {
    for fixture in fixture_files() {
        let (text, grid) = read_fixture(&fixture);
        assert!(text.starts_with("ver:\"3.0\""), "{}", fixture.display());
        assert_eq!(grid.meta().get_str("ver"), Some("3.0"));
        assert!(!grid.cols().is_empty());
    }
}
