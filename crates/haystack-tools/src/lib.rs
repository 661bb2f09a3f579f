use clap::ValueEnum;
use haystack_core::{zinc, Grid, Value};
use std::io::Read;
use std::path::Path;

/// Output encoding selectable on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Zinc,
    Json,
}

impl OutputFormat {
    /// Renders a grid in this format.
    pub fn render(self, grid: &Grid, pretty: bool) -> Result<String, serde_json::Error> {
        match self {
            Self::Zinc => Ok(zinc::write_grid(grid)),
            Self::Json => render_json(&Value::from(grid.clone()), pretty),
        }
    }
}

/// Reads `path`, or standard input when no path is given.
pub fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

pub fn render_json(val: &Value, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(val)
    } else {
        serde_json::to_string(val)
    }
}

/// Decodes JSON text into a value and writes it back out as Zinc.
pub fn json_to_zinc(text: &str) -> Result<String, serde_json::Error> {
    let val: Value = serde_json::from_str(text)?;
    Ok(match val {
        Value::Grid(grid) => zinc::write_grid(&grid),
        other => other.to_zinc(),
    })
}

#[cfg(test)]
mod tests {
    use super::{json_to_zinc, render_json, OutputFormat};
    use haystack_core::{zinc, Value};

    #[test]
    fn zinc_value_to_json_and_back() {
        let val = zinc::read_value("{site dis:\"HQ\" area:12000ft²}").unwrap();
        let json = render_json(&val, false).unwrap();
        assert_eq!(
            json,
            r#"{"area":{"_kind":"number","unit":"ft²","val":12000},"dis":"HQ","site":{"_kind":"marker"}}"#
        );
        assert_eq!(json_to_zinc(&json).unwrap(), "{area:12000ft² dis:\"HQ\" site}");
    }

    #[test]
    fn grids_render_in_both_formats() {
        let text = "ver:\"3.0\"\nid,dis\n@a,\"A\"\n";
        let grid = zinc::read_grid(text).unwrap();
        assert_eq!(OutputFormat::Zinc.render(&grid, false).unwrap(), text);

        let json = OutputFormat::Json.render(&grid, true).unwrap();
        assert!(json.contains("\"_kind\": \"grid\""));
        assert_eq!(json_to_zinc(&json).unwrap(), text);
    }

    #[test]
    fn rejects_bad_json() {
        assert!(json_to_zinc("{\"_kind\": \"bogus\"}").is_err());
        assert!(json_to_zinc("[1,").is_err());
        assert_eq!(json_to_zinc("null").unwrap(), Value::Null.to_zinc());
    }
}
