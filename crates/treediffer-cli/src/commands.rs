use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::Value;
use tracing::debug;

use treediffer_diff::{treediff, TreeDiffOptions};
use treediffer_types::{value_kind, DiffConfig, Node};

use crate::cli::*;
use crate::render::render_text;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.output),
        Command::Preset(args) => cmd_preset(args),
    }
}

fn cmd_diff(args: DiffArgs, output: OutputFormat) -> anyhow::Result<()> {
    let tree_a = load_tree(&args.old)?;
    let tree_b = load_tree(&args.new)?;
    let options = build_options(&args)?;
    debug!(format = %options.format, sort_order_changes = options.sort_order_changes, "running diff");

    let diff = treediff(&tree_a, &tree_b, &options).context("diff failed")?;

    let rendered = match output {
        OutputFormat::Json => serde_json::to_string_pretty(&diff)? + "\n",
        OutputFormat::Text => render_text(&diff, args.out.is_none()),
    };
    match &args.out {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("{} Wrote diff to {}", "✓".green().bold(), path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_preset(args: PresetArgs) -> anyhow::Result<()> {
    let text = toml::to_string_pretty(&args.name.config())
        .with_context(|| format!("failed to serialize preset {}", args.name))?;
    println!("# preset: {}", args.name);
    print!("{text}");
    Ok(())
}

/// Read a tree from a JSON file. The top-level value must be an object.
pub fn load_tree(path: &Path) -> anyhow::Result<Node> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    match value {
        Value::Object(node) => Ok(node),
        other => bail!(
            "{} must hold a JSON object, found {}",
            path.display(),
            value_kind(&other)
        ),
    }
}

/// Read a [`DiffConfig`] from TOML, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DiffConfig> {
    let Some(path) = path else {
        return Ok(DiffConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Config file first, then the preset, then command-line overrides.
/// `--exclude` adds to the exclusions instead of replacing them.
pub fn build_options(args: &DiffArgs) -> anyhow::Result<TreeDiffOptions> {
    let mut options = TreeDiffOptions {
        config: load_config(args.config.as_deref())?,
        format: args.format,
        sort_order_changes: args.sort_order_changes,
    };
    if let Some(preset) = args.preset {
        options = options.preset(preset);
    }
    if let Some(attrs) = &args.attrs {
        options = options.attrs(attrs.iter().cloned());
    }
    options
        .config
        .exclude_attrs
        .extend(args.exclude_attrs.iter().cloned());
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use treediffer_diff::{DiffFormat, TreeDiff};
    use treediffer_types::Preset;

    fn args(old: PathBuf, new: PathBuf) -> DiffArgs {
        DiffArgs {
            old,
            new,
            config: None,
            preset: None,
            format: DiffFormat::Simplified,
            sort_order_changes: false,
            attrs: None,
            exclude_attrs: Vec::new(),
            out: None,
        }
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diff.toml");
        fs::write(
            &path,
            r#"
exclude_attrs = ["modified"]
subitems_key = "questions"

[map_b]
node_id = "id"
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.exclude_attrs, vec!["modified"]);
        assert_eq!(config.subitems_key.as_deref(), Some("questions"));
        assert_eq!(config.map_b.resolve("node_id"), "id");
        assert_eq!(config.map_a.resolve("node_id"), "node_id");
        assert_eq!(config.setlike_attrs, vec!["tags"]);
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }

    #[test]
    fn preset_and_flags_apply_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diff.toml");
        fs::write(&path, "exclude_attrs = [\"modified\"]\n").unwrap();

        let mut a = args(PathBuf::from("a.json"), PathBuf::from("b.json"));
        a.config = Some(path);
        a.preset = Some(Preset::Ricecooker);
        a.attrs = Some(vec!["title".into(), "license_id".into()]);
        a.exclude_attrs = vec!["description".into()];

        let options = build_options(&a).unwrap();
        assert_eq!(options.config.exclude_attrs, vec!["modified", "description"]);
        assert_eq!(options.config.subitems_key.as_deref(), Some("questions"));
        assert_eq!(
            options.config.attrs,
            Some(vec!["title".to_string(), "license_id".to_string()])
        );
    }

    #[test]
    fn non_object_tree_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = load_tree(&path).unwrap_err();
        assert!(err.to_string().contains("found array"));
    }

    #[test]
    fn diff_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old.json");
        let new = dir.path().join("new.json");
        let out = dir.path().join("diff.json");
        let tree = json!({
            "node_id": "root",
            "title": "Channel",
            "children": [{"node_id": "a", "content_id": "ca", "title": "A"}],
        });
        let mut changed = tree.clone();
        changed["children"]
            .as_array_mut()
            .unwrap()
            .push(json!({"node_id": "b", "content_id": "cb", "title": "B"}));
        fs::write(&old, tree.to_string()).unwrap();
        fs::write(&new, changed.to_string()).unwrap();

        let mut a = args(old, new);
        a.out = Some(out.clone());
        cmd_diff(a, OutputFormat::Json).unwrap();

        let diff: TreeDiff = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(diff.nodes_added.len(), 1);
        assert_eq!(diff.nodes_added[0].node_id, "b");
        assert_eq!(diff.nodes_added[0].parent_id.as_deref(), Some("root"));
        assert!(diff.nodes_deleted.is_empty());
    }
}
