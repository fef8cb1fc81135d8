use super::support::hierarchy;
use design_tree::config::{DesignConfig, StorageConfig};
use design_tree::tooling::cli::{CliContext, Commands, PageCommands, Target};
use std::fs;
use tempfile::TempDir;

fn context(dir: &TempDir) -> CliContext {
    let config = DesignConfig {
        storage: StorageConfig {
            path: Some(dir.path().join("store")),
        },
        ..DesignConfig::default()
    };
    CliContext::with_config(dir.path(), config).unwrap()
}

fn target() -> Target {
    Target {
        design: "d1".to_string(),
        category: "SHIRT".to_string(),
    }
}

fn import(dir: &TempDir, cli: &CliContext) {
    let file = dir.path().join("design.json");
    fs::write(&file, serde_json::to_string(&hierarchy()).unwrap()).unwrap();
    cli.execute(&Commands::Import {
        design: "d1".to_string(),
        file,
    })
    .unwrap();
}

#[test]
fn show_json_contract_has_category_fields() {
    let dir = TempDir::new().unwrap();
    let cli = context(&dir);
    import(&dir, &cli);

    let output = cli
        .execute(&Commands::Show {
            target: target(),
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(parsed.get("pages").and_then(|v| v.as_object()).is_some());
    assert_eq!(parsed["baseDrawing"]["fileId"], "base");
    assert_eq!(parsed["components"]["A"]["options"]["x"]["fileId"], "f1");
}

#[test]
fn show_text_lists_every_node() {
    let dir = TempDir::new().unwrap();
    let cli = context(&dir);
    import(&dir, &cli);

    let output = cli
        .execute(&Commands::Show {
            target: target(),
            format: "text".to_string(),
        })
        .unwrap();
    assert!(output.contains("A/x"));
    assert!(output.contains("A/n/deep/d1"));
    assert!(output.contains("Base drawing: base"));
}

#[test]
fn edits_are_committed_to_the_store() {
    let dir = TempDir::new().unwrap();
    let cli = context(&dir);
    import(&dir, &cli);

    cli.execute(&Commands::Rename {
        target: target(),
        at: vec!["A".to_string(), "x".to_string()],
        to: "x2".to_string(),
    })
    .unwrap();
    cli.execute(&Commands::Page {
        target: target(),
        command: PageCommands::Add {
            name: "side".to_string(),
        },
    })
    .unwrap();

    let exported = cli
        .execute(&Commands::Export {
            design: "d1".to_string(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&exported).unwrap();
    let shirt = &parsed["categories"]["SHIRT"];
    assert_eq!(shirt["components"]["A"]["options"]["x2"]["fileId"], "f1");
    assert!(shirt["components"]["A"]["options"].get("x").is_none());
    assert!(shirt["pages"].get("side").is_some());
}

#[test]
fn failed_edit_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let cli = context(&dir);
    import(&dir, &cli);

    let result = cli.execute(&Commands::Delete {
        target: target(),
        at: vec!["A".to_string(), "missing".to_string()],
    });
    assert!(result.is_err());

    let exported = cli
        .execute(&Commands::Export {
            design: "d1".to_string(),
        })
        .unwrap();
    let stored: design_tree::Hierarchy = serde_json::from_str(&exported).unwrap();
    assert_eq!(stored, hierarchy());
}

#[test]
fn validate_reports_dangling_selection() {
    let dir = TempDir::new().unwrap();
    let cli = context(&dir);
    import(&dir, &cli);

    cli.execute(&Commands::Rename {
        target: target(),
        at: vec!["A".to_string(), "x".to_string()],
        to: "x2".to_string(),
    })
    .unwrap();
    let output = cli
        .execute(&Commands::Validate { target: target() })
        .unwrap();
    assert!(output.contains("1 dangling selection(s)"));
    assert!(output.contains("'x'"));
}
