//! Unit tests for CLI commands.

use super::*;
use crate::ExtraCommand;
use dan_config::WorldProject;
use dan_core::types::Dimension;
use dan_format::DanWorld;
use std::fs;
use tempfile::TempDir;

const DUMP: &str = r#"{
    "default": { "material": "stone", "biome": "plains" },
    "blocks": [
        { "pos": [0, 64, 0], "material": "gold_block", "biome": "desert" }
    ]
}"#;

/// Create a test command context in a temporary directory
fn create_test_context(temp_dir: &TempDir) -> CommandContext {
    let cwd = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    let settings = Settings {
        data_dir: cwd.join("worlds"),
        compression: 1,
        ..Settings::default()
    };
    fs::write(cwd.join("dump.json"), DUMP).unwrap();

    CommandContext {
        cwd,
        settings,
        output: crate::output::OutputHandler::new(),
    }
}

async fn create_world(ctx: &CommandContext, name: &str) {
    new::execute(
        name.to_string(),
        "world".to_string(),
        "0:60:0".to_string(),
        "31:75:31".to_string(),
        Dimension::Overworld,
        ctx,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_suggest_similar_command() {
    assert_eq!(suggest_similar_command("inspect"), Some("inspect".to_string()));

    assert_eq!(suggest_similar_command("inspct"), Some("inspect".to_string()));
    assert_eq!(suggest_similar_command("stauts"), Some("status".to_string()));
    assert_eq!(suggest_similar_command("lst"), Some("list".to_string()));
    assert_eq!(suggest_similar_command("nwe"), Some("new".to_string()));

    assert_eq!(suggest_similar_command("xyzzy"), None);
    assert_eq!(suggest_similar_command("completely-different"), None);
}

#[tokio::test]
async fn test_edit_distance() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("abc", "abc"), 0);
    assert_eq!(edit_distance("abc", "ab"), 1);
    assert_eq!(edit_distance("abc", "abcd"), 1);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(edit_distance("export", "exprot"), 2);
}

#[tokio::test]
async fn test_new_writes_project_file() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    create_world(&ctx, "spawn").await;

    let path = ctx.settings.data_dir.join("spawn.dan.toml");
    let project = WorldProject::load(&path).unwrap();
    assert_eq!(project.name, "spawn");
    assert_eq!(project.selection.max.y, 75);

    // a second project with the same name is refused
    let again = new::execute(
        "spawn".to_string(),
        "world".to_string(),
        "0:0:0".to_string(),
        "1:1:1".to_string(),
        Dimension::Overworld,
        &ctx,
    )
    .await;
    assert!(matches!(again, Err(DanError::WorldExists { .. })));
}

#[tokio::test]
async fn test_new_rejects_bad_input() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    for (name, min) in [("bad name", "0:0:0"), ("-dash", "0:0:0"), ("ok", "0:0")] {
        let result = new::execute(
            name.to_string(),
            "world".to_string(),
            min.to_string(),
            "5:5:5".to_string(),
            Dimension::Overworld,
            &ctx,
        )
        .await;
        assert!(result.is_err(), "expected error for {} {}", name, min);
    }
}

#[tokio::test]
async fn test_project_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    create_world(&ctx, "spawn").await;

    set::execute(
        "spawn".to_string(),
        ExtraCommand::Pos {
            key: "spawn".to_string(),
            x: 4.5,
            y: 64.0,
            z: 4.5,
            yaw: 90.0,
            pitch: 0.0,
        },
        &ctx,
    )
    .await
    .unwrap();
    set::execute(
        "spawn".to_string(),
        ExtraCommand::Str {
            key: "motd".to_string(),
            text: vec!["Hello".to_string(), "there".to_string()],
        },
        &ctx,
    )
    .await
    .unwrap();

    let outside = set::execute(
        "spawn".to_string(),
        ExtraCommand::Pos {
            key: "far".to_string(),
            x: -100.0,
            y: 64.0,
            z: 0.0,
            yaw: 0.0,
            pitch: 0.0,
        },
        &ctx,
    )
    .await;
    assert!(matches!(outside, Err(DanError::OutOfSelection { .. })));

    status::execute("spawn".to_string(), false, &ctx).await.unwrap();
    save::execute("spawn".to_string(), Utf8PathBuf::from("dump.json"), &ctx)
        .await
        .unwrap();

    let world = DanWorld::load(ctx.settings.data_dir.join("spawn.dan")).unwrap();
    assert_eq!(world.extra_count(), 2);
    assert_eq!(world.extra("motd").unwrap().as_text().as_deref(), Some("Hello there"));
    let spawn = world.extra("spawn").unwrap().as_position().unwrap();
    assert_eq!((spawn.x, spawn.y, spawn.z), (4.5, 4.0, 4.5));

    let gold = world.block_at(0, 4, 0).unwrap();
    assert_eq!(gold.material, "gold_block");
    assert_eq!(world.block_at(1, 4, 0).unwrap().material, "stone");

    list::execute(false, &ctx).await.unwrap();
    list::execute(true, &ctx).await.unwrap();
}

#[tokio::test]
async fn test_redefine_keeps_world_name() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    create_world(&ctx, "arena").await;

    redefine::execute(
        "arena".to_string(),
        "-16:0:-16".to_string(),
        "15:31:15".to_string(),
        None,
        &ctx,
    )
    .await
    .unwrap();

    let project = WorldProject::load(ctx.settings.data_dir.join("arena.dan.toml")).unwrap();
    assert_eq!(project.selection.world, "world");
    assert_eq!(project.selection.min.x, -16);
    assert_eq!(project.selection.chunk_width(), 2);
}

#[tokio::test]
async fn test_world_names_cannot_leave_data_dir() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let outside = WorldProject::new(
        "outside",
        dan_core::types::Selection::from_strings("world", "0:0:0", "15:15:15").unwrap(),
        Dimension::Overworld,
    )
    .unwrap();
    outside.save(ctx.cwd.join("outside.dan.toml")).unwrap();

    let status = status::execute("../outside".to_string(), false, &ctx).await;
    assert!(matches!(status, Err(DanError::InvalidValue { .. })));

    let saved = save::execute(
        "../outside".to_string(),
        Utf8PathBuf::from("dump.json"),
        &ctx,
    )
    .await;
    assert!(matches!(saved, Err(DanError::InvalidValue { .. })));
    assert!(!ctx.cwd.join("outside.dan").exists());
}

#[tokio::test]
async fn test_unset_after_shrinking_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    create_world(&ctx, "hub").await;

    set::execute(
        "hub".to_string(),
        ExtraCommand::Pos {
            key: "spawn".to_string(),
            x: 2.5,
            y: 64.0,
            z: 2.5,
            yaw: 0.0,
            pitch: 0.0,
        },
        &ctx,
    )
    .await
    .unwrap();

    redefine::execute(
        "hub".to_string(),
        "16:60:16".to_string(),
        "31:75:31".to_string(),
        None,
        &ctx,
    )
    .await
    .unwrap();

    let blocked = save::execute("hub".to_string(), Utf8PathBuf::from("dump.json"), &ctx).await;
    assert!(matches!(blocked, Err(DanError::OutOfSelection { .. })));

    unset::execute("hub".to_string(), "spawn".to_string(), &ctx)
        .await
        .unwrap();
    let project = WorldProject::load(ctx.settings.data_dir.join("hub.dan.toml")).unwrap();
    assert!(project.extras.is_empty());

    let missing = unset::execute("hub".to_string(), "spawn".to_string(), &ctx).await;
    assert!(matches!(missing, Err(DanError::InvalidValue { .. })));

    save::execute("hub".to_string(), Utf8PathBuf::from("dump.json"), &ctx)
        .await
        .unwrap();
    assert!(ctx.settings.data_dir.join("hub.dan").exists());
}

#[tokio::test]
async fn test_list_lines_report_exports() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    create_world(&ctx, "draft").await;

    let workspace = ctx.workspace().unwrap();
    let entries = workspace.list().unwrap();
    assert_eq!(entries.len(), 1);
    let exported = workspace.world_path(&entries[0].name).unwrap().exists();
    assert_eq!(list::entry_line(&entries[0].name, exported), "  draft  (not exported)");

    save::execute("draft".to_string(), Utf8PathBuf::from("dump.json"), &ctx)
        .await
        .unwrap();
    assert!(workspace.world_path("draft").unwrap().exists());
    assert_eq!(list::entry_line("draft", true), "  draft");
}

#[tokio::test]
async fn test_status_of_missing_world() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let result = status::execute("ghost".to_string(), false, &ctx).await;
    assert!(matches!(result, Err(DanError::WorldNotFound { .. })));
}

#[tokio::test]
async fn test_export_and_inspect() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    export::execute(
        export::ExportArgs {
            output: Utf8PathBuf::from("out/region.dan"),
            world: "world".to_string(),
            min: "-4:60:-4".to_string(),
            max: "20:70:4".to_string(),
            source: Utf8PathBuf::from("dump.json"),
            dimension: Dimension::End,
        },
        &ctx,
    )
    .await
    .unwrap();

    let path = temp_dir.path().join("out/region.dan");
    let report = inspect::summarize(&path, true).unwrap();
    assert_eq!(report.dimension, Dimension::End);
    assert_eq!((report.width, report.depth), (2, 1));
    assert_eq!(report.chunks, 2);
    assert_eq!(report.checksum.len(), 64);

    let histogram = report.histogram.unwrap();
    assert_eq!(histogram["gold_block"], 1);
    assert!(histogram.contains_key(dan_export::VOID_MATERIAL));

    inspect::execute(PathBuf::from("out/region.dan"), false, true, &ctx)
        .await
        .unwrap();
    execute_file(path, &ctx).await.unwrap();
}

#[tokio::test]
async fn test_execute_file_suggests_command() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);

    let result = execute_file(PathBuf::from("lst"), &ctx).await;
    assert!(matches!(result, Err(DanError::ConfigValidation { .. })));

    let result = execute_file(PathBuf::from("missing.dan"), &ctx).await;
    assert!(matches!(result, Err(DanError::Io { .. })));
}

#[tokio::test]
async fn test_show_version() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    assert!(show_version(&ctx).await.is_ok());
}

#[tokio::test]
async fn test_show_help() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = create_test_context(&temp_dir);
    assert!(show_help(&ctx).await.is_ok());
}
