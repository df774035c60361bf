//! Import resolution, ordering, and provenance through the public API

use rcflags::{
    expand_configs, ArgOrigin, CommandHierarchy, ExpandError, Resolver, SourceKind, ToolConfig,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let ws = TempDir::new().unwrap();
    fs::write(ws.path().join("WORKSPACE"), "").unwrap();
    for (name, contents) in files {
        let path = ws.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
    ws
}

#[test]
fn test_imported_flags_keep_import_position() {
    let ws = workspace(&[
        (
            ".bazelrc",
            "build --first\nimport %workspace%/tools/ci.bazelrc\nbuild --last\n",
        ),
        ("tools/ci.bazelrc", "build --from_ci\nbuild:ci --ci_only\n"),
    ]);

    let expanded = expand_configs(ws.path(), &argv(&["build", "--config=ci"])).unwrap();
    assert_eq!(
        expanded,
        argv(&["build", "--first", "--from_ci", "--last", "--ci_only"])
    );
}

#[test]
fn test_try_import_of_missing_file_never_errors() {
    let ws = workspace(&[(
        ".bazelrc",
        "try-import %workspace%/user.bazelrc\ntry-import /definitely/not/here.rc\nbuild --x\n",
    )]);

    let expanded = expand_configs(ws.path(), &argv(&["build"])).unwrap();
    assert_eq!(expanded, argv(&["build", "--x"]));
}

#[test]
fn test_try_import_of_existing_file_is_read() {
    let ws = workspace(&[
        (".bazelrc", "try-import %workspace%/user.bazelrc\n"),
        ("user.bazelrc", "build --user\n"),
    ]);

    let expanded = expand_configs(ws.path(), &argv(&["build"])).unwrap();
    assert_eq!(expanded, argv(&["build", "--user"]));
}

#[test]
fn test_import_of_missing_file_errors() {
    let ws = workspace(&[(".bazelrc", "import %workspace%/missing.bazelrc\n")]);

    let err = expand_configs(ws.path(), &argv(&["build"])).unwrap_err();
    assert!(matches!(err, ExpandError::FileRead { .. }));
}

#[test]
fn test_malformed_line_in_import_fails() {
    let ws = workspace(&[
        (".bazelrc", "import %workspace%/bad.bazelrc\n"),
        ("bad.bazelrc", "\nbuild:a:b --x\n"),
    ]);

    let err = expand_configs(ws.path(), &argv(&["build"])).unwrap_err();
    match err {
        ExpandError::MalformedLine { path, source } => {
            assert!(path.ends_with("bad.bazelrc"));
            assert_eq!(source.line(), 2);
        }
        other => panic!("expected MalformedLine, got {:?}", other),
    }
}

#[test]
fn test_config_split_across_files() {
    let ws = workspace(&[
        (
            ".bazelrc",
            "common:remote --remote_common\nimport %workspace%/remote.bazelrc\n",
        ),
        ("remote.bazelrc", "build:remote --remote_build\ntest:remote --remote_test\n"),
    ]);

    let expanded = expand_configs(ws.path(), &argv(&["test", "--config=remote"])).unwrap();
    assert_eq!(
        expanded,
        argv(&["test", "--remote_common", "--remote_build", "--remote_test"])
    );
}

#[test]
fn test_explain_reports_origins_and_sources() {
    let ws = workspace(&[
        (".bazelrc", "build --b\nimport %workspace%/more.bazelrc\n"),
        ("more.bazelrc", "build:opt --opt\n"),
    ]);

    let explanation = Resolver::default()
        .explain(ws.path(), &argv(&["build", "--config=opt", "--keep"]))
        .unwrap();

    assert_eq!(explanation.command.as_deref(), Some("build"));
    assert_eq!(
        explanation.expanded_argv,
        argv(&["build", "--b", "--opt", "--keep"])
    );
    assert_eq!(explanation.sources.len(), 2);
    assert_eq!(explanation.sources[0].kind, SourceKind::Root);
    assert_eq!(explanation.sources[1].kind, SourceKind::Import);

    match &explanation.args[2].origin {
        ArgOrigin::Rc {
            path,
            line,
            command,
            configs,
        } => {
            assert!(path.ends_with("more.bazelrc"));
            assert_eq!(*line, 1);
            assert_eq!(command, "build");
            assert_eq!(configs, &["opt"]);
        }
        other => panic!("unexpected origin {:?}", other),
    }
    assert_eq!(explanation.args[3].origin, ArgOrigin::CommandLine);
}

#[test]
fn test_tool_config_changes_rc_file_and_hierarchy() {
    let ws = workspace(&[
        (
            ".rcflags.toml",
            "rc_file = \".toolrc\"\n\n[commands]\nlint = \"build\"\n",
        ),
        (".toolrc", "build --b\nlint --l\n"),
        (".bazelrc", "build --ignored\n"),
    ]);

    let config = ToolConfig::load(ws.path()).unwrap();
    let resolver = Resolver::from_config(&config).unwrap();
    let expanded = resolver.expand(ws.path(), &argv(&["lint"])).unwrap();
    assert_eq!(expanded, argv(&["lint", "--b", "--l"]));
}

#[test]
fn test_config_names_for_command() {
    let ws = workspace(&[(
        ".bazelrc",
        "common:all --a\nbuild:fast --f\ntest:slow --s\nquery:q --q\nbuild:fast --f2\n",
    )]);

    let resolver = Resolver::default();
    let table = resolver.load(ws.path()).unwrap();
    assert_eq!(
        table.config_names(resolver.hierarchy(), "test"),
        vec!["all", "fast", "slow"]
    );
    assert_eq!(
        table.config_names(&CommandHierarchy::empty(), "test"),
        vec!["all", "slow"]
    );
}

#[test]
fn test_workspace_discovery() {
    let ws = workspace(&[(".bazelrc", "build --b\n")]);
    let nested = ws.path().join("src/pkg");
    fs::create_dir_all(&nested).unwrap();

    let root = rcflags::find_workspace_root(&nested, &["WORKSPACE"]).unwrap();
    assert_eq!(root.as_path(), ws.path());
    assert_eq!(
        expand_configs(Path::new(&root), &argv(&["build"])).unwrap(),
        argv(&["build", "--b"])
    );
}

#[test]
fn test_discovery_follows_tool_config_markers() {
    let ws = workspace(&[
        (".rcflags.toml", "workspace_markers = [\"ROOT\"]\n"),
        ("ROOT", ""),
        (".bazelrc", "startup --s\nbuild --b\n"),
        ("sub/WORKSPACE", ""),
    ]);

    let (root, config) = ToolConfig::discover(&ws.path().join("sub")).unwrap().unwrap();
    assert_eq!(root.as_path(), ws.path());

    let resolver = Resolver::from_config(&config).unwrap();
    assert_eq!(
        resolver.expand(&root, &argv(&["build"])).unwrap(),
        argv(&["--s", "build", "--b"])
    );
    assert_eq!(
        expand_configs(&root, &argv(&["startup"])).unwrap(),
        argv(&["--s", "startup"])
    );
}
