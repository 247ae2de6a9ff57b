use clap::Parser;
use pypln_deploy::error::DeployError;
use pypln_deploy::pipeline::{Cli, Command, render_plan};
use pypln_deploy::prompt::AssumeYes;
use pypln_deploy::remote::{Recorder, RemoteCommand};
use pypln_deploy::{Config, Pipeline, Tasks};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("pypln-deploy").chain(args.iter().copied()))
        .expect("arguments should parse")
}

#[test]
fn deploy_defaults_to_master() {
    let cli = parse(&["--host", "pypln.org", "deploy"]);

    assert_eq!(cli.host.as_deref(), Some("pypln.org"));
    assert!(matches!(cli.command, Command::Deploy { ref branch } if branch == "master"));
}

#[test]
fn global_flags_after_subcommand() {
    let cli = parse(&["initial-setup", "--branch", "develop", "--user", "admin", "--key", "/k"]);

    assert_eq!(cli.user.as_deref(), Some("admin"));
    assert_eq!(cli.key.as_deref(), Some("/k"));
    assert!(matches!(cli.command, Command::InitialSetup { ref branch } if branch == "develop"));
}

#[test]
fn create_db_defaults() {
    let cli = parse(&["create-db", "pypln", "pypln_db"]);

    match cli.command {
        Command::CreateDb {
            db_user,
            db_name,
            db_host,
            db_port,
        } => {
            assert_eq!(db_user, "pypln");
            assert_eq!(db_name, "pypln_db");
            assert_eq!(db_host, "localhost");
            assert_eq!(db_port, 5432);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn db_restore_with_yes() {
    let cli = parse(&["db-restore", "pypln_2013-04-02_17-05-09.backup", "--yes"]);

    assert!(matches!(
        cli.command,
        Command::DbRestore { ref filename, yes: true } if filename == "pypln_2013-04-02_17-05-09.backup"
    ));
}

#[test]
fn manage_collects_trailing_arguments() {
    let cli = parse(&["manage", "--environment", "development", "migrate", "--noinput"]);

    match cli.command {
        Command::Manage {
            command,
            environment,
        } => {
            assert_eq!(command, vec!["migrate", "--noinput"]);
            assert_eq!(environment, "development");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn manage_requires_a_command() {
    assert!(Cli::try_parse_from(["pypln-deploy", "manage"]).is_err());
}

#[test]
fn json_requires_dry_run() {
    assert!(Cli::try_parse_from(["pypln-deploy", "--json", "db-backup"]).is_err());
    assert!(Cli::try_parse_from(["pypln-deploy", "--dry-run", "--json", "db-backup"]).is_ok());
}

#[test]
fn dry_run_needs_no_host() {
    let cli = parse(&["--dry-run", "deploy", "--branch", "develop"]);

    Pipeline::new(Config::new()).run_cli(&cli).unwrap();
}

#[test]
fn dry_run_restore_skips_confirmation() {
    let cli = parse(&["--dry-run", "--json", "db-restore", "old.backup"]);

    Pipeline::new(Config::new()).run_cli(&cli).unwrap();
}

#[test]
fn real_run_without_host_fails() {
    let mut cli = parse(&["restart-services"]);
    cli.host = None;

    let err = Pipeline::new(Config::new()).run_cli(&cli).unwrap_err();

    assert!(matches!(err, DeployError::MissingHost));
}

#[test]
fn plan_lists_one_line_per_command() {
    let commands = vec![
        RemoteCommand::new("sudo -p 'sudo password: ' /bin/bash -l -c \"apt-get update\"")
            .interactive(true),
        RemoteCommand::new("/bin/bash -l -c \"pg_dump -Fc -o -f x.backup\"")
            .login_user(Some("pypln")),
    ];

    let plan = render_plan(&commands, false).unwrap();

    assert_eq!(
        plan,
        "sudo -p 'sudo password: ' /bin/bash -l -c \"apt-get update\"\n\
         [pypln] /bin/bash -l -c \"pg_dump -Fc -o -f x.backup\""
    );
}

#[test]
fn empty_plan_is_empty() {
    assert_eq!(render_plan(&[], false).unwrap(), "");
    assert_eq!(render_plan(&[], true).unwrap(), "[]");
}

#[test]
fn json_plan_omits_defaults() {
    let commands = vec![
        RemoteCommand::new("uptime"),
        RemoteCommand::new("passwd pypln")
            .login_user(Some("admin"))
            .interactive(true),
    ];

    let plan = render_plan(&commands, true).unwrap();

    let value: serde_json::Value = serde_json::from_str(&plan).unwrap();
    assert_eq!(value[0], serde_json::json!({ "line": "uptime" }));
    assert_eq!(
        value[1],
        serde_json::json!({ "line": "passwd pypln", "login_user": "admin", "interactive": true })
    );
    let back: Vec<RemoteCommand> = serde_json::from_str(&plan).unwrap();
    assert_eq!(back, commands);
}

#[test]
fn config_file_layers_over_builder_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deploy.yml");
    std::fs::write(&path, "home: /opt/x/\n").unwrap();
    let cli = parse(&["--dry-run", "--config", path.to_str().unwrap(), "db-backup"]);
    let pipeline = Pipeline::new(Config::new().user("nlp").name("nlp"));

    let config = pipeline.effective_config(&cli).unwrap();

    assert_eq!(config.user, "nlp");
    assert_eq!(config.name, "nlp");
    assert_eq!(config.home, "/opt/x/");

    let remote = Recorder::new("dry-run");
    let backup = Tasks::new(&config, &remote, &AssumeYes).db_backup().unwrap();
    assert!(backup.starts_with("/opt/x/backups/nlp_"));
    assert_eq!(remote.commands()[0].login_user.as_deref(), Some("nlp"));
}

#[test]
fn without_config_file_builder_settings_are_used() {
    let cli = parse(&["--dry-run", "db-backup"]);
    let config = Config::new().home("/opt/y/");

    let effective = Pipeline::new(config.clone()).effective_config(&cli).unwrap();

    assert_eq!(effective, config);
}

#[test]
fn missing_config_file_fails() {
    let cli = parse(&["--dry-run", "--config", "/nonexistent/deploy.yml", "db-backup"]);

    let err = Pipeline::new(Config::new()).run_cli(&cli).unwrap_err();

    assert!(matches!(err, DeployError::FileNotFound(_)));
}
