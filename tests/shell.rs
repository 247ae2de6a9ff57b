use pypln_deploy::error::DeployError;
use pypln_deploy::remote::{CommandOutput, Recorder};
use pypln_deploy::shell::Shell;

#[test]
fn sudo_wraps_in_login_shell() {
    let remote = Recorder::new("h");
    let shell = Shell::new(&remote);

    shell.sudo("apt-get update").unwrap();

    assert_eq!(
        remote.lines(),
        vec!["sudo -p 'sudo password: ' /bin/bash -l -c \"apt-get update\""]
    );
}

#[test]
fn sudo_as_other_user() {
    let remote = Recorder::new("h");
    let shell = Shell::new(&remote);

    shell.sudo_as("postgres", "createdb x").unwrap();

    assert_eq!(
        remote.lines(),
        vec!["sudo -p 'sudo password: ' -u postgres /bin/bash -l -c \"createdb x\""]
    );
}

#[test]
fn cwd_then_prefixes_then_command() {
    let remote = Recorder::new("h");
    let shell = Shell::new(&remote)
        .prefix("source /srv/pypln/project/bin/activate")
        .cd("/srv/pypln/project/");

    shell.run("pip freeze").unwrap();

    assert_eq!(
        remote.lines(),
        vec![
            "/bin/bash -l -c \"cd /srv/pypln/project/ && \
             source /srv/pypln/project/bin/activate && pip freeze\""
        ]
    );
}

#[test]
fn inner_command_is_escaped() {
    let remote = Recorder::new("h");
    let shell = Shell::new(&remote);

    shell.run(r#"psql -c "SELECT '$1'""#).unwrap();

    assert_eq!(
        remote.lines(),
        vec![r#"/bin/bash -l -c "psql -c \"SELECT '\$1'\"""#]
    );
}

#[test]
fn cd_with_spaces_is_quoted() {
    let remote = Recorder::new("h");
    Shell::new(&remote).cd("/srv/my app").run("ls").unwrap();

    assert_eq!(
        remote.lines(),
        vec!["/bin/bash -l -c \"cd '/srv/my app' && ls\""]
    );
}

#[test]
fn login_user_and_interactivity_are_recorded() {
    let remote = Recorder::new("h");
    let shell = Shell::new(&remote).as_user("pypln");

    shell.run("whoami").unwrap();
    shell.run_interactive("passwd").unwrap();

    let commands = remote.commands();
    assert_eq!(commands[0].login_user.as_deref(), Some("pypln"));
    assert!(!commands[0].interactive);
    assert!(commands[1].interactive);
}

#[test]
fn sudo_commands_get_a_terminal() {
    let remote = Recorder::new("h");
    let shell = Shell::new(&remote);

    shell.sudo("apt-get update").unwrap();
    shell.sudo_as("postgres", "createdb x").unwrap();
    shell.run("git rev-parse origin/master").unwrap();

    let commands = remote.commands();
    assert!(commands[0].interactive);
    assert!(commands[1].interactive);
    assert!(!commands[2].interactive);
    assert!(!commands[0].line.contains(" -S "));
}

#[test]
fn failure_is_fatal_by_default() {
    let remote = Recorder::new("h").respond("false", CommandOutput::failure(3));
    let shell = Shell::new(&remote);

    let err = shell.run("false").unwrap_err();

    assert!(matches!(
        err,
        DeployError::CommandFailed { ref command, code: Some(3) } if command == "false"
    ));
}

#[test]
fn warn_only_returns_failed_output() {
    let remote = Recorder::new("h").respond("id pypln", CommandOutput::failure(1));
    let shell = Shell::new(&remote);

    let output = shell.warn_only().run("id pypln").unwrap();

    assert!(output.failed());
    assert_eq!(output.code, Some(1));
}

#[test]
fn run_returns_stdout() {
    let remote = Recorder::new("h").respond("rev-parse", CommandOutput::success("deadbeef"));
    let shell = Shell::new(&remote).cd("/srv/pypln/project/backend");

    let output = shell.run("git rev-parse origin/master").unwrap();

    assert_eq!(output.stdout, "deadbeef");
}
