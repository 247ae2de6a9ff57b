use pypln_deploy::error::DeployError;

#[test]
fn display_command_failed() {
    let err = DeployError::CommandFailed {
        command: "service nginx restart".into(),
        code: Some(1),
    };
    assert_eq!(err.to_string(), "command failed: service nginx restart");
}

#[test]
fn display_command_not_found() {
    let err = DeployError::CommandNotFound("ssh".into());
    assert_eq!(err.to_string(), "command not found: ssh");
}

#[test]
fn display_ssh_failed() {
    let err = DeployError::SshFailed("timeout".into());
    assert_eq!(err.to_string(), "SSH connection failed: timeout");
}

#[test]
fn display_missing_host() {
    let err = DeployError::MissingHost;
    assert!(err.to_string().contains("--host"));
}

#[test]
fn display_aborted() {
    let err = DeployError::Aborted("Aborting database restore...".into());
    assert_eq!(err.to_string(), "aborted: Aborting database restore...");
}

#[test]
fn display_invalid_argument() {
    let err = DeployError::InvalidArgument("empty".into());
    assert_eq!(err.to_string(), "invalid argument: empty");
}

#[test]
fn display_file_not_found() {
    let err = DeployError::FileNotFound("deploy.yml".into());
    assert_eq!(err.to_string(), "file not found: deploy.yml");
}

#[test]
fn display_other() {
    let err = DeployError::Other("custom error".into());
    assert_eq!(err.to_string(), "custom error");
}

#[test]
fn from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err: DeployError = io_err.into();
    assert!(matches!(err, DeployError::Io(_)));
}

#[test]
fn from_json_error() {
    let json_err = serde_json::from_str::<Vec<u64>>("invalid").unwrap_err();
    let err: DeployError = json_err.into();
    assert!(matches!(err, DeployError::Json(_)));
}

#[test]
fn from_yaml_error() {
    let yaml_err = serde_yaml::from_str::<Vec<u64>>("{ not: [a list").unwrap_err();
    let err: DeployError = yaml_err.into();
    assert!(matches!(err, DeployError::Yaml(_)));
}
