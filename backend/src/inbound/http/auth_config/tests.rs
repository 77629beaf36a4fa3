//! Unit tests for signing secret loading.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use uuid::Uuid;

struct TempSecretFile {
    path: PathBuf,
}

impl TempSecretFile {
    fn new(contents: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!("jwt-secret-{}", Uuid::new_v4()));
        std::fs::write(&path, contents).expect("write secret file");
        Self { path }
    }

    fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Drop for TempSecretFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: &[(&str, String)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

#[rstest]
fn release_requires_a_secret() {
    let env = mock_env(&[]);

    let err = signing_secret_from_env(&env, BuildMode::Release).expect_err("missing");

    assert!(matches!(err, AuthConfigError::MissingSecret));
}

#[rstest]
fn debug_falls_back_to_an_ephemeral_secret() {
    let env = mock_env(&[]);

    let secret = signing_secret_from_env(&env, BuildMode::Debug).expect("ephemeral");

    assert_eq!(secret.as_bytes().len(), SECRET_MIN_LEN);
}

#[rstest]
fn release_rejects_short_inline_secrets() {
    let env = mock_env(&[(JWT_SECRET_ENV, "short".to_owned())]);

    let err = signing_secret_from_env(&env, BuildMode::Release).expect_err("too short");

    assert!(matches!(
        err,
        AuthConfigError::SecretTooShort {
            origin: JWT_SECRET_ENV,
            length: 5,
            min_len: SECRET_MIN_LEN,
        }
    ));
}

#[rstest]
fn debug_accepts_short_inline_secrets() {
    let env = mock_env(&[(JWT_SECRET_ENV, "short".to_owned())]);

    let secret = signing_secret_from_env(&env, BuildMode::Debug).expect("accepted");

    assert_eq!(secret.as_bytes(), b"short");
}

#[rstest]
fn the_secret_file_wins_over_the_inline_secret() {
    let file = TempSecretFile::new(format!("{}\n", "f".repeat(40)).as_bytes());
    let env = mock_env(&[
        (JWT_SECRET_FILE_ENV, file.path_string()),
        (JWT_SECRET_ENV, "i".repeat(40)),
    ]);

    let secret = signing_secret_from_env(&env, BuildMode::Release).expect("file secret");

    assert_eq!(secret.as_bytes(), "f".repeat(40).as_bytes());
}

#[rstest]
#[case(BuildMode::Release, false)]
#[case(BuildMode::Debug, true)]
fn unreadable_secret_files(#[case] mode: BuildMode, #[case] succeeds: bool) {
    let missing = std::env::temp_dir().join(format!("jwt-secret-{}", Uuid::new_v4()));
    let env = mock_env(&[(JWT_SECRET_FILE_ENV, missing.to_string_lossy().into_owned())]);

    let result = signing_secret_from_env(&env, mode);

    assert_eq!(result.is_ok(), succeeds);
    if let Err(err) = result {
        assert!(matches!(err, AuthConfigError::SecretRead { .. }));
    }
}

#[rstest]
fn debug_output_redacts_the_secret() {
    let secret = SigningSecret::new(b"super-secret-value".to_vec());

    assert!(!format!("{secret:?}").contains("super-secret"));
}
