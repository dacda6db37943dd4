//! Replaces the process-wide registry, so it lives in its own test binary.

use conform::{Conform, ConformError, RegistryConfig, apply, configure, with_registry};

#[derive(Conform)]
struct Profile {
    #[conform("username")]
    username: String,
    #[conform("handle")]
    handle: String,
    #[conform("upper")]
    code: String,
}

#[test]
fn configure_replaces_the_global_registry() {
    let config = RegistryConfig::from_toml(
        r#"
        builtins = false

        [aliases]
        username = ["handle"]
        handle = ["missing"]
        "#,
    )
    .expect("parse");

    // unresolvable config leaves the built-ins in place
    let err = configure(&config).unwrap_err();
    assert!(matches!(err, ConformError::UnknownIdentifier { .. }));
    assert!(with_registry(|r| r.contains("upper")).expect("readable"));

    let config = RegistryConfig::from_toml(
        r#"
        [aliases]
        username = ["trim", "lower"]
        handle = ["username", "slug"]
        "#,
    )
    .expect("parse");
    configure(&config).expect("configure");

    let mut profile = Profile {
        username: "  LeeBenson ".into(),
        handle: " Lee Benson ".into(),
        code: "gb".into(),
    };
    apply(&mut profile).expect("apply");

    assert_eq!(profile.username, "leebenson");
    assert_eq!(profile.handle, "lee-benson");
    assert_eq!(profile.code, "GB");
}
