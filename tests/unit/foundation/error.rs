use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AvatarError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(AvatarError::store("x").to_string().contains("store error:"));
    assert!(AvatarError::render("x").to_string().contains("render error:"));
    assert!(
        AvatarError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AvatarError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
