use std::path::Path;

use tramita_core::config::{expand_path, resolve_with_base, Settings};

#[test]
fn defaults_match_the_documented_knobs() {
    let settings = Settings::default();
    assert_eq!(settings.chunking.chunk_size, 1000);
    assert_eq!(settings.chunking.chunk_overlap, 200);
    assert_eq!(settings.retrieval.top_k, 4);
    assert_eq!(settings.embedding.dim, 768);
    assert!(!settings.embedding.use_hash);
    assert_eq!(settings.data.raw_dir, "data/raw");
    assert!(settings
        .generation
        .api_key_env
        .contains(&"GEMINI_API_KEY".to_string()));
}

#[test]
fn relative_paths_resolve_against_the_base() {
    let base = Path::new("/srv/tramita");
    assert_eq!(
        resolve_with_base(base, "data/raw"),
        Path::new("/srv/tramita/data/raw")
    );
    assert_eq!(resolve_with_base(base, "/var/index"), Path::new("/var/index"));
}

#[test]
fn env_vars_expand_inside_paths() {
    std::env::set_var("TRAMITA_TEST_BASE", "/opt/corpus");
    let expanded = expand_path("${TRAMITA_TEST_BASE}/raw");
    assert_eq!(expanded, Path::new("/opt/corpus/raw"));
}

#[test]
fn api_key_resolution_walks_the_configured_env_list() {
    let mut settings = Settings::default();
    settings.generation.api_key_env =
        vec!["TRAMITA_TEST_MISSING".to_string(), "TRAMITA_TEST_KEY".to_string()];
    std::env::set_var("TRAMITA_TEST_KEY", "secreto");
    assert_eq!(settings.resolve_api_key().as_deref(), Some("secreto"));

    settings.generation.api_key_env = vec!["TRAMITA_TEST_MISSING".to_string()];
    assert_eq!(settings.resolve_api_key(), None);
}
