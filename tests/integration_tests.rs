//! Integration tests for the Waybank translation engine
//!
//! These tests drive the public API end to end: catalogs loaded from disk,
//! sessions backed by a preferences file, and the fallback guarantees of the
//! resolver checked with property tests.

use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

use waybank_i18n::error::I18nError;
use waybank_i18n::i18n::{
    Catalog, CompletenessAuditor, ContextSynchronizer, DirectionalityManager, DocumentAttributes,
    JsonFileStore, KeyResolver, Language, LanguageSession, LanguageState, MemoryStore,
    MicrotaskQueue, PreferenceStore, Section, StorageKeys, SyncState, Variables, DIR_ATTRIBUTE,
    LANG_ATTRIBUTE,
};

// ==================== Test Helpers ====================

/// Write a catalog directory with one namespaced section, one root section
/// and a common-words override.
fn write_catalog_dir(temp_dir: &TempDir) {
    let positions = r#"{
        "en": {
            "title": "Positions",
            "cooldownActive": "Wait {{days}} days",
            "actions": { "withdraw": "Withdraw", "deposit": "Deposit" }
        },
        "es": {
            "title": "Posiciones",
            "cooldownActive": "Espera {{days}} días",
            "actions": { "withdraw": "Retirar", "deposit": "" }
        },
        "ar": {
            "title": "المراكز"
        },
        "xx": { "title": "ignored" }
    }"#;
    let ui = r#"{
        "en": { "Cancel": "Cancel", "Connect Wallet": "Connect Wallet" },
        "fr": { "Cancel": "Annuler" },
        "de": "not a table"
    }"#;
    let common = r#"{ "es": { "wallet": "Billetera" } }"#;

    std::fs::write(temp_dir.path().join("positions.json"), positions)
        .expect("Failed to write positions.json");
    std::fs::write(temp_dir.path().join("_ui.json"), ui).expect("Failed to write _ui.json");
    std::fs::write(temp_dir.path().join("common.json"), common)
        .expect("Failed to write common.json");
    std::fs::write(temp_dir.path().join("README.txt"), "not a catalog")
        .expect("Failed to write README.txt");
}

fn interpolation_catalog() -> Arc<Catalog> {
    let positions = Section::new().with(Language::ENGLISH, [("cooldownActive", "Wait {{days}} days")]);
    Arc::new(
        Catalog::builder()
            .section("positions", positions)
            .build()
            .expect("Failed to build catalog"),
    )
}

fn file_backed_session(catalog_dir: &TempDir, prefs_path: &std::path::Path) -> LanguageSession {
    let catalog = Arc::new(Catalog::load_dir(catalog_dir.path()).expect("Failed to load catalog"));
    let preferences = PreferenceStore::new(
        Box::new(JsonFileStore::new(prefs_path)),
        StorageKeys::default(),
        Language::ENGLISH,
    );
    LanguageSession::start(
        catalog,
        preferences,
        DocumentAttributes::new(),
        MicrotaskQueue::new(),
        None,
    )
}

// ==================== Catalog Loading Tests ====================

#[test]
fn test_load_dir_resolves_namespaced_and_root_keys() {
    let temp_dir = TempDir::new().unwrap();
    write_catalog_dir(&temp_dir);

    let catalog = Arc::new(Catalog::load_dir(temp_dir.path()).unwrap());
    let resolver = KeyResolver::new(Arc::clone(&catalog), Language::ENGLISH);

    assert_eq!(catalog.section_count(), 2);
    assert_eq!(
        resolver.resolve("positions.actions.withdraw", Language::SPANISH, None, None),
        "Retirar"
    );
    // Blank value falls back to English
    assert_eq!(
        resolver.resolve("positions.actions.deposit", Language::SPANISH, None, None),
        "Deposit"
    );
    assert_eq!(resolver.resolve("Cancel", Language::FRENCH, None, None), "Annuler");
    assert_eq!(resolver.resolve("Cancel", Language::GERMAN, None, None), "Cancel");
    assert_eq!(catalog.common_word(Language::SPANISH, "wallet"), Some("Billetera"));
    assert_eq!(catalog.common_word(Language::SPANISH, "cancel"), Some("Cancelar"));
}

#[test]
fn test_load_dir_missing_directory_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let err = Catalog::load_dir(&missing).unwrap_err();
    assert!(matches!(err, I18nError::CatalogIo { .. }));
}

#[test]
fn test_load_dir_invalid_json_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();

    let err = Catalog::load_dir(temp_dir.path()).unwrap_err();
    assert!(matches!(err, I18nError::CatalogParse { .. }));
}

#[test]
fn test_section_without_english_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("orphan.json"),
        r#"{ "es": { "title": "Hola" } }"#,
    )
    .unwrap();

    let err = Catalog::load_dir(temp_dir.path()).unwrap_err();
    assert!(matches!(err, I18nError::MissingReferenceLanguage(name) if name == "orphan"));
}

// ==================== Audit Tests ====================

#[test]
fn test_audit_of_loaded_catalog() {
    let temp_dir = TempDir::new().unwrap();
    write_catalog_dir(&temp_dir);
    let catalog = Catalog::load_dir(temp_dir.path()).unwrap();

    let report = CompletenessAuditor::audit(&catalog);

    assert!(!report.is_complete());
    assert_eq!(
        report.get("positions", Language::SPANISH).unwrap().keys(),
        ["actions.deposit".to_string()]
    );
    assert!(report.get("ui", Language::GERMAN).unwrap().is_entire_language());
    assert!(report.get("ui", Language::RUSSIAN).unwrap().is_entire_language());
    assert_eq!(
        report.get("ui", Language::FRENCH).unwrap().keys(),
        ["Connect Wallet".to_string()]
    );
}

#[test]
fn test_audit_scenario_report_shape() {
    let mut section = Section::new()
        .with(Language::ENGLISH, [("a", "1"), ("b", "2")])
        .with(Language::FRENCH, [("a", "1")]);
    for language in Language::all() {
        if language != Language::ENGLISH && language != Language::FRENCH {
            section = section.with(language, [("a", "1"), ("b", "2")]);
        }
    }
    let catalog = Catalog::builder().section("demo", section).build().unwrap();

    let report = CompletenessAuditor::audit(&catalog);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json, serde_json::json!({ "demo": { "fr": ["b"] } }));
}

#[test]
fn test_audit_serializes_entire_language_sentinel() {
    let section = Section::new().with(Language::ENGLISH, [("a", "1")]);
    let catalog = Catalog::builder().section("demo", section).build().unwrap();

    let json = serde_json::to_value(CompletenessAuditor::audit(&catalog)).unwrap();
    assert_eq!(json["demo"]["ru"], serde_json::json!(["entire language missing"]));
    assert!(json["demo"].get("en").is_none());
}

// ==================== Resolver Scenario Tests ====================

#[test]
fn test_interpolation_scenario() {
    let resolver = KeyResolver::new(interpolation_catalog(), Language::ENGLISH);
    let vars = Variables::new().with("days", 5);

    assert_eq!(
        resolver.resolve("positions.cooldownActive", Language::ENGLISH, None, Some(&vars)),
        "Wait 5 days"
    );
}

#[test]
fn test_unsupported_language_scenario() {
    let ui = Section::new()
        .with(Language::ENGLISH, [("Cancel", "Cancel")])
        .with(Language::SPANISH, [("Cancel", "Cancelar")]);
    let catalog = Arc::new(Catalog::builder().root_section("ui", ui).build().unwrap());

    let english = KeyResolver::new(Arc::clone(&catalog), Language::ENGLISH);
    assert_eq!(english.resolve_code("Cancel", "xx", None, None), "Cancel");

    let spanish = KeyResolver::new(catalog, Language::SPANISH);
    assert_eq!(
        spanish.resolve_code("Cancel", "xx", None, None),
        spanish.resolve("Cancel", Language::SPANISH, None, None)
    );
}

// ==================== Preference Tests ====================

#[test]
fn test_migration_self_heal_through_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let prefs_path = temp_dir.path().join("prefs.json");
    std::fs::write(&prefs_path, r#"{ "language": "fr" }"#).unwrap();

    let store = PreferenceStore::new(
        Box::new(JsonFileStore::new(&prefs_path)),
        StorageKeys::default(),
        Language::ENGLISH,
    );

    assert_eq!(store.load(None), Language::FRENCH);
    assert_eq!(store.raw("waybank_language"), Some("fr".to_string()));

    // The migrated key survives a fresh store over the same file
    let reopened = PreferenceStore::new(
        Box::new(JsonFileStore::new(&prefs_path)),
        StorageKeys::default(),
        Language::ENGLISH,
    );
    assert_eq!(reopened.raw("waybank_language"), Some("fr".to_string()));
    assert!(!reopened.is_degraded());
}

#[test]
fn test_unreadable_preferences_file_degrades_to_memory() {
    let temp_dir = TempDir::new().unwrap();
    let prefs_path = temp_dir.path().join("prefs.json");
    std::fs::write(&prefs_path, "[1, 2, 3]").unwrap();

    let store = PreferenceStore::new(
        Box::new(JsonFileStore::new(&prefs_path)),
        StorageKeys::default(),
        Language::ENGLISH,
    );

    assert_eq!(store.load(Some("it-IT")), Language::ITALIAN);
    store.save(Language::HINDI);

    assert!(store.is_degraded());
    assert_eq!(store.raw("waybank_language"), Some("hi".to_string()));
}

// ==================== Session Tests ====================

#[test]
fn test_session_persists_language_across_restarts() {
    let catalog_dir = TempDir::new().unwrap();
    write_catalog_dir(&catalog_dir);
    let prefs_dir = TempDir::new().unwrap();
    let prefs_path = prefs_dir.path().join("prefs.json");

    {
        let session = file_backed_session(&catalog_dir, &prefs_path);
        assert_eq!(session.language(), Language::ENGLISH);
        session.set_language(Language::ARABIC);
        assert_eq!(session.t("positions.title", ()), "المراكز");
        assert_eq!(session.document_attribute(DIR_ATTRIBUTE).as_deref(), Some("rtl"));
    }

    let session = file_backed_session(&catalog_dir, &prefs_path);
    assert_eq!(session.language(), Language::ARABIC);
    assert_eq!(session.direction().as_str(), "rtl");

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&prefs_path).unwrap()).unwrap();
    assert_eq!(stored["waybank_language"], "ar");
    assert_eq!(stored["language"], "ar");
}

#[test]
fn test_session_translates_with_fallbacks() {
    let catalog_dir = TempDir::new().unwrap();
    write_catalog_dir(&catalog_dir);
    let prefs_dir = TempDir::new().unwrap();
    let session = file_backed_session(&catalog_dir, &prefs_dir.path().join("prefs.json"));

    session.set_language_code("es");
    let vars = Variables::new().with("days", 3);

    assert_eq!(session.t("positions.cooldownActive", &vars), "Espera 3 días");
    assert_eq!(session.t("Connect Wallet", ()), "Connect Wallet");
    assert_eq!(session.t("swap.title", "Swap"), "Swap");
    assert_eq!(session.t("swap.title", ()), "swap.title");
    assert_eq!(session.common_word("wallet"), "Billetera");

    let metrics = session.metrics();
    assert_eq!(metrics.total, 4);
    assert_eq!(metrics.requested, 1);
    assert_eq!(metrics.reference_fallbacks, 1);
}

#[test]
fn test_convergence_after_one_microtask() {
    let queue = MicrotaskQueue::new();
    let sync = ContextSynchronizer::new(
        LanguageState::new("local", Language::ENGLISH),
        LanguageState::new("global", Language::ENGLISH),
        queue.clone(),
    );

    // A write that bypasses set_language leaves the containers apart
    sync.global().set(Language::RUSSIAN);
    assert_eq!(sync.read(), Language::RUSSIAN);
    queue.run_until_idle();
    assert_eq!(sync.state(), SyncState::Converged);

    sync.set_language(Language::CHINESE);
    queue.run_until_idle();
    assert_eq!(sync.local().get(), Language::CHINESE);
    assert_eq!(sync.global().get(), Language::CHINESE);
    assert_eq!(sync.read(), Language::CHINESE);
}

#[test]
fn test_session_with_memory_store_and_browser_guess() {
    let preferences = PreferenceStore::new(
        Box::new(MemoryStore::new()),
        StorageKeys::default(),
        Language::ENGLISH,
    );
    let session = LanguageSession::start(
        interpolation_catalog(),
        preferences,
        DocumentAttributes::new(),
        MicrotaskQueue::new(),
        Some("pt_BR.UTF-8"),
    );

    assert_eq!(session.language(), Language::PORTUGUESE);
    assert_eq!(session.document_attribute(LANG_ATTRIBUTE).as_deref(), Some("pt"));
    assert_eq!(session.document_attribute(DIR_ATTRIBUTE).as_deref(), Some("ltr"));
}

// ==================== Property Tests ====================

fn any_language() -> impl Strategy<Value = Language> {
    prop::sample::select(Language::all())
}

proptest! {
    #[test]
    fn prop_resolution_is_never_empty(
        key in "[a-zA-Z]{1,8}(\\.[a-zA-Z]{1,8}){0,2}",
        language in any_language(),
    ) {
        let resolver = KeyResolver::new(interpolation_catalog(), Language::ENGLISH);
        let text = resolver.resolve(&key, language, None, None);
        prop_assert!(!text.is_empty());
    }

    #[test]
    fn prop_blank_default_still_yields_text(
        key in "[a-z]{1,12}",
        blank in " {0,4}",
        language in any_language(),
    ) {
        let resolver = KeyResolver::new(interpolation_catalog(), Language::ENGLISH);
        prop_assert_eq!(resolver.resolve(&key, language, Some(&blank), None), key);
    }

    #[test]
    fn prop_requested_value_wins(
        english in "[A-Za-z]{1,12}",
        translated in "[A-Za-z][A-Za-z ]{0,11}",
        language in any_language(),
    ) {
        let section = Section::new()
            .with(Language::ENGLISH, [("label", english.as_str())])
            .with(language, [("label", translated.as_str())]);
        let catalog = Catalog::builder().section("demo", section).build().unwrap();
        let resolver = KeyResolver::new(Arc::new(catalog), Language::ENGLISH);

        prop_assert_eq!(resolver.resolve("demo.label", language, None, None), translated);
    }

    #[test]
    fn prop_missing_translation_matches_english(
        english in "[A-Za-z]{1,12}",
        language in any_language(),
    ) {
        let section = Section::new().with(Language::ENGLISH, [("label", english.as_str())]);
        let catalog = Catalog::builder().section("demo", section).build().unwrap();
        let resolver = KeyResolver::new(Arc::new(catalog), Language::ENGLISH);

        prop_assert_eq!(
            resolver.resolve("demo.label", language, None, None),
            resolver.resolve("demo.label", Language::ENGLISH, None, None)
        );
    }

    #[test]
    fn prop_direction_apply_is_idempotent(language in any_language()) {
        let manager = DirectionalityManager::new();
        let mut once = DocumentAttributes::new();
        manager.apply(&mut once, language);

        let mut twice = DocumentAttributes::new();
        manager.apply(&mut twice, language);
        manager.apply(&mut twice, language);

        prop_assert_eq!(once.direction(), twice.direction());
        prop_assert_eq!(once.lang(), twice.lang());
    }
}
