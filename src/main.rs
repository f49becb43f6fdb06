use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use waybank_i18n::config::Config;
use waybank_i18n::i18n::{
    AuditReport, Catalog, CompletenessAuditor, DocumentAttributes, JsonFileStore, Language,
    LanguageSession, MicrotaskQueue, PreferenceStore, Variables,
};

const USAGE: &str = "Usage: waybank-i18n [command]

Commands:
  audit                                  Report missing translations (default)
  resolve <key> [--lang <code>] [--default <text>] [--var name=value]...
  languages                              List supported languages
  set-language <code>                    Persist the preferred language
  current-language                       Print the preferred language";

fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging on stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("waybank_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None | Some("audit") => run_audit(&config),
        Some("resolve") => run_resolve(&config, &args[1..]),
        Some("languages") => {
            run_languages();
            Ok(())
        }
        Some("set-language") => {
            let code = args.get(1).context("set-language requires a language code")?;
            run_set_language(&config, code);
            Ok(())
        }
        Some("current-language") => {
            println!("{}", preference_store(&config).load(config.browser_locale.as_deref()));
            Ok(())
        }
        Some("-h") | Some("--help") | Some("help") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(other) => bail!("unknown command '{}'\n\n{}", other, USAGE),
    }
}

fn load_catalog(config: &Config) -> Result<Arc<Catalog>> {
    let catalog = Catalog::load_dir(&config.catalog_dir).with_context(|| {
        format!(
            "Failed to load translation catalog from {}",
            config.catalog_dir.display()
        )
    })?;
    Ok(Arc::new(catalog))
}

fn preference_store(config: &Config) -> PreferenceStore {
    PreferenceStore::new(
        Box::new(JsonFileStore::new(&config.preferences_file)),
        config.storage_keys.clone(),
        config.default_language,
    )
}

fn run_audit(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    let report = CompletenessAuditor::audit(&catalog);

    println!("{}", serde_json::to_string_pretty(&report)?);

    let code = audit_exit_code(&report);
    if code == 0 {
        info!("All {} sections are complete", catalog.section_count());
        Ok(())
    } else {
        info!(
            "{} missing keys and {} missing languages across {} sections",
            report.missing_key_count(),
            report.missing_language_count(),
            report.section_count()
        );
        std::process::exit(code);
    }
}

/// Exit status for `audit`: 0 when every language is complete, 1 otherwise.
fn audit_exit_code(report: &AuditReport) -> i32 {
    if report.is_complete() {
        0
    } else {
        1
    }
}

/// Arguments of the `resolve` command.
#[derive(Debug, Default)]
struct ResolveRequest {
    key: String,
    language: Option<String>,
    default_value: Option<String>,
    variables: Variables,
}

fn parse_resolve_args(args: &[String]) -> Result<ResolveRequest> {
    let (key, rest) = args.split_first().context("resolve requires a key")?;
    let mut request = ResolveRequest {
        key: key.clone(),
        ..Default::default()
    };

    let mut rest = rest.iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .with_context(|| format!("{} requires a value", flag))?;
        match flag.as_str() {
            "--lang" => request.language = Some(value.clone()),
            "--default" => request.default_value = Some(value.clone()),
            "--var" => {
                let (name, value) = value
                    .split_once('=')
                    .with_context(|| format!("--var expects name=value, got '{}'", value))?;
                request.variables.insert(name, value);
            }
            other => bail!("unknown option '{}'", other),
        }
    }

    Ok(request)
}

fn run_resolve(config: &Config, args: &[String]) -> Result<()> {
    let ResolveRequest {
        key,
        language,
        default_value,
        variables,
    } = parse_resolve_args(args)?;

    let catalog = load_catalog(config)?;
    let session = LanguageSession::start(
        catalog,
        preference_store(config),
        DocumentAttributes::new(),
        MicrotaskQueue::new(),
        config.browser_locale.as_deref(),
    );

    let text = match language {
        Some(code) => session.resolver().resolve_code(
            &key,
            &code,
            default_value.as_deref(),
            Some(&variables),
        ),
        None => session.t(&key, (default_value.as_deref(), Some(&variables))),
    };

    println!("{}", text);
    Ok(())
}

fn run_languages() {
    for language in Language::all() {
        println!(
            "{}\t{}\t{}",
            language.code(),
            language.native_name(),
            language.direction()
        );
    }
}

fn run_set_language(config: &Config, code: &str) {
    let store = preference_store(config);
    let language = Language::coerce(code, config.default_language);
    store.save(language);

    if store.is_degraded() {
        warn!(
            "Preference could not be written to {}",
            config.preferences_file.display()
        );
    }
    println!("{}", language);
}
