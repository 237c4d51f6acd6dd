use std::path::PathBuf;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::{
    overrides::OverrideTable,
    pacing::Pacer,
    translations::{JsonAdapter, Node, Translatable},
    translators::Translator,
};

pub const DEFAULT_SOURCE_LANG: &str = "en";

/// Per-language leaf counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub overridden: usize,
    pub translated: usize,
    pub failed: usize,
    /// Empty strings and non-string scalars.
    pub untouched: usize,
}

pub struct OutputTargets {
    pub primary_dir: PathBuf,
    pub secondary_dir: Option<PathBuf>,
    pub indent: usize,
    pub write: bool,
}

pub struct LanguageReport {
    pub lang: String,
    pub tally: Tally,
    pub document: Node,
    pub written: Vec<PathBuf>,
}

pub struct Generator {
    translator: Box<dyn Translator>,
    pacer: Box<dyn Pacer>,
    overrides: OverrideTable,
    source_lang: String,
}

impl Generator {
    pub fn new(
        translator: Box<dyn Translator>,
        pacer: Box<dyn Pacer>,
        overrides: OverrideTable,
    ) -> Self {
        Self {
            translator,
            pacer,
            overrides,
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
        }
    }

    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = source_lang.into();
        self
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub async fn translate_document(
        &self,
        node: &Node,
        target_lang: &str,
        source_lang: &str,
    ) -> Node {
        let mut tally = Tally::default();
        self.translate_document_counted(node, target_lang, source_lang, &mut tally)
            .await
    }

    pub async fn translate_document_counted(
        &self,
        node: &Node,
        target_lang: &str,
        source_lang: &str,
        tally: &mut Tally,
    ) -> Node {
        self.translate_node(node, target_lang, source_lang, tally).await
    }

    fn translate_node<'a>(
        &'a self,
        node: &'a Node,
        target_lang: &'a str,
        source_lang: &'a str,
        tally: &'a mut Tally,
    ) -> BoxFuture<'a, Node> {
        async move {
            match node {
                Node::Mapping(entries) => {
                    let mut out = Vec::with_capacity(entries.len());
                    for (key, value) in entries {
                        let value = self
                            .translate_node(value, target_lang, source_lang, tally)
                            .await;
                        out.push((key.clone(), value));
                    }
                    Node::Mapping(out)
                }
                Node::Sequence(items) => {
                    let mut out = Vec::with_capacity(items.len());
                    for item in items {
                        out.push(
                            self.translate_node(item, target_lang, source_lang, tally)
                                .await,
                        );
                    }
                    Node::Sequence(out)
                }
                Node::Text(text) if node.is_translatable() => Node::Text(
                    self.translate_leaf(text, target_lang, source_lang, tally)
                        .await,
                ),
                other => {
                    tally.untouched += 1;
                    other.clone()
                }
            }
        }
        .boxed()
    }

    async fn translate_leaf(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: &str,
        tally: &mut Tally,
    ) -> String {
        if let Some(manual) = self.overrides.lookup(source_lang, target_lang, text) {
            tally.overridden += 1;
            return manual.to_string();
        }

        match self.translator.translate(text, source_lang, target_lang).await {
            Ok(translated) => {
                self.pacer.pause().await;
                tally.translated += 1;
                translated
            }
            Err(e) => {
                warn!("Error translating '{}' to {}: {:#}", text, target_lang, e);
                tally.failed += 1;
                text.to_string()
            }
        }
    }

    /// Translate `source` into every language in order, writing each result
    /// as it is produced. A write failure stops the run; earlier files stay.
    pub async fn run(
        &self,
        source: &Node,
        target_langs: &[String],
        outputs: &OutputTargets,
        pb: &ProgressBar,
    ) -> Result<Vec<LanguageReport>> {
        let mut reports = Vec::with_capacity(target_langs.len());

        for lang in target_langs {
            pb.set_message(format!("translating {}", lang));
            pb.println(format!("Translating to {}...", lang));

            let mut tally = Tally::default();
            let document = self
                .translate_document_counted(source, lang, &self.source_lang, &mut tally)
                .await;

            let mut written = Vec::new();
            if outputs.write {
                written.push(JsonAdapter::write_document(
                    &document,
                    lang,
                    &outputs.primary_dir,
                    outputs.indent,
                )?);
                if let Some(dir) = &outputs.secondary_dir {
                    written.push(JsonAdapter::write_document(
                        &document,
                        lang,
                        dir,
                        outputs.indent,
                    )?);
                }
                pb.println(format!("[OK] {}.json", lang));
            }

            if tally.failed > 0 {
                pb.println(format!(
                    "    ⚠️  {} - {} strings left untranslated",
                    lang, tally.failed
                ));
            }

            info!(
                lang = %lang,
                overridden = tally.overridden,
                translated = tally.translated,
                failed = tally.failed,
                "language done"
            );
            debug!("wrote {:?}", written);

            pb.inc(1);
            reports.push(LanguageReport {
                lang: lang.clone(),
                tally,
                document,
                written,
            });
        }

        Ok(reports)
    }
}

/// Curated codes first, then every supported code except the base language.
pub fn resolve_target_languages<'a>(
    curated: &[String],
    supported: impl IntoIterator<Item = &'a str>,
    base_lang: &str,
) -> Vec<String> {
    let mut langs: Vec<String> = Vec::new();

    for lang in curated {
        if !langs.contains(lang) {
            langs.push(lang.clone());
        }
    }

    for code in supported {
        if code != base_lang && !langs.iter().any(|l| l == code) {
            langs.push(code.to_string());
        }
    }

    langs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pacing::NoDelay, translators::google_languages};
    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;
    use std::{
        collections::{BTreeMap, HashMap},
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    /// Uppercases text unless it's listed as failing.
    #[derive(Default)]
    struct StubTranslator {
        failing: Vec<&'static str>,
        canned: HashMap<&'static str, &'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Translator for StubTranslator {
        async fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|f| *f == text) {
                bail!("service unavailable");
            }
            if let Some(canned) = self.canned.get(text) {
                return Ok(canned.to_string());
            }
            Ok(format!("{}:{}", target, text.to_uppercase()))
        }

        async fn supported_languages(&self) -> Result<BTreeMap<String, String>> {
            Ok(google_languages())
        }
    }

    struct CountingPacer(Arc<AtomicUsize>);

    #[async_trait]
    impl Pacer for CountingPacer {
        async fn pause(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn generator(translator: StubTranslator) -> Generator {
        Generator::new(
            Box::new(translator),
            Box::new(NoDelay),
            OverrideTable::builtin(),
        )
    }

    fn doc(value: serde_json::Value) -> Node {
        Node::from(value)
    }

    #[tokio::test]
    async fn test_override_example() {
        let generator = generator(StubTranslator::default());
        let out = generator
            .translate_document(&doc(json!({"title": "Analyzing...", "count": 3})), "ru", "en")
            .await;

        assert_eq!(out, doc(json!({"title": "Анализирую...", "count": 3})));
    }

    #[tokio::test]
    async fn test_empty_string_example() {
        let generator = generator(StubTranslator::default());
        let out = generator
            .translate_document(&doc(json!({"items": ["Back", ""]})), "ru", "en")
            .await;

        assert_eq!(out, doc(json!({"items": ["Назад", ""]})));
    }

    #[tokio::test]
    async fn test_override_beats_service() {
        let calls = Arc::new(AtomicUsize::new(0));
        let translator = StubTranslator {
            canned: HashMap::from([("Verdict", "Приговор")]),
            calls: calls.clone(),
            ..Default::default()
        };
        let out = generator(translator)
            .translate_document(&doc(json!(["Verdict"])), "ru", "en")
            .await;

        assert_eq!(out, doc(json!(["Вердикт"])));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_override_only_for_its_language_pair() {
        let out = generator(StubTranslator::default())
            .translate_document(&doc(json!(["Verdict"])), "de", "en")
            .await;

        assert_eq!(out, doc(json!(["de:VERDICT"])));
    }

    #[tokio::test]
    async fn test_scalars_and_blank_strings_untouched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let translator = StubTranslator {
            calls: calls.clone(),
            ..Default::default()
        };
        let input = doc(json!({
            "a": 1.5,
            "b": true,
            "c": null,
            "d": "",
            "e": "   ",
            "f": [0, "\n"]
        }));
        let mut tally = Tally::default();
        let out = generator(translator)
            .translate_document_counted(&input, "de", "en", &mut tally)
            .await;

        assert_eq!(out, input);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(tally.untouched, 7);
    }

    #[tokio::test]
    async fn test_failure_passes_original_through() {
        let translator = StubTranslator {
            failing: vec!["Broken"],
            ..Default::default()
        };
        let mut tally = Tally::default();
        let input = doc(json!({"a": "Broken", "b": "Fine"}));
        let out = generator(translator)
            .translate_document_counted(&input, "de", "en", &mut tally)
            .await;

        assert_eq!(out, doc(json!({"a": "Broken", "b": "de:FINE"})));
        assert_eq!(
            tally,
            Tally {
                overridden: 0,
                translated: 1,
                failed: 1,
                untouched: 0
            }
        );
    }

    #[tokio::test]
    async fn test_shape_is_preserved() {
        let input = doc(json!({
            "nav": {"home": "Home", "links": ["About", {"label": "Contact", "order": 2}]},
            "empty": {},
            "list": [],
            "nested": [[["deep"]]]
        }));
        let out = generator(StubTranslator::default())
            .translate_document(&input, "fr", "en")
            .await;

        assert!(input.same_shape(&out));
        assert_eq!(out.leaves(), vec!["fr:HOME", "fr:ABOUT", "fr:CONTACT", "fr:DEEP"]);
    }

    #[tokio::test]
    async fn test_pacer_runs_after_successful_calls_only() {
        let pauses = Arc::new(AtomicUsize::new(0));
        let translator = StubTranslator {
            failing: vec!["Broken"],
            ..Default::default()
        };
        let generator = Generator::new(
            Box::new(translator),
            Box::new(CountingPacer(pauses.clone())),
            OverrideTable::builtin(),
        );

        generator
            .translate_document(&doc(json!(["One", "Broken", "Two", "Back", ""])), "ru", "en")
            .await;

        assert_eq!(pauses.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_run_without_writing() {
        let generator = generator(StubTranslator::default());
        let outputs = OutputTargets {
            primary_dir: PathBuf::from("/nonexistent/should/not/be/created"),
            secondary_dir: None,
            indent: 2,
            write: false,
        };
        let langs = vec!["ru".to_string(), "de".to_string()];

        let reports = generator
            .run(&doc(json!({"t": "Back"})), &langs, &outputs, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].lang, "ru");
        assert_eq!(reports[0].document, doc(json!({"t": "Назад"})));
        assert_eq!(reports[0].tally.overridden, 1);
        assert_eq!(reports[1].document, doc(json!({"t": "de:BACK"})));
        assert!(reports.iter().all(|r| r.written.is_empty()));
    }

    #[tokio::test]
    async fn test_run_uses_configured_source_lang() {
        let generator = generator(StubTranslator::default()).with_source_lang("de");
        let outputs = OutputTargets {
            primary_dir: PathBuf::from("unused"),
            secondary_dir: None,
            indent: 2,
            write: false,
        };

        let reports = generator
            .run(&doc(json!(["Back"])), &["ru".to_string()], &outputs, &ProgressBar::hidden())
            .await
            .unwrap();

        // The built-in override is en -> ru only.
        assert_eq!(reports[0].document, doc(json!(["ru:BACK"])));
        assert_eq!(generator.source_lang(), "de");
    }

    #[test]
    fn test_resolve_curated_then_supported() {
        let curated = vec!["ru".to_string(), "de".to_string(), "ru".to_string()];
        let langs = resolve_target_languages(&curated, ["en", "fr", "ru", "zh-CN"], "en");
        assert_eq!(langs, vec!["ru", "de", "fr", "zh-CN"]);
    }

    #[test]
    fn test_resolve_curated_only() {
        let curated = vec!["ru".to_string()];
        let langs = resolve_target_languages(&curated, std::iter::empty(), "en");
        assert_eq!(langs, vec!["ru"]);
    }

    #[test]
    fn test_resolve_against_google_table() {
        let supported = google_languages();
        let langs = resolve_target_languages(
            &["ru".to_string()],
            supported.values().map(String::as_str),
            "en",
        );

        assert_eq!(langs[0], "ru");
        assert_eq!(langs[1], "af");
        assert!(!langs.contains(&"en".to_string()));
        assert_eq!(langs.len(), supported.len() - 1);
    }
}
