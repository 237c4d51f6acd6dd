use std::collections::HashMap;

use crate::configs::OverrideEntry;

/// Hand-picked English -> Russian strings that read better than the machine output.
const BUILTIN_EN_RU: &[(&str, &str)] = &[
    ("WILL AI TAKE MY JOB?", "ЗАБЕРЕТ ЛИ ИИ МОЮ РАБОТУ?"),
    ("Check the future", "Проверить будущее"),
    ("Analyzing...", "Анализирую..."),
    ("Risk of automation", "Риск автоматизации"),
    ("Safe Skills", "Безопасные навыки"),
    ("Tasks at risk", "Задачи под угрозой"),
    ("Verdict", "Вердикт"),
    ("Rationale", "Обоснование"),
    (
        "Will AI take my job?- Free career analysis",
        "Заберет ли ИИ мою работу? - Бесплатный анализ карьеры",
    ),
    (
        "Check if artificial intelligence is a threat to your profession.Get a free risk analysis and safe skills list.",
        "Проверьте, угрожает ли искусственный интеллект вашей профессии. Получите бесплатный анализ рисков и список безопасных навыков.",
    ),
    ("Supported by", "При поддержке"),
    ("Join the community", "Вступайте в сообщество"),
    ("Statistics", "Статистика"),
    ("Back", "Назад"),
];

/// source language -> target language -> source text -> replacement.
type Table = HashMap<String, HashMap<String, HashMap<String, String>>>;

/// Exact-match replacements keyed by (source language, target language, text).
///
/// Built once at startup and only read afterwards.
#[derive(Debug, Default, Clone)]
pub struct OverrideTable {
    pairs: Table,
}

impl OverrideTable {
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN_EN_RU.iter().map(|(text, translation)| OverrideEntry {
            source: "en".to_string(),
            target: "ru".to_string(),
            text: text.to_string(),
            translation: translation.to_string(),
        }))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = OverrideEntry>) -> Self {
        Self::default().with_entries(entries)
    }

    /// Later entries replace earlier ones with the same key.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = OverrideEntry>) -> Self {
        for e in entries {
            self.pairs
                .entry(e.source)
                .or_default()
                .entry(e.target)
                .or_default()
                .insert(e.text, e.translation);
        }
        self
    }

    pub fn lookup(&self, source_lang: &str, target_lang: &str, text: &str) -> Option<&str> {
        self.pairs
            .get(source_lang)?
            .get(target_lang)?
            .get(text)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
