use std::{collections::BTreeMap, time::Duration};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::Value;

/// The web endpoint refuses anything longer than this.
pub const MAX_TEXT_CHARS: usize = 5000;

/// Language name -> code, as accepted by the Google web endpoint.
pub const GOOGLE_LANGUAGES: &[(&str, &str)] = &[
    ("afrikaans", "af"),
    ("albanian", "sq"),
    ("amharic", "am"),
    ("arabic", "ar"),
    ("armenian", "hy"),
    ("assamese", "as"),
    ("aymara", "ay"),
    ("azerbaijani", "az"),
    ("bambara", "bm"),
    ("basque", "eu"),
    ("belarusian", "be"),
    ("bengali", "bn"),
    ("bhojpuri", "bho"),
    ("bosnian", "bs"),
    ("bulgarian", "bg"),
    ("catalan", "ca"),
    ("cebuano", "ceb"),
    ("chichewa", "ny"),
    ("chinese (simplified)", "zh-CN"),
    ("chinese (traditional)", "zh-TW"),
    ("corsican", "co"),
    ("croatian", "hr"),
    ("czech", "cs"),
    ("danish", "da"),
    ("dhivehi", "dv"),
    ("dogri", "doi"),
    ("dutch", "nl"),
    ("english", "en"),
    ("esperanto", "eo"),
    ("estonian", "et"),
    ("ewe", "ee"),
    ("filipino", "tl"),
    ("finnish", "fi"),
    ("french", "fr"),
    ("frisian", "fy"),
    ("galician", "gl"),
    ("georgian", "ka"),
    ("german", "de"),
    ("greek", "el"),
    ("guarani", "gn"),
    ("gujarati", "gu"),
    ("haitian creole", "ht"),
    ("hausa", "ha"),
    ("hawaiian", "haw"),
    ("hebrew", "iw"),
    ("hindi", "hi"),
    ("hmong", "hmn"),
    ("hungarian", "hu"),
    ("icelandic", "is"),
    ("igbo", "ig"),
    ("ilocano", "ilo"),
    ("indonesian", "id"),
    ("irish", "ga"),
    ("italian", "it"),
    ("japanese", "ja"),
    ("javanese", "jw"),
    ("kannada", "kn"),
    ("kazakh", "kk"),
    ("khmer", "km"),
    ("kinyarwanda", "rw"),
    ("konkani", "gom"),
    ("korean", "ko"),
    ("krio", "kri"),
    ("kurdish (kurmanji)", "ku"),
    ("kurdish (sorani)", "ckb"),
    ("kyrgyz", "ky"),
    ("lao", "lo"),
    ("latin", "la"),
    ("latvian", "lv"),
    ("lingala", "ln"),
    ("lithuanian", "lt"),
    ("luganda", "lg"),
    ("luxembourgish", "lb"),
    ("macedonian", "mk"),
    ("maithili", "mai"),
    ("malagasy", "mg"),
    ("malay", "ms"),
    ("malayalam", "ml"),
    ("maltese", "mt"),
    ("maori", "mi"),
    ("marathi", "mr"),
    ("meiteilon (manipuri)", "mni-Mtei"),
    ("mizo", "lus"),
    ("mongolian", "mn"),
    ("myanmar", "my"),
    ("nepali", "ne"),
    ("norwegian", "no"),
    ("odia (oriya)", "or"),
    ("oromo", "om"),
    ("pashto", "ps"),
    ("persian", "fa"),
    ("polish", "pl"),
    ("portuguese", "pt"),
    ("punjabi", "pa"),
    ("quechua", "qu"),
    ("romanian", "ro"),
    ("russian", "ru"),
    ("samoan", "sm"),
    ("sanskrit", "sa"),
    ("scots gaelic", "gd"),
    ("sepedi", "nso"),
    ("serbian", "sr"),
    ("sesotho", "st"),
    ("shona", "sn"),
    ("sindhi", "sd"),
    ("sinhala", "si"),
    ("slovak", "sk"),
    ("slovenian", "sl"),
    ("somali", "so"),
    ("spanish", "es"),
    ("sundanese", "su"),
    ("swahili", "sw"),
    ("swedish", "sv"),
    ("tajik", "tg"),
    ("tamil", "ta"),
    ("tatar", "tt"),
    ("telugu", "te"),
    ("thai", "th"),
    ("tigrinya", "ti"),
    ("tsonga", "ts"),
    ("turkish", "tr"),
    ("turkmen", "tk"),
    ("twi", "ak"),
    ("ukrainian", "uk"),
    ("urdu", "ur"),
    ("uyghur", "ug"),
    ("uzbek", "uz"),
    ("vietnamese", "vi"),
    ("welsh", "cy"),
    ("xhosa", "xh"),
    ("yiddish", "yi"),
    ("yoruba", "yo"),
    ("zulu", "zu"),
];

pub fn google_languages() -> BTreeMap<String, String> {
    GOOGLE_LANGUAGES
        .iter()
        .map(|(name, code)| (name.to_string(), code.to_string()))
        .collect()
}

fn is_google_code(code: &str) -> bool {
    GOOGLE_LANGUAGES.iter().any(|(_, c)| *c == code)
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String>;

    /// Human-readable name -> language code.
    async fn supported_languages(&self) -> Result<BTreeMap<String, String>>;
}

pub struct DryRunTranslator;

#[async_trait]
impl Translator for DryRunTranslator {
    async fn translate(&self, text: &str, _source_lang: &str, target_lang: &str) -> Result<String> {
        Ok(format!("[DRY:{}] {}", target_lang, text))
    }

    async fn supported_languages(&self) -> Result<BTreeMap<String, String>> {
        Ok(google_languages())
    }
}

pub struct GoogleTranslator {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        if text.chars().count() > MAX_TEXT_CHARS {
            bail!(
                "Text is {} characters long, the service accepts at most {}",
                text.chars().count(),
                MAX_TEXT_CHARS
            );
        }
        if source_lang != "auto" && !is_google_code(source_lang) {
            bail!("Source language '{}' is not supported", source_lang);
        }
        if !is_google_code(target_lang) {
            bail!("Target language '{}' is not supported", target_lang);
        }

        let response = self
            .client
            .get(format!("{}/translate_a/single", self.base_url))
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .with_context(|| format!("Request to translate into '{}' failed", target_lang))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Translation service returned {} for '{}'", status, target_lang);
        }

        let body: Value = response
            .json()
            .await
            .context("Translation service returned invalid JSON")?;

        parse_translation(&body)
    }

    async fn supported_languages(&self) -> Result<BTreeMap<String, String>> {
        Ok(google_languages())
    }
}

/// The body is `[[["translated", "source", ...], ...], ...]`; the translation
/// is every segment's first string glued together.
fn parse_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .context("Unexpected response shape from translation service")?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        bail!("Translation service returned an empty translation");
    }

    Ok(translated)
}
