use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Ka,
    Ru,
    En,
}

impl Locale {
    pub const FALLBACK: Locale = Locale::Ka;

    /// Resolves a device language tag (`ka-GE`, `en_US.UTF-8`, `ru`) by its
    /// primary subtag. Unsupported or empty tags resolve to the fallback.
    pub fn from_tag(tag: Option<&str>) -> Self {
        let primary = tag
            .map(|value| value.trim().to_lowercase())
            .and_then(|value| {
                value
                    .split(['-', '_', '.'])
                    .next()
                    .map(ToString::to_string)
            })
            .unwrap_or_default();

        match primary.as_str() {
            "ka" => Self::Ka,
            "ru" => Self::Ru,
            "en" => Self::En,
            _ => Self::FALLBACK,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Ka => "ka",
            Self::Ru => "ru",
            Self::En => "en",
        }
    }
}

/// Key to display-string lookup. Must return some string for every key.
pub trait Translator: Send + Sync {
    fn t(&self, key: &str) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    locale: Locale,
}

impl Catalog {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Locale::FALLBACK)
    }
}

impl Translator for Catalog {
    fn t(&self, key: &str) -> String {
        lookup(self.locale, key)
            .or_else(|| lookup(Locale::FALLBACK, key))
            .unwrap_or(key)
            .to_string()
    }
}

fn lookup(locale: Locale, key: &str) -> Option<&'static str> {
    let value = match (locale, key) {
        (Locale::En, "title") => "AIClinic • Your health assistant",
        (Locale::En, "botHello") => {
            "Hello! I'm your AIClinic assistant. Describe your symptoms and I'll help you understand them."
        }
        (Locale::En, "placeholder") => "Describe your symptoms...",
        (Locale::En, "typing") => "AI is analyzing...",
        (Locale::En, "welcome.title") => "AIClinic",
        (Locale::En, "welcome.subtitle") => "Your personal AI health assistant",
        (Locale::En, "welcome.startChat") => "Start chat",
        (Locale::En, "warning.title") => "Important",
        (Locale::En, "warning.description") => {
            "This assistant does not replace a doctor. In an emergency call your local emergency number."
        }

        (Locale::Ka, "title") => "AIClinic • თქვენი ჯანმრთელობის ასისტენტი",
        (Locale::Ka, "botHello") => {
            "გამარჯობა! მე ვარ AIClinic-ის ასისტენტი. აღწერეთ თქვენი სიმპტომები და დაგეხმარებით."
        }
        (Locale::Ka, "placeholder") => "აღწერეთ სიმპტომები...",
        (Locale::Ka, "typing") => "AI აანალიზებს...",
        (Locale::Ka, "welcome.title") => "AIClinic",
        (Locale::Ka, "welcome.subtitle") => "თქვენი პირადი AI ჯანმრთელობის ასისტენტი",
        (Locale::Ka, "welcome.startChat") => "ჩატის დაწყება",
        (Locale::Ka, "warning.title") => "მნიშვნელოვანი",
        (Locale::Ka, "warning.description") => {
            "ასისტენტი არ ცვლის ექიმს. გადაუდებელ შემთხვევაში დარეკეთ 112-ზე."
        }

        (Locale::Ru, "title") => "AIClinic • Ваш помощник по здоровью",
        (Locale::Ru, "botHello") => {
            "Здравствуйте! Я ассистент AIClinic. Опишите ваши симптомы, и я помогу в них разобраться."
        }
        (Locale::Ru, "placeholder") => "Опишите симптомы...",
        (Locale::Ru, "typing") => "ИИ анализирует...",
        (Locale::Ru, "welcome.title") => "AIClinic",
        (Locale::Ru, "welcome.subtitle") => "Ваш личный ИИ-помощник по здоровью",
        (Locale::Ru, "welcome.startChat") => "Начать чат",
        (Locale::Ru, "warning.title") => "Важно",
        (Locale::Ru, "warning.description") => {
            "Ассистент не заменяет врача. В экстренной ситуации звоните в службу спасения."
        }

        _ => return None,
    };

    Some(value)
}
