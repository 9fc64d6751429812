//! Keyword classification of inbound chat messages.
//!
//! Classification is a case-insensitive substring test against fixed
//! vocabularies. The three intents are independent: one message may trigger
//! a service lookup, advance the license wizard and check a plate at once.

use once_cell::sync::Lazy;

/// Vocabulary that marks a question about police administrative services.
pub static SERVICE_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "pelayanan",
        "layanan",
        "sim",
        "stnk",
        "pajak",
        "balik nama",
        "mutasi",
        "perpanjang",
        "buat",
        "bikin",
        "ganti",
        "hilang",
        "kehilangan",
        "pengesahan",
        "dokumen",
        "syarat",
        "persyaratan",
    ]
});

/// Vocabulary that starts or continues the driver-license wizard.
pub static FLOW_TRIGGER_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "perpanjang sim",
        "perpanjangan sim",
        "extend sim",
        "buat sim",
        "bikin sim",
        "sim baru",
        "sim a",
        "sim c",
        "proses sim",
        "urus sim",
    ]
});

/// Words that on their own ask for a traffic-violation check.
pub static VIOLATION_KEYWORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["tilang", "pelanggaran", "denda"]);

/// Intents detected in a single message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnIntents {
    pub service_request: bool,
    pub flow_trigger: bool,
    pub violation_check: bool,
}

impl TurnIntents {
    pub fn any(&self) -> bool {
        self.service_request || self.flow_trigger || self.violation_check
    }
}

/// Substring classifier over configurable vocabularies.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    service: Vec<String>,
    flow_trigger: Vec<String>,
    violation: Vec<String>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(
            SERVICE_KEYWORDS.iter().copied(),
            FLOW_TRIGGER_KEYWORDS.iter().copied(),
            VIOLATION_KEYWORDS.iter().copied(),
        )
    }
}

impl IntentClassifier {
    pub fn new<S, F, V>(service: S, flow_trigger: F, violation: V) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        Self {
            service: normalize(service),
            flow_trigger: normalize(flow_trigger),
            violation: normalize(violation),
        }
    }

    pub fn classify(&self, message: &str) -> TurnIntents {
        let lower = message.to_lowercase();
        TurnIntents {
            service_request: contains_any(&lower, &self.service),
            flow_trigger: contains_any(&lower, &self.flow_trigger),
            violation_check: contains_any(&lower, &self.violation)
                || (lower.contains("cek") && (lower.contains("polisi") || lower.contains("nopol"))),
        }
    }
}

fn normalize<I>(words: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(message: &str) -> TurnIntents {
        IntentClassifier::default().classify(message)
    }

    #[test]
    fn small_talk_matches_nothing() {
        assert!(!classify("Selamat pagi, apa kabar?").any());
    }

    #[test]
    fn license_renewal_triggers_service_and_flow() {
        let intents = classify("Saya mau PERPANJANG SIM");
        assert!(intents.service_request);
        assert!(intents.flow_trigger);
        assert!(!intents.violation_check);
    }

    #[test]
    fn service_question_without_license_wizard() {
        let intents = classify("Apa syarat balik nama kendaraan?");
        assert!(intents.service_request);
        assert!(!intents.flow_trigger);
    }

    #[test]
    fn violation_vocabulary() {
        assert!(classify("cek tilang B 1234 SV").violation_check);
        assert!(classify("berapa denda saya").violation_check);
        assert!(classify("ada pelanggaran?").violation_check);
    }

    #[test]
    fn cek_requires_polisi_or_nopol() {
        assert!(classify("tolong cek nopol B1234SV").violation_check);
        assert!(classify("cek nomor polisi saya").violation_check);
        assert!(!classify("cek cuaca hari ini").violation_check);
    }

    #[test]
    fn intents_can_co_occur() {
        let intents = classify("bikin sim dan cek tilang");
        assert!(intents.service_request);
        assert!(intents.flow_trigger);
        assert!(intents.violation_check);
    }

    #[test]
    fn custom_vocabulary_is_normalized() {
        let classifier = IntentClassifier::new(["  STNK "], ["Urus SIM"], Vec::<String>::new());
        let intents = classifier.classify("mau urus sim dong");
        assert!(!intents.service_request);
        assert!(intents.flow_trigger);
        assert!(!intents.violation_check);
    }

    #[test]
    fn blank_keywords_are_ignored() {
        let classifier = IntentClassifier::new([""], ["   "], [""]);
        assert!(!classifier.classify("apa saja").service_request);
        assert!(!classifier.classify("apa saja").flow_trigger);
    }
}
