//! Prompt-assembling reply generator.
//!
//! Turns a [`TurnContext`] into a system prompt for the "Sobat Lantas"
//! persona and asks the configured [`AIProvider`] for the reply. Everything
//! here is presentation; no state is read or written.

use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};

use crate::domain::flow::NodeType;
use crate::ports::{
    AIError, AIProvider, ActiveFlow, CompletionRequest, MessageRole, ReplyGenerator,
    RequestMetadata, ServiceInfo, TurnContext, ViolationInfo, ViolationStatus,
};

const SEPARATOR: &str = "----------------------------------------";

/// Western Indonesia Time, UTC+7.
const WIB_OFFSET_SECS: i32 = 7 * 3600;

/// Sampling settings passed with every completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplySettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// [`ReplyGenerator`] backed by an LLM provider.
pub struct PromptReplyGenerator {
    provider: Arc<dyn AIProvider>,
    settings: ReplySettings,
}

impl PromptReplyGenerator {
    pub fn new(provider: Arc<dyn AIProvider>, settings: ReplySettings) -> Self {
        Self { provider, settings }
    }

    /// Builds the system prompt for one turn.
    pub fn build_system_prompt(context: &TurnContext, now: DateTime<Utc>) -> String {
        let mut prompt = String::from(
            "Anda adalah asisten polisi lalu lintas AI bernama \"Sobat Lantas\" \
             yang membantu pengemudi di Indonesia.\n",
        );

        prompt.push_str(&greeting_section(context.is_first_message()));
        prompt.push_str(&time_section(now));

        let _ = writeln!(
            prompt,
            "\nDokumen diupload: {} ({} dokumen)",
            context.has_uploaded_documents(),
            context.uploaded_document_count()
        );

        if let Some(flow) = &context.active_flow {
            prompt.push_str(&flow_section(flow));
        }
        if let Some(info) = context.service_info.as_ref().filter(|i| i.found) {
            prompt.push_str(&service_section(info));
        }
        if let Some(info) = &context.violation_info {
            prompt.push_str(&violation_section(info));
        }
        if context.has_uploaded_documents() {
            prompt.push_str(&documents_section(context));
        }

        prompt.push_str(GUIDELINES);
        prompt
    }
}

#[async_trait]
impl ReplyGenerator for PromptReplyGenerator {
    async fn generate(&self, context: &TurnContext, message: &str) -> Result<String, AIError> {
        let system_prompt = Self::build_system_prompt(context, Utc::now());
        let trace_id = uuid::Uuid::new_v4().to_string();

        let request = CompletionRequest::new(RequestMetadata::new(
            context.session_id.clone(),
            trace_id,
        ))
        .with_system_prompt(system_prompt)
        .with_history(&context.history)
        .with_message(MessageRole::User, message)
        .with_temperature(self.settings.temperature)
        .with_max_tokens(self.settings.max_tokens);

        tracing::debug!(
            session_id = %context.session_id,
            history = context.history.len(),
            provider = %self.provider.provider_info().name,
            "Requesting assistant reply"
        );

        let response = self.provider.complete(request).await?;
        Ok(response.content)
    }
}

fn greeting_section(first_message: bool) -> String {
    if first_message {
        "\nINSTRUKSI SAPAAN:\n\
         - Ini pesan PERTAMA dalam percakapan, WAJIB mulai dengan sapaan \"Halo Sobat Lantas!\"\n\
         - Setelah sapaan, langsung lanjutkan dengan respons yang ramah dan membantu\n"
            .to_string()
    } else {
        "\nINSTRUKSI SAPAAN:\n\
         - Ini bukan pesan pertama, JANGAN gunakan sapaan \"Halo Sobat Lantas!\" lagi\n\
         - Langsung jawab pertanyaan dengan ramah dan membantu\n"
            .to_string()
    }
}

fn time_section(now: DateTime<Utc>) -> String {
    let local = FixedOffset::east_opt(WIB_OFFSET_SECS)
        .map(|tz| now.with_timezone(&tz).format("%d %B %Y, %H:%M WIB").to_string())
        .unwrap_or_else(|| now.format("%d %B %Y, %H:%M UTC").to_string());
    format!(
        "\nWAKTU SAAT INI: {}\n\
         Gunakan waktu ini jika pengguna bertanya tentang \"sekarang\" atau \"hari ini\".\n",
        local
    )
}

fn flow_section(flow: &ActiveFlow) -> String {
    let mut section = format!(
        "\n{SEPARATOR}\nFLOW PELAYANAN SIM AKTIF\n{SEPARATOR}\n\
         Node saat ini: {} ({})\n\
         Gunakan teks berikut apa adanya: \"{}\"\n",
        flow.node_id, flow.node_type, flow.text
    );

    if !flow.choices.is_empty() {
        section.push_str("Tampilkan pilihan dengan format:\n");
        for (i, choice) in flow.choices.iter().enumerate() {
            let _ = writeln!(section, "  {}. {}", i + 1, choice.label);
        }
    }

    if flow.node_type == NodeType::Collect {
        section.push_str("Ini adalah langkah upload dokumen. Minta pengguna mengupload file yang diminta.\n");
        if let Some(key) = &flow.collect_key {
            let _ = writeln!(section, "Dokumen yang diminta: {}", title_case(key));
        }
        if !flow.accepted_mime.is_empty() {
            let _ = writeln!(section, "Format yang diterima: {}", flow.accepted_mime.join(", "));
        }
    }

    section.push_str("PENTING: Ikuti teks dan urutan flow. Jangan tambahkan langkah lain.\n");
    section
}

fn service_section(info: &ServiceInfo) -> String {
    let Some(service) = &info.service else {
        return String::new();
    };

    let mut section = format!(
        "\n{SEPARATOR}\nINFORMASI PELAYANAN YANG DITANYAKAN\n{SEPARATOR}\n\
         Jenis pelayanan: {}\nDokumen yang perlu disiapkan:\n",
        title_case(&service.jenis_pelayanan)
    );
    for (i, doc) in service.dokumen_yang_perlu_disiapkan.iter().enumerate() {
        let _ = writeln!(section, "  {}. {}", i + 1, title_case(doc));
    }
    section.push_str(
        "Setelah menyampaikan dokumen, tanyakan apakah pengguna ingin dibantu. \
         Jika ya, minta pengguna mengupload dokumen tersebut.\n",
    );
    section
}

fn violation_section(info: &ViolationInfo) -> String {
    let mut section = format!(
        "\n{SEPARATOR}\nDATA E-TILANG YANG DICEK PENGGUNA\n{SEPARATOR}\n\
         Nomor polisi: {}\nNomor rangka: {}\nNama pemilik: {}\nJenis kendaraan: {}\n",
        info.plate_number, info.chassis_number, info.owner_name, info.vehicle_type
    );

    if info.has_violation && !info.violations.is_empty() {
        let _ = writeln!(
            section,
            "STATUS: ADA PELANGGARAN ({} pelanggaran), total denda Rp {}",
            info.violations.len(),
            format_rupiah(info.total_fine)
        );
        for (i, v) in info.violations.iter().enumerate() {
            let status = match v.status {
                ViolationStatus::Unpaid => "Belum dibayar",
                ViolationStatus::Paid => "Sudah dibayar",
                ViolationStatus::Processed => "Dalam proses",
            };
            let _ = writeln!(
                section,
                "  {}. {} | {} | {} | Rp {} | {} | {}",
                i + 1,
                v.date,
                v.violation,
                v.location,
                format_rupiah(v.fine),
                v.officer_name,
                status
            );
        }
        section.push_str("Ingatkan pengguna untuk segera melunasi denda yang belum dibayar.\n");
    } else {
        section.push_str("STATUS: TIDAK ADA PELANGGARAN. Berikan apresiasi kepada pengguna.\n");
    }
    section
}

fn documents_section(context: &TurnContext) -> String {
    let mut section = format!(
        "\n{SEPARATOR}\nDOKUMEN DITERIMA ({} dokumen)\n{SEPARATOR}\n",
        context.uploaded_document_count()
    );
    for (i, doc) in context.documents.iter().enumerate() {
        let description = doc.description.as_deref().unwrap_or("-");
        let _ = writeln!(
            section,
            "  {}. {} ({}) - {}",
            i + 1,
            doc.file_name,
            doc.file_type,
            description
        );
    }
    section.push_str(
        "Konfirmasi bahwa dokumen sudah diterima dan jelaskan tahapan berikutnya: \
         verifikasi kelengkapan, pemeriksaan validitas data, proses administrasi \
         (estimasi 1-3 hari kerja).\n",
    );
    section
}

const GUIDELINES: &str = "
TUGAS ANDA:
- Menjawab pertanyaan terkait peraturan lalu lintas dan pelayanan kepolisian Indonesia
- Mengingatkan keselamatan berkendara
- Menyampaikan data e-tilang dan pelayanan jika tersedia di konteks
- Mengingat dan merujuk informasi dari pesan sebelumnya; jangan menanyakan hal yang sama berulang kali

GAYA KOMUNIKASI:
- Ramah, santai tapi informatif, dalam Bahasa Indonesia
- Jelas dan ringkas, gunakan penomoran untuk daftar
- Jika pelayanan tidak ada di data, sarankan menghubungi kantor polisi terdekat
";

/// Formats an amount with `.` thousands separators: `750000` -> `750.000`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// `"fotokopi_KTP"` -> `"Fotokopi Ktp"`.
fn title_case(raw: &str) -> String {
    raw.replace('_', " ")
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
