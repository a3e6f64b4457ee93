// src/llm/prompt.rs

use serde::Serialize;

use super::client::ChatMessage;
use crate::models::question::StoredContent;

const VARIANT_SYSTEM_PROMPT: &str = "You write clinical case questions for a medical education app \
used by Indonesian medical students preparing for the national competency exam. Every question has \
a scenario, five options, one correct answer, a discussion and a learning objective, and meets \
strict academic and clinical standards.";

const DISCUSSION_SYSTEM_PROMPT: &str = "You review clinical case questions for a medical education app \
used by Indonesian medical students. You write rigorous, well-referenced explanations of why the \
correct option is right and why every other option is wrong.";

/// Keys a generated question draft must contain.
pub const DRAFT_KEYS: &[&str] = &[
    "scenario",
    "question",
    "option_a",
    "option_b",
    "option_c",
    "option_d",
    "option_e",
    "correct_answer",
    "discussion",
    "learning_objective",
];

pub const DISCUSSION_KEYS: &[&str] = &["discussion"];

/// The fields sent when only the discussion is being rewritten.
#[derive(Debug, Serialize)]
struct DiscussionInput<'a> {
    scenario: &'a Option<String>,
    question: &'a Option<String>,
    option_a: &'a Option<String>,
    option_b: &'a Option<String>,
    option_c: &'a Option<String>,
    option_d: &'a Option<String>,
    option_e: &'a Option<String>,
    correct_answer: &'a Option<String>,
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn variant_prompt(original: &StoredContent) -> String {
    format!(
        r#"Di bawah ini adalah sebuah soal kasus klinis setingkat UKMPPD dalam format JSON:

{original}

Kerjakan langkah berikut:
1. Tentukan konsep klinis atau diagnosis inti yang diuji oleh soal tersebut (berdasarkan kunci jawabannya), beserta jenis soalnya (diagnosis, tata laksana, pemeriksaan penunjang, patofisiologi, dan sebagainya).
2. Tulis soal baru dengan konsep dan jenis soal yang sama, tetapi dengan skenario klinis yang benar-benar berbeda, bukan parafrase dan bukan pengulangan pola.
3. Skenario dapat memuat anamnesis, pemeriksaan fisik, EKG, laboratorium, radiologi, atau kombinasinya.
4. Arahkan peserta untuk bernalar klinis hingga sampai pada jawaban yang tepat.
5. Sediakan lima pilihan jawaban (A sampai E) yang sama-sama kredibel secara medis, dengan tepat satu jawaban benar.
6. Tulis pembahasan yang komprehensif: mengapa jawaban benar paling tepat dan mengapa setiap opsi lain keliru, berdasarkan ilmu dan data klinis.
7. Tulis "learning_objective" yang ringkas: konsep inti yang harus dikuasai calon dokter untuk menjawab soal ini (teori dasar, diagnosis utama, tanda klinis penting, dan pendekatan terapi), tanpa mengulang rincian skenario.

Jawab HANYA dengan JSON valid berstruktur berikut, tanpa teks lain:
{{
  "scenario": "",
  "question": "",
  "option_a": "",
  "option_b": "",
  "option_c": "",
  "option_d": "",
  "option_e": "",
  "correct_answer": "",
  "discussion": "",
  "learning_objective": ""
}}

Nilai "correct_answer" harus salah satu huruf A, B, C, D, atau E.
Gunakan Bahasa Indonesia akademik yang jelas, runtut, dan klinis."#,
        original = pretty(original)
    )
}

pub fn discussion_prompt(original: &StoredContent) -> String {
    let input = DiscussionInput {
        scenario: &original.scenario,
        question: &original.question,
        option_a: &original.option_a,
        option_b: &original.option_b,
        option_c: &original.option_c,
        option_d: &original.option_d,
        option_e: &original.option_e,
        correct_answer: &original.correct_answer,
    };

    format!(
        r#"Di bawah ini adalah sebuah soal kasus klinis setingkat UKMPPD beserta kunci jawabannya, dalam format JSON:

{input}

Tulis ulang pembahasan soal ini secara komprehensif:
- Jelaskan mengapa kunci jawaban merupakan pilihan paling tepat, dikaitkan dengan temuan pada skenario.
- Jelaskan satu per satu mengapa setiap opsi lain keliru.
- Jangan mengubah skenario, pertanyaan, pilihan jawaban, maupun kunci jawaban.

Jawab HANYA dengan JSON valid berstruktur berikut, tanpa teks lain:
{{
  "discussion": ""
}}

Gunakan Bahasa Indonesia akademik yang jelas, runtut, dan klinis."#,
        input = pretty(&input)
    )
}

pub fn variant_messages(original: &StoredContent) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(VARIANT_SYSTEM_PROMPT),
        ChatMessage::user(variant_prompt(original)),
    ]
}

pub fn discussion_messages(original: &StoredContent) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(DISCUSSION_SYSTEM_PROMPT),
        ChatMessage::user(discussion_prompt(original)),
    ]
}
