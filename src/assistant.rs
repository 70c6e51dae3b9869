//! Canned-response health assistant.
//!
//! Keyword matching over the incoming message; no model behind it.

/// Opening message shown when a conversation starts.
pub const GREETING: &str = "Hello! I'm your health assistant. I can help you understand symptoms, \
     suggest when to see a doctor, and provide general health information. How can I help you today?";

const HEADACHE: &str = "Headaches can be caused by various factors including stress, dehydration, \
     or eye strain. If you're experiencing frequent headaches, try to rest, stay hydrated, and \
     consider over-the-counter pain relievers if needed. If headaches are severe, sudden, or \
     accompanied by other symptoms like fever, vision changes, or neck stiffness, please consult \
     a healthcare provider promptly.";

const FEVER: &str = "Fever is often a sign that your body is fighting an infection. Rest, stay \
     hydrated, and take over-the-counter fever reducers like acetaminophen if needed. Seek medical \
     attention if your fever is very high (above 103\u{b0}F/39.4\u{b0}C), lasts more than three days, or is \
     accompanied by severe symptoms like difficulty breathing, chest pain, or confusion.";

const COUGH: &str = "Coughs can be caused by various conditions including the common cold, \
     allergies, or respiratory infections. Stay hydrated, use honey (if over 1 year old) for \
     soothing, and consider over-the-counter cough medicines. If your cough persists for more than \
     2 weeks, produces colored phlegm, or is accompanied by shortness of breath or fever, please \
     consult with a healthcare provider.";

const FALLBACK: &str = "I understand you're concerned about your health. While I can provide \
     general information, for accurate diagnosis and treatment, it's best to consult with a \
     healthcare professional. Would you like to tell me more about your symptoms so I can provide \
     some general guidance?";

/// Picks the canned response for a message. Case-insensitive; the first
/// matching keyword wins, otherwise the generic fallback.
pub fn reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    if message.contains("headache") {
        HEADACHE
    } else if message.contains("fever") {
        FEVER
    } else if message.contains("cough") {
        COUGH
    } else {
        FALLBACK
    }
}
