use crate::models::Urgency;

const EMERGENCY_KEYWORDS: &[&str] = &[
    "emergency",
    "urgent",
    "immediately",
    "911",
    "severe",
    "critical",
];

const URGENT_KEYWORDS: &[&str] = &[
    "pain",
    "bleeding",
    "difficulty breathing",
    "chest pain",
    "allergic reaction",
];

// Checked in order; the first matching set wins.
const RULES: &[(&[&str], Urgency)] = &[
    (EMERGENCY_KEYWORDS, Urgency::Emergency),
    (URGENT_KEYWORDS, Urgency::Urgent),
];

pub fn classify_urgency(text: &str) -> Urgency {
    let lower = text.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| contains_any(&lower, keywords))
        .map(|(_, level)| *level)
        .unwrap_or(Urgency::Normal)
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
