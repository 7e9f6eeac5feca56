//! crates/podcast_studio_core/src/personas.rs
//!
//! The built-in persona catalog and helpers for looking personas up or
//! picking a random cast for a generation.

use crate::domain::Persona;
use once_cell::sync::Lazy;
use rand::{seq::SliceRandom, Rng};

fn builtin(
    id: &str,
    name: &str,
    role: &str,
    voice_id: &str,
    personality: &str,
    speaking_style: &str,
    avatar: &str,
) -> Persona {
    Persona {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        voice_id: voice_id.to_string(),
        personality: personality.to_string(),
        speaking_style: speaking_style.to_string(),
        avatar: avatar.to_string(),
        is_custom: false,
    }
}

static DEFAULT_PERSONAS: Lazy<Vec<Persona>> = Lazy::new(|| {
    vec![
        builtin(
            "professor",
            "Dr. Sarah Chen",
            "Subject Matter Expert",
            "voice_1",
            "Thoughtful, precise, occasionally excited by complex ideas",
            "Academic but accessible, defines jargon clearly",
            "👩‍🏫",
        ),
        builtin(
            "journalist",
            "Marcus Rivera",
            "Investigative Journalist",
            "voice_2",
            "Curious, skeptical, asks probing questions",
            "Clear, direct, challenges assumptions",
            "📰",
        ),
        builtin(
            "student",
            "Alex Kim",
            "Curious Student",
            "voice_3",
            "Enthusiastic, asks clarifying questions, relates to everyday life",
            "Conversational, uses analogies, seeks practical applications",
            "🎓",
        ),
        builtin(
            "analyst",
            "Dr. James Wright",
            "Critical Analyst",
            "voice_4",
            "Analytical, methodical, focuses on evidence and logic",
            "Structured, references data, identifies patterns",
            "📊",
        ),
        builtin(
            "storyteller",
            "Maya Patel",
            "Creative Storyteller",
            "voice_5",
            "Imaginative, finds narrative threads, makes content engaging",
            "Vivid descriptions, uses metaphors, creates compelling narratives",
            "📚",
        ),
    ]
});

/// Every built-in persona, in catalog order.
pub fn all() -> &'static [Persona] {
    &DEFAULT_PERSONAS
}

pub fn get_persona_by_id(id: &str) -> Option<&'static Persona> {
    DEFAULT_PERSONAS.iter().find(|persona| persona.id == id)
}

/// Picks `count` distinct personas in random order, capped at the catalog size.
pub fn random_personas(count: usize) -> Vec<Persona> {
    random_personas_with(&mut rand::thread_rng(), count)
}

pub fn random_personas_with<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<Persona> {
    DEFAULT_PERSONAS
        .choose_multiple(rng, count)
        .cloned()
        .collect()
}
