//! Built-in child personas, their scripted replies, and therapist matching.

use serde::{Deserialize, Serialize};

/// A simulated child patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: &'static str,
    pub name: &'static str,
    pub age: u8,
    pub condition: &'static str,
    pub preferred_art: &'static str,
    #[serde(skip)]
    pub replies: &'static [&'static str],
}

/// A specialist therapist for one condition.
#[derive(Debug, Clone, Copy)]
struct Specialist {
    condition: &'static str,
    name: &'static str,
    specialization: &'static str,
    art_forms: &'static [&'static str],
    experience: &'static str,
}

/// Therapist matched to a persona, passed through to the dashboard as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTherapist {
    pub name: String,
    pub specialization: String,
    pub experience: String,
    pub art_forms: Vec<String>,
    #[serde(default)]
    pub art_match: bool,
    /// 0-100.
    pub match_score: u8,
}

const PERSONAS: &[Persona] = &[
    Persona {
        id: "aarav",
        name: "Aarav Shah",
        age: 6,
        condition: "asthma",
        preferred_art: "drawing",
        replies: &[
            "Hi! I'm Aarav. Sometimes it's hard to breathe, but drawing makes me feel better.",
            "I love using bright colors! They help me forget about my inhaler.",
            "Yesterday, I drew a picture of me playing soccer without getting tired. That's my dream!",
            "When I feel scared about breathing, I draw superheroes who have special breathing powers.",
            "My favorite thing to draw is the sky. It's so big and full of air!",
            "The doctor said my breathing is getting better. I drew a happy face to celebrate!",
            "Sometimes I get nervous at school when I can't breathe well, but my drawings help me stay calm.",
            "I made a comic book about a boy who turns his inhaler into a magic wand!",
            "Drawing helps me show others how I feel when my chest gets tight.",
            "I want to be an artist when I grow up. Maybe I'll draw comics about kids like me!",
        ],
    },
    Persona {
        id: "dani",
        name: "Dani Johnson",
        age: 5,
        condition: "diabetes",
        preferred_art: "painting",
        replies: &[
            "Hello! I'm Dani. I love painting butterflies - they remind me that changes can be beautiful.",
            "Today I painted my insulin pump with flowers. Now it looks pretty!",
            "Sometimes I feel different from other kids, but my art shows I'm special.",
            "I made a rainbow painting about being brave during my doctor visits.",
            "Painting helps me tell my friends how I feel without using words.",
            "I learned a new way to mix colors today. It's like mixing my medicine - it has to be just right!",
            "When I'm scared about needles, I paint happy things to feel better.",
            "My favorite colors are pink and purple. They make me feel strong!",
            "I painted my whole family today, including my doctor who helps me stay healthy.",
            "Art class is my favorite because I can express myself and forget about diabetes for a while.",
        ],
    },
    Persona {
        id: "leo",
        name: "Leo Thomas",
        age: 7,
        condition: "cancer",
        preferred_art: "music",
        replies: &[
            "Hi, I'm Leo! Music makes me feel stronger, even on tough treatment days.",
            "I wrote a song about being a brave knight fighting dragons. The dragons are like my cancer.",
            "The hospital isn't so scary when I can play music. It's like having a superpower!",
            "Today I learned a new song on the piano. It made all the doctors smile!",
            "Sometimes I feel tired, but music gives me energy to keep going.",
            "I made up a special song for when I take my medicine. It helps me be brave.",
            "The nurses say I'm their favorite musician. That makes me happy!",
            "When I can't sleep, I hum my favorite tunes and imagine nice dreams.",
            "Music therapy is the best part of my day. It makes me forget about being sick.",
            "I want to play in a big concert someday and show other kids that they can be strong too!",
        ],
    },
];

const SPECIALISTS: &[Specialist] = &[
    Specialist {
        condition: "asthma",
        name: "Dr. Sarah Chen",
        specialization: "Respiratory conditions",
        art_forms: &["drawing", "painting"],
        experience: "8 years with pediatric asthma patients",
    },
    Specialist {
        condition: "diabetes",
        name: "Dr. Michael Rodriguez",
        specialization: "Endocrine disorders",
        art_forms: &["painting", "sculpting"],
        experience: "10 years with pediatric diabetes care",
    },
    Specialist {
        condition: "cancer",
        name: "Dr. Emily Thompson",
        specialization: "Oncology",
        art_forms: &["drawing", "music"],
        experience: "12 years in pediatric oncology",
    },
];

/// All built-in personas.
pub fn personas() -> &'static [Persona] {
    PERSONAS
}

/// Look up a persona by id.
pub fn find_persona(id: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.id == id)
}

impl Persona {
    /// The scripted reply after `child_turns` earlier replies, wrapping around.
    pub fn reply(&self, child_turns: usize) -> &'static str {
        self.replies[child_turns % self.replies.len()]
    }
}

/// Match a therapist to a persona by condition; scores 100 when the
/// therapist works in the persona's preferred art form, 70 otherwise.
pub fn match_therapist(persona_id: &str) -> Option<MatchedTherapist> {
    let persona = find_persona(persona_id)?;
    let specialist = SPECIALISTS
        .iter()
        .find(|s| s.condition == persona.condition)?;
    let art_match = specialist.art_forms.contains(&persona.preferred_art);

    Some(MatchedTherapist {
        name: specialist.name.to_string(),
        specialization: specialist.specialization.to_string(),
        experience: specialist.experience.to_string(),
        art_forms: specialist.art_forms.iter().map(|s| s.to_string()).collect(),
        art_match,
        match_score: if art_match { 100 } else { 70 },
    })
}
