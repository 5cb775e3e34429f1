//! Story chapter screens
//!
//! A lore screen runs through three phases (decrypting, visualizing,
//! reading) on fixed timers, then waits for the player to tap continue.
//! Chapter content is static data keyed by [`LoreKey`].

use serde::{Deserialize, Serialize};

/// Which story chapter a lore screen shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoreKey {
    Intro,
    Celebration,
    Distance,
    Stars,
    Care,
}

impl LoreKey {
    /// Parse a chapter name; unknown names fall back to the intro chapter
    /// so a bad key shows the opening text instead of a blank screen.
    pub fn parse(s: &str) -> Self {
        match s {
            "celebration" => Self::Celebration,
            "distance" => Self::Distance,
            "stars" => Self::Stars,
            "care" => Self::Care,
            _ => Self::Intro,
        }
    }
}

/// Static content for one chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoreEntry {
    pub chapter: &'static str,
    pub title: &'static str,
    pub image: &'static str,
    pub date: &'static str,
    pub text: &'static str,
}

/// Chapter content lookup; total over the key space
pub fn entry(key: LoreKey) -> LoreEntry {
    match key {
        LoreKey::Intro => LoreEntry {
            chapter: "Capítulo 01",
            title: "O Começo de Tudo",
            image: "./cpgo.jpg",
            date: "21 NOV 2025",
            text: "Foi onde o player 1 encontrou o player 2. No meio de tanta \
                   tecnologia, o melhor algoritmo foi o destino nos juntando.",
        },
        LoreKey::Celebration => LoreEntry {
            chapter: "Capítulo 02",
            title: "Momentos de Alegria",
            image: "./ano_novo.jpeg",
            date: "31 DEZ 2023",
            text: "Cada celebração se torna especial quando compartilhamos com \
                   quem amamos. Risadas que ecoam no tempo.",
        },
        LoreKey::Distance => LoreEntry {
            chapter: "Capítulo 03",
            title: "Superando Obstáculos",
            image: "./surpresa.jpg",
            date: "17 JAN 2025",
            text: "A distância é apenas um número quando dois corações estão \
                   conectados. Cada quilometro percorrido vale a pena.",
        },
        LoreKey::Stars => LoreEntry {
            chapter: "Capítulo 04",
            title: "Sob as Estrelas",
            image: "./ela_aqui.jpeg",
            date: "25 JAN 2025",
            text: "Mesmo longe, olhamos para o mesmo céu. As estrelas são \
                   testemunhas silenciosas do nosso amor.",
        },
        LoreKey::Care => LoreEntry {
            chapter: "Capítulo 05",
            title: "Cuidado e Carinho",
            image: "./aleatoria.jpg",
            date: "HOJE",
            text: "Cuidar um do outro é a forma mais pura de amor. Cada gesto \
                   pequeno constrói algo grande.",
        },
    }
}

/// Presentation phase of a lore screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LorePhase {
    Decrypting,
    Visualizing,
    Reading,
}

const DECRYPT_MS: f32 = 1000.0;
const VISUALIZE_MS: f32 = 800.0;

#[derive(Debug, Clone)]
pub struct LoreScene {
    pub key: LoreKey,
    phase: LorePhase,
    phase_timer_ms: f32,
}

impl LoreScene {
    pub fn new(key: LoreKey) -> Self {
        Self {
            key,
            phase: LorePhase::Decrypting,
            phase_timer_ms: 0.0,
        }
    }

    pub fn phase(&self) -> LorePhase {
        self.phase
    }

    pub fn entry(&self) -> LoreEntry {
        entry(self.key)
    }

    /// The continue control is only live once the text is on screen
    pub fn can_continue(&self) -> bool {
        self.phase == LorePhase::Reading
    }

    pub fn update(&mut self, dt_ms: f32) {
        self.phase_timer_ms += dt_ms;
        match self.phase {
            LorePhase::Decrypting if self.phase_timer_ms >= DECRYPT_MS => {
                self.phase = LorePhase::Visualizing;
                self.phase_timer_ms = 0.0;
            }
            LorePhase::Visualizing if self.phase_timer_ms >= VISUALIZE_MS => {
                self.phase = LorePhase::Reading;
                self.phase_timer_ms = 0.0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_falls_back_to_intro() {
        assert_eq!(LoreKey::parse("no_such_chapter"), LoreKey::Intro);
        assert_eq!(LoreKey::parse("stars"), LoreKey::Stars);
    }

    #[test]
    fn test_phases_run_on_timers() {
        let mut scene = LoreScene::new(LoreKey::Distance);
        assert_eq!(scene.phase(), LorePhase::Decrypting);
        assert!(!scene.can_continue());
        scene.update(1000.0);
        assert_eq!(scene.phase(), LorePhase::Visualizing);
        scene.update(799.0);
        assert_eq!(scene.phase(), LorePhase::Visualizing);
        scene.update(1.0);
        assert_eq!(scene.phase(), LorePhase::Reading);
        assert!(scene.can_continue());
    }

    #[test]
    fn test_every_key_has_content() {
        for key in [
            LoreKey::Intro,
            LoreKey::Celebration,
            LoreKey::Distance,
            LoreKey::Stars,
            LoreKey::Care,
        ] {
            let e = entry(key);
            assert!(!e.text.is_empty());
            assert!(e.chapter.starts_with("Capítulo"));
        }
    }
}
