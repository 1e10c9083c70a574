use rand::Rng;
use tracing::info;

use crate::dom::{ids, Element, Page};

pub const PARTICLE_COUNT: usize = 40;
pub const PALETTE: [&str; 4] = ["#ffd166", "#06d6a0", "#118ab2", "#ef476f"];

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub size_px: f64,
    pub color: &'static str,
    pub left_pct: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Particle {
    pub fn random<R: Rng + ?Sized>(index: usize, rng: &mut R) -> Self {
        Self {
            size_px: rng.gen_range(4.0..=10.0),
            color: PALETTE[index % PALETTE.len()],
            left_pct: rng.gen_range(0.0..=100.0),
            duration_s: rng.gen_range(3.0..=5.0),
            delay_s: rng.gen_range(0.0..=0.5),
        }
    }

    pub fn to_element(&self) -> Element {
        let size = format!("{:.1}px", self.size_px);
        Element::new("div")
            .with_class("confetti-particle")
            .with_style("width", size.clone())
            .with_style("height", size)
            .with_style("background", self.color)
            .with_style("left", format!("{:.1}%", self.left_pct))
            .with_style("animation-duration", format!("{:.2}s", self.duration_s))
            .with_style("animation-delay", format!("{:.2}s", self.delay_s))
    }
}

/// Fills the confetti container. Returns how many particles were added, which
/// is zero when the page has no container.
pub fn celebrate<R: Rng + ?Sized>(page: &mut Page, rng: &mut R) -> usize {
    if !page.contains(ids::CONFETTI) {
        return 0;
    }
    for index in 0..PARTICLE_COUNT {
        let particle = Particle::random(index, rng);
        page.append_child(ids::CONFETTI, particle.to_element());
    }
    info!(count = PARTICLE_COUNT, "confetti launched");
    PARTICLE_COUNT
}

pub fn clear(page: &mut Page) -> usize {
    page.clear_children(ids::CONFETTI)
}

pub fn particle_count(page: &Page) -> usize {
    page.find(ids::CONFETTI)
        .map(|container| container.children().len())
        .unwrap_or(0)
}
