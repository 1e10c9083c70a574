use std::fmt;

use tracing::{info, trace};
use url::Url;

use crate::dom::{ids, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneId {
    #[default]
    Scene1,
    Scene2,
    Scene3,
}

impl SceneId {
    pub const ALL: [SceneId; 3] = [SceneId::Scene1, SceneId::Scene2, SceneId::Scene3];

    /// Picks the slide named anywhere in `query`, ignoring case. `scene2` wins
    /// over `scene3`, and anything else falls back to `scene1`.
    pub fn from_query(query: &str) -> SceneId {
        let query = query.to_ascii_lowercase();
        if query.contains("scene2") {
            SceneId::Scene2
        } else if query.contains("scene3") {
            SceneId::Scene3
        } else {
            SceneId::Scene1
        }
    }

    pub fn from_url(url: &Url) -> SceneId {
        Self::from_query(url.query().unwrap_or_default())
    }

    pub fn element_id(self) -> &'static str {
        match self {
            SceneId::Scene1 => ids::SCENE1,
            SceneId::Scene2 => ids::SCENE2,
            SceneId::Scene3 => ids::SCENE3,
        }
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

pub fn activate(page: &mut Page, scene: SceneId) {
    for other in SceneId::ALL {
        match page.find_mut(other.element_id()) {
            Some(slide) => slide.set_hidden(other != scene),
            None => trace!(%other, "slide container missing"),
        }
    }
    info!(%scene, "scene activated");
}
