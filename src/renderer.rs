//! Rendering session state to different output formats

use crate::session::SessionState;
use crate::world::{ViewCell, WorldView};

/// Trait for rendering session state to various formats
pub trait Renderer {
    type Output;
    type Error;

    fn render(&self, state: &SessionState) -> Result<Self::Output, Self::Error>;
}

/// Text renderer for terminals, LLM agents, and debugging
pub struct TextRenderer {
    /// Append a glyph legend
    pub show_legend: bool,
    /// Draw elevations as digits instead of terrain glyphs
    pub show_levels: bool,
    /// Blank out cells the agent has never sensed
    pub fog_of_war: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            show_legend: true,
            show_levels: false,
            fog_of_war: true,
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimal() -> Self {
        Self {
            show_legend: false,
            show_levels: false,
            fog_of_war: true,
        }
    }

    fn glyph(&self, cell: &ViewCell) -> char {
        if cell.agent {
            return '@';
        }
        if self.fog_of_war && !cell.known {
            return ' ';
        }
        if self.show_levels && !cell.tile.kind.is_wall() && !cell.tile.kind.is_gold() {
            return match cell.tile.level {
                l @ 0..=9 => (b'0' + l as u8) as char,
                _ => '+',
            };
        }
        cell.tile.kind.display_char()
    }

    /// Render the view window to a grid of glyphs
    fn render_view(&self, view: &WorldView) -> String {
        let size = view.size();
        let mut lines = Vec::new();
        for row in 0..size {
            let mut line = String::new();
            for col in 0..size {
                if let Some(cell) = view.cell(row, col) {
                    line.push(self.glyph(cell));
                }
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

impl Renderer for TextRenderer {
    type Output = String;
    type Error = std::convert::Infallible;

    fn render(&self, state: &SessionState) -> Result<String, Self::Error> {
        let mut output = String::new();

        output.push_str(&format!(
            "Turn: {} | Phase: {:?} | Carrying: {}\n",
            state.turn,
            state.phase,
            if state.carrying { "yes" } else { "no" }
        ));
        output.push_str(&format!(
            "Position: ({}, {}) | Known: {} | Visited: {}{}\n",
            state.position.0,
            state.position.1,
            state.tiles_known,
            state.cells_visited,
            if state.gold_located {
                " | Gold sighted"
            } else {
                ""
            }
        ));
        output.push('\n');

        output.push_str(&self.render_view(&state.view));
        output.push('\n');

        if self.show_legend {
            output.push('\n');
            output.push_str("@ agent  . open  # wall  o block  $ gold  (blank = unsensed)\n");
        }

        Ok(output)
    }
}

/// JSON renderer for structured output
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    type Output = String;
    type Error = serde_json::Error;

    fn render(&self, state: &SessionState) -> Result<String, Self::Error> {
        serde_json::to_string_pretty(state)
    }
}

/// Compact JSON renderer (no pretty printing)
pub struct CompactJsonRenderer;

impl Renderer for CompactJsonRenderer {
    type Output = String;
    type Error = serde_json::Error;

    fn render(&self, state: &SessionState) -> Result<String, Self::Error> {
        serde_json::to_string(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::session::Session;
    use crate::world::World;

    fn small_session() -> Session {
        let world = World::from_rows(
            &[
                "#####",
                "#.@.#",
                "#####",
            ],
            8,
        );
        let config = SessionConfig {
            view_radius: 1,
            ..SessionConfig::default()
        };
        Session::from_world(config, world, 0)
    }

    #[test]
    fn test_text_renderer_shows_the_agent() {
        let mut session = small_session();
        session.step();
        let state = session.get_state();

        let output = TextRenderer::new().render(&state).unwrap();
        assert!(output.contains("Turn: 1"));
        assert!(output.contains('@'));
        assert!(output.contains("agent"));
    }

    #[test]
    fn test_fog_hides_unsensed_cells() {
        let session = small_session();
        let state = session.get_state();

        // Nothing sensed yet: fog blanks everything but the agent.
        let fogged = TextRenderer::minimal().render(&state).unwrap();
        assert!(!fogged.contains('#'));
        assert!(fogged.contains('@'));

        let mut truth = TextRenderer::minimal();
        truth.fog_of_war = false;
        let output = truth.render(&state).unwrap();
        assert!(output.contains('#'));
        assert!(output.contains('.'));
    }

    #[test]
    fn test_level_digits() {
        let world = World::from_rows(
            &[
                "#####",
                "#12@#",
                "#####",
            ],
            8,
        );
        let config = SessionConfig {
            view_radius: 1,
            ..SessionConfig::default()
        };
        let session = Session::from_world(config, world, 0);

        let renderer = TextRenderer {
            show_legend: false,
            show_levels: true,
            fog_of_war: false,
        };
        let output = renderer.render(&session.get_state()).unwrap();
        assert!(output.contains('2'));
        assert!(output.contains('@'));
    }

    #[test]
    fn test_json_renderer() {
        let mut session = small_session();
        session.step();
        let state = session.get_state();

        let output = JsonRenderer.render(&state).unwrap();
        assert!(output.contains("\"turn\""));
        assert!(output.contains("\"phase\""));

        let compact = CompactJsonRenderer.render(&state).unwrap();
        assert!(!compact.contains('\n'));
    }
}
