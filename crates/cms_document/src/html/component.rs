use crate::error::DocumentResult;
use crate::marker::Attributes;
use crate::renderer::DocumentRenderer;
use crate::state::DocumentState;

/// Renders the main component.
///
/// The component's output is normally placed in the buffer before the
/// document renders, so this renderer only runs when nothing was seeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentRenderer;

impl DocumentRenderer for ComponentRenderer {
    fn render(
        &self,
        _state: &mut DocumentState,
        _name: Option<&str>,
        _attributes: &Attributes,
        content: Option<&str>,
    ) -> DocumentResult<String> {
        Ok(content.unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_returns_override() {
        let mut state = DocumentState::new("html");
        let renderer = ComponentRenderer;
        let attrs = Attributes::new();

        assert_eq!(renderer.render(&mut state, None, &attrs, None).unwrap(), "");
        assert_eq!(
            renderer
                .render(&mut state, None, &attrs, Some("<main/>"))
                .unwrap(),
            "<main/>"
        );
    }
}
