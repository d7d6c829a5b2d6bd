use crate::render::TextureId;

/// Button interaction state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HoverState {
    Disabled,
    Idle,
    MouseOver,
}

/// Sprite set for a button: normal, disabled, highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonTextures {
    pub enabled: TextureId,
    pub disabled: TextureId,
    pub highlighted: TextureId,
}

impl Default for ButtonTextures {
    fn default() -> Self {
        Self {
            enabled: TextureId::new("widget/button"),
            disabled: TextureId::new("widget/button_disabled"),
            highlighted: TextureId::new("widget/button_highlighted"),
        }
    }
}

impl ButtonTextures {
    pub fn get(&self, enabled: bool, focused: bool) -> &TextureId {
        match (enabled, focused) {
            (false, _) => &self.disabled,
            (true, true) => &self.highlighted,
            (true, false) => &self.enabled,
        }
    }

    pub fn for_state(&self, state: HoverState) -> &TextureId {
        self.get(state != HoverState::Disabled, state == HoverState::MouseOver)
    }
}

/// Checkbox sprite for the given focus/checked combination.
pub fn checkbox_sprite(focused: bool, checked: bool) -> TextureId {
    TextureId::new(match (checked, focused) {
        (true, true) => "widget/checkbox_selected_highlighted",
        (true, false) => "widget/checkbox_selected",
        (false, true) => "widget/checkbox_highlighted",
        (false, false) => "widget/checkbox",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_sprites_by_state() {
        let t = ButtonTextures::default();
        assert_eq!(t.for_state(HoverState::Disabled).as_str(), "widget/button_disabled");
        assert_eq!(t.for_state(HoverState::Idle).as_str(), "widget/button");
        assert_eq!(t.for_state(HoverState::MouseOver).as_str(), "widget/button_highlighted");
    }

    #[test]
    fn checkbox_sprites() {
        assert_eq!(checkbox_sprite(true, true).as_str(), "widget/checkbox_selected_highlighted");
        assert_eq!(checkbox_sprite(false, true).as_str(), "widget/checkbox_selected");
        assert_eq!(checkbox_sprite(true, false).as_str(), "widget/checkbox_highlighted");
        assert_eq!(checkbox_sprite(false, false).as_str(), "widget/checkbox");
    }
}
